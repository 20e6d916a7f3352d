// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric parameterization.
//!
//! The mesh and volume kernels are generic over a scalar type so that both
//! single- and double-precision instantiations exist as monomorphizations of
//! the same code, rather than as hand-duplicated modules.

use glam::{DVec2, DVec3, Vec2, Vec3};
use num_traits::{Float, NumCast};

/// A floating-point scalar usable throughout the mesh and volume kernels.
///
/// Implemented for `f32` and `f64`. Pulls in [`num_traits::Float`] for the
/// arithmetic surface (`sqrt`, `abs`, `min`/`max`, ...) and ties each scalar
/// to its matching `glam` vector/point types via associated types.
pub trait Scalar: Float + NumCast + Copy + std::fmt::Debug + 'static {
    type Vec3: Vec3Like<Scalar = Self>;
    type Vec2: Vec2Like<Scalar = Self>;

    /// The tie-band epsilon used throughout the raycaster's zero-crossing logic (1e-5).
    fn epsilon5() -> Self {
        NumCast::from(1e-5).unwrap()
    }
}

impl Scalar for f32 {
    type Vec3 = Vec3;
    type Vec2 = Vec2;
}

impl Scalar for f64 {
    type Vec3 = DVec3;
    type Vec2 = DVec2;
}

/// A 3-D vector/point type paired with a [`Scalar`].
pub trait Vec3Like: Copy + std::fmt::Debug + std::ops::Add<Output = Self> + std::ops::Sub<Output = Self> {
    type Scalar: Scalar<Vec3 = Self>;

    fn new(x: Self::Scalar, y: Self::Scalar, z: Self::Scalar) -> Self;
    fn splat(v: Self::Scalar) -> Self;
    fn x(self) -> Self::Scalar;
    fn y(self) -> Self::Scalar;
    fn z(self) -> Self::Scalar;
    fn get(self, axis: usize) -> Self::Scalar {
        match axis {
            0 => self.x(),
            1 => self.y(),
            2 => self.z(),
            _ => panic!("axis out of range: {axis}"),
        }
    }
    fn scale(self, s: Self::Scalar) -> Self;
    fn dot(self, rhs: Self) -> Self::Scalar;
    fn cross(self, rhs: Self) -> Self;
    fn length(self) -> Self::Scalar;
    fn normalize(self) -> Self;
    fn zero() -> Self {
        Self::splat(Self::Scalar::zero())
    }
}

/// A 2-D vector/UV type paired with a [`Scalar`].
pub trait Vec2Like: Copy + std::fmt::Debug + std::ops::Add<Output = Self> + std::ops::Sub<Output = Self> {
    type Scalar: Scalar<Vec2 = Self>;

    fn new(x: Self::Scalar, y: Self::Scalar) -> Self;
    fn x(self) -> Self::Scalar;
    fn y(self) -> Self::Scalar;
    fn zero() -> Self {
        Self::new(Self::Scalar::zero(), Self::Scalar::zero())
    }
}

impl Vec3Like for Vec3 {
    type Scalar = f32;

    fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3::new(x, y, z)
    }
    fn splat(v: f32) -> Self {
        Vec3::splat(v)
    }
    fn x(self) -> f32 {
        self.x
    }
    fn y(self) -> f32 {
        self.y
    }
    fn z(self) -> f32 {
        self.z
    }
    fn scale(self, s: f32) -> Self {
        self * s
    }
    fn dot(self, rhs: Self) -> f32 {
        Vec3::dot(self, rhs)
    }
    fn cross(self, rhs: Self) -> Self {
        Vec3::cross(self, rhs)
    }
    fn length(self) -> f32 {
        Vec3::length(self)
    }
    fn normalize(self) -> Self {
        Vec3::normalize(self)
    }
}

impl Vec3Like for DVec3 {
    type Scalar = f64;

    fn new(x: f64, y: f64, z: f64) -> Self {
        DVec3::new(x, y, z)
    }
    fn splat(v: f64) -> Self {
        DVec3::splat(v)
    }
    fn x(self) -> f64 {
        self.x
    }
    fn y(self) -> f64 {
        self.y
    }
    fn z(self) -> f64 {
        self.z
    }
    fn scale(self, s: f64) -> Self {
        self * s
    }
    fn dot(self, rhs: Self) -> f64 {
        DVec3::dot(self, rhs)
    }
    fn cross(self, rhs: Self) -> Self {
        DVec3::cross(self, rhs)
    }
    fn length(self) -> f64 {
        DVec3::length(self)
    }
    fn normalize(self) -> Self {
        DVec3::normalize(self)
    }
}

impl Vec2Like for Vec2 {
    type Scalar = f32;

    fn new(x: f32, y: f32) -> Self {
        Vec2::new(x, y)
    }
    fn x(self) -> f32 {
        self.x
    }
    fn y(self) -> f32 {
        self.y
    }
}

impl Vec2Like for DVec2 {
    type Scalar = f64;

    fn new(x: f64, y: f64) -> Self {
        DVec2::new(x, y)
    }
    fn x(self) -> f64 {
        self.x
    }
    fn y(self) -> f64 {
        self.y
    }
}
