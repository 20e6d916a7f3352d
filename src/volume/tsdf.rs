// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TSDF volume view: a read-only grid view over a caller-owned voxel buffer.

use num_traits::NumCast;

use crate::scalar::{Scalar, Vec3Like};

/// The externally-owned voxel buffer this view reads from. Two parallel
/// arrays: `word0` packs (distance, weight); `word1` packs RGBA. Pack format
/// is opaque here, only `crate::volume::codec` depends on it.
pub trait VoxelSource {
    /// Reads the packed voxel at `(i, j, k)`. Indices are assumed in range;
    /// implementations may panic or return a sentinel out-of-range word, the
    /// caller in this crate never calls `read` with an index outside
    /// `[0, resolution)` because `base_index` always clamps.
    fn read(&self, i: u32, j: u32, k: u32) -> (u64, u32);
}

/// A read-only view over a 3-D voxel grid: world-space origin, isotropic
/// voxel size, integer resolution, and truncation distance, plus a
/// reference to the externally-owned voxel buffer, which must outlive every
/// in-flight ray.
pub struct TsdfVolume<'a, S: Scalar, V: VoxelSource> {
    pub corner: S::Vec3,
    pub size: S,
    pub resolution: [u32; 3],
    pub truncation_distance: S,
    pub voxels: &'a V,
}

impl<'a, S: Scalar, V: VoxelSource> TsdfVolume<'a, S, V> {
    pub fn new(corner: S::Vec3, size: S, resolution: [u32; 3], truncation_distance: S, voxels: &'a V) -> Self {
        Self {
            corner,
            size,
            resolution,
            truncation_distance,
            voxels,
        }
    }

    /// `floor((p - corner) / size)` clamped into `[0, resolution - 1]` per
    /// axis.
    pub fn base_index(&self, p: S::Vec3) -> [u32; 3] {
        let rel = (p - self.corner).scale(self.size.recip());
        let axis = |value: S, res: u32| -> u32 {
            let floored = value.floor();
            let idx: i64 = NumCast::from(floored).unwrap_or(0);
            idx.clamp(0, res as i64 - 1) as u32
        };
        [
            axis(rel.x(), self.resolution[0]),
            axis(rel.y(), self.resolution[1]),
            axis(rel.z(), self.resolution[2]),
        ]
    }

    /// `(p - corner)/size - base`. Not clamped: callers
    /// sampling exactly at the last cell's far face legitimately see
    /// coordinates at or slightly past 1.0.
    pub fn local_coords(&self, p: S::Vec3, base: [u32; 3]) -> (S, S, S) {
        let rel = (p - self.corner).scale(self.size.recip());
        let base_s = |b: u32| -> S { NumCast::from(b).unwrap() };
        (
            rel.x() - base_s(base[0]),
            rel.y() - base_s(base[1]),
            rel.z() - base_s(base[2]),
        )
    }

    /// Reads the packed voxel at `(i, j, k)`, decoded into `S`-typed
    /// `(distance, weight, (r, g, b, a))`.
    pub fn read_decoded(&self, i: u32, j: u32, k: u32) -> (S, u32, (S, S, S, S)) {
        let (word0, word1) = self.voxels.read(i, j, k);
        let (distance, weight) = super::codec::unpack_distance_weight(word0);
        let (r, g, b, a) = super::codec::unpack_color(word1);
        let cast = |v: f32| -> S { NumCast::from(v).unwrap() };
        (cast(distance), weight, (cast(r), cast(g), cast(b), cast(a)))
    }

    /// Clamped world-space corner of voxel `(i, j, k)`.
    pub fn voxel_corner(&self, i: u32, j: u32, k: u32) -> S::Vec3 {
        let idx = |v: u32| -> S { NumCast::from(v).unwrap() };
        self.corner
            + S::Vec3::new(idx(i), idx(j), idx(k)).scale(self.size)
    }

    /// World-space max corner of the grid's sampling domain: the far corner
    /// of the last voxel sample, `corner + (resolution - 1) * size` per axis,
    /// not the far face of the last voxel cell.
    pub fn world_max_corner(&self) -> S::Vec3 {
        let idx = |v: u32| -> S { NumCast::from(v.saturating_sub(1)).unwrap() };
        self.corner
            + S::Vec3::new(idx(self.resolution[0]), idx(self.resolution[1]), idx(self.resolution[2])).scale(self.size)
    }
}
