// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The raycaster: slab intersection, trilinear interpolation, analytic
//! gradient, and the adaptive march.

use num_traits::NumCast;

use crate::scalar::{Scalar, Vec3Like};

use super::tsdf::{TsdfVolume, VoxelSource};

/// `minLength`/`maxLength`/`marchingStep`: the one caller-supplied
/// configuration value this crate has.
#[derive(Debug, Clone, Copy)]
pub struct RaycastParams<S: Scalar> {
    pub min_length: S,
    pub max_length: S,
    pub marching_step: S,
}

/// A successful raycast hit: the distance along the ray and the surface
/// normal there.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit<S: Scalar> {
    pub distance: S,
    pub normal: S::Vec3,
}

/// A hard cap on march steps, purely a hang guard against pathological
/// parameters (e.g. `marching_step <= 0`); never reached for any sane
/// combination of range and step size.
const MAX_MARCH_STEPS: usize = 1_000_000;

struct DistanceSample<S: Scalar> {
    value: S,
    valid: bool,
    coeffs: [S; 8],
    uvw: (S, S, S),
}

/// Eight corner values named `f_xyz`: `f000` is the base cell,
/// `f100`/`f010`/`f001` step one axis at a time.
struct Corners<S> {
    f000: S,
    f100: S,
    f010: S,
    f001: S,
    f110: S,
    f101: S,
    f011: S,
    f111: S,
}

fn coefficients<S: Scalar>(c: Corners<S>) -> [S; 8] {
    let c0 = c.f000;
    let c1 = c.f100 - c.f000;
    let c2 = c.f010 - c.f000;
    let c3 = c.f001 - c.f000;
    let c4 = c.f000 - c.f010 - c.f100 + c.f110;
    let c5 = c.f000 - c.f001 - c.f100 + c.f101;
    let c6 = c.f000 - c.f001 - c.f010 + c.f011;
    let c7 = c.f111 - c.f011 - c.f101 - c.f110 + c.f100 + c.f010 + c.f001 - c.f000;
    [c0, c1, c2, c3, c4, c5, c6, c7]
}

fn eval<S: Scalar>(coeffs: [S; 8], u: S, v: S, w: S) -> S {
    coeffs[0]
        + coeffs[1] * u
        + coeffs[2] * v
        + coeffs[3] * w
        + coeffs[4] * u * v
        + coeffs[5] * u * w
        + coeffs[6] * v * w
        + coeffs[7] * u * v * w
}

/// `(dF/du, dF/dv, dF/dw)`.
fn gradient<S: Scalar>(coeffs: [S; 8], u: S, v: S, w: S) -> (S, S, S) {
    let du = coeffs[1] + coeffs[4] * v + coeffs[5] * w + coeffs[7] * v * w;
    let dv = coeffs[2] + coeffs[4] * u + coeffs[6] * w + coeffs[7] * u * w;
    let dw = coeffs[3] + coeffs[5] * u + coeffs[6] * v + coeffs[7] * u * v;
    (du, dv, dw)
}

/// Clamps `base[axis] + delta` into `[0, resolution[axis] - 1]`.
fn neighbor_index(base: u32, delta: u32, resolution: u32) -> u32 {
    (base + delta).min(resolution.saturating_sub(1))
}

fn sample_distance<S: Scalar, V: VoxelSource>(volume: &TsdfVolume<S, V>, p: S::Vec3) -> DistanceSample<S> {
    let base = volume.base_index(p);
    let (u, v, w) = volume.local_coords(p, base);

    let mut values = [S::zero(); 8];
    let mut valid = true;
    for (idx, &(dx, dy, dz)) in [
        (0u32, 0u32, 0u32),
        (1, 0, 0),
        (0, 1, 0),
        (0, 0, 1),
        (1, 1, 0),
        (1, 0, 1),
        (0, 1, 1),
        (1, 1, 1),
    ]
    .iter()
    .enumerate()
    {
        let i = neighbor_index(base[0], dx, volume.resolution[0]);
        let j = neighbor_index(base[1], dy, volume.resolution[1]);
        let k = neighbor_index(base[2], dz, volume.resolution[2]);
        let (distance, weight, _color) = volume.read_decoded(i, j, k);
        if weight == 0 {
            valid = false;
        }
        values[idx] = distance;
    }

    let coeffs = coefficients(Corners {
        f000: values[0],
        f100: values[1],
        f010: values[2],
        f001: values[3],
        f110: values[4],
        f101: values[5],
        f011: values[6],
        f111: values[7],
    });

    DistanceSample {
        value: eval(coeffs, u, v, w),
        valid,
        coeffs,
        uvw: (u, v, w),
    }
}

/// Samples color at `p`, returning `None` unless the co-located distance
/// sample is also valid.
pub fn sample_color<S: Scalar, V: VoxelSource>(volume: &TsdfVolume<S, V>, p: S::Vec3) -> Option<(S, S, S, S)> {
    let distance = sample_distance(volume, p);
    if !distance.valid {
        return None;
    }

    let base = volume.base_index(p);
    let (u, v, w) = distance.uvw;
    let mut r = [S::zero(); 8];
    let mut g = [S::zero(); 8];
    let mut b = [S::zero(); 8];
    let mut a = [S::zero(); 8];
    for (idx, &(dx, dy, dz)) in [
        (0u32, 0u32, 0u32),
        (1, 0, 0),
        (0, 1, 0),
        (0, 0, 1),
        (1, 1, 0),
        (1, 0, 1),
        (0, 1, 1),
        (1, 1, 1),
    ]
    .iter()
    .enumerate()
    {
        let i = neighbor_index(base[0], dx, volume.resolution[0]);
        let j = neighbor_index(base[1], dy, volume.resolution[1]);
        let k = neighbor_index(base[2], dz, volume.resolution[2]);
        let (_distance, _weight, color) = volume.read_decoded(i, j, k);
        r[idx] = color.0;
        g[idx] = color.1;
        b[idx] = color.2;
        a[idx] = color.3;
    }

    let corners = |v: [S; 8]| Corners {
        f000: v[0],
        f100: v[1],
        f010: v[2],
        f001: v[3],
        f110: v[4],
        f101: v[5],
        f011: v[6],
        f111: v[7],
    };
    let eval_channel = |values: [S; 8]| eval(coefficients(corners(values)), u, v, w);

    Some((eval_channel(r), eval_channel(g), eval_channel(b), eval_channel(a)))
}

/// Clamps axis components of `d` smaller than 1e-5 in magnitude to 1e-5,
/// preserving sign.
fn clamp_degenerate_axes<S: Scalar>(d: S::Vec3) -> S::Vec3 {
    let eps = S::epsilon5();
    let fix = |c: S| if c.abs() < eps { if c < S::zero() { -eps } else { eps } } else { c };
    S::Vec3::new(fix(d.x()), fix(d.y()), fix(d.z()))
}

/// Slab-method AABB intersection. Returns `None` if the ray misses the
/// volume's bounding box entirely.
fn slab_intersect<S: Scalar, V: VoxelSource>(
    volume: &TsdfVolume<S, V>,
    origin: S::Vec3,
    dir: S::Vec3,
) -> Option<(S, S)> {
    let corner_min = volume.corner;
    let corner_max = volume.world_max_corner();

    let mut t_enter = S::neg_infinity();
    let mut t_exit = S::infinity();
    for axis in 0..3 {
        let d = dir.get(axis);
        let (near, far) = if d > S::zero() {
            (corner_min.get(axis), corner_max.get(axis))
        } else {
            (corner_max.get(axis), corner_min.get(axis))
        };
        let t1 = (near - origin.get(axis)) / d;
        let t2 = (far - origin.get(axis)) / d;
        if t1 > t_enter {
            t_enter = t1;
        }
        if t2 < t_exit {
            t_exit = t2;
        }
    }

    if t_enter > t_exit {
        None
    } else {
        Some((t_enter, t_exit))
    }
}

/// The adaptive march: intersects the ray with the
/// volume and `[minLength, maxLength]`, then steps along it, returning the
/// first zero-crossing or `None` ("miss").
pub fn raycast<S: Scalar, V: VoxelSource>(
    volume: &TsdfVolume<S, V>,
    origin: S::Vec3,
    dir: S::Vec3,
    params: RaycastParams<S>,
) -> Option<RaycastHit<S>> {
    let dir = clamp_degenerate_axes::<S>(dir);
    let (t_enter, t_exit) = slab_intersect(volume, origin, dir)?;

    let t_min = if t_enter > params.min_length { t_enter } else { params.min_length };
    let t_max = if t_exit < params.max_length { t_exit } else { params.max_length };
    if t_min >= t_max {
        return None;
    }

    let eps = S::epsilon5();
    let ninety_five: S = NumCast::from(0.95).unwrap();

    let mut last_t: Option<S> = None;
    let mut last_d: Option<S> = None;
    let mut t = t_min + eps;

    for _ in 0..MAX_MARCH_STEPS {
        if t >= t_max {
            break;
        }

        let p = origin + dir.scale(t);
        let sample = sample_distance(volume, p);

        if !sample.valid {
            t = t + ninety_five * volume.truncation_distance;
            last_d = None;
            continue;
        }

        if sample.value > eps {
            let advance_candidate = ninety_five * volume.truncation_distance * sample.value;
            let advance = if params.marching_step > advance_candidate {
                params.marching_step
            } else {
                advance_candidate
            };
            last_t = Some(t);
            last_d = Some(sample.value);
            t = t + advance;
            continue;
        }

        if sample.value < -eps {
            return match (last_t, last_d) {
                (Some(lt), Some(ld)) if ld > S::zero() => {
                    let t_hit = lt + (t - lt) * ld / (ld - sample.value);
                    Some(hit_at(volume, origin, dir, t_hit))
                }
                _ => None,
            };
        }

        // |D| <= eps: exact zero-crossing at this sample.
        return Some(RaycastHit {
            distance: t,
            normal: normal_from_gradient(sample.coeffs, sample.uvw),
        });
    }

    None
}

fn hit_at<S: Scalar, V: VoxelSource>(volume: &TsdfVolume<S, V>, origin: S::Vec3, dir: S::Vec3, t: S) -> RaycastHit<S> {
    let sample = sample_distance(volume, origin + dir.scale(t));
    RaycastHit {
        distance: t,
        normal: normal_from_gradient(sample.coeffs, sample.uvw),
    }
}

/// The gradient of `F` is in local unit-cube coordinates; a uniform 1/size
/// rescale to world space doesn't change its direction, so normalizing the
/// local gradient directly gives the world-space surface normal.
fn normal_from_gradient<S: Scalar>(coeffs: [S; 8], uvw: (S, S, S)) -> S::Vec3 {
    let (du, dv, dw) = gradient(coeffs, uvw.0, uvw.1, uvw.2);
    S::Vec3::new(du, dv, dw).normalize()
}
