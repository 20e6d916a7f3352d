// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The volumetric raycaster: TSDF grid view, voxel codec, and ray march.

pub mod codec;
pub mod raycast;
pub mod tsdf;

pub use raycast::{raycast, sample_color, RaycastHit, RaycastParams};
pub use tsdf::{TsdfVolume, VoxelSource};
