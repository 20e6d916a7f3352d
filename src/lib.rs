// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A halfedge mesh kernel and a TSDF volume raycaster.
//!
//! Two independent cores, generic over a [`scalar::Scalar`] so both `f32` and
//! `f64` instantiations are monomorphizations of the same code:
//!
//! - [`mesh`]: a doubly-connected edge list (vertices, halfedges, edges,
//!   faces) with lazy deletion, garbage collection, manifold ingestion from
//!   an indexed mesh, and a structural validator.
//! - [`volume`]: a read-only TSDF voxel grid view and a ray-marching
//!   raycaster that locates the surface zero-crossing and its analytic
//!   normal.
//!
//! Device-memory buffers, windowing, camera matrices, and GPU/platform
//! bootstrap are the caller's concern; this crate only defines the
//! interfaces ([`volume::tsdf::VoxelSource`]) it consumes from them.

pub mod error;
pub mod mesh;
pub mod scalar;
pub mod volume;

pub use error::ConversionError;
pub use mesh::{
    Edge, EdgeId, ElementId, Face, FaceId, HalfEdge, HalfEdgeId, HalfedgeMesh, IndexedCorner, IndexedFace,
    IndexedMesh, IndexedVertex, Vertex, VertexId,
};
pub use scalar::{Scalar, Vec2Like, Vec3Like};
pub use volume::{raycast, sample_color, RaycastHit, RaycastParams, TsdfVolume, VoxelSource};
