// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed error kinds for the closed set of conversion failures.
//!
//! These are an internal reasoning aid: the public surface still returns
//! `bool`/`String`/`Option<RaycastHit>` exactly as the public contract
//! requires. `ConversionError` lets `HalfedgeMesh::from_indexed_mesh` log a
//! specific, structured diagnostic before collapsing to `false`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("face corner references out-of-range vertex index {index} (mesh has {vertex_count} vertices)")]
    OutOfRangeVertexIndex { index: u32, vertex_count: u32 },

    #[error("face has a degenerate edge: consecutive corners both reference vertex {index}")]
    DegenerateFace { index: u32 },

    #[error("edge between vertices {a} and {b} is incident to more than two faces")]
    NonManifoldEdge { a: u32, b: u32 },

    #[error("vertex {index} has more than one boundary loop")]
    NonManifoldVertex { index: u32 },

    #[error("boundary loop starting at vertex {start} could not be closed")]
    BoundaryLoopNotClosed { start: u32 },
}
