// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cycle-walking helpers built directly on `next`/`twin`.
//!
//! Whole-arena iteration is just [`DoubleEndedIterator`] (see
//! `mesh_impl.rs`'s `iter_*` methods). What's left here is mesh-local cycle
//! walking, exposed as plain methods returning `SVec`s, since every caller
//! here already holds a handle known to be live.

use geode_commons::utils::SVec;

use crate::scalar::{Scalar, Vec3Like};

use super::id::{EdgeId, FaceId, HalfEdgeId, VertexId};
use super::mesh_impl::HalfedgeMesh;
use super::MAX_LOOP_ITERATIONS;

impl<S: Scalar> HalfedgeMesh<S> {
    /// Halfedges of a face's cycle, in order, starting at `face.halfedge`.
    pub fn face_halfedges(&self, face: FaceId) -> SVec<HalfEdgeId> {
        let start = self.face(face).expect("live face").halfedge;
        let mut out = SVec::new();
        let mut h = start;
        for _ in 0..MAX_LOOP_ITERATIONS {
            out.push(h);
            h = self.halfedge(h).expect("live halfedge").next;
            if h == start {
                return out;
            }
        }
        panic!("face {face} halfedge cycle did not close; mesh topology is corrupt");
    }

    pub fn face_vertices(&self, face: FaceId) -> SVec<VertexId> {
        self.face_halfedges(face)
            .into_iter()
            .map(|h| self.halfedge(h).expect("live halfedge").vertex)
            .collect()
    }

    pub fn face_degree(&self, face: FaceId) -> usize {
        self.face_halfedges(face).len()
    }

    /// Halfedges outgoing from `vertex`, walking `h -> h.twin.next`.
    pub fn vertex_outgoing_halfedges(&self, vertex: VertexId) -> SVec<HalfEdgeId> {
        let start = match self.vertex(vertex).expect("live vertex").halfedge {
            Some(h) => h,
            None => return SVec::new(),
        };
        let mut out = SVec::new();
        let mut h = start;
        for _ in 0..MAX_LOOP_ITERATIONS {
            out.push(h);
            let twin = self.halfedge(h).expect("live halfedge").twin;
            h = self.halfedge(twin).expect("live halfedge").next;
            if h == start {
                return out;
            }
        }
        panic!("vertex {vertex} outgoing cycle did not close; mesh topology is corrupt");
    }

    pub fn vertex_degree(&self, vertex: VertexId) -> usize {
        self.vertex_outgoing_halfedges(vertex).len()
    }

    /// True if any halfedge outgoing from `vertex` faces a boundary face.
    pub fn vertex_on_boundary(&self, vertex: VertexId) -> bool {
        self.vertex_outgoing_halfedges(vertex)
            .into_iter()
            .any(|h| self.halfedge_on_boundary(h))
    }

    pub fn halfedge_on_boundary(&self, halfedge: HalfEdgeId) -> bool {
        let h = self.halfedge(halfedge).expect("live halfedge");
        match h.face {
            Some(f) => self.face(f).expect("live face").boundary,
            None => true,
        }
    }

    /// True if either of the edge's two halfedges faces a boundary face.
    pub fn edge_on_boundary(&self, edge: EdgeId) -> bool {
        let h = self.edge(edge).expect("live edge").halfedge;
        let twin = self.halfedge(h).expect("live halfedge").twin;
        self.halfedge_on_boundary(h) || self.halfedge_on_boundary(twin)
    }

    /// `h.twin.source.position - h.source.position`.
    pub fn halfedge_vector(&self, halfedge: HalfEdgeId) -> S::Vec3 {
        let h = self.halfedge(halfedge).expect("live halfedge");
        let src = self.vertex(h.vertex).expect("live vertex").position;
        let twin = self.halfedge(h.twin).expect("live halfedge");
        let dst = self.vertex(twin.vertex).expect("live vertex").position;
        dst - src
    }

    pub fn halfedge_src_vertex(&self, halfedge: HalfEdgeId) -> VertexId {
        self.halfedge(halfedge).expect("live halfedge").vertex
    }

    pub fn halfedge_dst_vertex(&self, halfedge: HalfEdgeId) -> VertexId {
        let twin = self.halfedge(halfedge).expect("live halfedge").twin;
        self.halfedge(twin).expect("live halfedge").vertex
    }
}
