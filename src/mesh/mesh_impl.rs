// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The owning mesh store: four arenas plus the shared id generator.

use crate::scalar::{Scalar, Vec2Like, Vec3Like};

use super::arena::Arena;
use super::entities::{Edge, Face, HalfEdge, Vertex};
use super::id::{EdgeId, FaceId, HalfEdgeId, IdGenerator, VertexId};

/// Four append-mostly arenas (vertices, halfedges, edges, faces) tied
/// together by a single monotonic id generator. Owns its storage exclusively.
#[derive(Debug, Clone)]
pub struct HalfedgeMesh<S: Scalar> {
    pub(crate) ids: IdGenerator,
    pub(crate) vertices: Arena<Vertex<S>>,
    pub(crate) halfedges: Arena<HalfEdge<S>>,
    pub(crate) edges: Arena<Edge>,
    pub(crate) faces: Arena<Face>,
}

impl<S: Scalar> Default for HalfedgeMesh<S> {
    fn default() -> Self {
        Self {
            ids: IdGenerator::default(),
            vertices: Arena::default(),
            halfedges: Arena::default(),
            edges: Arena::default(),
            faces: Arena::default(),
        }
    }
}

impl<S: Scalar> HalfedgeMesh<S> {
    pub fn new() -> Self {
        Self::default()
    }

    // -- counts -------------------------------------------------------

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    // -- lookup ---------------------------------------------------------

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<S>> {
        self.vertices.get(id.index)
    }
    pub fn halfedge(&self, id: HalfEdgeId) -> Option<&HalfEdge<S>> {
        self.halfedges.get(id.index)
    }
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index)
    }
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.index)
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex<S>> {
        self.vertices.get_mut(id.index)
    }
    pub fn halfedge_mut(&mut self, id: HalfEdgeId) -> Option<&mut HalfEdge<S>> {
        self.halfedges.get_mut(id.index)
    }
    pub fn face_mut(&mut self, id: FaceId) -> Option<&mut Face> {
        self.faces.get_mut(id.index)
    }

    // -- iteration --------------------------------------------------------

    pub fn iter_vertices(&self) -> impl DoubleEndedIterator<Item = (VertexId, &Vertex<S>)> {
        self.vertices.iter().map(|(i, v)| (VertexId::new(i), v))
    }
    pub fn iter_halfedges(&self) -> impl DoubleEndedIterator<Item = (HalfEdgeId, &HalfEdge<S>)> {
        self.halfedges.iter().map(|(i, h)| (HalfEdgeId::new(i), h))
    }
    pub fn iter_edges(&self) -> impl DoubleEndedIterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().map(|(i, e)| (EdgeId::new(i), e))
    }
    pub fn iter_faces(&self) -> impl DoubleEndedIterator<Item = (FaceId, &Face)> {
        self.faces.iter().map(|(i, f)| (FaceId::new(i), f))
    }

    // -- creation (used internally by the conversion routine) ------------

    pub(crate) fn alloc_vertex(&mut self, position: S::Vec3) -> VertexId {
        let index = self
            .vertices
            .create_append(&mut self.ids, |id| Vertex::new(id, position));
        VertexId::new(index)
    }

    pub(crate) fn alloc_edge(&mut self, halfedge: HalfEdgeId) -> EdgeId {
        let index = self.edges.create_append(&mut self.ids, |id| Edge {
            id,
            removed: false,
            halfedge,
        });
        EdgeId::new(index)
    }

    /// Allocates a new halfedge with `next`/`prev`/`twin` all pointing at
    /// itself as a placeholder (overwritten by the caller once the rest of
    /// the local topology is known) and zeroed per-corner attributes.
    pub(crate) fn alloc_halfedge(&mut self, vertex: VertexId, edge: EdgeId) -> HalfEdgeId {
        let predicted = HalfEdgeId::new(self.halfedges.slot_count() as u32);
        let index = self.halfedges.create_append(&mut self.ids, |id| HalfEdge {
            id,
            removed: false,
            next: predicted,
            prev: predicted,
            twin: predicted,
            vertex,
            edge,
            face: None,
            uv: S::Vec2::zero(),
            normal: S::Vec3::zero(),
            tangent: S::Vec3::zero(),
        });
        HalfEdgeId::new(index)
    }

    pub(crate) fn alloc_face(&mut self, halfedge: HalfEdgeId, boundary: bool) -> FaceId {
        let index = self.faces.create_append(&mut self.ids, |id| Face {
            id,
            removed: false,
            halfedge,
            boundary,
        });
        FaceId::new(index)
    }

    // -- removal ----------------------------------------------------------

    pub fn remove_vertex(&mut self, id: VertexId) -> bool {
        self.vertices.remove(id.index)
    }
    pub fn remove_halfedge(&mut self, id: HalfEdgeId) -> bool {
        self.halfedges.remove(id.index)
    }
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        self.edges.remove(id.index)
    }
    pub fn remove_face(&mut self, id: FaceId) -> bool {
        self.faces.remove(id.index)
    }

    /// Drops all four arenas back to empty, used by
    /// `from_indexed_mesh`'s atomic failure path.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.halfedges.clear();
        self.edges.clear();
        self.faces.clear();
    }
}
