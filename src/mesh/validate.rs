// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural validator for invariants I1-I6.
//!
//! Unlike the cycle-walking helpers in `traversal.rs` (which assume a
//! well-formed mesh and panic on corruption, as a guard against an infinite
//! loop), the validator must never panic: it walks the same cycles with its
//! own bounded loop and turns a non-closing cycle into a diagnostic instead.

use geode_commons::utils::SVec;

use crate::scalar::Scalar;

use super::id::HalfEdgeId;
use super::mesh_impl::HalfedgeMesh;
use super::MAX_LOOP_ITERATIONS;

impl<S: Scalar> HalfedgeMesh<S> {
    /// Returns an empty string if I1-I6 all hold (plus the validator's own
    /// extra checks: face degree >= 3, vertex fan length >= 2). Otherwise
    /// returns a short diagnostic naming the first offending element.
    pub fn validate(&self) -> String {
        for (h_id, h) in self.iter_halfedges() {
            let next = match self.halfedge(h.next) {
                Some(x) => x,
                None => return format!("halfedge {h_id}: next {} is not a live halfedge", h.next),
            };
            if next.prev != h_id {
                return format!("halfedge {h_id}: next.prev != self (I1)");
            }
            let prev = match self.halfedge(h.prev) {
                Some(x) => x,
                None => return format!("halfedge {h_id}: prev {} is not a live halfedge", h.prev),
            };
            if prev.next != h_id {
                return format!("halfedge {h_id}: prev.next != self (I1)");
            }
            if h.twin == h_id {
                return format!("halfedge {h_id}: twin == self (I2)");
            }
            let twin = match self.halfedge(h.twin) {
                Some(x) => x,
                None => return format!("halfedge {h_id}: twin {} is not a live halfedge", h.twin),
            };
            if twin.twin != h_id {
                return format!("halfedge {h_id}: twin.twin != self (I2)");
            }
            let edge = match self.edge(h.edge) {
                Some(x) => x,
                None => return format!("halfedge {h_id}: edge {} is not live", h.edge),
            };
            if edge.halfedge != h_id && edge.halfedge != h.twin {
                return format!("halfedge {h_id}: edge.halfedge is neither self nor twin (I3)");
            }
            if twin.edge != h.edge {
                return format!("halfedge {h_id}: self and twin disagree on edge (I3)");
            }
        }

        for (f_id, face) in self.iter_faces() {
            let cycle = match self.bounded_cycle(face.halfedge, |h| Some(h.next)) {
                Ok(c) => c,
                Err(msg) => return format!("face {f_id}: {msg}"),
            };
            if cycle.len() < 3 {
                return format!("face {f_id}: degree {} < 3", cycle.len());
            }
            for &h_id in &cycle {
                let he = match self.halfedge(h_id) {
                    Some(x) => x,
                    None => return format!("face {f_id}: halfedge {h_id} is not live"),
                };
                if he.face != Some(f_id) {
                    return format!("face {f_id}: halfedge {h_id} does not reference this face (I4)");
                }
            }
            let total_with_face = self.iter_halfedges().filter(|(_, h)| h.face == Some(f_id)).count();
            if total_with_face != cycle.len() {
                return format!(
                    "face {f_id}: cycle has {} halfedges but {} halfedges reference this face (I4)",
                    cycle.len(),
                    total_with_face
                );
            }
        }

        for (v_id, vertex) in self.iter_vertices() {
            let start = match vertex.halfedge {
                Some(h) => h,
                None => return format!("vertex {v_id}: no outgoing halfedge"),
            };
            let cycle = match self.bounded_cycle(start, |h| {
                let twin = self.halfedge(h.twin)?;
                Some(twin.next)
            }) {
                Ok(c) => c,
                Err(msg) => return format!("vertex {v_id}: {msg}"),
            };
            if cycle.len() < 2 {
                return format!("vertex {v_id}: outgoing fan length {} < 2 (I5)", cycle.len());
            }

            let mut boundary_count = 0usize;
            for &h_id in &cycle {
                let he = match self.halfedge(h_id) {
                    Some(x) => x,
                    None => return format!("vertex {v_id}: halfedge {h_id} is not live"),
                };
                if he.vertex != v_id {
                    return format!("vertex {v_id}: halfedge {h_id} does not source from this vertex (I5)");
                }
                if self.halfedge_on_boundary(h_id) {
                    boundary_count += 1;
                }
            }
            let total_with_source = self.iter_halfedges().filter(|(_, h)| h.vertex == v_id).count();
            if total_with_source != cycle.len() {
                return format!(
                    "vertex {v_id}: fan has {} halfedges but {} halfedges source from this vertex (I5)",
                    cycle.len(),
                    total_with_source
                );
            }
            if boundary_count > 1 {
                return format!("vertex {v_id}: belongs to {boundary_count} boundary faces (I6)");
            }
        }

        String::new()
    }

    /// Walks `next(start), next(next(start)), ...` (via `step`) back to
    /// `start`, bailing out instead of looping forever if it never closes.
    fn bounded_cycle(
        &self,
        start: HalfEdgeId,
        step: impl Fn(&super::entities::HalfEdge<S>) -> Option<HalfEdgeId>,
    ) -> Result<SVec<HalfEdgeId>, String> {
        let mut out = SVec::new();
        let mut h = start;
        for _ in 0..MAX_LOOP_ITERATIONS {
            out.push(h);
            let he = match self.halfedge(h) {
                Some(x) => x,
                None => return Err(format!("halfedge {h} is not live")),
            };
            h = match step(he) {
                Some(next) => next,
                None => return Err(format!("cycle broken at halfedge {h}")),
            };
            if h == start {
                return Ok(out);
            }
        }
        Err(format!(
            "cycle starting at halfedge {start} did not close within {MAX_LOOP_ITERATIONS} steps"
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::convert::{IndexedCorner, IndexedFace, IndexedMesh, IndexedVertex};
    use crate::mesh::HalfedgeMesh;

    fn tetrahedron() -> IndexedMesh<f32> {
        let tri = |a: u32, b: u32, c: u32| IndexedFace {
            corners: vec![IndexedCorner::new(a), IndexedCorner::new(b), IndexedCorner::new(c)],
        };
        IndexedMesh {
            vertices: vec![
                IndexedVertex { position: glam::Vec3::new(0.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(1.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(0.0, 1.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(0.0, 0.0, 1.0) },
            ],
            faces: vec![tri(0, 2, 1), tri(0, 1, 3), tri(0, 3, 2), tri(1, 2, 3)],
        }
    }

    #[test]
    fn validate_is_empty_for_a_freshly_ingested_manifold_mesh() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&tetrahedron()));
        assert_eq!(mesh.validate(), "");
    }

    #[test]
    fn validate_catches_a_broken_next_pointer() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&tetrahedron()));

        let (h_id, h) = mesh.iter_halfedges().next().unwrap();
        let bogus_next = h.next.index() as u32;
        let other = (bogus_next + 1) % mesh.num_halfedges() as u32;
        mesh.halfedge_mut(h_id).unwrap().next = crate::mesh::HalfEdgeId::new(other);

        let diagnostic = mesh.validate();
        assert_ne!(diagnostic, "");
        assert!(diagnostic.contains("I1"), "diagnostic was: {diagnostic}");
    }

    #[test]
    fn validate_rejects_a_self_twinned_halfedge() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&tetrahedron()));

        let (h_id, _) = mesh.iter_halfedges().next().unwrap();
        mesh.halfedge_mut(h_id).unwrap().twin = h_id;

        let diagnostic = mesh.validate();
        assert!(diagnostic.contains("I2"), "diagnostic was: {diagnostic}");
    }
}
