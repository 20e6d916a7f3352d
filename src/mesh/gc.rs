// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Garbage collection: compact all four arenas and remap interior handles.

use crate::scalar::Scalar;

use super::id::{EdgeId, FaceId, HalfEdgeId, VertexId};
use super::mesh_impl::HalfedgeMesh;

impl<S: Scalar> HalfedgeMesh<S> {
    /// Compacts all four arenas toward the front in index order, remaps
    /// every interior handle, truncates to the live count and clears the
    /// free lists. Every handle held before this call is invalidated.
    /// Identifiers are preserved; only slot indices change.
    pub fn collect_garbage(&mut self) {
        let v_remap = self.vertices.build_remap();
        let h_remap = self.halfedges.build_remap();
        let e_remap = self.edges.build_remap();
        let f_remap = self.faces.build_remap();

        log::trace!(
            "collect_garbage: vertices {} -> {}, halfedges {} -> {}, edges {} -> {}, faces {} -> {}",
            self.vertices.slot_count(),
            self.vertices.len(),
            self.halfedges.slot_count(),
            self.halfedges.len(),
            self.edges.slot_count(),
            self.edges.len(),
            self.faces.slot_count(),
            self.faces.len(),
        );

        self.vertices.compact_with(|vertex| {
            if let Some(h) = vertex.halfedge {
                vertex.halfedge = Some(HalfEdgeId::new(h_remap[h.index()]));
            }
        });

        self.halfedges.compact_with(|h| {
            h.next = HalfEdgeId::new(h_remap[h.next.index()]);
            h.prev = HalfEdgeId::new(h_remap[h.prev.index()]);
            h.twin = HalfEdgeId::new(h_remap[h.twin.index()]);
            h.vertex = VertexId::new(v_remap[h.vertex.index()]);
            h.edge = EdgeId::new(e_remap[h.edge.index()]);
            h.face = h.face.map(|f| FaceId::new(f_remap[f.index()]));
        });

        self.edges.compact_with(|edge| {
            edge.halfedge = HalfEdgeId::new(h_remap[edge.halfedge.index()]);
        });

        self.faces.compact_with(|face| {
            face.halfedge = HalfEdgeId::new(h_remap[face.halfedge.index()]);
        });
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

    /// `collect_garbage` on a mesh with nothing tombstoned is a pure
    /// compaction no-op: live counts and every live identifier survive
    /// unchanged, and the mesh still validates.
    #[test]
    fn collect_garbage_preserves_live_count_and_ids() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&tetrahedron()));

        let v_ids_before: std::collections::HashSet<_> = mesh.iter_vertices().map(|(_, v)| v.id).collect();
        let h_ids_before: std::collections::HashSet<_> = mesh.iter_halfedges().map(|(_, h)| h.id).collect();
        let counts_before = (mesh.num_vertices(), mesh.num_halfedges(), mesh.num_edges(), mesh.num_faces());

        mesh.collect_garbage();

        assert_eq!(
            (mesh.num_vertices(), mesh.num_halfedges(), mesh.num_edges(), mesh.num_faces()),
            counts_before
        );
        let v_ids_after: std::collections::HashSet<_> = mesh.iter_vertices().map(|(_, v)| v.id).collect();
        let h_ids_after: std::collections::HashSet<_> = mesh.iter_halfedges().map(|(_, h)| h.id).collect();
        assert_eq!(v_ids_before, v_ids_after);
        assert_eq!(h_ids_before, h_ids_after);

        assert_eq!(mesh.validate(), "");
    }

    /// `from_indexed_mesh` clears and rebuilds in place; rebuilding a second
    /// time and then compacting must still leave a valid mesh behind.
    #[test]
    fn collect_garbage_after_rebuild_stays_valid() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&tetrahedron()));
        assert!(mesh.from_indexed_mesh(&tetrahedron()));

        mesh.collect_garbage();
        assert_eq!(mesh.validate(), "");
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
    }
}
