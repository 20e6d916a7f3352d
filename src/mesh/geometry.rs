// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face/vertex normals and per-face tangents.

use crate::scalar::{Scalar, Vec2Like, Vec3Like};

use super::mesh_impl::HalfedgeMesh;

impl<S: Scalar> HalfedgeMesh<S> {
    /// `n = normalize(h.vector x h.prev.twin.vector)` for every non-boundary
    /// face, written to every halfedge of that face. Boundary faces are
    /// skipped.
    pub fn compute_face_normals(&mut self) {
        let face_ids: Vec<_> = self
            .iter_faces()
            .filter(|(_, f)| !f.boundary)
            .map(|(id, _)| id)
            .collect();

        for face in face_ids {
            let h = self.face(face).expect("live face").halfedge;
            let prev = self.halfedge(h).expect("live halfedge").prev;

            let h_vec = self.halfedge_vector(h);
            let prev_twin = self.halfedge(prev).expect("live halfedge").twin;
            let prev_twin_vec = self.halfedge_vector(prev_twin);
            let normal = h_vec.cross(prev_twin_vec).normalize();

            for he in self.face_halfedges(face) {
                self.halfedge_mut(he).expect("live halfedge").normal = normal;
            }
        }
    }

    /// Recomputes face normals, then for each vertex sums the normals of its
    /// incident non-boundary halfedges (walking the outgoing cycle), and
    /// writes the normalized sum back to every non-boundary outgoing
    /// halfedge of that vertex.
    pub fn compute_vertex_normals(&mut self) {
        self.compute_face_normals();

        let vertex_ids: Vec<_> = self.iter_vertices().map(|(id, _)| id).collect();
        for vertex in vertex_ids {
            let outgoing = self.vertex_outgoing_halfedges(vertex);
            let mut sum = S::Vec3::zero();
            for &h in outgoing.iter() {
                if !self.halfedge_on_boundary(h) {
                    sum = sum + self.halfedge(h).expect("live halfedge").normal;
                }
            }
            let normal = sum.normalize();
            for h in outgoing {
                if !self.halfedge_on_boundary(h) {
                    self.halfedge_mut(h).expect("live halfedge").normal = normal;
                }
            }
        }
    }

    /// For face `f` with corners `h, h.next, h.prev` forming the spanning
    /// triangle: `t = normalize(first column of (E * dUV^-1))` where
    /// `E = [h.vector, h.prev.twin.vector]` and
    /// `dUV = [h.next.uv - h.uv, h.prev.uv - h.uv]`. Undefined (no-op) when
    /// `dUV` is singular; non-degenerate UVs are the caller's responsibility.
    pub fn compute_tangents(&mut self) {
        let face_ids: Vec<_> = self
            .iter_faces()
            .filter(|(_, f)| !f.boundary)
            .map(|(id, _)| id)
            .collect();

        for face in face_ids {
            let h = self.face(face).expect("live face").halfedge;
            let next = self.halfedge(h).expect("live halfedge").next;
            let prev = self.halfedge(h).expect("live halfedge").prev;

            let e0 = self.halfedge_vector(h);
            let prev_twin = self.halfedge(prev).expect("live halfedge").twin;
            let e1 = self.halfedge_vector(prev_twin);

            let uv_h = self.halfedge(h).expect("live halfedge").uv;
            let uv_next = self.halfedge(next).expect("live halfedge").uv;
            let uv_prev = self.halfedge(prev).expect("live halfedge").uv;

            let d_uv0 = uv_next - uv_h;
            let d_uv1 = uv_prev - uv_h;

            // Inverse of the 2x2 [[d_uv0.x, d_uv1.x], [d_uv0.y, d_uv1.y]] matrix.
            let det = d_uv0.x() * d_uv1.y() - d_uv1.x() * d_uv0.y();
            if det.abs() <= S::epsilon5() {
                // Singular dUV: leave tangents untouched.
                continue;
            }
            let inv_det = det.recip();
            // dUV = [d_uv0 | d_uv1] as columns; first column of dUV^-1 is
            // (d_uv1.y, -d_uv0.y) / det, so the first column of E * dUV^-1 is
            // (e0 * d_uv1.y - e1 * d_uv0.y) / det.
            let tangent = (e0.scale(d_uv1.y()) - e1.scale(d_uv0.y())).scale(inv_det).normalize();

            for he in self.face_halfedges(face) {
                self.halfedge_mut(he).expect("live halfedge").tangent = tangent;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::convert::{IndexedCorner, IndexedFace, IndexedMesh, IndexedVertex};
    use crate::mesh::HalfedgeMesh;
    use crate::scalar::Vec3Like;

    fn single_quad_with_uvs() -> IndexedMesh<f32> {
        let corner = |v: u32, u: f32, vv: f32| IndexedCorner {
            vertex_index: v,
            uv: glam::Vec2::new(u, vv),
            normal: glam::Vec3::ZERO,
            tangent: glam::Vec3::ZERO,
        };
        IndexedMesh {
            vertices: vec![
                IndexedVertex { position: glam::Vec3::new(0.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(1.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(1.0, 1.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(0.0, 1.0, 0.0) },
            ],
            faces: vec![IndexedFace {
                corners: vec![
                    corner(0, 0.0, 0.0),
                    corner(1, 1.0, 0.0),
                    corner(2, 1.0, 1.0),
                    corner(3, 0.0, 1.0),
                ],
            }],
        }
    }

    #[test]
    fn face_normal_of_a_flat_quad_points_along_z() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&single_quad_with_uvs()));
        mesh.compute_face_normals();

        let face = mesh.iter_faces().find(|(_, f)| !f.boundary).unwrap().0;
        for h in mesh.face_halfedges(face) {
            let n = mesh.halfedge(h).unwrap().normal;
            assert!((n.z().abs() - 1.0).abs() < 1e-5, "normal was {n:?}");
            assert!(n.x().abs() < 1e-5 && n.y().abs() < 1e-5);
        }
    }

    #[test]
    fn vertex_normals_are_unit_length() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&single_quad_with_uvs()));
        mesh.compute_vertex_normals();

        let face = mesh.iter_faces().find(|(_, f)| !f.boundary).unwrap().0;
        for h in mesh.face_halfedges(face) {
            let n = mesh.halfedge(h).unwrap().normal;
            assert!((n.length() - 1.0).abs() < 1e-5, "normal length was {}", n.length());
        }
    }

    #[test]
    fn tangent_of_an_axis_aligned_quad_points_along_x() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&single_quad_with_uvs()));
        mesh.compute_tangents();

        let face = mesh.iter_faces().find(|(_, f)| !f.boundary).unwrap().0;
        for h in mesh.face_halfedges(face) {
            let t = mesh.halfedge(h).unwrap().tangent;
            assert!((t.x().abs() - 1.0).abs() < 1e-4, "tangent was {t:?}");
            assert!(t.y().abs() < 1e-4 && t.z().abs() < 1e-4);
        }
    }
}
