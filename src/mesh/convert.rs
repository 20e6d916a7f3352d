// Copyright (C) 2023 setzer22 and contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indexed-mesh exchange: manifold ingestion and emission.

use std::collections::HashMap;

use geode_commons::utils::SVec;

use crate::error::ConversionError;
use crate::scalar::Scalar;

use super::id::{EdgeId, HalfEdgeId, VertexId};
use super::mesh_impl::HalfedgeMesh;

/// One vertex of an [`IndexedMesh`]: just a position.
#[derive(Debug, Clone)]
pub struct IndexedVertex<S: Scalar> {
    pub position: S::Vec3,
}

/// One corner of an [`IndexedFace`]: a vertex reference plus per-corner
/// attributes.
#[derive(Debug, Clone)]
pub struct IndexedCorner<S: Scalar> {
    pub vertex_index: u32,
    pub uv: S::Vec2,
    pub normal: S::Vec3,
    pub tangent: S::Vec3,
}

impl<S: Scalar> IndexedCorner<S> {
    pub fn new(vertex_index: u32) -> Self {
        Self {
            vertex_index,
            uv: <S::Vec2 as crate::scalar::Vec2Like>::zero(),
            normal: <S::Vec3 as crate::scalar::Vec3Like>::zero(),
            tangent: <S::Vec3 as crate::scalar::Vec3Like>::zero(),
        }
    }
}

/// An ordered corner list; a face of degree `corners.len()`.
#[derive(Debug, Clone, Default)]
pub struct IndexedFace<S: Scalar> {
    pub corners: Vec<IndexedCorner<S>>,
}

impl<S: Scalar> IndexedFace<S> {
    pub fn degree(&self) -> usize {
        self.corners.len()
    }
}

/// The flat indexed-mesh exchange format.
#[derive(Debug, Clone, Default)]
pub struct IndexedMesh<S: Scalar> {
    pub vertices: Vec<IndexedVertex<S>>,
    pub faces: Vec<IndexedFace<S>>,
}

impl<S: Scalar> HalfedgeMesh<S> {
    /// Builds a manifold halfedge mesh from `input`, or fails atomically,
    /// leaving `self` empty. Returns `true` on success.
    pub fn from_indexed_mesh(&mut self, input: &IndexedMesh<S>) -> bool {
        match self.try_from_indexed_mesh(input) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("from_indexed_mesh: {err}");
                self.clear();
                false
            }
        }
    }

    fn try_from_indexed_mesh(&mut self, input: &IndexedMesh<S>) -> Result<(), ConversionError> {
        self.clear();

        let v = input.vertices.len();
        let f = input.faces.len();
        // Euler's relation V - E + F = 2 => E ~= F + V - 2, H = 2E.
        let e_estimate = (f + v).saturating_sub(2).max(f.max(v));
        self.vertices.reserve(v);
        self.edges.reserve(e_estimate);
        self.halfedges.reserve(e_estimate * 2);
        self.faces.reserve(f);

        let vertex_ids: Vec<VertexId> = input
            .vertices
            .iter()
            .map(|vertex| self.alloc_vertex(vertex.position))
            .collect();

        // Maps directed (src_input_index, dst_input_index) -> halfedge.
        let mut directed: HashMap<(u32, u32), HalfEdgeId> = HashMap::new();

        for face in &input.faces {
            let k = face.degree();
            let face_id = self.alloc_face(HalfEdgeId::new(0), false);
            let mut face_halfedges: SVec<HalfEdgeId> = SVec::new();

            for i in 0..k {
                let corner = &face.corners[i];
                let next_corner = &face.corners[(i + 1) % k];
                let a = corner.vertex_index;
                let b = next_corner.vertex_index;

                if a as usize >= v {
                    return Err(ConversionError::OutOfRangeVertexIndex {
                        index: a,
                        vertex_count: v as u32,
                    });
                }
                if b as usize >= v {
                    return Err(ConversionError::OutOfRangeVertexIndex {
                        index: b,
                        vertex_count: v as u32,
                    });
                }
                if a == b {
                    return Err(ConversionError::DegenerateFace { index: a });
                }

                let h = match directed.get(&(a, b)) {
                    Some(&h) => h,
                    None => {
                        let va = vertex_ids[a as usize];
                        let vb = vertex_ids[b as usize];
                        let h = self.alloc_halfedge(va, EdgeId::new(0));
                        let h2 = self.alloc_halfedge(vb, EdgeId::new(0));
                        let edge = self.alloc_edge(h);
                        self.halfedge_mut(h).expect("just created").edge = edge;
                        self.halfedge_mut(h2).expect("just created").edge = edge;
                        self.halfedge_mut(h).expect("just created").twin = h2;
                        self.halfedge_mut(h2).expect("just created").twin = h;
                        directed.insert((a, b), h);
                        directed.insert((b, a), h2);
                        h
                    }
                };

                if self.halfedge(h).expect("live halfedge").face.is_some() {
                    return Err(ConversionError::NonManifoldEdge { a, b });
                }

                {
                    let he = self.halfedge_mut(h).expect("live halfedge");
                    he.face = Some(face_id);
                    he.uv = corner.uv;
                    he.normal = corner.normal;
                    he.tangent = corner.tangent;
                }

                let va_id = vertex_ids[a as usize];
                if self.vertex(va_id).expect("live vertex").halfedge.is_none() {
                    self.vertex_mut(va_id).expect("live vertex").halfedge = Some(h);
                }

                face_halfedges.push(h);
            }

            for i in 0..k {
                let next = face_halfedges[(i + 1) % k];
                let prev = face_halfedges[(i + k - 1) % k];
                let he = self.halfedge_mut(face_halfedges[i]).expect("live halfedge");
                he.next = next;
                he.prev = prev;
            }
            self.face_mut(face_id).expect("live face").halfedge = face_halfedges[0];
        }

        // Boundary synthesis: fill every hole with a first-class boundary face.
        let mut boundary_by_source: HashMap<VertexId, HalfEdgeId> = HashMap::new();
        for (h_id, h) in self.iter_halfedges() {
            if h.face.is_none() {
                let source = h.vertex;
                if boundary_by_source.insert(source, h_id).is_some() {
                    return Err(ConversionError::NonManifoldVertex {
                        index: source.index() as u32,
                    });
                }
            }
        }

        while let Some((&start_source, _)) = boundary_by_source.iter().next() {
            let start = boundary_by_source.remove(&start_source).expect("just observed");
            let mut cycle: SVec<HalfEdgeId> = SVec::new();
            let mut current = start;
            loop {
                cycle.push(current);
                let dst = self.halfedge_dst_vertex(current);
                if dst == start_source {
                    break;
                }
                let current_source = self.halfedge_src_vertex(current);
                boundary_by_source.remove(&current_source);
                match boundary_by_source.get(&dst) {
                    Some(&next) => current = next,
                    None => {
                        return Err(ConversionError::BoundaryLoopNotClosed {
                            start: start_source.index() as u32,
                        })
                    }
                }
            }
            let current_source = self.halfedge_src_vertex(current);
            boundary_by_source.remove(&current_source);

            let n = cycle.len();
            let boundary_face = self.alloc_face(cycle[0], true);
            for &h in cycle.iter() {
                self.halfedge_mut(h).expect("live halfedge").face = Some(boundary_face);
            }
            // Boundary halfedges wind opposite to the interior loop: next
            // points backward around the hole.
            for i in 0..n {
                let next = cycle[(i + n - 1) % n];
                let prev = cycle[(i + 1) % n];
                let he = self.halfedge_mut(cycle[i]).expect("live halfedge");
                he.next = next;
                he.prev = prev;
            }
        }

        Ok(())
    }

    /// Enumerates non-boundary faces in live-iteration order, emitting each
    /// face's halfedge cycle as a corner list.
    pub fn to_indexed_mesh(&self) -> IndexedMesh<S> {
        let mut output_index: HashMap<VertexId, u32> = HashMap::new();
        let mut vertices = Vec::with_capacity(self.num_vertices());
        for (id, vertex) in self.iter_vertices() {
            output_index.insert(id, vertices.len() as u32);
            vertices.push(IndexedVertex {
                position: vertex.position,
            });
        }

        let mut faces = Vec::new();
        for (face_id, face) in self.iter_faces() {
            if face.boundary {
                continue;
            }
            let corners = self
                .face_halfedges(face_id)
                .into_iter()
                .map(|h| {
                    let he = self.halfedge(h).expect("live halfedge");
                    IndexedCorner {
                        vertex_index: output_index[&he.vertex],
                        uv: he.uv,
                        normal: he.normal,
                        tangent: he.tangent,
                    }
                })
                .collect();
            faces.push(IndexedFace { corners });
        }

        IndexedMesh { vertices, faces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Vec3Like;

    fn tri(a: u32, b: u32, c: u32) -> IndexedFace<f32> {
        IndexedFace {
            corners: vec![IndexedCorner::new(a), IndexedCorner::new(b), IndexedCorner::new(c)],
        }
    }

    fn tetrahedron() -> IndexedMesh<f32> {
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

    fn quad() -> IndexedMesh<f32> {
        IndexedMesh {
            vertices: vec![
                IndexedVertex { position: glam::Vec3::new(0.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(1.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(1.0, 1.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(0.0, 1.0, 0.0) },
            ],
            faces: vec![IndexedFace {
                corners: vec![
                    IndexedCorner::new(0),
                    IndexedCorner::new(1),
                    IndexedCorner::new(2),
                    IndexedCorner::new(3),
                ],
            }],
        }
    }

    #[test]
    fn tetrahedron_ingests_to_a_closed_manifold() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&tetrahedron()));

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.num_halfedges(), 12);
        let (non_boundary, boundary) = mesh
            .iter_faces()
            .fold((0, 0), |(nb, b), (_, f)| if f.boundary { (nb, b + 1) } else { (nb + 1, b) });
        assert_eq!(non_boundary, 4);
        assert_eq!(boundary, 0);
        assert_eq!(mesh.validate(), "");

        for (id, _) in mesh.iter_vertices() {
            assert_eq!(mesh.vertex_degree(id), 3);
        }
    }

    #[test]
    fn open_square_synthesizes_one_boundary_face() {
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&quad()));

        let (non_boundary, boundary) = mesh
            .iter_faces()
            .fold((0, 0), |(nb, b), (_, f)| if f.boundary { (nb, b + 1) } else { (nb + 1, b) });
        assert_eq!(non_boundary, 1);
        assert_eq!(boundary, 1);
        assert_eq!(mesh.num_edges(), 4);
        assert_eq!(mesh.num_halfedges(), 8);
        assert_eq!(mesh.face_degree(mesh.iter_faces().find(|(_, f)| f.boundary).unwrap().0), 4);
        assert_eq!(mesh.validate(), "");

        for (id, _) in mesh.iter_vertices() {
            assert!(mesh.vertex_on_boundary(id));
        }
    }

    #[test]
    fn three_triangles_sharing_an_edge_is_rejected() {
        let mesh_input = IndexedMesh {
            vertices: vec![
                IndexedVertex { position: glam::Vec3::new(0.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(1.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(0.0, 1.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(0.0, -1.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(-1.0, 0.0, 0.0) },
            ],
            faces: vec![tri(0, 1, 2), tri(1, 0, 3), tri(0, 4, 1)],
        };

        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(!mesh.from_indexed_mesh(&mesh_input));
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_edges(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
    }

    #[test]
    fn bowtie_apex_is_rejected_as_non_manifold_vertex() {
        // Two triangle fans that touch only at vertex 0, each an isolated
        // boundary triangle: a single outgoing boundary loop can't cover
        // both fans at once.
        let mesh_input = IndexedMesh {
            vertices: vec![
                IndexedVertex { position: glam::Vec3::new(0.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(1.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(0.0, 1.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(-1.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(0.0, -1.0, 0.0) },
            ],
            faces: vec![tri(0, 1, 2), tri(0, 3, 4)],
        };

        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(!mesh.from_indexed_mesh(&mesh_input));
        assert_eq!(mesh.num_vertices(), 0);
    }

    #[test]
    fn out_of_range_vertex_index_is_rejected() {
        let mesh_input = IndexedMesh {
            vertices: vec![IndexedVertex { position: glam::Vec3::ZERO }],
            faces: vec![tri(0, 1, 2)],
        };
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(!mesh.from_indexed_mesh(&mesh_input));
    }

    #[test]
    fn degenerate_face_is_rejected() {
        let mesh_input = IndexedMesh {
            vertices: vec![
                IndexedVertex { position: glam::Vec3::new(0.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(1.0, 0.0, 0.0) },
                IndexedVertex { position: glam::Vec3::new(0.0, 1.0, 0.0) },
            ],
            faces: vec![IndexedFace {
                corners: vec![IndexedCorner::new(0), IndexedCorner::new(0), IndexedCorner::new(1)],
            }],
        };
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(!mesh.from_indexed_mesh(&mesh_input));
    }

    #[test]
    fn round_trip_preserves_corners_up_to_rotation_and_face_permutation() {
        let input = tetrahedron();
        let mut mesh: HalfedgeMesh<f32> = HalfedgeMesh::new();
        assert!(mesh.from_indexed_mesh(&input));
        let output = mesh.to_indexed_mesh();

        assert_eq!(output.vertices.len(), input.vertices.len());
        assert_eq!(output.faces.len(), input.faces.len());

        let canonical = |face: &IndexedFace<f32>| -> Vec<Vec<u32>> {
            let indices: Vec<u32> = face.corners.iter().map(|c| c.vertex_index).collect();
            (0..indices.len())
                .map(|shift| {
                    let mut rotated = indices[shift..].to_vec();
                    rotated.extend_from_slice(&indices[..shift]);
                    rotated
                })
                .collect()
        };

        let mut input_faces: Vec<Vec<Vec<u32>>> = input.faces.iter().map(canonical).collect();
        let mut output_faces: Vec<Vec<Vec<u32>>> = output.faces.iter().map(canonical).collect();
        input_faces.sort();
        output_faces.sort();
        assert_eq!(input_faces, output_faces);
    }
}
