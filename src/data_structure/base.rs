use std::collections::BTreeSet;
use std::fmt::Debug;
use std::path::Path;

use nalgebra::base::Vector3;

use crate::error::Result;
use crate::mesh::RawMesh;

pub type IndexType = u32;
pub type Vertex = Vector3<f64>;
/// Vertex loop of one polygon, 1-based.
pub type Face = Vec<IndexType>;
/// `(origin, destination)`; the origin is only known through the opposite
/// half-edge and is `None` on boundary edges.
pub type HalfEdgePair<K> = (Option<K>, K);

/// What to do when a directed edge `(u, v)` is used by more than one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicateEdgePolicy {
  /// The later face takes over the edge lookup slot; the earlier half-edge
  /// stays on its face loop but loses its opposite.
  Overwrite,
  /// Fail with `MeshError::NonManifoldEdge`.
  Reject,
}

impl Default for DuplicateEdgePolicy {
  fn default() -> Self {
    DuplicateEdgePolicy::Overwrite
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
  pub duplicate_edges: DuplicateEdgePolicy,
}

impl LoadOptions {
  pub fn strict() -> Self {
    LoadOptions {
      duplicate_edges: DuplicateEdgePolicy::Reject,
    }
  }
}

pub trait DataStructure: Sized {
  fn from_iters_with<IterVert, IterFace>(
    vertices: IterVert,
    faces: IterFace,
    options: &LoadOptions,
  ) -> Result<Self>
  where
    IterVert: IntoIterator<Item = Vertex>,
    IterFace: IntoIterator<Item = Face>;

  fn from_iters<IterVert, IterFace>(
    vertices: IterVert,
    faces: IterFace,
  ) -> Result<Self>
  where
    IterVert: IntoIterator<Item = Vertex>,
    IterFace: IntoIterator<Item = Face>,
  {
    Self::from_iters_with(vertices, faces, &LoadOptions::default())
  }

  fn from_raw(raw: RawMesh, options: &LoadOptions) -> Result<Self> {
    Self::from_iters_with(raw.vertices, raw.faces, options)
  }

  /// Build from an OBJ-style text description.
  fn load(source: &str) -> Result<Self> {
    Self::load_with(source, &LoadOptions::default())
  }

  fn load_with(source: &str, options: &LoadOptions) -> Result<Self> {
    Self::from_raw(RawMesh::parse(source)?, options)
  }

  /// Read an OBJ file with the line reader, keeping the file's indices.
  fn open(path: &Path, options: &LoadOptions) -> Result<Self> {
    Self::from_raw(RawMesh::read(path)?, options)
  }

  /// Read an OBJ file through tobj. Vertices are renumbered in first-use
  /// order and models are concatenated.
  fn from_obj(path: &Path, options: &LoadOptions) -> Result<Self> {
    Self::from_raw(RawMesh::from_obj(path)?, options)
  }

  fn num_vertices(&self) -> usize;

  fn num_half_edges(&self) -> usize;

  /// Undirected edges: paired half-edges count once.
  fn num_edges(&self) -> usize;

  fn num_faces(&self) -> usize;

  fn num_boundary_half_edges(&self) -> usize;

  type VertexKey: Copy + Ord + Debug;
  type FaceKey: Copy + Ord + Debug;
  type IterVertexKeys: Iterator<Item = Self::VertexKey>;
  type IterFaceKeys: Iterator<Item = Self::FaceKey>;

  fn vertex_indices(&self) -> Self::IterVertexKeys;

  /// Face indices in file order.
  fn face_indices(&self) -> Self::IterFaceKeys;

  fn vertex_position(&self, key: Self::VertexKey) -> Result<Vertex>;

  /// Vertex loop of a face, starting at its first vertex.
  fn face_vertices(&self, key: Self::FaceKey) -> Result<Vec<Self::VertexKey>>;

  // Rotates around the vertex and stops early at a boundary edge, so the
  // result can miss faces of a boundary fan.
  fn faces_around_vertex(
    &self,
    key: Self::VertexKey,
  ) -> Result<BTreeSet<Self::FaceKey>>;

  fn edges_around_vertex(
    &self,
    key: Self::VertexKey,
  ) -> Result<BTreeSet<HalfEdgePair<Self::VertexKey>>>;

  // face of (u, v) first, then face of (v, u)
  fn faces_sharing_edge(
    &self,
    u: Self::VertexKey,
    v: Self::VertexKey,
  ) -> Result<Vec<Self::FaceKey>>;

  fn edges_of_face(
    &self,
    key: Self::FaceKey,
  ) -> Result<Vec<HalfEdgePair<Self::VertexKey>>>;

  fn adjacent_faces(&self, key: Self::FaceKey)
    -> Result<BTreeSet<Self::FaceKey>>;

  fn to_raw(&self) -> RawMesh;

  fn save_obj(&self, path: &Path) -> Result<()> {
    self.to_raw().save(path)
  }
}
