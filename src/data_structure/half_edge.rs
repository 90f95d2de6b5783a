use crate::data_structure::base::{
  DuplicateEdgePolicy, Face, HalfEdgePair, IndexType, LoadOptions, Vertex,
};
use crate::data_structure::DataStructure;
use crate::error::{Element, MeshError, Result};
use crate::mesh::RawMesh;

use std::collections::BTreeSet;
use std::collections::HashMap;

use tracing::{debug, warn};

// All indices below are 0-based slots; the public API is 1-based.

#[derive(Debug)]
struct HalfEdgeRef {
  twin_idx: Option<IndexType>,
  next_idx: IndexType,
  // destination
  vertex_idx: IndexType,
  face_idx: Option<IndexType>,
}

#[derive(Debug)]
struct VertexRef {
  half_edge_idx: Option<IndexType>,
  // number of half-edges leaving this vertex, bounds rotation
  valence: IndexType,
  vertex: Vertex,
}

#[derive(Debug)]
struct FaceRef {
  half_edge_idx: IndexType,
  degree: IndexType,
}

#[derive(Debug)]
pub struct HalfEdgeMesh {
  half_edge_refs: Vec<HalfEdgeRef>,
  vertex_refs: Vec<VertexRef>,
  face_refs: Vec<FaceRef>,
  vertex_pair_to_half_edge_idx: HashMap<(IndexType, IndexType), IndexType>,
}

fn detach_twin(half_edge_refs: &mut [HalfEdgeRef], idx: IndexType) {
  if let Some(twin_idx) = half_edge_refs[idx as usize].twin_idx.take() {
    half_edge_refs[twin_idx as usize].twin_idx = None;
  }
}

fn link_twins(half_edge_refs: &mut [HalfEdgeRef], a: IndexType, b: IndexType) {
  detach_twin(half_edge_refs, a);
  detach_twin(half_edge_refs, b);
  half_edge_refs[a as usize].twin_idx = Some(b);
  half_edge_refs[b as usize].twin_idx = Some(a);
}

/// Validate a 1-based vertex loop and convert it to slots.
fn resolve_face(
  face: &[IndexType],
  num_vertices: usize,
  face_number: usize,
) -> Result<Vec<IndexType>> {
  let degenerate = |distinct| MeshError::DegenerateFace {
    face: face_number,
    distinct,
  };

  if face.len() < 3 {
    return Err(degenerate(face.iter().collect::<BTreeSet<_>>().len()));
  }

  let slots = face
    .iter()
    .map(|&idx| {
      if idx == 0 || idx as usize > num_vertices {
        Err(MeshError::UndefinedVertex {
          face: face_number,
          vertex: i64::from(idx),
        })
      } else {
        Ok(idx - 1)
      }
    })
    .collect::<Result<Vec<_>>>()?;

  let distinct = slots.iter().collect::<BTreeSet<_>>().len();
  let zero_length_edge = slots
    .iter()
    .zip(slots.iter().cycle().skip(1))
    .any(|(a, b)| a == b);

  if distinct < 3 || zero_length_edge {
    return Err(degenerate(distinct));
  }

  Ok(slots)
}

impl HalfEdgeMesh {
  fn vertex_ref(&self, key: IndexType) -> Result<&VertexRef> {
    key
      .checked_sub(1)
      .and_then(|idx| self.vertex_refs.get(idx as usize))
      .ok_or(MeshError::NotFound(Element::Vertex(key)))
  }

  fn face_ref(&self, key: IndexType) -> Result<&FaceRef> {
    key
      .checked_sub(1)
      .and_then(|idx| self.face_refs.get(idx as usize))
      .ok_or(MeshError::NotFound(Element::Face(key)))
  }

  fn get_next(&self, idx: IndexType) -> IndexType {
    self.half_edge_refs[idx as usize].next_idx
  }

  fn get_pair(&self, idx: IndexType) -> HalfEdgePair<IndexType> {
    let half_edge = &self.half_edge_refs[idx as usize];
    let origin = half_edge
      .twin_idx
      .map(|twin_idx| self.half_edge_refs[twin_idx as usize].vertex_idx + 1);
    (origin, half_edge.vertex_idx + 1)
  }

  fn get_face(&self, idx: IndexType) -> Option<IndexType> {
    self.half_edge_refs[idx as usize].face_idx.map(|face| face + 1)
  }

  /// Outgoing half-edges of a vertex, visited by `twin -> next` rotation.
  fn rotate_around_vertex(&self, key: IndexType) -> Result<Vec<IndexType>> {
    let vertex_ref = self.vertex_ref(key)?;
    let mut visited = Vec::new();

    let start = match vertex_ref.half_edge_idx {
      Some(idx) => idx,
      None => return Ok(visited),
    };

    let mut half_edge_idx = start;
    for _ in 0..vertex_ref.valence {
      visited.push(half_edge_idx);
      match self.half_edge_refs[half_edge_idx as usize].twin_idx {
        Some(twin_idx) => {
          half_edge_idx = self.get_next(twin_idx);
          if half_edge_idx == start {
            return Ok(visited);
          }
        }
        None => return Ok(visited),
      }
    }

    warn!(vertex = key, "rotation did not close within the vertex valence");
    Ok(visited)
  }

  /// Half-edges of a face loop in winding order.
  fn walk_face(&self, key: IndexType) -> Result<Vec<IndexType>> {
    let face_ref = self.face_ref(key)?;
    let start = face_ref.half_edge_idx;
    let mut visited = Vec::with_capacity(face_ref.degree as usize);

    let mut half_edge_idx = start;
    for _ in 0..face_ref.degree {
      visited.push(half_edge_idx);
      half_edge_idx = self.get_next(half_edge_idx);
      if half_edge_idx == start {
        return Ok(visited);
      }
    }

    warn!(face = key, "face loop did not close within the face degree");
    Ok(visited)
  }

  #[cfg(debug_assertions)]
  fn verify_half_edge_valid(&self, half_edge_idx: IndexType) {
    if let Some(twin_idx) = self.half_edge_refs[half_edge_idx as usize].twin_idx
    {
      debug_assert_eq!(
        self.half_edge_refs[twin_idx as usize].twin_idx,
        Some(half_edge_idx)
      );
    }
    debug_assert!(self.half_edge_refs[half_edge_idx as usize]
      .face_idx
      .is_some());
  }

  #[cfg(not(debug_assertions))]
  fn verify_half_edge_valid(&self, _: IndexType) {}

  #[cfg(debug_assertions)]
  fn verify_face_valid(&self, face_idx: IndexType) {
    let face_ref = &self.face_refs[face_idx as usize];
    let mut half_edge_idx = face_ref.half_edge_idx;
    for _ in 0..face_ref.degree {
      debug_assert_eq!(
        self.half_edge_refs[half_edge_idx as usize].face_idx,
        Some(face_idx)
      );
      half_edge_idx = self.get_next(half_edge_idx);
    }
    debug_assert_eq!(half_edge_idx, face_ref.half_edge_idx);
  }

  #[cfg(not(debug_assertions))]
  fn verify_face_valid(&self, _: IndexType) {}
}

impl DataStructure for HalfEdgeMesh {
  fn from_iters_with<IterVert, IterFace>(
    vertices: IterVert,
    faces: IterFace,
    options: &LoadOptions,
  ) -> Result<Self>
  where
    IterVert: IntoIterator<Item = Vertex>,
    IterFace: IntoIterator<Item = Face>,
  {
    let mut vertex_refs: Vec<VertexRef> = vertices
      .into_iter()
      .map(|vertex| VertexRef {
        half_edge_idx: None,
        valence: 0,
        vertex,
      })
      .collect();

    let mut vertex_pair_to_half_edge_idx = HashMap::new();
    let mut half_edge_refs = Vec::<HalfEdgeRef>::new();
    let mut face_refs = Vec::new();

    for face in faces.into_iter() {
      let face_idx = face_refs.len() as IndexType;
      let face_number = face_refs.len() + 1;
      let slots = resolve_face(&face, vertex_refs.len(), face_number)?;

      let degree = slots.len() as IndexType;
      let start_idx = half_edge_refs.len() as IndexType;

      for (offset, &vertex_idx) in slots.iter().enumerate() {
        let offset = offset as IndexType;
        let next_vertex_idx = slots[((offset + 1) % degree) as usize];
        let half_edge_idx = start_idx + offset;
        let next_idx = start_idx + (offset + 1) % degree;

        half_edge_refs.push(HalfEdgeRef {
          twin_idx: None,
          next_idx,
          vertex_idx: next_vertex_idx,
          face_idx: Some(face_idx),
        });

        if let Some(displaced_idx) = vertex_pair_to_half_edge_idx
          .insert((vertex_idx, next_vertex_idx), half_edge_idx)
        {
          match options.duplicate_edges {
            DuplicateEdgePolicy::Reject => {
              return Err(MeshError::NonManifoldEdge {
                origin: vertex_idx + 1,
                destination: next_vertex_idx + 1,
                face: face_number,
              });
            }
            DuplicateEdgePolicy::Overwrite => {
              warn!(
                origin = vertex_idx + 1,
                destination = next_vertex_idx + 1,
                face = face_number,
                "directed edge used twice, later face takes the edge"
              );
              detach_twin(&mut half_edge_refs, displaced_idx);
            }
          }
        }

        let vertex_ref = &mut vertex_refs[vertex_idx as usize];
        vertex_ref.half_edge_idx = Some(half_edge_idx);
        vertex_ref.valence += 1;

        if let Some(&twin_idx) =
          vertex_pair_to_half_edge_idx.get(&(next_vertex_idx, vertex_idx))
        {
          link_twins(&mut half_edge_refs, half_edge_idx, twin_idx);
        }
      }

      face_refs.push(FaceRef {
        half_edge_idx: start_idx,
        degree,
      });
    }

    let out = HalfEdgeMesh {
      half_edge_refs,
      vertex_refs,
      face_refs,
      vertex_pair_to_half_edge_idx,
    };

    for idx in 0..(out.half_edge_refs.len() as IndexType) {
      out.verify_half_edge_valid(idx);
    }

    for idx in 0..(out.face_refs.len() as IndexType) {
      out.verify_face_valid(idx);
    }

    debug!(
      vertices = out.num_vertices(),
      half_edges = out.num_half_edges(),
      faces = out.num_faces(),
      boundary = out.num_boundary_half_edges(),
      "built half-edge mesh"
    );

    Ok(out)
  }

  fn num_vertices(&self) -> usize {
    self.vertex_refs.len()
  }

  fn num_half_edges(&self) -> usize {
    self.half_edge_refs.len()
  }

  fn num_edges(&self) -> usize {
    self
      .half_edge_refs
      .iter()
      .enumerate()
      .filter(|(idx, half_edge)| {
        half_edge
          .twin_idx
          .map_or(true, |twin_idx| twin_idx as usize > *idx)
      })
      .count()
  }

  fn num_faces(&self) -> usize {
    self.face_refs.len()
  }

  fn num_boundary_half_edges(&self) -> usize {
    self
      .half_edge_refs
      .iter()
      .filter(|half_edge| half_edge.twin_idx.is_none())
      .count()
  }

  type VertexKey = IndexType;
  type FaceKey = IndexType;
  type IterVertexKeys = std::ops::RangeInclusive<IndexType>;
  type IterFaceKeys = std::ops::RangeInclusive<IndexType>;

  fn vertex_indices(&self) -> Self::IterVertexKeys {
    1..=(self.vertex_refs.len() as IndexType)
  }

  fn face_indices(&self) -> Self::IterFaceKeys {
    1..=(self.face_refs.len() as IndexType)
  }

  fn vertex_position(&self, key: Self::VertexKey) -> Result<Vertex> {
    Ok(self.vertex_ref(key)?.vertex)
  }

  fn face_vertices(&self, key: Self::FaceKey) -> Result<Vec<Self::VertexKey>> {
    let mut vertices: Vec<IndexType> = self
      .walk_face(key)?
      .into_iter()
      .map(|idx| self.half_edge_refs[idx as usize].vertex_idx + 1)
      .collect();
    // the last destination is the origin of the first half-edge
    vertices.rotate_right(1);
    Ok(vertices)
  }

  fn faces_around_vertex(
    &self,
    key: Self::VertexKey,
  ) -> Result<BTreeSet<Self::FaceKey>> {
    Ok(
      self
        .rotate_around_vertex(key)?
        .into_iter()
        .filter_map(|idx| self.get_face(idx))
        .collect(),
    )
  }

  fn edges_around_vertex(
    &self,
    key: Self::VertexKey,
  ) -> Result<BTreeSet<HalfEdgePair<Self::VertexKey>>> {
    Ok(
      self
        .rotate_around_vertex(key)?
        .into_iter()
        .map(|idx| self.get_pair(idx))
        .collect(),
    )
  }

  fn faces_sharing_edge(
    &self,
    u: Self::VertexKey,
    v: Self::VertexKey,
  ) -> Result<Vec<Self::FaceKey>> {
    self.vertex_ref(u)?;
    self.vertex_ref(v)?;

    let (u_idx, v_idx) = (u - 1, v - 1);
    Ok(
      [(u_idx, v_idx), (v_idx, u_idx)]
        .iter()
        .filter_map(|pair| self.vertex_pair_to_half_edge_idx.get(pair))
        .filter_map(|&idx| self.get_face(idx))
        .collect(),
    )
  }

  fn edges_of_face(
    &self,
    key: Self::FaceKey,
  ) -> Result<Vec<HalfEdgePair<Self::VertexKey>>> {
    Ok(
      self
        .walk_face(key)?
        .into_iter()
        .map(|idx| self.get_pair(idx))
        .collect(),
    )
  }

  fn adjacent_faces(
    &self,
    key: Self::FaceKey,
  ) -> Result<BTreeSet<Self::FaceKey>> {
    Ok(
      self
        .walk_face(key)?
        .into_iter()
        .filter_map(|idx| self.half_edge_refs[idx as usize].twin_idx)
        .filter_map(|twin_idx| self.get_face(twin_idx))
        .collect(),
    )
  }

  fn to_raw(&self) -> RawMesh {
    let vertices = self.vertex_refs.iter().map(|v| v.vertex).collect();

    let faces = self
      .face_indices()
      .filter_map(|key| self.face_vertices(key).ok())
      .collect();

    RawMesh { vertices, faces }
  }
}
