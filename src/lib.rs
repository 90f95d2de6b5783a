//! Half-edge connectivity for polygon meshes read from OBJ descriptions.
//!
//! A mesh is built once by [`load`] (or the [`DataStructure`] constructors)
//! and is read-only afterwards, so it can be shared freely between readers.
//! Vertex and face indices are 1-based, as in the OBJ file.

pub mod data_structure;
pub mod error;
pub mod mesh;
pub mod query;

pub use data_structure::DataStructure;
pub use data_structure::DuplicateEdgePolicy;
pub use data_structure::HalfEdgeMesh;
pub use data_structure::LoadOptions;
pub use data_structure::{Face, HalfEdgePair, IndexType, Vertex};

pub use error::{Element, MeshError, Result};

pub use mesh::RawMesh;

pub use query::{Answer, Prompt, Query};

pub type Mesh = HalfEdgeMesh;

/// Build a mesh from OBJ text with the default options.
pub fn load(source: &str) -> Result<Mesh> {
  Mesh::load(source)
}
