//! Error types for mesh loading and topology queries.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::data_structure::IndexType;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// A mesh element addressed by its 1-based index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Element {
  Vertex(IndexType),
  Face(IndexType),
}

impl fmt::Display for Element {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Element::Vertex(idx) => write!(f, "vertex {}", idx),
      Element::Face(idx) => write!(f, "face {}", idx),
    }
  }
}

/// Errors raised while building or querying a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
  /// A line of the mesh description could not be read.
  #[error("line {line}: {message}")]
  Parse {
    /// 1-based line number in the source.
    line: usize,
    message: String,
  },

  /// A face references a vertex that was never defined.
  #[error("face {face} references undefined vertex {vertex}")]
  UndefinedVertex {
    /// 1-based face index.
    face: usize,
    /// The reference as written (relative references stay negative).
    vertex: i64,
  },

  /// A face has fewer than three distinct vertices, or repeats a vertex
  /// back to back.
  #[error("face {face} is degenerate ({distinct} distinct vertices)")]
  DegenerateFace { face: usize, distinct: usize },

  /// A query named an element the mesh does not contain.
  #[error("{0} not found")]
  NotFound(Element),

  /// Two faces use the same directed edge (only under the strict policy).
  #[error("face {face} reuses directed edge {origin} -> {destination}")]
  NonManifoldEdge {
    origin: IndexType,
    destination: IndexType,
    face: usize,
  },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to load {path}: {source}")]
  Obj {
    path: PathBuf,
    #[source]
    source: tobj::LoadError,
  },
}

impl MeshError {
  pub(crate) fn parse<M: Into<String>>(line: usize, message: M) -> Self {
    MeshError::Parse {
      line,
      message: message.into(),
    }
  }
}
