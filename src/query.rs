use std::fmt;

use clap::{Parser, Subcommand};

use crate::data_structure::{DataStructure, HalfEdgePair, IndexType};
use crate::error::Result;

/// Adjacency queries, addressed by 1-based indices.
#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Query {
  /// faces reachable by rotating around a vertex
  FacesAroundVertex { vertex: IndexType },
  /// edges reachable by rotating around a vertex
  EdgesAroundVertex { vertex: IndexType },
  /// faces on either side of the edge between two vertices
  FacesSharingEdge { from: IndexType, to: IndexType },
  /// boundary loop of a face in winding order
  EdgesOfFace { face: IndexType },
  /// faces that share an edge with a face
  AdjacentFaces { face: IndexType },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
  Faces(Vec<IndexType>),
  Edges(Vec<HalfEdgePair<IndexType>>),
}

impl Query {
  pub fn run<D>(&self, mesh: &D) -> Result<Answer>
  where
    D: DataStructure<VertexKey = IndexType, FaceKey = IndexType>,
  {
    let answer = match *self {
      Query::FacesAroundVertex { vertex } => {
        Answer::Faces(mesh.faces_around_vertex(vertex)?.into_iter().collect())
      }
      Query::EdgesAroundVertex { vertex } => {
        Answer::Edges(mesh.edges_around_vertex(vertex)?.into_iter().collect())
      }
      Query::FacesSharingEdge { from, to } => {
        Answer::Faces(mesh.faces_sharing_edge(from, to)?)
      }
      Query::EdgesOfFace { face } => Answer::Edges(mesh.edges_of_face(face)?),
      Query::AdjacentFaces { face } => {
        Answer::Faces(mesh.adjacent_faces(face)?.into_iter().collect())
      }
    };

    Ok(answer)
  }
}

impl fmt::Display for Answer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Answer::Faces(faces) => {
        let faces: Vec<String> = faces.iter().map(|idx| idx.to_string()).collect();
        write!(f, "faces: [{}]", faces.join(", "))
      }
      Answer::Edges(edges) => {
        let edges: Vec<String> = edges
          .iter()
          .map(|(origin, destination)| match origin {
            Some(origin) => format!("({}, {})", origin, destination),
            None => format!("(-, {})", destination),
          })
          .collect();
        write!(f, "edges: [{}]", edges.join(", "))
      }
    }
  }
}

/// One line of interactive input.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Prompt {
  #[command(flatten)]
  Query(Query),
  /// leave interactive mode
  #[command(alias = "exit")]
  Quit,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct PromptLine {
  #[command(subcommand)]
  prompt: Prompt,
}

impl Prompt {
  pub fn parse_line(line: &str) -> std::result::Result<Self, clap::Error> {
    PromptLine::try_parse_from(line.split_whitespace()).map(|line| line.prompt)
  }
}
