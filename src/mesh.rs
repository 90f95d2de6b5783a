use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;

use nalgebra::base::Vector3;
use tracing::debug;

use crate::data_structure::{Face, IndexType, Vertex};
use crate::error::{MeshError, Result};

/// Vertex positions and polygon loops as read from an OBJ description,
/// before any connectivity is built. Face indices are 1-based.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMesh {
  pub vertices: Vec<Vertex>,
  pub faces: Vec<Face>,
}

fn parse_vertex_ref(
  token: &str,
  defined: usize,
  line: usize,
  face: usize,
) -> Result<IndexType> {
  let prefix = match token.find('/') {
    Some(end) => &token[..end],
    None => token,
  };

  let written: i64 = prefix.parse().map_err(|_| {
    MeshError::parse(line, format!("invalid vertex reference `{}`", token))
  })?;

  // negative references count back from the last vertex defined so far
  let resolved = if written < 0 {
    defined as i64 + 1 + written
  } else {
    written
  };

  match IndexType::try_from(resolved) {
    Ok(idx) if idx > 0 => Ok(idx),
    _ => Err(MeshError::UndefinedVertex {
      face,
      vertex: written,
    }),
  }
}

impl RawMesh {
  /// Read `v` and `f` lines; everything else is skipped.
  pub fn parse(source: &str) -> Result<Self> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (line_idx, line) in source.lines().enumerate() {
      let line_number = line_idx + 1;
      let mut fields = line.split_whitespace();

      match fields.next() {
        Some("v") => {
          let coords = fields
            .map(|field| {
              field.parse::<f64>().map_err(|_| {
                MeshError::parse(
                  line_number,
                  format!("invalid coordinate `{}`", field),
                )
              })
            })
            .collect::<Result<Vec<_>>>()?;

          if coords.len() != 3 {
            return Err(MeshError::parse(
              line_number,
              format!("expected 3 coordinates, found {}", coords.len()),
            ));
          }

          vertices.push(Vector3::new(coords[0], coords[1], coords[2]));
        }
        Some("f") => {
          let face_number = faces.len() + 1;
          let face = fields
            .map(|token| {
              parse_vertex_ref(token, vertices.len(), line_number, face_number)
            })
            .collect::<Result<Face>>()?;

          faces.push(face);
        }
        _ => {}
      }
    }

    debug!(
      vertices = vertices.len(),
      faces = faces.len(),
      "parsed mesh description"
    );

    Ok(RawMesh { vertices, faces })
  }

  pub fn read(path: &Path) -> Result<Self> {
    Self::parse(&fs::read_to_string(path)?)
  }

  /// Load through tobj, keeping polygons as they are written.
  pub fn from_obj(path: &Path) -> Result<Self> {
    let options = tobj::LoadOptions {
      triangulate: false,
      single_index: false,
      ..Default::default()
    };

    let (models, _) =
      tobj::load_obj(path, &options).map_err(|source| MeshError::Obj {
        path: path.to_path_buf(),
        source,
      })?;

    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for m in models {
      let mesh = &m.mesh;
      let offset = vertices.len() as IndexType + 1;

      vertices.extend(mesh.positions.chunks_exact(3).map(|vals| {
        Vector3::new(f64::from(vals[0]), f64::from(vals[1]), f64::from(vals[2]))
      }));

      // no arities means every face is a triangle
      if mesh.face_arities.is_empty() {
        faces.extend(
          mesh
            .indices
            .chunks_exact(3)
            .map(|vals| vals.iter().map(|idx| idx + offset).collect::<Face>()),
        );
      } else {
        let mut indices = mesh.indices.iter();
        for &arity in &mesh.face_arities {
          faces.push(
            indices
              .by_ref()
              .take(arity as usize)
              .map(|idx| idx + offset)
              .collect(),
          );
        }
      }
    }

    debug!(
      path = %path.display(),
      vertices = vertices.len(),
      faces = faces.len(),
      "loaded obj through tobj"
    );

    Ok(RawMesh { vertices, faces })
  }

  pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
    for vertex in &self.vertices {
      writeln!(writer, "v {} {} {}", vertex[0], vertex[1], vertex[2])?
    }

    for face in &self.faces {
      write!(writer, "f")?;
      for idx in face {
        write!(writer, " {}", idx)?;
      }
      writeln!(writer)?
    }

    Ok(())
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    self.write(&mut writer)?;
    writer.flush()?;

    Ok(())
  }
}
