use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use tempfile::tempdir;

use halfedge_mesh::{DataStructure, HalfEdgeMesh, LoadOptions, MeshError};

// unit cube, quads wound outwards, with normals and texture references
const CUBE: &str = "# cube\n\
o cube\n\
v -0.5 -0.5 0.5\n\
v 0.5 -0.5 0.5\n\
v -0.5 0.5 0.5\n\
v 0.5 0.5 0.5\n\
v -0.5 0.5 -0.5\n\
v 0.5 0.5 -0.5\n\
v -0.5 -0.5 -0.5\n\
v 0.5 -0.5 -0.5\n\
vt 0 0\n\
vn 0 0 1\n\
s off\n\
f 1/1/1 2/1/1 4/1/1 3/1/1\n\
f 3/1/1 4/1/1 6/1/1 5/1/1\n\
f 5/1/1 6/1/1 8/1/1 7/1/1\n\
f 7/1/1 8/1/1 2/1/1 1/1/1\n\
f 2/1/1 8/1/1 6/1/1 4/1/1\n\
f 7/1/1 1/1/1 3/1/1 5/1/1\n";

fn write_cube(dir: &Path) -> std::path::PathBuf {
  let path = dir.join("cube.obj");
  fs::write(&path, CUBE).unwrap();
  path
}

fn assert_closed_cube(mesh: &HalfEdgeMesh) {
  assert_eq!(mesh.num_vertices(), 8);
  assert_eq!(mesh.num_faces(), 6);
  assert_eq!(mesh.num_edges(), 12);
  assert_eq!(mesh.num_half_edges(), 24);
  assert_eq!(mesh.num_boundary_half_edges(), 0);

  for face in mesh.face_indices() {
    assert_eq!(mesh.adjacent_faces(face).unwrap().len(), 4);
    assert_eq!(mesh.edges_of_face(face).unwrap().len(), 4);
  }
  for vertex in mesh.vertex_indices() {
    assert_eq!(mesh.faces_around_vertex(vertex).unwrap().len(), 3);
    assert_eq!(mesh.edges_around_vertex(vertex).unwrap().len(), 3);
  }
}

#[test]
fn open_keeps_file_indices() {
  let dir = tempdir().unwrap();
  let path = write_cube(dir.path());

  let mesh = HalfEdgeMesh::open(&path, &LoadOptions::default()).unwrap();
  assert_closed_cube(&mesh);

  let position = mesh.vertex_position(4).unwrap();
  assert_relative_eq!(position.x, 0.5);
  assert_relative_eq!(position.y, 0.5);
  assert_relative_eq!(position.z, 0.5);

  assert_eq!(mesh.face_vertices(5).unwrap(), vec![2, 8, 6, 4]);
  assert_eq!(mesh.faces_sharing_edge(2, 4).unwrap(), vec![1, 5]);
}

#[test]
fn tobj_keeps_polygons() {
  let dir = tempdir().unwrap();
  let path = write_cube(dir.path());

  let mesh = HalfEdgeMesh::from_obj(&path, &LoadOptions::strict()).unwrap();
  assert_closed_cube(&mesh);

  let mut xs: Vec<f64> = mesh
    .vertex_indices()
    .map(|v| mesh.vertex_position(v).unwrap().x)
    .collect();
  xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
  assert_relative_eq!(xs[0], -0.5);
  assert_relative_eq!(xs[7], 0.5);
}

#[test]
fn save_and_reload() {
  let dir = tempdir().unwrap();
  let path = write_cube(dir.path());
  let out = dir.path().join("out.obj");

  let mesh = HalfEdgeMesh::open(&path, &LoadOptions::default()).unwrap();
  mesh.save_obj(&out).unwrap();

  let reloaded = HalfEdgeMesh::open(&out, &LoadOptions::default()).unwrap();
  assert_closed_cube(&reloaded);
  for face in mesh.face_indices() {
    assert_eq!(
      mesh.face_vertices(face).unwrap(),
      reloaded.face_vertices(face).unwrap()
    );
  }
  for vertex in mesh.vertex_indices() {
    assert_relative_eq!(
      mesh.vertex_position(vertex).unwrap(),
      reloaded.vertex_position(vertex).unwrap()
    );
  }
}

#[test]
fn missing_files_report_errors() {
  let dir = tempdir().unwrap();
  let missing = dir.path().join("missing.obj");

  assert!(matches!(
    HalfEdgeMesh::open(&missing, &LoadOptions::default()),
    Err(MeshError::Io(_))
  ));
  assert!(matches!(
    HalfEdgeMesh::from_obj(&missing, &LoadOptions::default()),
    Err(MeshError::Obj { .. })
  ));
}
