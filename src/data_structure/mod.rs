mod base;
pub use base::DataStructure;
pub use base::DuplicateEdgePolicy;
pub use base::Face;
pub use base::HalfEdgePair;
pub use base::IndexType;
pub use base::LoadOptions;
pub use base::Vertex;

mod half_edge;
pub use half_edge::HalfEdgeMesh;
