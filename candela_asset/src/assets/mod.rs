pub mod cubemap;
pub mod environment;
pub mod mesh;

pub use cubemap::{Cubemap, CubemapError, FACE_SUFFIXES};
pub use environment::Environment;
pub use mesh::{Mesh, MeshVertexData, Vertex3D};
