//! Asset types for the Candela engine.
//!
//! This crate holds "raw" data: cube maps, environment resources and meshes.
//! It exists to cleanly differentiate between plain-old-data and whatever hot
//! state a renderer instantiates from it.

pub mod assets;
pub mod store;

pub use assets::{Cubemap, CubemapError, Environment, Mesh, MeshVertexData, Vertex3D};
pub use store::AssetStore;
