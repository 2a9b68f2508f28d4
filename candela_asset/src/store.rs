//! The [`AssetStore`] caches shared "raw" asset data, primarily the built-in
//! primitive meshes the engine initializes once at startup and releases once
//! at shutdown.

use crate::assets::Mesh;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub const MESH_CUBE: &str = "cube";
pub const MESH_SPHERE: &str = "sphere";
pub const MESH_QUAD: &str = "quad";

#[derive(Default)]
pub struct AssetStore {
    meshes: HashMap<String, Arc<Mesh>>,
}

impl AssetStore {
    /// Store pre-populated with the built-in primitives.
    pub fn with_builtin_meshes() -> Self {
        let mut store = Self::default();
        store.add_mesh(MESH_CUBE, Mesh::unit_cube());
        store.add_mesh(MESH_SPHERE, Mesh::uv_sphere(16, 24));
        store.add_mesh(MESH_QUAD, Mesh::unit_quad());
        debug!("Initialized {} built-in meshes", store.mesh_count());
        store
    }

    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) -> Arc<Mesh> {
        let mesh = Arc::new(mesh);
        self.meshes.insert(name.into(), mesh.clone());
        mesh
    }

    pub fn mesh(&self, name: &str) -> Option<Arc<Mesh>> {
        self.meshes.get(name).cloned()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Drops every cached mesh. Safe to call more than once.
    pub fn release_meshes(&mut self) {
        if !self.meshes.is_empty() {
            debug!("Releasing {} cached meshes", self.meshes.len());
        }
        self.meshes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_present() {
        let store = AssetStore::with_builtin_meshes();
        assert!(store.mesh(MESH_CUBE).is_some());
        assert!(store.mesh(MESH_SPHERE).is_some());
        assert!(store.mesh(MESH_QUAD).is_some());
        assert!(store.mesh("teapot").is_none());
    }

    #[test]
    fn release_is_idempotent() {
        let mut store = AssetStore::with_builtin_meshes();
        store.release_meshes();
        assert_eq!(store.mesh_count(), 0);
        store.release_meshes();
        assert_eq!(store.mesh_count(), 0);
    }
}
