//! Scenes and the manager that switches between them.
//!
//! Scene switches are requested by index and committed only at the end of the
//! frame, so every subsystem observes one stable active scene for the whole
//! tick.

use crate::engine::timestep::TimeStep;
use crate::windowing::WindowSignal;
use candela_asset::Environment;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[allow(unused)]
pub trait Scene {
    fn name(&self) -> &str;

    fn on_init(&mut self) {}
    fn on_cleanup(&mut self) {}

    fn on_update(&mut self, ts: &TimeStep) {}

    /// 1-second cadence hook driven by the orchestrator's sampling window.
    fn on_tick(&mut self) {}

    fn on_event(&mut self, event: &WindowSignal) {}

    fn environment(&self) -> Option<&Environment> {
        None
    }

    fn environment_mut(&mut self) -> Option<&mut Environment> {
        None
    }
}

#[derive(Default)]
pub struct SceneManager {
    scenes: Vec<Box<dyn Scene>>,
    current: usize,
    queued: usize,
    switching: bool,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_scene(&mut self, scene: Box<dyn Scene>) {
        info!("Enqueued scene {:?}", scene.name());
        self.scenes.push(scene);
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&dyn Scene> {
        self.scenes.get(self.current).map(|scene| &**scene)
    }

    pub fn current_mut(&mut self) -> Option<&mut dyn Scene> {
        self.scenes.get_mut(self.current).map(|scene| &mut **scene)
    }

    /// Requests a switch; the active scene changes only at the next
    /// [`SceneManager::apply_scene_switch`]. Requesting the current index
    /// reloads the scene.
    pub fn switch_scene(&mut self, index: usize) {
        if index >= self.scenes.len() {
            warn!(
                "Scene switch to index {index} ignored, only {} scenes",
                self.scenes.len()
            );
            return;
        }
        self.queued = index;
        self.switching = true;
    }

    /// End-of-frame commit point. Returns true when the active scene changed
    /// (or was reloaded).
    pub fn apply_scene_switch(&mut self) -> bool {
        if !self.switching {
            return false;
        }
        self.switching = false;

        if let Some(scene) = self.current_mut() {
            scene.on_cleanup();
        }

        self.current = self.queued;

        if let Some(scene) = self.scenes.get_mut(self.current) {
            info!("Switched to scene {:?}", scene.name());
            scene.on_init();
        }

        true
    }
}

/// Persisted form of a scene: its name and environment source fields.
///
/// Deserializing re-triggers the environment load when its path is non-empty.
#[derive(Deserialize)]
pub struct SceneSnapshot {
    pub name: String,
    pub environment: Option<Environment>,
}

#[derive(Serialize)]
struct SceneSnapshotRef<'a> {
    name: &'a str,
    environment: Option<&'a Environment>,
}

impl SceneSnapshot {
    pub fn write_json(scene: &dyn Scene) -> serde_json::Result<String> {
        serde_json::to_string(&SceneSnapshotRef {
            name: scene.name(),
            environment: scene.environment(),
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<SceneSnapshot> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Named {
        name: &'static str,
        inits: Arc<AtomicU32>,
        cleanups: Arc<AtomicU32>,
    }

    impl Named {
        fn boxed(name: &'static str) -> (Box<dyn Scene>, Arc<AtomicU32>, Arc<AtomicU32>) {
            let inits = Arc::new(AtomicU32::new(0));
            let cleanups = Arc::new(AtomicU32::new(0));
            let scene = Box::new(Named {
                name,
                inits: inits.clone(),
                cleanups: cleanups.clone(),
            });
            (scene, inits, cleanups)
        }
    }

    impl Scene for Named {
        fn name(&self) -> &str {
            self.name
        }
        fn on_init(&mut self) {
            self.inits.fetch_add(1, Ordering::Relaxed);
        }
        fn on_cleanup(&mut self) {
            self.cleanups.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn switch_is_deferred_until_applied() {
        let (first, _, first_cleanups) = Named::boxed("first");
        let (second, second_inits, _) = Named::boxed("second");

        let mut manager = SceneManager::new();
        manager.enqueue_scene(first);
        manager.enqueue_scene(second);

        manager.switch_scene(1);
        assert_eq!(manager.current().unwrap().name(), "first");
        assert_eq!(second_inits.load(Ordering::Relaxed), 0);

        assert!(manager.apply_scene_switch());
        assert_eq!(manager.current().unwrap().name(), "second");
        assert_eq!(first_cleanups.load(Ordering::Relaxed), 1);
        assert_eq!(second_inits.load(Ordering::Relaxed), 1);

        // no pending request, nothing to do
        assert!(!manager.apply_scene_switch());
    }

    #[test]
    fn switching_to_the_current_index_reloads() {
        let (only, inits, cleanups) = Named::boxed("only");
        let mut manager = SceneManager::new();
        manager.enqueue_scene(only);

        manager.switch_scene(0);
        assert!(manager.apply_scene_switch());
        manager.switch_scene(0);
        assert!(manager.apply_scene_switch());

        assert_eq!(inits.load(Ordering::Relaxed), 2);
        assert_eq!(cleanups.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn out_of_range_requests_are_ignored() {
        let (only, _, _) = Named::boxed("only");
        let mut manager = SceneManager::new();
        manager.enqueue_scene(only);
        manager.switch_scene(3);
        assert!(!manager.apply_scene_switch());
        assert_eq!(manager.current_index(), 0);
    }

    #[test]
    fn snapshot_round_trips_scene_name() {
        struct Plain;
        impl Scene for Plain {
            fn name(&self) -> &str {
                "plain"
            }
        }

        let json = SceneSnapshot::write_json(&Plain).expect("snapshot should serialize");
        let snapshot = SceneSnapshot::from_json(&json).expect("snapshot should deserialize");
        assert_eq!(snapshot.name, "plain");
        assert!(snapshot.environment.is_none());
    }
}
