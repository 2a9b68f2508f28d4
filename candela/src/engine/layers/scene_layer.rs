use crate::engine::layers::Layer;
use crate::engine::scene::Scene;
use candela_render::{EnvironmentBindings, Renderer};

/// Draws the active scene through the deferred pipeline.
///
/// The environment maps are bound as borrowed views; a scene without an
/// environment (or with unloaded maps) binds an empty set, which the lighting
/// pass treats as "no environment contribution".
#[derive(Debug, Default)]
pub struct SceneLayer;

impl Layer for SceneLayer {
    fn name(&self) -> &'static str {
        "scene"
    }

    fn on_render(&mut self, scene: Option<&dyn Scene>, renderer: &mut dyn Renderer) {
        let bindings = scene
            .and_then(|scene| scene.environment())
            .map(EnvironmentBindings::of)
            .unwrap_or_default();

        renderer.bind_environment(&bindings);
    }
}
