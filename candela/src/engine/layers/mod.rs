//! Ordered update/render/event participants.
//!
//! Regular layers render first in push order; overlays always render after
//! every regular layer, in their own push order. Structural changes go through
//! `&mut` access and therefore land between frames, never during one.

pub mod scene_layer;

pub use scene_layer::SceneLayer;

use crate::engine::scene::Scene;
use crate::engine::timestep::TimeStep;
use crate::windowing::WindowSignal;
use candela_render::Renderer;
use tracing::trace;

#[allow(unused)]
pub trait Layer {
    fn name(&self) -> &'static str;

    fn on_attach(&mut self) {}
    fn on_detach(&mut self) {}

    fn on_update(&mut self, ts: &TimeStep, scene: Option<&mut dyn Scene>) {}
    fn on_render(&mut self, scene: Option<&dyn Scene>, renderer: &mut dyn Renderer) {}

    /// Returns true when the event was consumed and must not reach the scene.
    fn on_event(&mut self, event: &WindowSignal) -> bool {
        false
    }
}

#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn Layer>>,
    // boundary between regular layers and overlays
    layer_insert_index: usize,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_layer(&mut self, mut layer: Box<dyn Layer>) {
        trace!("Pushing layer {:?}", layer.name());
        layer.on_attach();
        self.layers.insert(self.layer_insert_index, layer);
        self.layer_insert_index += 1;
    }

    pub fn push_overlay(&mut self, mut overlay: Box<dyn Layer>) {
        trace!("Pushing overlay {:?}", overlay.name());
        overlay.on_attach();
        self.layers.push(overlay);
    }

    pub fn count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    pub fn on_update(&mut self, ts: &TimeStep, mut scene: Option<&mut dyn Scene>) {
        for layer in &mut self.layers {
            layer.on_update(ts, scene.as_deref_mut());
        }
    }

    pub fn on_render(&mut self, scene: Option<&dyn Scene>, renderer: &mut dyn Renderer) {
        for layer in &mut self.layers {
            layer.on_render(scene, renderer);
        }
    }

    /// Dispatches in reverse render order; overlays get first refusal.
    pub fn on_event(&mut self, event: &WindowSignal) -> bool {
        for layer in self.layers.iter_mut().rev() {
            if layer.on_event(event) {
                return true;
            }
        }
        false
    }

    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.on_detach();
        }
        self.layers.clear();
        self.layer_insert_index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Layer for Named {
        fn name(&self) -> &'static str {
            self.0
        }
    }

    #[test]
    fn overlays_stay_after_layers() {
        let mut stack = LayerStack::new();
        stack.push_overlay(Box::new(Named("overlay-a")));
        stack.push_layer(Box::new(Named("layer-a")));
        stack.push_overlay(Box::new(Named("overlay-b")));
        stack.push_layer(Box::new(Named("layer-b")));

        assert_eq!(
            stack.names(),
            vec!["layer-a", "layer-b", "overlay-a", "overlay-b"]
        );
    }

    #[test]
    fn clear_empties_and_resets_insert_point() {
        let mut stack = LayerStack::new();
        stack.push_layer(Box::new(Named("layer")));
        stack.push_overlay(Box::new(Named("overlay")));
        stack.clear();

        assert!(stack.is_empty());
        stack.push_layer(Box::new(Named("fresh")));
        assert_eq!(stack.names(), vec!["fresh"]);
    }

    #[test]
    fn events_stop_at_the_first_consumer() {
        struct Consumer(&'static str);
        impl Layer for Consumer {
            fn name(&self) -> &'static str {
                self.0
            }
            fn on_event(&mut self, _event: &WindowSignal) -> bool {
                true
            }
        }

        let mut stack = LayerStack::new();
        stack.push_layer(Box::new(Named("passive")));
        stack.push_overlay(Box::new(Consumer("consumer")));
        assert!(stack.on_event(&WindowSignal::CloseRequested));
    }
}
