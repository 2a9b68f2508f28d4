use crate::engine::timestep::TimeStep;
use tracing::info;

/// A subsystem updated once per tick, in registration order.
#[allow(unused)]
pub trait EngineSystem {
    fn name(&self) -> &'static str;

    fn on_update(&mut self, ts: &TimeStep);

    fn set_paused(&mut self, paused: bool) {}

    fn is_paused(&self) -> bool {
        false
    }
}

#[derive(Default)]
pub struct SystemManager {
    systems: Vec<Box<dyn EngineSystem>>,
}

impl SystemManager {
    pub fn register(&mut self, system: Box<dyn EngineSystem>) {
        info!("Registered system {:?}", system.name());
        self.systems.push(system);
    }

    pub fn on_update(&mut self, ts: &TimeStep) {
        for system in &mut self.systems {
            system.on_update(ts);
        }
    }

    /// Flips the pause flag of every pausable system.
    pub fn toggle_paused(&mut self) {
        for system in &mut self.systems {
            let paused = system.is_paused();
            system.set_paused(!paused);
        }
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    pub fn clear(&mut self) {
        if !self.systems.is_empty() {
            info!("Releasing {} systems", self.systems.len());
        }
        self.systems.clear();
    }
}
