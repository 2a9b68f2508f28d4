use crate::engine::systems::EngineSystem;
use crate::engine::timestep::TimeStep;
use crate::math::{Quaternion, Vector3};
use kira::listener::ListenerHandle;
use kira::track::{SpatialTrackBuilder, SpatialTrackHandle};
use kira::{AudioManager, AudioManagerSettings, DefaultBackend, Tween};
use tracing::error;

pub use kira::effect;
pub use kira::track;

struct AudioInner {
    manager: AudioManager<DefaultBackend>,
    listener: ListenerHandle,
}

impl AudioInner {
    fn new() -> Option<Self> {
        let mut manager = match AudioManager::new(AudioManagerSettings::default()) {
            Ok(x) => x,
            Err(e) => {
                error!("Audio manager could not be initialized: {e:?}");
                return None;
            }
        };

        let position = Vector3::zeros();
        let orientation = Quaternion::identity();

        let listener = match manager.add_listener(position, orientation) {
            Ok(x) => x,
            Err(e) => {
                // So we technically have an audio manager but can't play anything. Fantastic.
                error!("Failed to add audio listener: {e}");
                return None;
            }
        };

        Some(Self { manager, listener })
    }
}

/// Spatial audio output.
///
/// Soft-fails to a disabled state when no output device is available, so a
/// headless machine still runs the full frame loop.
pub struct AudioSystem {
    inner: Option<AudioInner>,
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSystem {
    pub fn new() -> Self {
        Self {
            inner: AudioInner::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    pub fn set_listener_position(&mut self, position: Vector3<f32>) {
        if let Some(this) = self.inner.as_mut() {
            this.listener.set_position(position, Tween::default())
        }
    }

    pub fn set_listener_orientation(&mut self, orientation: Quaternion<f32>) {
        if let Some(this) = self.inner.as_mut() {
            this.listener.set_orientation(orientation, Tween::default())
        }
    }

    /// Returns none if the spatial track limit was reached
    pub fn add_spatial_track(
        &mut self,
        initial_position: Vector3<f32>,
        track: SpatialTrackBuilder,
    ) -> Option<SpatialTrackHandle> {
        self.inner.as_mut().and_then(|this| {
            this.manager
                .add_spatial_sub_track(this.listener.id(), initial_position, track)
                .ok()
        })
    }
}

impl EngineSystem for AudioSystem {
    fn name(&self) -> &'static str {
        "audio"
    }

    // kira mixes on its own thread; the per-tick hook only exists so audio
    // takes part in the ordered system dispatch
    fn on_update(&mut self, _ts: &TimeStep) {}
}
