use crate::ibl::EnvironmentBindings;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

/// Seam between the frame orchestrator and a render backend.
///
/// A frame is bracketed by `begin` and `present`; layers submit work in
/// between. Implementations must tolerate `on_resize` between frames only.
pub trait Renderer {
    fn begin(&mut self);
    fn present(&mut self);
    fn on_resize(&mut self, width: u32, height: u32);
    fn bind_environment(&mut self, bindings: &EnvironmentBindings<'_>);
}

/// Side-effect counters recorded by the [`HeadlessRenderer`].
#[derive(Debug, Default)]
pub struct RenderLog {
    pub begins: AtomicU32,
    pub presents: AtomicU32,
    pub environment_binds: AtomicU32,
    pub contributing_binds: AtomicU32,
}

impl RenderLog {
    pub fn begins(&self) -> u32 {
        self.begins.load(Ordering::Relaxed)
    }

    pub fn presents(&self) -> u32 {
        self.presents.load(Ordering::Relaxed)
    }

    pub fn environment_binds(&self) -> u32 {
        self.environment_binds.load(Ordering::Relaxed)
    }

    pub fn contributing_binds(&self) -> u32 {
        self.contributing_binds.load(Ordering::Relaxed)
    }
}

/// Renderer without a GPU behind it.
///
/// Records every call into a shared [`RenderLog`]; command submission is out
/// of scope for the resource pipeline, which makes this the default backend
/// for tests and tool builds.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    log: Arc<RenderLog>,
    width: u32,
    height: u32,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Arc<RenderLog> {
        self.log.clone()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Renderer for HeadlessRenderer {
    fn begin(&mut self) {
        self.log.begins.fetch_add(1, Ordering::Relaxed);
    }

    fn present(&mut self) {
        self.log.presents.fetch_add(1, Ordering::Relaxed);
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        trace!("Headless renderer resized to {width}x{height}");
        self.width = width;
        self.height = height;
    }

    fn bind_environment(&mut self, bindings: &EnvironmentBindings<'_>) {
        self.log.environment_binds.fetch_add(1, Ordering::Relaxed);
        if bindings.contributes() {
            self.log.contributing_binds.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_records_frame_brackets() {
        let mut renderer = HeadlessRenderer::new();
        let log = renderer.log();

        renderer.begin();
        renderer.bind_environment(&EnvironmentBindings::default());
        renderer.present();

        assert_eq!(log.begins(), 1);
        assert_eq!(log.presents(), 1);
        assert_eq!(log.environment_binds(), 1);
        assert_eq!(log.contributing_binds(), 0);
    }
}
