//! Platform windowing behind a narrow seam.
//!
//! The orchestrator talks to an [`EngineWindow`]: a size, an initialization
//! flag, a vsync toggle and a per-tick event pump. The `winit` backend is the
//! real thing; [`HeadlessWindow`] drives the same loop without a display.

pub mod headless;
pub mod winit_backend;

pub use headless::HeadlessWindow;
pub use winit_backend::WinitWindow;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Window-side event observed during one pump.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowSignal {
    CloseRequested,
    Resized { width: u32, height: u32 },
    Key { code: KeyCode, state: ElementState },
    FocusChanged(bool),
}

pub trait EngineWindow {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// False when the backing window could not be created; the orchestrator
    /// treats that as a fatal initialization failure.
    fn has_initialized(&self) -> bool;

    fn vsync(&self) -> bool;
    fn set_vsync(&mut self, vsync: bool);

    fn toggle_vsync(&mut self) {
        let vsync = self.vsync();
        self.set_vsync(!vsync);
    }

    fn set_title(&mut self, title: &str);

    /// Drains the platform event queue. Called once per tick; may block
    /// briefly on the OS but never waits for new events.
    fn pump_events(&mut self) -> Vec<WindowSignal>;
}
