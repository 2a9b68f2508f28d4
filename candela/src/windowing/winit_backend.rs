use crate::windowing::{EngineWindow, WindowSignal};
use std::time::Duration;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalSize, Size};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

struct WinitHost {
    attributes: WindowAttributes,
    window: Option<Window>,
    signals: Vec<WindowSignal>,
}

impl ApplicationHandler for WinitHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                info!("Created window {:?}", window.inner_size());
                self.window = Some(window);
            }
            Err(e) => {
                error!("Couldn't create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.signals.push(WindowSignal::CloseRequested),
            WindowEvent::Resized(size) => self.signals.push(WindowSignal::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Focused(focused) => {
                self.signals.push(WindowSignal::FocusChanged(focused))
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.signals.push(WindowSignal::Key {
                        code,
                        state: event.state,
                    });
                }
            }
            _ => {}
        }
    }
}

/// `winit`-backed window driven by a pump-style event loop.
///
/// The window itself is created by the first pump (winit only hands out
/// windows inside its callbacks), which [`WinitWindow::new`] performs before
/// returning.
pub struct WinitWindow {
    event_loop: Option<EventLoop<()>>,
    host: WinitHost,
    vsync: bool,
}

impl WinitWindow {
    pub fn new(title: &str, width: u32, height: u32, vsync: bool) -> Self {
        let attributes = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(Size::Physical(PhysicalSize::new(width, height)));

        let host = WinitHost {
            attributes,
            window: None,
            signals: Vec::new(),
        };

        let event_loop = match EventLoop::new() {
            Ok(event_loop) => {
                event_loop.set_control_flow(ControlFlow::Poll);
                Some(event_loop)
            }
            Err(e) => {
                error!("No usable windowing backend: {e}");
                None
            }
        };

        let mut this = Self {
            event_loop,
            host,
            vsync,
        };
        // first pump delivers StartCause::Init and creates the window
        this.pump_once();
        this
    }

    fn pump_once(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.host);
        if let PumpStatus::Exit(code) = status {
            warn!("Windowing backend exited with code {code}");
            self.host.signals.push(WindowSignal::CloseRequested);
        }
    }
}

impl EngineWindow for WinitWindow {
    fn width(&self) -> u32 {
        self.host
            .window
            .as_ref()
            .map_or(0, |window| window.inner_size().width)
    }

    fn height(&self) -> u32 {
        self.host
            .window
            .as_ref()
            .map_or(0, |window| window.inner_size().height)
    }

    fn has_initialized(&self) -> bool {
        self.host.window.is_some()
    }

    fn vsync(&self) -> bool {
        self.vsync
    }

    // Remembered for the presenter; the swapchain is rebuilt with the new
    // present mode on its next configure.
    fn set_vsync(&mut self, vsync: bool) {
        self.vsync = vsync;
        info!("VSync {}", if vsync { "enabled" } else { "disabled" });
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = self.host.window.as_ref() {
            window.set_title(title);
        }
    }

    fn pump_events(&mut self) -> Vec<WindowSignal> {
        self.pump_once();
        std::mem::take(&mut self.host.signals)
    }
}
