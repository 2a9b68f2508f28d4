use crate::windowing::{EngineWindow, WindowSignal};
use std::collections::VecDeque;

/// Window without a display behind it.
///
/// Signals are queued in per-pump batches: one [`HeadlessWindow::queue_signals`]
/// call is delivered by exactly one pump, which makes tick-precise scripting of
/// the frame loop possible in tests and tool builds.
#[derive(Debug)]
pub struct HeadlessWindow {
    width: u32,
    height: u32,
    vsync: bool,
    initialized: bool,
    batches: VecDeque<Vec<WindowSignal>>,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            vsync: true,
            initialized: true,
            batches: VecDeque::new(),
        }
    }

    /// A window that failed to come up, for exercising the fatal init path.
    pub fn uninitialized() -> Self {
        Self {
            initialized: false,
            ..Self::new(0, 0)
        }
    }

    /// Queues one pump's worth of signals.
    pub fn queue_signals(&mut self, signals: impl IntoIterator<Item = WindowSignal>) {
        self.batches.push_back(signals.into_iter().collect());
    }
}

impl EngineWindow for HeadlessWindow {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn has_initialized(&self) -> bool {
        self.initialized
    }

    fn vsync(&self) -> bool {
        self.vsync
    }

    fn set_vsync(&mut self, vsync: bool) {
        self.vsync = vsync;
    }

    fn set_title(&mut self, _title: &str) {}

    fn pump_events(&mut self) -> Vec<WindowSignal> {
        let signals = self.batches.pop_front().unwrap_or_default();
        for signal in &signals {
            if let WindowSignal::Resized { width, height } = signal {
                self.width = *width;
                self.height = *height;
            }
        }
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batches_arrive_one_pump_at_a_time() {
        let mut window = HeadlessWindow::new(800, 600);
        window.queue_signals([WindowSignal::CloseRequested]);
        window.queue_signals([WindowSignal::FocusChanged(false)]);

        assert_eq!(window.pump_events(), vec![WindowSignal::CloseRequested]);
        assert_eq!(window.pump_events(), vec![WindowSignal::FocusChanged(false)]);
        assert!(window.pump_events().is_empty());
    }

    #[test]
    fn resize_signals_update_the_reported_size() {
        let mut window = HeadlessWindow::new(800, 600);
        window.queue_signals([WindowSignal::Resized {
            width: 0,
            height: 500,
        }]);
        window.pump_events();
        // the window reports the raw size; clamping happens in the dispatcher
        assert_eq!((window.width(), window.height()), (0, 500));
    }
}
