//! The frame orchestrator.
//!
//! [`Application`] owns the window, input, layer stack, scene manager, system
//! registry and rendering resources outright; there is no global instance
//! pointer. "Exactly one application" is still enforced at the construction
//! site, which refuses a second live instance.

use crate::engine::audio::AudioSystem;
use crate::engine::editor::{EditorHost, EditorState, NullEditor};
use crate::engine::input::InputManager;
use crate::engine::jobs::JobPool;
use crate::engine::layers::{Layer, LayerStack, SceneLayer};
use crate::engine::physics::{DynamicsSystem, PlanarSystem};
use crate::engine::scene::{Scene, SceneManager};
use crate::engine::systems::{EngineSystem, SystemManager};
use crate::engine::timestep::{TimeStep, Timer};
use crate::windowing::{EngineWindow, WindowSignal, WinitWindow};
use bon::Builder;
use candela_asset::AssetStore;
use candela_render::{HeadlessRenderer, RenderManager, Renderer};
use candela_utils::EngineArgs;
use crossbeam_channel::bounded;
use snafu::{Snafu, ensure};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};
use winit::keyboard::KeyCode;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Err)))]
pub enum EngineError {
    #[snafu(display("Window failed to initialise"))]
    WindowInit,
}

/// Lifecycle of the orchestrator. `Closing` is terminal: once observed by the
/// run loop, no further frame is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Uninitialized,
    Running,
    Closing,
}

/// Telemetry sampled over 1-second windows of wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct EngineStats {
    pub fps: u32,
    pub ups: u32,
    pub frame_time_ms: f32,
}

#[derive(Debug, Clone, Builder)]
pub struct AppConfig {
    #[builder(into, default = String::from("Candela"))]
    pub title: String,
    #[builder(default = EngineArgs::default_window_size().0)]
    pub width: u32,
    #[builder(default = EngineArgs::default_window_size().1)]
    pub height: u32,
    #[builder(default = !EngineArgs::get().no_vsync)]
    pub vsync: bool,
    #[builder(default = EngineArgs::get().target_fps.is_some())]
    pub limit_framerate: bool,
    #[builder(default = EngineArgs::get().target_fps.unwrap_or(60.0))]
    pub target_fps: f32,
    #[builder(default = KeyCode::Escape)]
    pub close_key: KeyCode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

static INSTANCE_LIVE: AtomicBool = AtomicBool::new(false);

struct InstanceGuard;

impl InstanceGuard {
    fn acquire() -> Self {
        assert!(
            !INSTANCE_LIVE.swap(true, Ordering::AcqRel),
            "Application already exists!"
        );
        InstanceGuard
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        INSTANCE_LIVE.store(false, Ordering::Release);
    }
}

pub struct Application {
    window: Box<dyn EngineWindow>,
    renderer: Box<dyn Renderer>,
    editor: Box<dyn EditorHost>,

    input: InputManager,
    timer: Timer,
    timestep: TimeStep,
    layers: LayerStack,
    scenes: SceneManager,
    systems: SystemManager,
    render_manager: Option<RenderManager>,
    assets: Option<AssetStore>,

    stats: EngineStats,
    state: AppState,
    config: AppConfig,
    target_frame_interval: f32,
    update_timer: f32,
    second_timer: f32,
    frames: u32,
    updates: u32,
    released: bool,

    _guard: InstanceGuard,
}

impl Application {
    /// Orchestrator over a real `winit` window.
    ///
    /// # Panics
    /// Panics if another `Application` is alive.
    pub fn new(config: AppConfig) -> Self {
        let window = Box::new(WinitWindow::new(
            &config.title,
            config.width,
            config.height,
            config.vsync,
        ));
        Self::with_backends(
            config,
            window,
            Box::new(HeadlessRenderer::new()),
            Box::new(NullEditor),
        )
    }

    /// Orchestrator over injected window, renderer and editor backends.
    ///
    /// # Panics
    /// Panics if another `Application` is alive.
    pub fn with_backends(
        config: AppConfig,
        window: Box<dyn EngineWindow>,
        renderer: Box<dyn Renderer>,
        editor: Box<dyn EditorHost>,
    ) -> Self {
        let guard = InstanceGuard::acquire();
        let target_frame_interval = 1000.0 / config.target_fps.max(1.0);

        Self {
            window,
            renderer,
            editor,
            input: InputManager::new(),
            timer: Timer::new(),
            timestep: TimeStep::new(0.0),
            layers: LayerStack::new(),
            scenes: SceneManager::new(),
            systems: SystemManager::default(),
            render_manager: None,
            assets: None,
            stats: EngineStats::default(),
            state: AppState::Uninitialized,
            config,
            target_frame_interval,
            update_timer: 0.0,
            second_timer: 0.0,
            frames: 0,
            updates: 0,
            released: false,
            _guard: guard,
        }
    }

    /// One-time bring-up. The physics engines are constructed on the job
    /// pool and joined before the first frame can run.
    pub fn init(&mut self) -> Result<(), EngineError> {
        ensure!(self.window.has_initialized(), WindowInitErr);

        let width = self.window.width().max(1);
        let height = self.window.height().max(1);

        let jobs = JobPool::new(2);
        let (dynamics_tx, dynamics_rx) = bounded(1);
        let (planar_tx, planar_rx) = bounded(1);
        jobs.execute(move || {
            let _ = dynamics_tx.send(DynamicsSystem::new());
            info!("Initialized dynamics physics");
        });
        jobs.execute(move || {
            let _ = planar_tx.send(PlanarSystem::new());
            info!("Initialized planar physics");
        });

        // main-thread bring-up runs while the pool works
        let audio = AudioSystem::new();
        self.assets = Some(AssetStore::with_builtin_meshes());
        self.render_manager = Some(RenderManager::new(width, height));
        self.renderer.on_resize(width, height);

        jobs.wait();
        let dynamics = dynamics_rx.recv().expect("dynamics bring-up job has run");
        let planar = planar_rx.recv().expect("planar bring-up job has run");

        self.systems.register(Box::new(audio));
        self.systems.register(Box::new(dynamics));
        self.systems.register(Box::new(planar));

        self.layers.push_layer(Box::new(SceneLayer));
        self.editor.on_init();

        self.state = AppState::Running;
        Ok(())
    }

    /// Per-tick transition function. Returns false once the state machine is
    /// terminal.
    pub fn on_frame(&mut self) -> bool {
        let now = self.timer.millis();

        if !self.config.limit_framerate || now - self.update_timer > self.target_frame_interval {
            if self.config.limit_framerate {
                self.update_timer += self.target_frame_interval;
            }

            self.timestep.update(now);

            self.on_update();
            self.updates += 1;

            self.on_render();
            self.frames += 1;

            self.input.next_frame();
            for signal in self.window.pump_events() {
                self.on_event(signal);
            }

            if self.input.is_key_down(self.config.close_key) {
                self.state = AppState::Closing;
            }
        }

        // telemetry samples on the wall clock even when frame processing is
        // throttled by the gate above
        if self.timer.millis() - self.second_timer > 1000.0 {
            self.second_timer += 1000.0;
            self.stats.fps = self.frames;
            self.stats.ups = self.updates;
            self.stats.frame_time_ms = if self.frames > 0 {
                1000.0 / self.frames as f32
            } else {
                0.0
            };

            self.frames = 0;
            self.updates = 0;

            if let Some(scene) = self.scenes.current_mut() {
                scene.on_tick();
            }
        }

        if self.editor.state() == EditorState::Next {
            self.editor.set_state(EditorState::Paused);
        }

        if self.scenes.apply_scene_switch()
            && let Some(scene) = self.scenes.current()
        {
            self.editor.on_new_scene(scene);
        }

        self.state != AppState::Closing
    }

    fn on_update(&mut self) {
        let scene_index = self.scenes.current_index();
        let scene_count = self.scenes.scene_count();

        if self.input.is_key_down(KeyCode::KeyP) {
            self.systems.toggle_paused();
        }
        if scene_count > 0 {
            if self.input.is_key_down(KeyCode::KeyE) {
                self.scenes.switch_scene((scene_index + 1) % scene_count);
            }
            if self.input.is_key_down(KeyCode::KeyQ) {
                self.scenes
                    .switch_scene((if scene_index == 0 { scene_count } else { scene_index }) - 1);
            }
            if self.input.is_key_down(KeyCode::KeyR) {
                self.scenes.switch_scene(scene_index);
            }
        }
        if self.input.is_key_down(KeyCode::KeyV) {
            self.window.toggle_vsync();
        }

        if !self.editor.state().blocks_world_updates() {
            if let Some(scene) = self.scenes.current_mut() {
                scene.on_update(&self.timestep);
            }
            self.systems.on_update(&self.timestep);
        }

        let Self {
            layers,
            scenes,
            timestep,
            ..
        } = self;
        layers.on_update(timestep, scenes.current_mut());
    }

    fn on_render(&mut self) {
        // an empty layer stack is a deliberate no-op, not an error: no clear,
        // no present
        if self.layers.is_empty() {
            return;
        }

        let Self {
            layers,
            scenes,
            renderer,
            ..
        } = self;

        renderer.begin();
        layers.on_render(scenes.current(), renderer.as_mut());
        renderer.present();
    }

    fn on_event(&mut self, signal: WindowSignal) {
        match &signal {
            WindowSignal::CloseRequested => {
                self.state = AppState::Closing;
                return;
            }
            WindowSignal::Resized { width, height } => {
                // zero-sized targets are invalid for GPU resource allocation
                let width = (*width).max(1);
                let height = (*height).max(1);
                if let Some(render_manager) = self.render_manager.as_mut() {
                    render_manager.on_resize(width, height);
                }
                self.renderer.on_resize(width, height);
            }
            _ => {}
        }

        let Self { layers, scenes, .. } = self;
        let handled = layers.on_event(&signal);
        if !handled && let Some(scene) = scenes.current_mut() {
            scene.on_event(&signal);
        }

        self.input.process_signal(&signal);
    }

    /// Drives the frame loop to completion and shuts down. Returns the
    /// process exit code.
    pub fn run(mut self) -> i32 {
        if self.state == AppState::Uninitialized
            && let Err(e) = self.init()
        {
            return self.quit_with_reason(&e.to_string());
        }

        self.update_timer = self.timer.millis();
        while self.on_frame() {}

        self.quit()
    }

    pub fn quit(&mut self) -> i32 {
        self.release();
        0
    }

    pub fn quit_with_reason(&mut self, reason: &str) -> i32 {
        error!("{reason}");
        self.quit()
    }

    // Ordered teardown; a second call is a safe no-op.
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.systems.clear();
        self.input.clear();
        if let Some(mut assets) = self.assets.take() {
            assets.release_meshes();
        }
        self.layers.clear();
        self.render_manager.take();

        info!("Engine released");
    }

    pub fn push_layer(&mut self, layer: Box<dyn Layer>) {
        self.layers.push_layer(layer);
    }

    pub fn push_overlay(&mut self, overlay: Box<dyn Layer>) {
        self.layers.push_overlay(overlay);
    }

    pub fn clear_layers(&mut self) {
        self.layers.clear();
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn enqueue_scene(&mut self, scene: Box<dyn Scene>) {
        self.scenes.enqueue_scene(scene);
    }

    /// Requests a scene switch; committed at the end of the current frame.
    pub fn switch_scene(&mut self, index: usize) {
        self.scenes.switch_scene(index);
    }

    pub fn scene_manager(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scene_manager_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    pub fn register_system(&mut self, system: Box<dyn EngineSystem>) {
        self.systems.register(system);
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn editor_state(&self) -> EditorState {
        self.editor.state()
    }

    pub fn window(&self) -> &dyn EngineWindow {
        self.window.as_ref()
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window.width(), self.window.height())
    }

    pub fn render_manager(&self) -> Option<&RenderManager> {
        self.render_manager.as_ref()
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        self.release();
    }
}
