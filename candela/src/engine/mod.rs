pub mod app;
pub mod audio;
pub mod editor;
pub mod input;
pub mod jobs;
pub mod layers;
pub mod physics;
pub mod scene;
pub mod systems;
pub mod timestep;

pub use app::{AppConfig, AppState, Application, EngineError, EngineStats};
pub use editor::{EditorHost, EditorState, NullEditor};
pub use input::InputManager;
pub use layers::{Layer, LayerStack, SceneLayer};
pub use scene::{Scene, SceneManager, SceneSnapshot};
pub use systems::{EngineSystem, SystemManager};
pub use timestep::{TimeStep, Timer};
