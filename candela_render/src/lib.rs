//! Deferred-rendering resource side of the Candela engine: the G-buffer and
//! its owning render manager, the renderer seam, and the environment bindings
//! consumed by the lighting pass.

pub mod gbuffer;
pub mod ibl;
pub mod render_manager;
pub mod renderer;

pub use gbuffer::{AttachmentDesc, GBuffer, GBufferTarget};
pub use ibl::EnvironmentBindings;
pub use render_manager::RenderManager;
pub use renderer::{HeadlessRenderer, RenderLog, Renderer};
