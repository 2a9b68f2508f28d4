extern crate self as candela;

pub mod engine;
pub mod math;
pub mod windowing;

pub use engine::*;
pub use windowing::*;

pub use ::tracing;
pub use ::winit;

pub use candela_asset as asset;
pub use candela_render as render;
pub use candela_utils as utils;
