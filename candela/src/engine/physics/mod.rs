//! Physics simulation powered by `rapier`.
//!
//! Two engines run side by side: [`DynamicsSystem`] steps the 3D world and
//! [`PlanarSystem`] steps the 2D one. Both accumulate wall-clock time into
//! fixed steps and participate in the per-tick system dispatch.

pub mod dynamics;
pub mod planar;

pub use dynamics::DynamicsSystem;
pub use planar::PlanarSystem;
