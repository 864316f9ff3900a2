//! Math type re-exports.
//!
//! All vector math in this crate goes through `glam`; these are the types
//! consumers exchange with the codec.

pub use glam::{UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};
