//! # meshbuf
//!
//! Typed, bounds-checked views over shared geometry byte buffers, plus a
//! vertex welding pass for triangle meshes.
//!
//! Geometry attributes (positions, normals, colors, texture coordinates,
//! skin weights, index lists) live in compact byte buffers whose per-element
//! encoding varies: raw integers, `f32`, `f16`, normalized integers, or the
//! packed SNORM 10-10-10-2 word used for compressed normals and tangents.
//! This crate gives uniform read/write access to those buffers regardless of
//! encoding, and collapses naively triangulated geometry into a compact,
//! render-ready form.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math re-exports
//! - [`buffer`] - Element formats, buffer views, the codec, and buffer ops
//! - [`mesh`] - The mesh container and the [`mesh::weld`] pass
//!
//! ## Example
//!
//! ```
//! use meshbuf::prelude::*;
//!
//! let positions = meshbuf::buffer::from_vec(
//!     &[Vec3::ZERO, Vec3::ZERO, Vec3::X, Vec3::X],
//!     ElementFormat::VEC3F,
//! )?;
//! let indices = meshbuf::buffer::from_vec(&[0u32, 1, 2, 1, 0, 3], ElementFormat::UINT32)?;
//!
//! let mesh = Mesh::new(positions, indices)?;
//! let welded = weld(&mesh, WELD_EPSILON, false)?;
//! assert_eq!(welded.vertex_count(), 2);
//! # Ok::<(), meshbuf::Error>(())
//! ```

pub mod buffer;
pub mod mesh;
pub mod util;

// Re-export commonly used types
pub use buffer::{
    BufferView, ByteBuffer, DynamicValue, ElementFormat, ElementKind, SharedByteBuffer,
};
pub use mesh::{weld, Attribute, Mesh, WELD_EPSILON};
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::buffer::{BufferView, ByteBuffer, DynamicValue, ElementFormat, ElementKind};
    pub use crate::mesh::{weld, Attribute, Mesh, WELD_EPSILON};
    pub use crate::util::{Error, Result, Vec2, Vec3, Vec4};
}
