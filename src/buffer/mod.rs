//! Typed access to raw geometry byte buffers.
//!
//! - [`ElementKind`] / [`ElementFormat`] - how one buffer element is encoded
//! - [`ByteBuffer`] / [`BufferView`] - shared storage and strided windows
//! - [`codec`] - `get`/`set` between native encodings and float vectors, or
//!   [`DynamicValue`] when arity is only known at runtime
//! - [`clone_view`] / [`resized`] / [`from_vec`] - buffer lifecycle helpers

pub mod codec;
mod element;
mod ops;
mod view;

pub use codec::{Channels, DynamicValue};
pub use element::*;
pub use ops::*;
pub use view::*;
