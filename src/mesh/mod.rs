//! Triangle-mesh container and the vertex welding pass.

mod model;
mod weld;

pub use model::*;
pub use weld::*;
