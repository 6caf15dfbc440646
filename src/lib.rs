//! World space obstacle polygons for 2D navigation, and single ownership of the navmesh
//! compiled from them.

pub mod blocking;
pub mod border;
pub mod error;
pub mod navmesh;
pub mod polygon;
pub mod rebuild;
pub mod shape;
mod util;
