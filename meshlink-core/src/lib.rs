/// Meshlink Core Library - Geometry building and 3D data exchange
///
/// This library provides the host-independent half of meshlink: typed flat
/// buffers, drawable descriptions for points, meshes and outlines, and the
/// STL/PLY/CSV codecs with the small amount of math around them.

pub mod bbox;
pub mod buffers;
pub mod drawable;
pub mod edges;
pub mod error;
pub mod factory;
pub mod falsecolor;
pub mod geometry;
pub mod io;
pub mod primitives;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use bbox::{camera_placement, Aabb, CameraPlacement};
pub use buffers::{Colors, Positions, Rgb, Triangles};
pub use drawable::{Drawable, DrawableKind, Material};
pub use error::{Error, Result};
pub use geometry::BufferGeometry;
pub use scene::{Camera, SceneConfig, Viewport};
pub use transform::Transform;
