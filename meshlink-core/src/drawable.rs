/// Host-independent descriptions of renderable scene objects
use crate::buffers::Rgb;
use crate::geometry::BufferGeometry;

/// Which kind of scene node the host should build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableKind {
    Points,
    Mesh,
    LineSegments,
}

/// Material parameters for a drawable
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Sized points; `color` is `None` when per-vertex colors are used
    Points {
        color: Option<Rgb>,
        size: f32,
        size_attenuation: bool,
        vertex_colors: bool,
    },
    /// Unlit solid color
    MeshBasic { color: Rgb },
    /// Unlit lines; `color` is `None` when per-vertex colors are used
    LineBasic {
        color: Option<Rgb>,
        vertex_colors: bool,
    },
}

/// A geometry plus the material it is drawn with.
///
/// The caller owns the value; nothing here keeps a reference to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub kind: DrawableKind,
    pub geometry: BufferGeometry,
    pub material: Material,
}

impl Drawable {
    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }
}
