/// Buffer geometry: flat vertex attributes ready to upload to a renderer
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::{Error, Result};

/// Number of floats per vertex in every attribute
pub const ITEM_SIZE: usize = 3;

/// Flat vertex attributes, mirroring a WebGL buffer geometry.
///
/// `position` is always present. `normal` and `color` are optional and,
/// when present, hold one triple per vertex. `index`, when present, lists
/// triangle corners by vertex number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferGeometry {
    pub position: Vec<f32>,
    pub normal: Option<Vec<f32>>,
    pub color: Option<Vec<f32>>,
    pub index: Option<Vec<u32>>,
}

/// Face normal of a triangle; zero for degenerate triangles
pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let cb = c - b;
    let ab = a - b;
    cb.cross(&ab).try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
}

impl BufferGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry with positions only; the buffer must hold whole points
    pub fn from_positions(position: Vec<f32>) -> Result<Self> {
        if position.len() % ITEM_SIZE != 0 {
            return Err(Error::InvalidLength {
                what: "position",
                len: position.len(),
                multiple: ITEM_SIZE,
            });
        }
        Ok(Self {
            position,
            ..Self::default()
        })
    }

    /// Attach a per-vertex color attribute
    pub fn with_colors(mut self, color: Vec<f32>) -> Result<Self> {
        if color.len() != self.position.len() {
            return Err(Error::LengthMismatch {
                what: "color attribute",
                expected: self.vertex_count(),
                found: color.len() / ITEM_SIZE,
            });
        }
        self.color = Some(color);
        Ok(self)
    }

    pub fn vertex_count(&self) -> usize {
        self.position.len() / ITEM_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    pub fn point(&self, vertex: usize) -> Point3<f32> {
        let i = vertex * ITEM_SIZE;
        Point3::new(self.position[i], self.position[i + 1], self.position[i + 2])
    }

    /// Triangle corners as vertex numbers, following the index when present
    pub fn triangle_indices(&self) -> Vec<[usize; 3]> {
        match &self.index {
            Some(index) => index
                .chunks_exact(3)
                .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
                .collect(),
            None => (0..self.vertex_count() / 3)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
        }
    }

    /// Compute per-vertex normals.
    ///
    /// Without an index every triangle is independent and its three
    /// vertices receive the face normal. With an index, face normals are
    /// summed per shared vertex and normalised.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3::<f32>::zeros(); self.vertex_count()];

        for [a, b, c] in self.triangle_indices() {
            let (pa, pb, pc) = (self.point(a), self.point(b), self.point(c));
            if self.index.is_some() {
                // Unnormalised cross product weights by face area
                let n = (pc - pb).cross(&(pa - pb));
                normals[a] += n;
                normals[b] += n;
                normals[c] += n;
            } else {
                let n = face_normal(&pa, &pb, &pc);
                normals[a] = n;
                normals[b] = n;
                normals[c] = n;
            }
        }

        let flat = normals
            .into_iter()
            .flat_map(|n| {
                let n = n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
                [n.x, n.y, n.z]
            })
            .collect();
        self.normal = Some(flat);
    }

    /// Transform positions by `matrix` and normals by its normal matrix
    pub fn apply_matrix4(&mut self, matrix: &Matrix4<f32>) {
        for p in self.position.chunks_exact_mut(ITEM_SIZE) {
            let moved = matrix.transform_point(&Point3::new(p[0], p[1], p[2]));
            p.copy_from_slice(&[moved.x, moved.y, moved.z]);
        }

        let linear = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        if let (Some(normals), Some(inverse)) = (self.normal.as_mut(), linear.try_inverse()) {
            let normal_matrix = inverse.transpose();
            for n in normals.chunks_exact_mut(ITEM_SIZE) {
                let turned = (normal_matrix * Vector3::new(n[0], n[1], n[2]))
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
                n.copy_from_slice(&[turned.x, turned.y, turned.z]);
            }
        }
    }

    pub fn apply_translation(&mut self, offset: &Vector3<f32>) {
        self.apply_matrix4(&Matrix4::new_translation(offset));
    }

    /// Concatenate non-indexed geometries in order.
    ///
    /// Every input must carry the same optional attributes as the first.
    /// An empty input list yields an empty geometry.
    pub fn merge(geometries: &[BufferGeometry]) -> Result<BufferGeometry> {
        let Some(first) = geometries.first() else {
            return Ok(BufferGeometry::new());
        };
        let has_normal = first.normal.is_some();
        let has_color = first.color.is_some();

        let mut merged = BufferGeometry {
            position: Vec::new(),
            normal: has_normal.then(Vec::new),
            color: has_color.then(Vec::new),
            index: None,
        };

        for (i, geometry) in geometries.iter().enumerate() {
            if geometry.index.is_some()
                || geometry.normal.is_some() != has_normal
                || geometry.color.is_some() != has_color
            {
                return Err(Error::AttributeMismatch { index: i });
            }
            merged.position.extend_from_slice(&geometry.position);
            if let (Some(dst), Some(src)) = (merged.normal.as_mut(), &geometry.normal) {
                dst.extend_from_slice(src);
            }
            if let (Some(dst), Some(src)) = (merged.color.as_mut(), &geometry.color) {
                dst.extend_from_slice(src);
            }
        }

        Ok(merged)
    }
}
