/// Typed views over the flat numeric buffers exchanged with the host
use nalgebra::Point3;

use crate::error::{Error, Result};

/// An RGB color with components nominally in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(level: f32) -> Self {
        Self::new(level, level, level)
    }

    /// Build from a `[r, g, b]` slice
    pub fn from_slice(rgb: &[f32]) -> Result<Self> {
        match rgb {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(Error::LengthMismatch {
                what: "rgb color",
                expected: 3,
                found: rgb.len(),
            }),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

fn check_multiple(what: &'static str, len: usize, multiple: usize) -> Result<()> {
    if len % multiple != 0 {
        return Err(Error::InvalidLength {
            what,
            len,
            multiple,
        });
    }
    Ok(())
}

/// Point positions decoded from a flat `[x1, y1, z1, x2, ...]` buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Positions {
    pub points: Vec<Point3<f32>>,
}

impl Positions {
    pub fn new(points: Vec<Point3<f32>>) -> Self {
        Self { points }
    }

    pub fn from_flat(flat: &[f32]) -> Result<Self> {
        check_multiple("position", flat.len(), 3)?;
        let points = flat
            .chunks_exact(3)
            .map(|p| Point3::new(p[0], p[1], p[2]))
            .collect();
        Ok(Self { points })
    }

    /// Build from `(n, 3)` rows, rejecting rows of any other width
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let points = rows
            .iter()
            .map(|row| match row.as_ref() {
                [x, y, z] => Ok(Point3::new(*x, *y, *z)),
                other => Err(Error::LengthMismatch {
                    what: "point row",
                    expected: 3,
                    found: other.len(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn to_flat(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }
}

/// Per-point colors decoded from a flat `[r1, g1, b1, r2, ...]` buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Colors {
    pub colors: Vec<Rgb>,
}

impl Colors {
    pub fn new(colors: Vec<Rgb>) -> Self {
        Self { colors }
    }

    pub fn from_flat(flat: &[f32]) -> Result<Self> {
        check_multiple("color", flat.len(), 3)?;
        let colors = flat
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self { colors })
    }

    /// A single color repeated `count` times
    pub fn uniform(color: Rgb, count: usize) -> Self {
        Self {
            colors: vec![color; count],
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn to_flat(&self) -> Vec<f32> {
        self.colors.iter().flat_map(|c| c.to_array()).collect()
    }

    /// Fail unless there is exactly one color per point
    pub fn check_paired(&self, what: &'static str, points: usize) -> Result<()> {
        if self.colors.len() != points {
            return Err(Error::LengthMismatch {
                what,
                expected: points,
                found: self.colors.len(),
            });
        }
        Ok(())
    }
}

/// Independent triangles decoded from a flat buffer of 9 floats per triangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangles {
    pub triangles: Vec<[Point3<f32>; 3]>,
}

impl Triangles {
    pub fn new(triangles: Vec<[Point3<f32>; 3]>) -> Self {
        Self { triangles }
    }

    pub fn from_flat(flat: &[f32]) -> Result<Self> {
        check_multiple("triangle", flat.len(), 9)?;
        let triangles = flat
            .chunks_exact(9)
            .map(|t| {
                [
                    Point3::new(t[0], t[1], t[2]),
                    Point3::new(t[3], t[4], t[5]),
                    Point3::new(t[6], t[7], t[8]),
                ]
            })
            .collect();
        Ok(Self { triangles })
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Array shape as `(n_triangles, 3, 3)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.triangles.len(), 3, 3)
    }

    pub fn to_flat(&self) -> Vec<f32> {
        self.triangles
            .iter()
            .flat_map(|tri| tri.iter().flat_map(|p| [p.x, p.y, p.z]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_positions_from_flat() {
        let positions = Positions::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
        assert_eq!(positions.len(), 3);
        assert_eq!(positions.points[1], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_positions_reject_partial_point() {
        let err = Positions::from_flat(&[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { len: 2, multiple: 3, .. }));
    }

    #[test]
    fn test_positions_from_rows_rejects_wide_row() {
        let rows: Vec<Vec<f32>> = vec![vec![0.0, 0.0, 0.0], vec![1.0, 2.0, 3.0, 4.0]];
        assert!(Positions::from_rows(&rows).is_err());
    }

    #[test]
    fn test_triangles_shape() {
        let flat: Vec<f32> = (0..18).map(|i| i as f32).collect();
        let triangles = Triangles::from_flat(&flat).unwrap();
        assert_eq!(triangles.shape(), (2, 3, 3));
        assert_eq!(triangles.triangles[1][0], Point3::new(9.0, 10.0, 11.0));
        assert_eq!(triangles.to_flat(), flat);
    }

    #[test]
    fn test_triangles_reject_partial_triangle() {
        assert!(Triangles::from_flat(&[0.0; 12]).is_err());
    }

    #[test]
    fn test_colors_pairing() {
        let colors = Colors::from_flat(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
        assert!(colors.check_paired("points", 2).is_ok());
        assert!(matches!(
            colors.check_paired("points", 3),
            Err(Error::LengthMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_rgb_from_slice() {
        assert_eq!(Rgb::from_slice(&[0.0, 1.0, 0.0]).unwrap(), Rgb::new(0.0, 1.0, 0.0));
        assert!(Rgb::from_slice(&[1.0, 1.0]).is_err());
    }

    proptest! {
        #[test]
        fn prop_flat_length_decides_point_count(flat in prop::collection::vec(-1e6f32..1e6, 0..60)) {
            match Positions::from_flat(&flat) {
                Ok(positions) => {
                    prop_assert_eq!(flat.len() % 3, 0);
                    prop_assert_eq!(positions.len(), flat.len() / 3);
                    prop_assert_eq!(positions.to_flat(), flat);
                }
                Err(Error::InvalidLength { .. }) => prop_assert_ne!(flat.len() % 3, 0),
                Err(other) => prop_assert!(false, "unexpected error {}", other),
            }
        }
    }
}
