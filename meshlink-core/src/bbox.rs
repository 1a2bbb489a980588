/// Bounding boxes and camera placement derived from them
use nalgebra::{Point3, Vector3};

use crate::error::{Error, Result};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn from_points(points: &[Point3<f32>]) -> Result<Self> {
        let (first, rest) = points.split_first().ok_or(Error::EmptyPointSet)?;
        let mut bbox = Self {
            min: *first,
            max: *first,
        };
        for point in rest {
            bbox.expand_to_include(point);
        }
        Ok(bbox)
    }

    pub fn expand_to_include(&mut self, point: &Point3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Where a camera should sit and what it should look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    pub position: Point3<f32>,
    pub look_at: Point3<f32>,
}

/// Place a camera at the box's max corner pushed out by `offset` on every
/// axis, looking at the box centre.
///
/// A single point gives a zero-size box: the camera then sits at the point
/// plus `offset`, so callers want `offset > 0` to keep a usable view
/// direction.
pub fn camera_placement(points: &[Point3<f32>], offset: f32) -> Result<CameraPlacement> {
    let bbox = Aabb::from_points(points)?;
    Ok(CameraPlacement {
        position: bbox.max + Vector3::repeat(offset),
        look_at: bbox.center(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bbox_from_points() {
        let bbox = Aabb::from_points(&[
            Point3::new(1.0, -2.0, 3.0),
            Point3::new(-1.0, 4.0, 0.0),
            Point3::new(0.0, 0.0, 5.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, Point3::new(-1.0, -2.0, 0.0));
        assert_eq!(bbox.max, Point3::new(1.0, 4.0, 5.0));
        assert_relative_eq!(bbox.center(), Point3::new(0.0, 1.0, 2.5));
    }

    #[test]
    fn test_camera_placement() {
        let placement = camera_placement(
            &[Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0)],
            10.0,
        )
        .unwrap();
        assert_relative_eq!(placement.position, Point3::new(12.0, 14.0, 16.0));
        assert_relative_eq!(placement.look_at, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_single_point_without_offset() {
        let p = Point3::new(3.0, -1.5, 2.0);
        let placement = camera_placement(&[p, p, p], 0.0).unwrap();
        assert_eq!(placement.position, p);
        assert_eq!(placement.look_at, p);
    }

    #[test]
    fn test_empty_points_rejected() {
        assert!(matches!(camera_placement(&[], 1.0), Err(Error::EmptyPointSet)));
    }
}
