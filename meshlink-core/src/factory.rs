/// Builders that turn flat numeric buffers into drawable descriptions
use log::debug;
use nalgebra::Point3;

use crate::buffers::{Colors, Positions, Rgb, Triangles};
use crate::drawable::{Drawable, DrawableKind, Material};
use crate::edges::{edges, DEFAULT_THRESHOLD_DEG};
use crate::error::{Error, Result};
use crate::geometry::BufferGeometry;
use crate::primitives::{box_geometry, sphere_geometry};
use crate::transform::Transform;

pub const DEFAULT_POINT_SIZE: f32 = 0.03;
pub const DEFAULT_POINT_COLOR: Rgb = Rgb::WHITE;
pub const DEFAULT_LINE_COLOR: Rgb = Rgb::WHITE;
pub const DEFAULT_MESH_COLOR: Rgb = Rgb::grey(0.8);
pub const DEFAULT_PRIMITIVE_COLOR: Rgb = Rgb::grey(0.5);
pub const OUTLINE_COLOR: Rgb = Rgb::WHITE;

/// Edge vertices of one box outline: 12 edges, 2 vertices each
pub const VOXEL_EDGE_VERTICES: usize = 24;

fn outline_of(geometry: &BufferGeometry) -> Drawable {
    Drawable {
        kind: DrawableKind::LineSegments,
        geometry: edges(geometry, DEFAULT_THRESHOLD_DEG),
        material: Material::LineBasic {
            color: Some(OUTLINE_COLOR),
            vertex_colors: false,
        },
    }
}

fn solid(geometry: BufferGeometry, color: Rgb) -> Drawable {
    Drawable {
        kind: DrawableKind::Mesh,
        geometry,
        material: Material::MeshBasic { color },
    }
}

/// Point cloud drawn in a single color
pub fn points(positions: &Positions, size: f32, color: Rgb) -> Drawable {
    debug!("building point cloud with {} points", positions.len());
    Drawable {
        kind: DrawableKind::Points,
        geometry: BufferGeometry {
            position: positions.to_flat(),
            ..BufferGeometry::default()
        },
        material: Material::Points {
            color: Some(color),
            size,
            size_attenuation: true,
            vertex_colors: false,
        },
    }
}

/// Point cloud with one color per point; point `i` is drawn in color `i`
pub fn colored_points(positions: &Positions, colors: &Colors, size: f32) -> Result<Drawable> {
    colors.check_paired("point colors", positions.len())?;
    debug!("building colored point cloud with {} points", positions.len());

    let geometry = BufferGeometry {
        position: positions.to_flat(),
        ..BufferGeometry::default()
    }
    .with_colors(colors.to_flat())?;

    Ok(Drawable {
        kind: DrawableKind::Points,
        geometry,
        material: Material::Points {
            color: None,
            size,
            size_attenuation: true,
            vertex_colors: true,
        },
    })
}

/// Solid triangle soup plus its feature-edge outline.
///
/// Triangles are not welded: every triangle keeps its own three vertices
/// and its face normal.
pub fn triangle_mesh(triangles: &Triangles, color: Rgb) -> (Drawable, Drawable) {
    debug!("building mesh with {} triangles", triangles.len());
    let mut geometry = BufferGeometry {
        position: triangles.to_flat(),
        ..BufferGeometry::default()
    };
    geometry.compute_vertex_normals();

    let outline = outline_of(&geometry);
    (solid(geometry, color), outline)
}

/// Box of the given size plus its 12-edge outline
pub fn cube(sx: f32, sy: f32, sz: f32, color: Rgb) -> (Drawable, Drawable) {
    let geometry = box_geometry(sx, sy, sz);
    let outline = outline_of(&geometry);
    (solid(geometry, color), outline)
}

pub fn sphere(radius: f32, width_segments: u32, height_segments: u32, color: Rgb) -> Drawable {
    solid(sphere_geometry(radius, width_segments, height_segments), color)
}

/// Disconnected segments, one per consecutive pair of points
pub fn line_segments(positions: &Positions, color: Rgb) -> Result<Drawable> {
    if positions.len() % 2 != 0 {
        return Err(Error::InvalidLength {
            what: "line segment",
            len: positions.len(),
            multiple: 2,
        });
    }
    Ok(Drawable {
        kind: DrawableKind::LineSegments,
        geometry: BufferGeometry {
            position: positions.to_flat(),
            ..BufferGeometry::default()
        },
        material: Material::LineBasic {
            color: Some(color),
            vertex_colors: false,
        },
    })
}

/// Outlines of many voxels merged into a single line-segment drawable.
///
/// Voxel `i` is a cube of edge `voxel_size` centred on `centers[i]` whose
/// 24 edge vertices take `colors[i]`. Voxels are merged in input order, so
/// the result is the concatenation of each voxel's own outline.
pub fn voxel_outlines(centers: &[Point3<f32>], colors: &[Colors], voxel_size: f32) -> Result<Drawable> {
    if colors.len() != centers.len() {
        return Err(Error::LengthMismatch {
            what: "voxel colors",
            expected: centers.len(),
            found: colors.len(),
        });
    }
    debug!("building outlines for {} voxels", centers.len());

    let unit = box_geometry(voxel_size, voxel_size, voxel_size);
    let outlines = centers
        .iter()
        .zip(colors)
        .map(|(center, color)| {
            let mut cube = unit.clone();
            cube.apply_matrix4(&Transform::translation_matrix(center.x, center.y, center.z));
            color.check_paired("voxel edge colors", VOXEL_EDGE_VERTICES)?;
            edges(&cube, DEFAULT_THRESHOLD_DEG).with_colors(color.to_flat())
        })
        .collect::<Result<Vec<_>>>()?;

    let mut geometry = BufferGeometry::merge(&outlines)?;
    if geometry.color.is_none() {
        geometry.color = Some(Vec::new());
    }

    Ok(Drawable {
        kind: DrawableKind::LineSegments,
        geometry,
        material: Material::LineBasic {
            color: None,
            vertex_colors: true,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn three_points() -> Positions {
        Positions::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_points_defaults() {
        let cloud = points(&three_points(), DEFAULT_POINT_SIZE, DEFAULT_POINT_COLOR);
        assert_eq!(cloud.kind, DrawableKind::Points);
        assert_eq!(cloud.vertex_count(), 3);
        assert_eq!(
            cloud.material,
            Material::Points {
                color: Some(Rgb::new(1.0, 1.0, 1.0)),
                size: 0.03,
                size_attenuation: true,
                vertex_colors: false,
            }
        );
    }

    #[test]
    fn test_colored_points_keep_pairing() {
        let colors = Colors::from_flat(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let cloud = colored_points(&three_points(), &colors, 0.1).unwrap();
        let color = cloud.geometry.color.as_ref().unwrap();
        for i in 0..3 {
            assert_eq!(&color[i * 3..i * 3 + 3], &colors.colors[i].to_array());
            assert_eq!(cloud.geometry.point(i), three_points().points[i]);
        }
    }

    #[test]
    fn test_colored_points_reject_mismatch() {
        let colors = Colors::from_flat(&[1.0, 0.0, 0.0]).unwrap();
        assert!(matches!(
            colored_points(&three_points(), &colors, 0.1),
            Err(Error::LengthMismatch { expected: 3, found: 1, .. })
        ));
    }

    #[test]
    fn test_triangle_mesh_with_outline() {
        let triangles = Triangles::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap();
        let (mesh, outline) = triangle_mesh(&triangles, DEFAULT_MESH_COLOR);
        assert_eq!(mesh.kind, DrawableKind::Mesh);
        assert_eq!(mesh.vertex_count(), 3);
        assert_relative_eq!(mesh.geometry.normal.as_ref().unwrap()[2], 1.0);
        assert_eq!(outline.kind, DrawableKind::LineSegments);
        assert_eq!(outline.vertex_count(), 6);
    }

    #[test]
    fn test_cube_outline() {
        let (mesh, outline) = cube(1.0, 1.0, 1.0, DEFAULT_PRIMITIVE_COLOR);
        assert_eq!(mesh.material, Material::MeshBasic { color: Rgb::grey(0.5) });
        assert_eq!(outline.vertex_count(), 24);
    }

    #[test]
    fn test_line_segments_need_pairs() {
        assert!(line_segments(&three_points(), DEFAULT_LINE_COLOR).is_err());
        let pair = Positions::from_flat(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(line_segments(&pair, DEFAULT_LINE_COLOR).unwrap().vertex_count(), 2);
    }

    #[test]
    fn test_voxel_outlines_concatenate_in_order() {
        let centers = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)];
        let colors = vec![
            Colors::uniform(Rgb::new(1.0, 0.0, 0.0), VOXEL_EDGE_VERTICES),
            Colors::uniform(Rgb::new(0.0, 0.0, 1.0), VOXEL_EDGE_VERTICES),
        ];
        let merged = voxel_outlines(&centers, &colors, 1.0).unwrap();
        assert_eq!(merged.vertex_count(), 2 * VOXEL_EDGE_VERTICES);

        let mut first = box_geometry(1.0, 1.0, 1.0);
        first.apply_translation(&centers[0].coords);
        let mut second = box_geometry(1.0, 1.0, 1.0);
        second.apply_translation(&centers[1].coords);
        let mut expected = edges(&first, DEFAULT_THRESHOLD_DEG).position;
        expected.extend(edges(&second, DEFAULT_THRESHOLD_DEG).position);
        assert_eq!(merged.geometry.position, expected);

        let color = merged.geometry.color.unwrap();
        assert_eq!(&color[..3], &[1.0, 0.0, 0.0]);
        assert_eq!(&color[color.len() - 3..], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_no_voxels() {
        let merged = voxel_outlines(&[], &[], 1.0).unwrap();
        assert_eq!(merged.vertex_count(), 0);
        assert_eq!(merged.geometry.color, Some(Vec::new()));
    }

    #[test]
    fn test_voxel_color_count_checked() {
        let centers = vec![Point3::new(0.0, 0.0, 0.0)];
        let colors = vec![Colors::uniform(Rgb::WHITE, 8)];
        assert!(voxel_outlines(&centers, &colors, 1.0).is_err());
    }

    fn flat_cloud() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
        (0usize..40).prop_flat_map(|k| {
            (
                prop::collection::vec(-1e4f32..1e4, 3 * k),
                prop::collection::vec(0.0f32..=1.0, 3 * k),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_one_point_per_triple((xyzs, _) in flat_cloud()) {
            let positions = Positions::from_flat(&xyzs).unwrap();
            let cloud = points(&positions, DEFAULT_POINT_SIZE, DEFAULT_POINT_COLOR);
            prop_assert_eq!(cloud.vertex_count(), xyzs.len() / 3);
            prop_assert_eq!(&cloud.geometry.position, &xyzs);
        }

        #[test]
        fn prop_color_follows_point_index((xyzs, rgbs) in flat_cloud()) {
            let positions = Positions::from_flat(&xyzs).unwrap();
            let colors = Colors::from_flat(&rgbs).unwrap();
            let cloud = colored_points(&positions, &colors, DEFAULT_POINT_SIZE).unwrap();
            let color = cloud.geometry.color.as_ref().unwrap();
            for i in 0..positions.len() {
                prop_assert_eq!(cloud.geometry.point(i), positions.points[i]);
                prop_assert_eq!(&color[i * 3..i * 3 + 3], &rgbs[i * 3..i * 3 + 3]);
            }
        }
    }
}
