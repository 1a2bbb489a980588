/// Feature-edge extraction for outline rendering
use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::geometry::{face_normal, BufferGeometry};

/// Edges whose faces meet at less than this angle are hidden
pub const DEFAULT_THRESHOLD_DEG: f32 = 1.0;

/// Vertices are matched after rounding to this many decimals
const PRECISION: f32 = 1e4;

type VertexKey = [i64; 3];

struct OpenEdge {
    from: usize,
    to: usize,
    normal: Vector3<f32>,
}

fn vertex_key(p: &Point3<f32>) -> VertexKey {
    // Round half up, so -0.5 and 0.5 land in neighbouring buckets consistently
    let round = |v: f32| (v * PRECISION + 0.5).floor() as i64;
    [round(p.x), round(p.y), round(p.z)]
}

/// Build a line-segment geometry holding the feature edges of `geometry`.
///
/// An edge is kept when only one triangle uses it, or when the two
/// triangles sharing it bend by more than `threshold_deg`. Shared edges are
/// emitted in triangle order as they are matched, then the unmatched edges
/// follow in the order they were first seen. Degenerate triangles are
/// skipped.
pub fn edges(geometry: &BufferGeometry, threshold_deg: f32) -> BufferGeometry {
    let threshold_dot = threshold_deg.to_radians().cos();

    let mut slots: Vec<Option<OpenEdge>> = Vec::new();
    let mut lookup: HashMap<(VertexKey, VertexKey), usize> = HashMap::new();
    let mut position = Vec::new();

    let push_segment = |position: &mut Vec<f32>, a: Point3<f32>, b: Point3<f32>| {
        position.extend_from_slice(&[a.x, a.y, a.z, b.x, b.y, b.z]);
    };

    for corners in geometry.triangle_indices() {
        let points = corners.map(|v| geometry.point(v));
        let keys = points.map(|p| vertex_key(&p));
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
            continue;
        }
        let normal = face_normal(&points[0], &points[1], &points[2]);

        for j in 0..3 {
            let next = (j + 1) % 3;
            let forward = (keys[j], keys[next]);
            let reverse = (keys[next], keys[j]);

            match lookup.get(&reverse).copied() {
                Some(slot) if slots[slot].is_some() => {
                    if let Some(open) = slots[slot].take() {
                        if normal.dot(&open.normal) <= threshold_dot {
                            push_segment(&mut position, points[j], points[next]);
                        }
                    }
                }
                _ => {
                    if !lookup.contains_key(&forward) {
                        lookup.insert(forward, slots.len());
                        slots.push(Some(OpenEdge {
                            from: corners[j],
                            to: corners[next],
                            normal,
                        }));
                    }
                }
            }
        }
    }

    for open in slots.into_iter().flatten() {
        push_segment(&mut position, geometry.point(open.from), geometry.point(open.to));
    }

    BufferGeometry {
        position,
        ..BufferGeometry::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::box_geometry;

    #[test]
    fn test_box_has_twelve_edges() {
        let outline = edges(&box_geometry(1.0, 1.0, 1.0), DEFAULT_THRESHOLD_DEG);
        assert_eq!(outline.vertex_count(), 24);
    }

    #[test]
    fn test_lone_triangle_keeps_all_edges() {
        let tri = BufferGeometry::from_positions(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .unwrap();
        let outline = edges(&tri, DEFAULT_THRESHOLD_DEG);
        assert_eq!(outline.vertex_count(), 6);
        assert_eq!(&outline.position[0..6], &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_flat_quad_hides_diagonal() {
        // Two coplanar triangles sharing the (1,0,0)-(0,1,0) diagonal
        let quad = BufferGeometry::from_positions(vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
            1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
        ])
        .unwrap();
        let outline = edges(&quad, DEFAULT_THRESHOLD_DEG);
        assert_eq!(outline.vertex_count(), 8);
    }

    #[test]
    fn test_degenerate_triangle_skipped() {
        let sliver = BufferGeometry::from_positions(vec![0.0; 9]).unwrap();
        assert!(edges(&sliver, DEFAULT_THRESHOLD_DEG).is_empty());
    }
}
