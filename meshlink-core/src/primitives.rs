/// Parametric primitive geometries
use std::f32::consts::PI;

use nalgebra::Vector3;

use crate::geometry::BufferGeometry;

/// One face of a box: `u`/`v` span the face, `w` is the face normal axis
struct Plane {
    u: usize,
    v: usize,
    w: usize,
    u_dir: f32,
    v_dir: f32,
    width: f32,
    height: f32,
    depth: f32,
}

/// Axis-aligned box centred on the origin.
///
/// Each face owns four vertices so faces keep flat normals. Faces are laid
/// out in +x, -x, +y, -y, +z, -z order, two triangles per face.
pub fn box_geometry(sx: f32, sy: f32, sz: f32) -> BufferGeometry {
    let (x, y, z) = (0, 1, 2);
    let planes = [
        Plane { u: z, v: y, w: x, u_dir: -1.0, v_dir: -1.0, width: sz, height: sy, depth: sx },
        Plane { u: z, v: y, w: x, u_dir: 1.0, v_dir: -1.0, width: sz, height: sy, depth: -sx },
        Plane { u: x, v: z, w: y, u_dir: 1.0, v_dir: 1.0, width: sx, height: sz, depth: sy },
        Plane { u: x, v: z, w: y, u_dir: 1.0, v_dir: -1.0, width: sx, height: sz, depth: -sy },
        Plane { u: x, v: y, w: z, u_dir: 1.0, v_dir: -1.0, width: sx, height: sy, depth: sz },
        Plane { u: x, v: y, w: z, u_dir: -1.0, v_dir: -1.0, width: sx, height: sy, depth: -sz },
    ];

    let mut position = Vec::with_capacity(6 * 4 * 3);
    let mut normal = Vec::with_capacity(6 * 4 * 3);
    let mut index = Vec::with_capacity(6 * 6);

    for plane in &planes {
        let base = (position.len() / 3) as u32;
        for iy in 0..2 {
            for ix in 0..2 {
                let mut vertex = [0.0f32; 3];
                vertex[plane.u] = (ix as f32 * plane.width - plane.width / 2.0) * plane.u_dir;
                vertex[plane.v] = (iy as f32 * plane.height - plane.height / 2.0) * plane.v_dir;
                vertex[plane.w] = plane.depth / 2.0;
                position.extend_from_slice(&vertex);

                let mut n = [0.0f32; 3];
                n[plane.w] = if plane.depth > 0.0 { 1.0 } else { -1.0 };
                normal.extend_from_slice(&n);
            }
        }
        // Corners: a bottom-left, b top-left, c top-right, d bottom-right
        let (a, b, c, d) = (base, base + 2, base + 3, base + 1);
        index.extend_from_slice(&[a, b, d, b, c, d]);
    }

    BufferGeometry {
        position,
        normal: Some(normal),
        color: None,
        index: Some(index),
    }
}

/// UV sphere centred on the origin.
///
/// Segment counts below 3 around and 2 from pole to pole are raised to
/// those minimums. The degenerate triangles at both poles are left out.
pub fn sphere_geometry(radius: f32, width_segments: u32, height_segments: u32) -> BufferGeometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut position = Vec::new();
    let mut normal = Vec::new();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);
    let mut next_index = 0u32;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        let mut row = Vec::with_capacity(width_segments as usize + 1);

        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;

            let vertex = Vector3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            position.extend_from_slice(&[vertex.x, vertex.y, vertex.z]);

            let n = vertex
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3::zeros);
            normal.extend_from_slice(&[n.x, n.y, n.z]);

            row.push(next_index);
            next_index += 1;
        }
        grid.push(row);
    }

    let mut index = Vec::new();
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];

            if iy != 0 {
                index.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                index.extend_from_slice(&[b, c, d]);
            }
        }
    }

    BufferGeometry {
        position,
        normal: Some(normal),
        color: None,
        index: Some(index),
    }
}
