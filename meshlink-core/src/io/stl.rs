/// STL reader and writer for binary and ASCII formats
use std::fmt::Write as _;

use log::{debug, warn};
use nalgebra::Point3;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::opt,
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};

use crate::buffers::Triangles;
use crate::error::{Error, Result};
use crate::geometry::face_normal;

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

fn read_f32(data: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Triangles> {
    if data.len() < HEADER_LEN + 4 {
        return Err(Error::Stl("file too small to be a valid STL".to_string()));
    }

    // Skip 80-byte header
    let data = &data[HEADER_LEN..];

    // Read triangle count (4 bytes, little-endian)
    let triangle_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let body = &data[4..];

    let expected = triangle_count
        .checked_mul(RECORD_LEN)
        .ok_or_else(|| Error::Stl(format!("triangle count {} overflows", triangle_count)))?;
    if body.len() < expected {
        return Err(Error::Stl(format!(
            "unexpected end of file: {} triangles need {} bytes, found {}",
            triangle_count,
            expected,
            body.len()
        )));
    }
    if body.len() > expected {
        warn!("binary STL has {} trailing bytes", body.len() - expected);
    }

    let triangles = body[..expected]
        .chunks_exact(RECORD_LEN)
        .map(|record| {
            // The stored normal (first 12 bytes) is ignored; normals are recomputed on build
            let vertex = |i: usize| {
                let offset = 12 + i * 12;
                Point3::new(
                    read_f32(record, offset),
                    read_f32(record, offset + 4),
                    read_f32(record, offset + 8),
                )
            };
            [vertex(0), vertex(1), vertex(2)]
        })
        .collect();

    Ok(Triangles::new(triangles))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Triangles> {
    match parse_ascii_stl_impl(input) {
        Ok((_, triangles)) => Ok(triangles),
        Err(e) => Err(Error::Stl(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Triangles> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = opt(not_line_ending)(input)?;

    Ok((input, Triangles::new(triangles)))
}

fn parse_facet(input: &str) -> IResult<&str, [Point3<f32>; 3]> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v1, v2, v3]))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse STL file (binary or ASCII).
///
/// Binary files may also start with `solid`, so ASCII is only chosen when
/// the whole text parses.
pub fn parse_stl(data: &[u8]) -> Result<Triangles> {
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(triangles) = parse_ascii_stl(text) {
                debug!("parsed ASCII STL with {} triangles", triangles.len());
                return Ok(triangles);
            }
        }
    }

    let triangles = parse_binary_stl(data)?;
    debug!("parsed binary STL with {} triangles", triangles.len());
    Ok(triangles)
}

/// Serialize triangles as binary STL with computed facet normals
pub fn write_binary_stl(triangles: &Triangles) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 4 + triangles.len() * RECORD_LEN);
    let mut header = [0u8; HEADER_LEN];
    let label = b"binary STL written by meshlink";
    header[..label.len()].copy_from_slice(label);
    out.extend_from_slice(&header);
    out.extend_from_slice(&(triangles.len() as u32).to_le_bytes());

    for [a, b, c] in &triangles.triangles {
        let n = face_normal(a, b, c);
        for value in [n.x, n.y, n.z, a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        // Attribute byte count
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    out
}

/// Serialize triangles as ASCII STL with computed facet normals
pub fn write_ascii_stl(name: &str, triangles: &Triangles) -> Vec<u8> {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "solid {}", name);
    for [a, b, c] in &triangles.triangles {
        let n = face_normal(a, b, c);
        let _ = writeln!(out, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z);
        let _ = writeln!(out, "    outer loop");
        for p in [a, b, c] {
            let _ = writeln!(out, "      vertex {:e} {:e} {:e}", p.x, p.y, p.z);
        }
        let _ = writeln!(out, "    endloop");
        let _ = writeln!(out, "  endfacet");
    }
    let _ = writeln!(out, "endsolid {}", name);
    out.into_bytes()
}
