/// PLY reader (ASCII and binary) and ASCII writer for vertex tables
use std::fmt::Write as _;
use std::iter::Enumerate;
use std::str::{FromStr, Lines, SplitAsciiWhitespace};

use log::debug;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::{digit1, not_line_ending, space0, space1},
    combinator::{all_consuming, map_res, value},
    sequence::terminated,
    IResult,
};

use crate::buffers::Positions;
use crate::error::{Error, Result};

/// Numeric type of a PLY property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl ScalarType {
    /// Name used in PLY headers
    pub fn ply_name(self) -> &'static str {
        match self {
            ScalarType::Int8 => "char",
            ScalarType::UInt8 => "uchar",
            ScalarType::Int16 => "short",
            ScalarType::UInt16 => "ushort",
            ScalarType::Int32 => "int",
            ScalarType::UInt32 => "uint",
            ScalarType::Float32 => "float",
            ScalarType::Float64 => "double",
        }
    }

    /// Size in bytes in binary PLY
    pub fn size(self) -> usize {
        match self {
            ScalarType::Int8 | ScalarType::UInt8 => 1,
            ScalarType::Int16 | ScalarType::UInt16 => 2,
            ScalarType::Int32 | ScalarType::UInt32 | ScalarType::Float32 => 4,
            ScalarType::Float64 => 8,
        }
    }

    /// Convert a value the way an array cast would: integers truncate toward
    /// zero and saturate, `float` narrows to single precision.
    pub fn cast(self, v: f64) -> f64 {
        match self {
            ScalarType::Int8 => v as i8 as f64,
            ScalarType::UInt8 => v as u8 as f64,
            ScalarType::Int16 => v as i16 as f64,
            ScalarType::UInt16 => v as u16 as f64,
            ScalarType::Int32 => v as i32 as f64,
            ScalarType::UInt32 => v as u32 as f64,
            ScalarType::Float32 => v as f32 as f64,
            ScalarType::Float64 => v,
        }
    }

    fn format(self, v: f64) -> String {
        match self {
            ScalarType::Float32 => format!("{}", v as f32),
            ScalarType::Float64 => format!("{}", v),
            _ => format!("{}", self.cast(v) as i64),
        }
    }

    fn decode(self, bytes: &[u8], big_endian: bool) -> f64 {
        fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
            let mut raw = [0u8; N];
            raw.copy_from_slice(&bytes[..N]);
            raw
        }
        macro_rules! decode {
            ($t:ty, $n:expr) => {{
                let raw = array::<$n>(bytes);
                let v = if big_endian {
                    <$t>::from_be_bytes(raw)
                } else {
                    <$t>::from_le_bytes(raw)
                };
                v as f64
            }};
        }
        match self {
            ScalarType::Int8 => decode!(i8, 1),
            ScalarType::UInt8 => decode!(u8, 1),
            ScalarType::Int16 => decode!(i16, 2),
            ScalarType::UInt16 => decode!(u16, 2),
            ScalarType::Int32 => decode!(i32, 4),
            ScalarType::UInt32 => decode!(u32, 4),
            ScalarType::Float32 => decode!(f32, 4),
            ScalarType::Float64 => decode!(f64, 8),
        }
    }
}

impl FromStr for ScalarType {
    type Err = Error;

    /// Accepts PLY names (`float`, `uchar`, `int32`, ...) and array type
    /// codes (`f4`, `<u1`, `i4`, ...)
    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim_start_matches(|c: char| matches!(c, '<' | '>' | '=' | '|'));
        let ty = match code {
            "char" | "int8" | "i1" => ScalarType::Int8,
            "uchar" | "uint8" | "u1" => ScalarType::UInt8,
            "short" | "int16" | "i2" => ScalarType::Int16,
            "ushort" | "uint16" | "u2" => ScalarType::UInt16,
            "int" | "int32" | "i4" => ScalarType::Int32,
            "uint" | "uint32" | "u4" => ScalarType::UInt32,
            "float" | "float32" | "f4" => ScalarType::Float32,
            "double" | "float64" | "f8" => ScalarType::Float64,
            _ => return Err(Error::UnknownScalarType(s.to_string())),
        };
        Ok(ty)
    }
}

/// One named, typed column of a vertex table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyField {
    pub name: String,
    pub ty: ScalarType,
}

impl PlyField {
    pub fn new(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Build fields from `(name, type)` pairs such as `("x", "f4")`
    pub fn from_pairs<N: AsRef<str>, T: AsRef<str>>(pairs: &[(N, T)]) -> Result<Vec<Self>> {
        pairs
            .iter()
            .map(|(name, ty)| Ok(Self::new(name.as_ref(), ty.as_ref().parse()?)))
            .collect()
    }
}

/// Vertex records decoded from a PLY file, one row per vertex and one
/// column per declared vertex property, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct PlyTable {
    pub fields: Vec<PlyField>,
    pub rows: Vec<Vec<f64>>,
}

impl PlyTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(n_points, n_attributes)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.fields.len())
    }

    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let i = self.fields.iter().position(|f| f.name == name)?;
        Some(self.rows.iter().map(|row| row[i]).collect())
    }

    /// The `x`, `y` and `z` columns as points
    pub fn positions(&self) -> Result<Positions> {
        let column = |name: &str| {
            self.column(name)
                .ok_or_else(|| Error::Ply(format!("vertex has no '{}' property", name)))
        };
        let (xs, ys, zs) = (column("x")?, column("y")?, column("z")?);
        let flat: Vec<f32> = xs
            .iter()
            .zip(&ys)
            .zip(&zs)
            .flat_map(|((x, y), z)| [*x as f32, *y as f32, *z as f32])
            .collect();
        Positions::from_flat(&flat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

#[derive(Debug, Clone, PartialEq)]
enum PropertyKind {
    Scalar(ScalarType),
    List { count: ScalarType, item: ScalarType },
}

#[derive(Debug, Clone, PartialEq)]
struct Property {
    name: String,
    kind: PropertyKind,
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    name: String,
    count: usize,
    properties: Vec<Property>,
}

#[derive(Debug)]
struct Header {
    format: Format,
    elements: Vec<Element>,
}

#[derive(Clone)]
enum HeaderLine<'a> {
    Format(Format),
    Comment,
    Element { name: &'a str, count: usize },
    Property(Property),
    EndHeader,
}

fn word(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn scalar_type(input: &str) -> IResult<&str, ScalarType> {
    map_res(word, str::parse::<ScalarType>)(input)
}

fn format_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    let (input, _) = tag("format")(input)?;
    let (input, _) = space1(input)?;
    let (input, format) = alt((
        value(Format::Ascii, tag("ascii")),
        value(Format::BinaryLittleEndian, tag("binary_little_endian")),
        value(Format::BinaryBigEndian, tag("binary_big_endian")),
    ))(input)?;
    let (input, _) = space1(input)?;
    let (input, _version) = word(input)?;
    Ok((input, HeaderLine::Format(format)))
}

fn comment_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    let (input, _) = alt((tag("comment"), tag("obj_info")))(input)?;
    let (input, _) = not_line_ending(input)?;
    Ok((input, HeaderLine::Comment))
}

fn element_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    let (input, _) = tag("element")(input)?;
    let (input, _) = space1(input)?;
    let (input, name) = word(input)?;
    let (input, _) = space1(input)?;
    let (input, count) = map_res(digit1, str::parse::<usize>)(input)?;
    Ok((input, HeaderLine::Element { name, count }))
}

fn property_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    let (input, _) = tag("property")(input)?;
    let (input, _) = space1(input)?;
    let (input, kind) = alt((list_property, scalar_property))(input)?;
    let (input, _) = space1(input)?;
    let (input, name) = word(input)?;
    Ok((
        input,
        HeaderLine::Property(Property {
            name: name.to_string(),
            kind,
        }),
    ))
}

fn list_property(input: &str) -> IResult<&str, PropertyKind> {
    let (input, _) = tag("list")(input)?;
    let (input, _) = space1(input)?;
    let (input, count) = scalar_type(input)?;
    let (input, _) = space1(input)?;
    let (input, item) = scalar_type(input)?;
    Ok((input, PropertyKind::List { count, item }))
}

fn scalar_property(input: &str) -> IResult<&str, PropertyKind> {
    let (input, ty) = scalar_type(input)?;
    Ok((input, PropertyKind::Scalar(ty)))
}

fn end_header_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    value(HeaderLine::EndHeader, tag("end_header"))(input)
}

fn header_line(input: &str) -> IResult<&str, HeaderLine<'_>> {
    all_consuming(terminated(
        alt((format_line, comment_line, element_line, property_line, end_header_line)),
        space0,
    ))(input)
}

/// Split the file into header text (through the `end_header` line) and body bytes
fn split_header(data: &[u8]) -> Result<(&str, &[u8])> {
    let mut start = 0;
    for line in data.split(|b| *b == b'\n') {
        let end = start + line.len();
        if std::str::from_utf8(line)?.trim() == "end_header" {
            let header = std::str::from_utf8(&data[..end])?;
            let body = data.get(end + 1..).unwrap_or_default();
            return Ok((header, body));
        }
        start = end + 1;
    }
    Err(Error::Ply("missing end_header".to_string()))
}

fn parse_header(text: &str) -> Result<Header> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    if lines.next() != Some("ply") {
        return Err(Error::Ply("missing 'ply' magic".to_string()));
    }

    let mut format = None;
    let mut elements: Vec<Element> = Vec::new();
    for line in lines {
        let (_, parsed) =
            header_line(line).map_err(|_| Error::Ply(format!("bad header line '{}'", line)))?;
        match parsed {
            HeaderLine::Format(f) => format = Some(f),
            HeaderLine::Comment => {}
            HeaderLine::Element { name, count } => elements.push(Element {
                name: name.to_string(),
                count,
                properties: Vec::new(),
            }),
            HeaderLine::Property(property) => match elements.last_mut() {
                Some(element) => element.properties.push(property),
                None => {
                    return Err(Error::Ply(format!(
                        "property '{}' before any element",
                        property.name
                    )))
                }
            },
            HeaderLine::EndHeader => break,
        }
    }

    let format = format.ok_or_else(|| Error::Ply("missing format line".to_string()))?;
    Ok(Header { format, elements })
}

/// Sequential reader over a PLY body
trait ValueSource {
    fn read(&mut self, ty: ScalarType) -> Result<f64>;

    /// Called before the values of each element row
    fn begin_row(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called after the values of each element row
    fn end_row(&mut self) -> Result<()> {
        Ok(())
    }
}

/// ASCII bodies hold one element row per line
struct AsciiSource<'a> {
    lines: Enumerate<Lines<'a>>,
    tokens: SplitAsciiWhitespace<'a>,
    line: usize,
}

impl<'a> AsciiSource<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            tokens: "".split_ascii_whitespace(),
            line: 0,
        }
    }
}

impl ValueSource for AsciiSource<'_> {
    fn read(&mut self, ty: ScalarType) -> Result<f64> {
        let token = self
            .tokens
            .next()
            .ok_or_else(|| Error::Ply(format!("body line {} has too few values", self.line)))?;
        let v: f64 = token
            .parse()
            .map_err(|_| Error::Ply(format!("'{}' is not a number", token)))?;
        Ok(ty.cast(v))
    }

    fn begin_row(&mut self) -> Result<()> {
        for (i, text) in self.lines.by_ref() {
            if !text.trim().is_empty() {
                self.line = i + 1;
                self.tokens = text.split_ascii_whitespace();
                return Ok(());
            }
        }
        Err(Error::Ply("unexpected end of ASCII data".to_string()))
    }

    fn end_row(&mut self) -> Result<()> {
        match self.tokens.next() {
            Some(extra) => Err(Error::Ply(format!(
                "body line {} has unexpected extra value '{}'",
                self.line, extra
            ))),
            None => Ok(()),
        }
    }
}

struct BinarySource<'a> {
    data: &'a [u8],
    offset: usize,
    big_endian: bool,
}

impl ValueSource for BinarySource<'_> {
    fn read(&mut self, ty: ScalarType) -> Result<f64> {
        let end = self.offset + ty.size();
        let bytes = self
            .data
            .get(self.offset..end)
            .ok_or_else(|| Error::Ply("unexpected end of binary data".to_string()))?;
        self.offset = end;
        Ok(ty.decode(bytes, self.big_endian))
    }
}

/// Read rows of the `vertex` element, skipping the elements stored before it
fn read_vertex_rows<S: ValueSource>(header: &Header, source: &mut S) -> Result<Vec<Vec<f64>>> {
    for element in &header.elements {
        let is_vertex = element.name == "vertex";
        // Headers are untrusted, so the count only hints the allocation
        let mut rows = Vec::with_capacity(if is_vertex { element.count.min(1 << 20) } else { 0 });

        for _ in 0..element.count {
            source.begin_row()?;
            let mut row = Vec::with_capacity(element.properties.len());
            for property in &element.properties {
                match property.kind {
                    PropertyKind::Scalar(ty) => row.push(source.read(ty)?),
                    PropertyKind::List { count, item } => {
                        let n = source.read(count)?;
                        if n < 0.0 {
                            return Err(Error::Ply(format!("negative list length {}", n)));
                        }
                        for _ in 0..n as usize {
                            source.read(item)?;
                        }
                    }
                }
            }
            source.end_row()?;
            if is_vertex {
                rows.push(row);
            }
        }

        if is_vertex {
            return Ok(rows);
        }
    }
    Err(Error::Ply("no vertex element".to_string()))
}

/// Decode the `vertex` element of a PLY file into a numeric table
pub fn read_ply(data: &[u8]) -> Result<PlyTable> {
    let (header_text, body) = split_header(data)?;
    let header = parse_header(header_text)?;

    let vertex = header
        .elements
        .iter()
        .find(|e| e.name == "vertex")
        .ok_or_else(|| Error::Ply("no vertex element".to_string()))?;
    let fields = vertex
        .properties
        .iter()
        .map(|p| match p.kind {
            PropertyKind::Scalar(ty) => Ok(PlyField::new(p.name.clone(), ty)),
            PropertyKind::List { .. } => Err(Error::Ply(format!(
                "list property '{}' on vertex is not supported",
                p.name
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    let rows = match header.format {
        Format::Ascii => {
            let text = std::str::from_utf8(body)?;
            let mut source = AsciiSource::new(text);
            read_vertex_rows(&header, &mut source)?
        }
        Format::BinaryLittleEndian | Format::BinaryBigEndian => {
            let mut source = BinarySource {
                data: body,
                offset: 0,
                big_endian: header.format == Format::BinaryBigEndian,
            };
            read_vertex_rows(&header, &mut source)?
        }
    };

    debug!("read PLY vertex table {}x{}", rows.len(), fields.len());
    Ok(PlyTable { fields, rows })
}

/// Encode rows as an ASCII PLY file with a single `vertex` element.
///
/// Every row must hold exactly one value per field, and field names must be
/// unique. Values are cast to their field's type before writing.
pub fn write_ply<R: AsRef<[f64]>>(rows: &[R], fields: &[PlyField]) -> Result<Vec<u8>> {
    for (i, field) in fields.iter().enumerate() {
        if fields[..i].iter().any(|f| f.name == field.name) {
            return Err(Error::Ply(format!("duplicate field '{}'", field.name)));
        }
    }
    for (i, row) in rows.iter().enumerate() {
        let found = row.as_ref().len();
        if found != fields.len() {
            return Err(Error::FieldMismatch {
                row: i,
                expected: fields.len(),
                found,
            });
        }
    }

    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "ply");
    let _ = writeln!(out, "format ascii 1.0");
    let _ = writeln!(out, "element vertex {}", rows.len());
    for field in fields {
        let _ = writeln!(out, "property {} {}", field.ty.ply_name(), field.name);
    }
    let _ = writeln!(out, "end_header");

    for row in rows {
        let line: Vec<String> = row
            .as_ref()
            .iter()
            .zip(fields)
            .map(|(v, field)| field.ty.format(*v))
            .collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }

    debug!("wrote PLY vertex table {}x{}", rows.len(), fields.len());
    Ok(out.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn xyz_temperature() -> Vec<PlyField> {
        PlyField::from_pairs(&[("x", "f4"), ("y", "f4"), ("z", "f4"), ("temperature", "f4")]).unwrap()
    }

    #[test]
    fn test_scalar_type_names() {
        assert_eq!("f4".parse::<ScalarType>().unwrap(), ScalarType::Float32);
        assert_eq!("<u1".parse::<ScalarType>().unwrap(), ScalarType::UInt8);
        assert_eq!("double".parse::<ScalarType>().unwrap(), ScalarType::Float64);
        assert!(matches!("q8".parse::<ScalarType>(), Err(Error::UnknownScalarType(_))));
    }

    #[test]
    fn test_write_header() {
        let bytes = write_ply(&[vec![1.0, 2.0, 3.0, 20.5]], &xyz_temperature()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float y\n\
             property float z\nproperty float temperature\nend_header\n"
        ));
        assert!(text.ends_with("1 2 3 20.5\n"));
    }

    #[test]
    fn test_round_trip() {
        let rows = vec![
            vec![0.1, 0.2, 0.3, 21.5],
            vec![-1.0, 2.5, 1e-3, 19.25],
            vec![100.0, 0.0, -7.75, 0.0],
        ];
        let fields = xyz_temperature();
        let table = read_ply(&write_ply(&rows, &fields).unwrap()).unwrap();
        assert_eq!(table.fields, fields);
        assert_eq!(table.shape(), (3, 4));
        for (read, written) in table.rows.iter().zip(&rows) {
            for (a, b) in read.iter().zip(written) {
                assert_relative_eq!(*a, *b, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn test_integer_fields_truncate() {
        let fields = PlyField::from_pairs(&[("id", "i4"), ("flag", "u1")]).unwrap();
        let bytes = write_ply(&[vec![7.9, 300.0]], &fields).unwrap();
        let table = read_ply(&bytes).unwrap();
        assert_eq!(table.rows, vec![vec![7.0, 255.0]]);
    }

    #[test]
    fn test_arity_mismatch_fails_fast() {
        let err = write_ply(&[vec![1.0, 2.0, 3.0, 4.0], vec![1.0, 2.0, 3.0]], &xyz_temperature())
            .unwrap_err();
        assert!(matches!(err, Error::FieldMismatch { row: 1, expected: 4, found: 3 }));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let fields = PlyField::from_pairs(&[("x", "f4"), ("x", "f4")]).unwrap();
        assert!(write_ply(&[vec![1.0, 2.0]], &fields).is_err());
    }

    #[test]
    fn test_ascii_with_faces_before_vertices() {
        let text = "ply\r\nformat ascii 1.0\r\ncomment made by hand\r\n\
            element face 1\r\nproperty list uchar int vertex_indices\r\n\
            element vertex 2\r\nproperty double x\r\nproperty double y\r\nproperty double z\r\n\
            end_header\r\n3 0 1 2\r\n1 2 3\r\n4 5 6\r\n";
        let table = read_ply(text.as_bytes()).unwrap();
        assert_eq!(table.rows, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let positions = table.positions().unwrap();
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn test_binary_little_endian() {
        let mut data = b"ply\nformat binary_little_endian 1.0\nelement vertex 2\n\
            property float x\nproperty float y\nproperty float z\nproperty uchar red\nend_header\n"
            .to_vec();
        for (xyz, red) in [([1.0f32, 2.0, 3.0], 10u8), ([4.0, 5.0, 6.0], 200)] {
            for v in xyz {
                data.extend_from_slice(&v.to_le_bytes());
            }
            data.push(red);
        }
        let table = read_ply(&data).unwrap();
        assert_eq!(table.rows, vec![vec![1.0, 2.0, 3.0, 10.0], vec![4.0, 5.0, 6.0, 200.0]]);
        assert_eq!(table.column("red"), Some(vec![10.0, 200.0]));
    }

    #[test]
    fn test_binary_big_endian_truncated() {
        let mut data = b"ply\nformat binary_big_endian 1.0\nelement vertex 1\n\
            property double x\nend_header\n"
            .to_vec();
        data.extend_from_slice(&[0u8; 4]);
        assert!(matches!(read_ply(&data), Err(Error::Ply(_))));
    }

    #[test]
    fn test_missing_vertex_element() {
        let text = "ply\nformat ascii 1.0\nelement face 0\nproperty list uchar int vertex_indices\nend_header\n";
        assert!(read_ply(text.as_bytes()).is_err());
    }

    #[test]
    fn test_bad_header_line() {
        let text = "ply\nformat ascii 1.0\nelement vertex one\nend_header\n";
        assert!(matches!(read_ply(text.as_bytes()), Err(Error::Ply(_))));
    }

    #[test]
    fn test_comment_mentioning_end_header() {
        let text = "ply\nformat ascii 1.0\ncomment written before end_header was reached\n\
            obj_info end_header follows\nelement vertex 1\nproperty float x\nend_header\n2.5\n";
        let table = read_ply(text.as_bytes()).unwrap();
        assert_eq!(table.rows, vec![vec![2.5]]);
    }

    #[test]
    fn test_ascii_row_missing_value() {
        let text = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\n\
            end_header\n1\n2 3\n";
        let err = read_ply(text.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Ply(ref msg) if msg.contains("line 1")));
    }

    #[test]
    fn test_ascii_row_extra_value() {
        let text = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nend_header\n1 2\n";
        assert!(matches!(read_ply(text.as_bytes()), Err(Error::Ply(_))));
    }

    #[test]
    fn test_ascii_blank_lines_between_rows() {
        let text = "ply\nformat ascii 1.0\nelement vertex 2\nproperty int id\nend_header\n\n4\n\n5\n";
        assert_eq!(read_ply(text.as_bytes()).unwrap().rows, vec![vec![4.0], vec![5.0]]);
    }

    fn any_scalar_type() -> impl Strategy<Value = ScalarType> {
        prop::sample::select(vec![
            ScalarType::Int8,
            ScalarType::UInt8,
            ScalarType::Int16,
            ScalarType::UInt16,
            ScalarType::Int32,
            ScalarType::UInt32,
            ScalarType::Float32,
            ScalarType::Float64,
        ])
    }

    fn table() -> impl Strategy<Value = (Vec<PlyField>, Vec<Vec<f64>>)> {
        prop::collection::vec(any_scalar_type(), 1..6).prop_flat_map(|types| {
            let fields: Vec<PlyField> = types
                .iter()
                .enumerate()
                .map(|(i, ty)| PlyField::new(format!("f{}", i), *ty))
                .collect();
            let row = prop::collection::vec(-1e9f64..1e9, types.len());
            (Just(fields), prop::collection::vec(row, 0..10))
        })
    }

    proptest! {
        #[test]
        fn prop_round_trip_casts_each_value((fields, rows) in table()) {
            let table = read_ply(&write_ply(&rows, &fields).unwrap()).unwrap();
            prop_assert_eq!(&table.fields, &fields);
            let expected: Vec<Vec<f64>> = rows
                .iter()
                .map(|row| row.iter().zip(&fields).map(|(v, f)| f.ty.cast(*v)).collect())
                .collect();
            prop_assert_eq!(table.rows, expected);
        }

        #[test]
        fn prop_wrong_arity_rejected((fields, rows) in table(), extra in 1usize..3) {
            prop_assume!(!rows.is_empty());
            let mut rows = rows;
            let last = rows.len() - 1;
            rows[last].extend(std::iter::repeat(0.0).take(extra));
            let is_field_mismatch = matches!(
                write_ply(&rows, &fields),
                Err(Error::FieldMismatch { row, .. }) if row == last
            );
            prop_assert!(is_field_mismatch);
        }
    }
}
