/// Readers and writers for the exchanged file formats
pub mod csv;
pub mod ply;
pub mod stl;

pub use self::csv::{read_csv, write_csv};
pub use ply::{read_ply, write_ply, PlyField, PlyTable, ScalarType};
pub use stl::{parse_stl, write_ascii_stl, write_binary_stl};
