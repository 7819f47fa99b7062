/*
This file is part of the OpenMap tools library.
Created: 14/10/2026
Last Modified: 18/10/2026
License: MIT

Notes: The logic behind writing (and reading back) the ESRI Shapefile format.
*/
pub mod attributes;
pub mod exporter;
pub mod geometry;
pub mod index;
pub mod reader;
pub mod transform;
pub mod writer;

pub use self::attributes::{
    AttributeField, AttributeTable, DbfSummary, DbfWriter, FieldData, FieldDataType,
};
pub use self::exporter::ShapefileExporter;
pub use self::geometry::{EsriShape, GeometryList, MultiPart, ShapeType};
pub use self::index::{create_point_index, create_poly_index, IndexTable, ShxWriter};
pub use self::reader::{Shapefile, ShapefileRecord};
pub use self::transform::{CoordTransform, XyBounds};
pub use self::writer::ShpWriter;

use crate::io_utils::{ByteOrderReader, ByteOrderWriter, Endianness};
use std::fmt;
use std::io::prelude::*;
use thiserror::Error;

/// Magic number at the start of every .shp and .shx file.
pub const FILE_CODE: i32 = 9994;
/// Format version written after the file length.
pub const VERSION: i32 = 1000;
/// The fixed 100-byte file header, in 16-bit words.
pub const HEADER_LENGTH_WORDS: i32 = 50;
/// Record number plus content length, in 16-bit words.
pub const RECORD_HEADER_WORDS: i32 = 4;

#[derive(Error, Debug)]
pub enum ShapefileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shape type {0} cannot be written; expected Point, PolyLine or Polygon.")]
    UnsupportedShapeType(ShapeType),

    #[error("Unrecognized shape type code {0}.")]
    UnknownShapeType(i32),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid attributes: {0}")]
    InvalidAttributes(String),

    #[error("The attribute table holds {records} records but there are {shapes} shapes.")]
    AttributeMismatch { records: usize, shapes: usize },

    #[error("Invalid shapefile: {0}")]
    InvalidFile(String),
}

// 100 bytes in size
#[derive(Debug, Default, Clone)]
pub struct ShapefileHeader {
    pub file_code: i32,        // BigEndian; value is 9994
    pub file_length: i32,      // BigEndian; in 16-bit words
    pub version: i32,          // LittleEndian
    pub shape_type: ShapeType, // LittleEndian
    pub x_min: f64,            // LittleEndian
    pub y_min: f64,            // LittleEndian
    pub x_max: f64,            // LittleEndian
    pub y_max: f64,            // LittleEndian
    pub z_min: f64,            // LittleEndian; zero for 2-D shape types
    pub z_max: f64,            // LittleEndian
    pub m_min: f64,            // LittleEndian
    pub m_max: f64,            // LittleEndian
}

impl ShapefileHeader {
    pub(crate) fn read(bor: &mut ByteOrderReader) -> Result<ShapefileHeader, ShapefileError> {
        if bor.len() < 100 {
            return Err(ShapefileError::InvalidFile(format!(
                "file is {} bytes, shorter than the 100-byte header",
                bor.len()
            )));
        }
        let mut header = ShapefileHeader::default();
        bor.seek(0);
        bor.byte_order = Endianness::BigEndian;
        header.file_code = bor.read_i32()?;
        if header.file_code != FILE_CODE {
            return Err(ShapefileError::InvalidFile(format!(
                "file code is {}, expected {}",
                header.file_code, FILE_CODE
            )));
        }
        bor.seek(24);
        header.file_length = bor.read_i32()?;

        // the rest of the header is in LittleEndian format
        bor.byte_order = Endianness::LittleEndian;
        header.version = bor.read_i32()?;
        header.shape_type = ShapeType::from_int(bor.read_i32()?)?;
        header.x_min = bor.read_f64()?;
        header.y_min = bor.read_f64()?;
        header.x_max = bor.read_f64()?;
        header.y_max = bor.read_f64()?;
        header.z_min = bor.read_f64()?;
        header.z_max = bor.read_f64()?;
        header.m_min = bor.read_f64()?;
        header.m_max = bor.read_f64()?;
        Ok(header)
    }
}

impl fmt::Display for ShapefileHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "file_code: {}
file_length: {}
version: {}
shape_type: {}
x_min: {}
x_max: {}
y_min: {}
y_max: {}",
            self.file_code,
            self.file_length,
            self.version,
            self.shape_type,
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max
        )
    }
}

/// Writes the 100-byte header shared by .shp and .shx files. The caller's
/// byte order is left little-endian afterwards.
pub(crate) fn write_file_header<W: Write>(
    bow: &mut ByteOrderWriter<W>,
    file_length_words: i32,
    shape_type: ShapeType,
    bounds: &XyBounds,
) -> Result<(), ShapefileError> {
    bow.set_byte_order(Endianness::BigEndian);

    // magic number
    bow.write_i32(FILE_CODE)?;

    // unused header bytes
    for _ in 0..5 {
        bow.write_i32(0i32)?;
    }

    bow.write_i32(file_length_words)?;

    bow.set_byte_order(Endianness::LittleEndian);
    bow.write_i32(VERSION)?;
    bow.write_i32(shape_type.to_int())?;

    bow.write_f64(bounds.x_min)?;
    bow.write_f64(bounds.y_min)?;
    bow.write_f64(bounds.x_max)?;
    bow.write_f64(bounds.y_max)?;

    // z and m ranges are unused for 2-D shapes
    for _ in 0..4 {
        bow.write_f64(0f64)?;
    }
    Ok(())
}
