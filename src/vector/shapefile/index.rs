/*
This file is part of the OpenMap tools library.
Created: 15/10/2026
Last Modified: 17/10/2026
License: MIT

Notes: Record offsets and content lengths, and the .shx file built from them.
*/
use super::geometry::{EsriShape, GeometryList, ShapeType};
use super::transform::XyBounds;
use super::{write_file_header, ShapefileError, HEADER_LENGTH_WORDS, RECORD_HEADER_WORDS};
use crate::io_utils::{ByteOrderWriter, Endianness};
use std::io::prelude::*;

/// Content length of a point record: shape type (2) plus x and y (4 each).
pub const POINT_CONTENT_WORDS: i32 = 10;

/// Per-record offsets and content lengths, both in 16-bit words.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexTable {
    pub offsets: Vec<i32>,
    pub lengths: Vec<i32>,
}

impl IndexTable {
    /// Lays records out back to back after the file header.
    pub fn from_lengths(lengths: Vec<i32>) -> IndexTable {
        let mut offsets = Vec::with_capacity(lengths.len());
        let mut pos = HEADER_LENGTH_WORDS;
        for len in &lengths {
            offsets.push(pos);
            pos += len + RECORD_HEADER_WORDS;
        }
        IndexTable {
            offsets: offsets,
            lengths: lengths,
        }
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Total .shp length in words, as recorded in its header.
    pub fn file_length_words(&self) -> i32 {
        match (self.offsets.last(), self.lengths.last()) {
            (Some(offset), Some(length)) => offset + length + RECORD_HEADER_WORDS,
            _ => HEADER_LENGTH_WORDS,
        }
    }

    /// Total .shx length in words.
    pub fn index_file_length_words(&self) -> i32 {
        HEADER_LENGTH_WORDS + RECORD_HEADER_WORDS * self.len() as i32
    }
}

/// Content length of a polyline or polygon record in words: shape type (2),
/// bounding box (16), part and point counts (2 each), one part offset per
/// part (2 each) and one x/y pair per coordinate (8 each).
pub fn poly_content_length(shape: &EsriShape) -> i32 {
    2 + 16 + 2 + 2 + 2 * shape.num_parts() as i32 + 8 * shape.num_points() as i32
}

pub fn create_point_index(list: &GeometryList) -> IndexTable {
    IndexTable::from_lengths(vec![POINT_CONTENT_WORDS; list.len()])
}

pub fn create_poly_index(list: &GeometryList) -> IndexTable {
    IndexTable::from_lengths(list.shapes.iter().map(poly_content_length).collect())
}

/// Writes the .shx companion of a .shp file.
pub struct ShxWriter<W: Write> {
    bow: ByteOrderWriter<W>,
}

impl<W: Write> ShxWriter<W> {
    pub fn new(writer: W) -> ShxWriter<W> {
        ShxWriter {
            bow: ByteOrderWriter::new(writer, Endianness::BigEndian),
        }
    }

    /// Writes the header and one (offset, length) pair per record, then
    /// flushes. The header mirrors the .shp header apart from its length.
    pub fn write_index(
        mut self,
        index: &IndexTable,
        shape_type: ShapeType,
        bounds: &XyBounds,
    ) -> Result<(), ShapefileError> {
        write_file_header(
            &mut self.bow,
            index.index_file_length_words(),
            shape_type,
            bounds,
        )?;
        self.bow.set_byte_order(Endianness::BigEndian);
        for (offset, length) in index.offsets.iter().zip(index.lengths.iter()) {
            self.bow.write_i32(*offset)?;
            self.bow.write_i32(*length)?;
        }
        self.bow.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::structures::{Extents, LatLonPoint};

    fn sample_polygons() -> GeometryList {
        let mut list = GeometryList::new(ShapeType::Polygon);
        list.add_part(vec![
            LatLonPoint::new(0.0, 0.0),
            LatLonPoint::new(0.0, 1.0),
            LatLonPoint::new(1.0, 1.0),
            LatLonPoint::new(0.0, 0.0),
        ]);
        list.add_multi_part(vec![
            vec![
                LatLonPoint::new(5.0, 5.0),
                LatLonPoint::new(5.0, 6.0),
                LatLonPoint::new(6.0, 6.0),
            ],
            vec![LatLonPoint::new(7.0, 7.0), LatLonPoint::new(8.0, 8.0)],
        ]);
        list
    }

    #[test]
    fn test_poly_content_lengths() {
        let index = create_poly_index(&sample_polygons());
        // 22 + 2 * 1 + 8 * 4 and 22 + 2 * 2 + 8 * 5
        assert_eq!(index.lengths, vec![56, 66]);
        assert_eq!(index.offsets, vec![50, 110]);
    }

    #[test]
    fn test_offsets_chain() {
        let index = create_poly_index(&sample_polygons());
        for i in 0..index.len() - 1 {
            assert_eq!(
                index.offsets[i] + index.lengths[i] + 4,
                index.offsets[i + 1]
            );
        }
        let last = index.len() - 1;
        assert_eq!(
            index.offsets[last] + index.lengths[last] + 4,
            index.file_length_words()
        );
    }

    #[test]
    fn test_point_index() {
        let mut list = GeometryList::new(ShapeType::Point);
        list.add_point(LatLonPoint::new(1.0, 2.0));
        list.add_point(LatLonPoint::new(3.0, 4.0));
        let index = create_point_index(&list);
        assert_eq!(index.offsets, vec![50, 64]);
        assert_eq!(index.file_length_words(), 78);
        assert_eq!(IndexTable::default().file_length_words(), 50);
    }

    #[test]
    fn test_shx_bytes() {
        let index = IndexTable::from_lengths(vec![10, 10]);
        let bounds = XyBounds::from_extents(&Extents::unset(), None);
        let mut buf: Vec<u8> = vec![];
        ShxWriter::new(&mut buf)
            .write_index(&index, ShapeType::Point, &bounds)
            .unwrap();
        assert_eq!(buf.len(), 116);
        // file length in words, big-endian
        assert_eq!(&buf[24..28], &[0, 0, 0, 58]);
        // first record: offset 50, length 10
        assert_eq!(&buf[100..108], &[0, 0, 0, 50, 0, 0, 0, 10]);
        assert_eq!(&buf[108..112], &[0, 0, 0, 64]);
    }
}
