/*
This file is part of the OpenMap tools library.
Created: 15/10/2026
Last Modified: 18/10/2026
License: MIT

Notes: Serializes a GeometryList into the .shp format. Record lengths are
computed up front because both the file header and each record header
carry them ahead of the geometry bytes.
*/
use super::geometry::{EsriShape, GeometryList, ShapeType};
use super::index::{create_point_index, create_poly_index, IndexTable};
use super::transform::{project, CoordTransform, XyBounds};
use super::{write_file_header, ShapefileError};
use crate::io_utils::{ByteOrderWriter, Endianness};
use std::io::prelude::*;
use tracing::debug;

/// Writes one geometry list to a stream. A writer is consumed by
/// `write_geometry`; create a new one for every export.
pub struct ShpWriter<'a, W: Write> {
    bow: ByteOrderWriter<W>,
    transform: Option<&'a dyn CoordTransform>,
}

impl<'a, W: Write> ShpWriter<'a, W> {
    pub fn new(writer: W) -> ShpWriter<'a, W> {
        ShpWriter {
            bow: ByteOrderWriter::new(writer, Endianness::BigEndian),
            transform: None,
        }
    }

    /// Passes every coordinate through `transform` before it is written.
    pub fn with_transform(mut self, transform: &'a dyn CoordTransform) -> ShpWriter<'a, W> {
        self.transform = Some(transform);
        self
    }

    /// Writes the list and returns the offset/length table that the .shx
    /// writer consumes. The stream is flushed before returning.
    pub fn write_geometry(mut self, list: &GeometryList) -> Result<IndexTable, ShapefileError> {
        let index = match list.shape_type {
            ShapeType::Point => self.write_point_geometry(list)?,
            ShapeType::PolyLine | ShapeType::Polygon => self.write_poly_geometry(list)?,
            other => return Err(ShapefileError::UnsupportedShapeType(other)),
        };
        self.bow.flush()?;
        debug!(
            records = index.len(),
            bytes = self.bow.len(),
            "wrote {} geometry",
            list.shape_type
        );
        Ok(index)
    }

    fn write_header(&mut self, index: &IndexTable, list: &GeometryList) -> Result<(), ShapefileError> {
        let bounds = XyBounds::from_extents(&list.extents, self.transform);
        write_file_header(&mut self.bow, index.file_length_words(), list.shape_type, &bounds)
    }

    fn write_record_header(&mut self, record_number: usize, content_length: i32) -> Result<(), ShapefileError> {
        self.bow.set_byte_order(Endianness::BigEndian);
        self.bow.write_i32(record_number as i32)?;
        self.bow.write_i32(content_length)?;
        self.bow.set_byte_order(Endianness::LittleEndian);
        Ok(())
    }

    fn write_xy(&mut self, lat: f64, lon: f64) -> Result<(), ShapefileError> {
        let (x, y) = project(self.transform, lat, lon);
        self.bow.write_f64(x)?;
        self.bow.write_f64(y)?;
        Ok(())
    }

    fn write_point_geometry(&mut self, list: &GeometryList) -> Result<IndexTable, ShapefileError> {
        list.check_points()?;
        let index = create_point_index(list);
        self.write_header(&index, list)?;
        let shape_type = list.shape_type.to_int();
        for (i, shape) in list.shapes.iter().enumerate() {
            self.write_record_header(i + 1, index.lengths[i])?;
            self.bow.write_i32(shape_type)?;
            if let EsriShape::Single(points) = shape {
                self.write_xy(points[0].lat, points[0].lon)?;
            }
        }
        Ok(index)
    }

    fn write_poly_geometry(&mut self, list: &GeometryList) -> Result<IndexTable, ShapefileError> {
        let index = create_poly_index(list);
        self.write_header(&index, list)?;
        let shape_type = list.shape_type.to_int();
        for (i, shape) in list.shapes.iter().enumerate() {
            self.write_record_header(i + 1, index.lengths[i])?;
            self.bow.write_i32(shape_type)?;

            let bounds = XyBounds::from_extents(&shape.record_extents(), self.transform);
            self.bow.write_f64(bounds.x_min)?;
            self.bow.write_f64(bounds.y_min)?;
            self.bow.write_f64(bounds.x_max)?;
            self.bow.write_f64(bounds.y_max)?;

            let parts = shape.parts();
            self.bow.write_i32(parts.len() as i32)?;
            self.bow.write_i32(shape.num_points() as i32)?;

            // index of the first point of each part
            let mut start = 0i32;
            for part in &parts {
                self.bow.write_i32(start)?;
                start += part.len() as i32;
            }

            for part in &parts {
                for p in part.iter() {
                    self.write_xy(p.lat, p.lon)?;
                }
            }
        }
        Ok(index)
    }
}

#[cfg(test)]
mod test {
    use super::ShpWriter;
    use crate::io_utils::{ByteOrderReader, Endianness};
    use crate::structures::{Extents, LatLonPoint};
    use crate::vector::shapefile::{
        CoordTransform, EsriShape, GeometryList, MultiPart, ShapeType, ShapefileError,
    };

    fn read_be_i32(buf: &[u8], at: usize) -> i32 {
        let mut bor = ByteOrderReader::new(buf[at..at + 4].to_vec(), Endianness::BigEndian);
        bor.read_i32().unwrap()
    }

    fn read_le_i32(buf: &[u8], at: usize) -> i32 {
        let mut bor = ByteOrderReader::new(buf[at..at + 4].to_vec(), Endianness::LittleEndian);
        bor.read_i32().unwrap()
    }

    fn read_le_f64(buf: &[u8], at: usize) -> f64 {
        let mut bor = ByteOrderReader::new(buf[at..at + 8].to_vec(), Endianness::LittleEndian);
        bor.read_f64().unwrap()
    }

    #[test]
    fn test_point_bytes() {
        let mut list = GeometryList::new(ShapeType::Point);
        list.add_point(LatLonPoint::new(45.0, -75.0));
        let mut buf: Vec<u8> = vec![];
        let index = ShpWriter::new(&mut buf).write_geometry(&list).unwrap();
        assert_eq!(index.lengths, vec![10]);
        assert_eq!(buf.len(), 128);
        assert_eq!(read_be_i32(&buf, 0), 9994);
        assert_eq!(read_be_i32(&buf, 24), 64);
        // record header is big-endian
        assert_eq!(read_be_i32(&buf, 100), 1);
        assert_eq!(read_be_i32(&buf, 104), 10);
        // shape type little-endian
        assert_eq!(&buf[108..112], &[1, 0, 0, 0]);
        // x = lon, y = lat
        assert_eq!(read_le_f64(&buf, 112), -75.0);
        assert_eq!(read_le_f64(&buf, 120), 45.0);
    }

    #[test]
    fn test_unset_extents_never_written() {
        let mut list = GeometryList::new(ShapeType::PolyLine);
        list.shapes.push(EsriShape::Single(vec![
            LatLonPoint::new(1.0, 1.0),
            LatLonPoint::new(2.0, 2.0),
        ]));
        assert!(list.extents.is_unset());
        let mut buf: Vec<u8> = vec![];
        ShpWriter::new(&mut buf).write_geometry(&list).unwrap();
        assert_eq!(read_le_f64(&buf, 36), -180.0);
        assert_eq!(read_le_f64(&buf, 44), -90.0);
        assert_eq!(read_le_f64(&buf, 52), 180.0);
        assert_eq!(read_le_f64(&buf, 60), 90.0);
    }

    #[test]
    fn test_unset_multi_part_extents_become_full_globe() {
        let mut list = GeometryList::new(ShapeType::PolyLine);
        list.shapes.push(EsriShape::Multi(MultiPart {
            parts: vec![
                vec![LatLonPoint::new(1.0, 2.0), LatLonPoint::new(3.0, 4.0)],
                vec![LatLonPoint::new(5.0, 6.0)],
            ],
            extents: Extents::unset(),
        }));
        let mut buf: Vec<u8> = vec![];
        ShpWriter::new(&mut buf).write_geometry(&list).unwrap();
        // record bounding box follows the shape type at 108
        assert_eq!(read_le_f64(&buf, 112), -180.0);
        assert_eq!(read_le_f64(&buf, 120), -90.0);
        assert_eq!(read_le_f64(&buf, 128), 180.0);
        assert_eq!(read_le_f64(&buf, 136), 90.0);
        assert_eq!(read_le_i32(&buf, 144), 2);
        assert_eq!(read_le_i32(&buf, 148), 3);
        assert_eq!(read_le_i32(&buf, 152), 0);
        assert_eq!(read_le_i32(&buf, 156), 2);
        assert_eq!(read_le_f64(&buf, 160), 2.0);
        assert_eq!(read_le_f64(&buf, 168), 1.0);
        assert_eq!(read_le_f64(&buf, 192), 6.0);
        assert_eq!(read_le_f64(&buf, 200), 5.0);
        assert_eq!(buf.len(), 208);
    }

    #[test]
    fn test_unsupported_shape_type() {
        let list = GeometryList::new(ShapeType::MultiPoint);
        let mut buf: Vec<u8> = vec![];
        match ShpWriter::new(&mut buf).write_geometry(&list) {
            Err(ShapefileError::UnsupportedShapeType(ShapeType::MultiPoint)) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert!(buf.is_empty());
    }

    struct Offset;

    impl CoordTransform for Offset {
        fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
            (lon + 1000.0, lat + 2000.0)
        }
    }

    #[test]
    fn test_transform_applied() {
        let mut list = GeometryList::new(ShapeType::Point);
        list.add_point(LatLonPoint::new(10.0, 20.0));
        let mut buf: Vec<u8> = vec![];
        ShpWriter::new(&mut buf)
            .with_transform(&Offset)
            .write_geometry(&list)
            .unwrap();
        assert_eq!(read_le_f64(&buf, 36), 1020.0);
        assert_eq!(read_le_f64(&buf, 44), 2010.0);
        assert_eq!(read_le_f64(&buf, 112), 1020.0);
        assert_eq!(read_le_f64(&buf, 120), 2010.0);
    }

    #[test]
    fn test_transform_applied_to_polygon() {
        let mut list = GeometryList::new(ShapeType::Polygon);
        list.add_part(vec![
            LatLonPoint::new(0.0, 0.0),
            LatLonPoint::new(1.0, 0.0),
            LatLonPoint::new(1.0, 1.0),
            LatLonPoint::new(0.0, 0.0),
        ]);
        let mut buf: Vec<u8> = vec![];
        ShpWriter::new(&mut buf)
            .with_transform(&Offset)
            .write_geometry(&list)
            .unwrap();
        // file header box
        assert_eq!(read_le_f64(&buf, 36), 1000.0);
        assert_eq!(read_le_f64(&buf, 44), 2000.0);
        assert_eq!(read_le_f64(&buf, 52), 1001.0);
        assert_eq!(read_le_f64(&buf, 60), 2001.0);
        // record box
        assert_eq!(read_le_i32(&buf, 108), 5);
        assert_eq!(read_le_f64(&buf, 112), 1000.0);
        assert_eq!(read_le_f64(&buf, 120), 2000.0);
        assert_eq!(read_le_f64(&buf, 128), 1001.0);
        assert_eq!(read_le_f64(&buf, 136), 2001.0);
        assert_eq!(read_le_i32(&buf, 144), 1);
        assert_eq!(read_le_i32(&buf, 148), 4);
        assert_eq!(read_le_i32(&buf, 152), 0);
        // (lat 0, lon 0) then (lat 1, lon 0)
        assert_eq!(read_le_f64(&buf, 156), 1000.0);
        assert_eq!(read_le_f64(&buf, 164), 2000.0);
        assert_eq!(read_le_f64(&buf, 172), 1000.0);
        assert_eq!(read_le_f64(&buf, 180), 2001.0);
        assert_eq!(read_le_f64(&buf, 188), 1001.0);
        assert_eq!(read_le_f64(&buf, 196), 2001.0);
        assert_eq!(buf.len(), 156 + 4 * 16);
    }
}
