/*
This file is part of the OpenMap tools library.
Created: 16/10/2026
Last Modified: 18/10/2026
License: MIT

Notes: Reads Point, PolyLine and Polygon shapefiles back into lat/lon form.
Coordinates are returned exactly as stored; if a projection was applied on
write, the values are projected x/y mapped onto (lon, lat).
*/
use super::geometry::{GeometryList, ShapeType};
use super::index::IndexTable;
use super::{ShapefileError, ShapefileHeader, HEADER_LENGTH_WORDS};
use crate::io_utils::{ByteOrderReader, Endianness};
use crate::structures::{Extents, LatLonPoint};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct ShapefileRecord {
    pub record_number: i32,
    pub shape_type: ShapeType,
    /// Record bounding box; for points it collapses onto the point.
    pub extents: Extents,
    pub parts: Vec<Vec<LatLonPoint>>,
}

impl ShapefileRecord {
    pub fn num_points(&self) -> usize {
        self.parts.iter().map(|p| p.len()).sum()
    }
}

/// An in-memory .shp/.shx pair.
#[derive(Clone, Debug, Default)]
pub struct Shapefile {
    pub header: ShapefileHeader,
    pub index: IndexTable,
    pub records: Vec<ShapefileRecord>,
}

impl Shapefile {
    /// Reads `file_name` and, when present, the .shx next to it.
    pub fn read<P: AsRef<Path>>(file_name: P) -> Result<Shapefile, ShapefileError> {
        let shp = fs::read(file_name.as_ref())?;
        let shx_file = file_name.as_ref().with_extension("shx");
        let shx = if shx_file.exists() {
            Some(fs::read(shx_file)?)
        } else {
            None
        };
        Shapefile::from_bytes(shp, shx)
    }

    /// Parses a .shp buffer. When no .shx buffer is given the index is
    /// rebuilt from the record headers.
    pub fn from_bytes(shp: Vec<u8>, shx: Option<Vec<u8>>) -> Result<Shapefile, ShapefileError> {
        let mut bor = ByteOrderReader::new(shp, Endianness::BigEndian);
        let header = ShapefileHeader::read(&mut bor)?;

        let file_size = (header.file_length as usize * 2).min(bor.len());
        let mut records = vec![];
        let mut offsets = vec![];
        let mut lengths = vec![];
        let mut pos = 100usize;
        while pos + 8 <= file_size {
            bor.seek(pos);
            bor.byte_order = Endianness::BigEndian;
            let record_number = bor.read_i32()?;
            let content_length = bor.read_i32()?;
            if content_length < 2 {
                return Err(ShapefileError::InvalidFile(format!(
                    "record {} has content length {}",
                    record_number, content_length
                )));
            }
            offsets.push((pos / 2) as i32);
            lengths.push(content_length);

            bor.byte_order = Endianness::LittleEndian;
            let record = read_record(&mut bor, record_number)?;
            records.push(record);
            pos += 8 + content_length as usize * 2;
        }

        let index = match shx {
            Some(buffer) => read_index(buffer)?,
            None => IndexTable {
                offsets: offsets,
                lengths: lengths,
            },
        };

        Ok(Shapefile {
            header: header,
            index: index,
            records: records,
        })
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    /// Converts the records back into a geometry list. Single-part records
    /// become `Single` shapes, the rest `Multi`.
    pub fn to_geometry_list(&self) -> GeometryList {
        let mut list = GeometryList::new(self.header.shape_type);
        for rec in &self.records {
            match self.header.shape_type {
                ShapeType::Point => {
                    for part in &rec.parts {
                        for p in part {
                            list.add_point(*p);
                        }
                    }
                }
                _ => {
                    if rec.parts.len() == 1 {
                        list.add_part(rec.parts[0].clone());
                    } else {
                        list.add_multi_part(rec.parts.clone());
                    }
                }
            }
        }
        list
    }
}

fn read_record(bor: &mut ByteOrderReader, record_number: i32) -> Result<ShapefileRecord, ShapefileError> {
    let shape_type = ShapeType::from_int(bor.read_i32()?)?;
    match shape_type {
        ShapeType::Null => Ok(ShapefileRecord {
            record_number: record_number,
            shape_type: shape_type,
            extents: Extents::unset(),
            parts: vec![],
        }),
        ShapeType::Point => {
            let p = LatLonPoint::from_xy(bor.read_f64()?, bor.read_f64()?);
            Ok(ShapefileRecord {
                record_number: record_number,
                shape_type: shape_type,
                extents: Extents::from_points(&[p]),
                parts: vec![vec![p]],
            })
        }
        ShapeType::PolyLine | ShapeType::Polygon => {
            let x_min = bor.read_f64()?;
            let y_min = bor.read_f64()?;
            let x_max = bor.read_f64()?;
            let y_max = bor.read_f64()?;
            let num_parts = bor.read_i32()?;
            let num_points = bor.read_i32()?;
            if num_parts < 0 || num_points < 0 {
                return Err(ShapefileError::InvalidFile(format!(
                    "record {} has {} parts and {} points",
                    record_number, num_parts, num_points
                )));
            }
            let mut part_starts = Vec::with_capacity(num_parts as usize);
            for _ in 0..num_parts {
                part_starts.push(bor.read_i32()? as usize);
            }
            let mut points = Vec::with_capacity(num_points as usize);
            for _ in 0..num_points {
                let x = bor.read_f64()?;
                let y = bor.read_f64()?;
                points.push(LatLonPoint::from_xy(x, y));
            }

            let mut parts = Vec::with_capacity(part_starts.len());
            for (i, st) in part_starts.iter().enumerate() {
                let end = if i + 1 < part_starts.len() {
                    part_starts[i + 1]
                } else {
                    points.len()
                };
                if *st > end || end > points.len() {
                    return Err(ShapefileError::InvalidFile(format!(
                        "record {} has a part starting at point {}",
                        record_number, st
                    )));
                }
                parts.push(points[*st..end].to_vec());
            }

            Ok(ShapefileRecord {
                record_number: record_number,
                shape_type: shape_type,
                extents: Extents::new(y_min, x_min, y_max, x_max),
                parts: parts,
            })
        }
        other => Err(ShapefileError::UnsupportedShapeType(other)),
    }
}

fn read_index(buffer: Vec<u8>) -> Result<IndexTable, ShapefileError> {
    let mut bor = ByteOrderReader::new(buffer, Endianness::BigEndian);
    let header = ShapefileHeader::read(&mut bor)?;
    let num_records = ((header.file_length - HEADER_LENGTH_WORDS) / 4).max(0) as usize;
    let mut index = IndexTable::default();
    bor.seek(100);
    bor.byte_order = Endianness::BigEndian;
    for _ in 0..num_records {
        index.offsets.push(bor.read_i32()?);
        index.lengths.push(bor.read_i32()?);
    }
    Ok(index)
}
