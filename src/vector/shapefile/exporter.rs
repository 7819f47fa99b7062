/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 18/10/2026
License: MIT

Notes: Writes the .shp, .shx and .dbf files (and the optional .prj) for one
geometry list. Every file is written next to the given .shp path.
*/
use super::attributes::{AttributeTable, DbfWriter};
use super::geometry::GeometryList;
use super::index::{IndexTable, ShxWriter};
use super::transform::{CoordTransform, XyBounds};
use super::writer::ShpWriter;
use super::ShapefileError;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

#[derive(Default)]
pub struct ShapefileExporter<'a> {
    transform: Option<&'a dyn CoordTransform>,
    projection: Option<String>,
}

impl<'a> ShapefileExporter<'a> {
    pub fn new() -> ShapefileExporter<'a> {
        ShapefileExporter::default()
    }

    pub fn with_transform(mut self, transform: &'a dyn CoordTransform) -> ShapefileExporter<'a> {
        self.transform = Some(transform);
        self
    }

    /// WKT written verbatim to the .prj file.
    pub fn with_projection(mut self, wkt: &str) -> ShapefileExporter<'a> {
        self.projection = Some(wkt.to_string());
        self
    }

    /// Exports `list` to `file_name`. When `attributes` is `None` a single
    /// ID column is written so that the .dbf always matches the records.
    pub fn export<P: AsRef<Path>>(
        &self,
        file_name: P,
        list: &GeometryList,
        attributes: Option<&AttributeTable>,
    ) -> Result<IndexTable, ShapefileError> {
        let file_name = file_name.as_ref();

        if let Some(table) = attributes {
            if table.num_records() != list.len() {
                return Err(ShapefileError::AttributeMismatch {
                    records: table.num_records(),
                    shapes: list.len(),
                });
            }
        }

        /////////////////////////////////////////
        // Write the geometry data (.shp file) //
        /////////////////////////////////////////
        let f = File::create(file_name)?;
        let mut shp_writer = ShpWriter::new(BufWriter::new(f));
        if let Some(transform) = self.transform {
            shp_writer = shp_writer.with_transform(transform);
        }
        let index = shp_writer.write_geometry(list)?;

        ////////////////////////////////////
        // Write the index file (.shx)    //
        ////////////////////////////////////
        let shx_file = file_name.with_extension("shx");
        let f = File::create(&shx_file)?;
        let bounds = XyBounds::from_extents(&list.extents, self.transform);
        ShxWriter::new(BufWriter::new(f)).write_index(&index, list.shape_type, &bounds)?;

        ///////////////////////////////////
        // Write the attributes (.dbf)   //
        ///////////////////////////////////
        let dbf_file = file_name.with_extension("dbf");
        let f = File::create(&dbf_file)?;
        let dbf_writer = DbfWriter::new(BufWriter::new(f));
        match attributes {
            Some(table) => dbf_writer.write_table(table)?,
            None => dbf_writer.write_table(&AttributeTable::with_record_ids(list.len()))?,
        }

        ///////////////////////////////////
        // Write the projection file     //
        ///////////////////////////////////
        if let Some(wkt) = &self.projection {
            let prj_file = file_name.with_extension("prj");
            let f = File::create(&prj_file)?;
            let mut writer = BufWriter::new(f);
            writer.write_all(wkt.as_bytes())?;
            writer.flush()?;
        }

        info!(
            file = %file_name.display(),
            records = index.len(),
            "exported {} shapefile",
            list.shape_type
        );
        Ok(index)
    }
}
