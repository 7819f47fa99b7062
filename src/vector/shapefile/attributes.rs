/*
This file is part of the OpenMap tools library.
Created: 16/10/2026
Last Modified: 18/10/2026
License: MIT

NOTE: Structures and functions for writing the Shapefile attribute table
contained within the associated .dbf (dBASE III) file.
*/
use super::ShapefileError;
use crate::io_utils::{ByteOrderReader, ByteOrderWriter, Endianness};
use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldDataType {
    Int,
    Real,
    Text,
    Bool,
}

impl FieldDataType {
    pub fn to_char(&self) -> char {
        match self {
            FieldDataType::Int | FieldDataType::Real => 'N',
            FieldDataType::Text => 'C',
            FieldDataType::Bool => 'L',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldData {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
    Null,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttributeField {
    pub name: String,
    pub field_type: FieldDataType,
    pub field_length: u8,
    #[serde(default)]
    pub decimal_count: u8,
}

impl AttributeField {
    pub fn new(name: &str, field_type: FieldDataType, field_length: u8, decimal_count: u8) -> AttributeField {
        AttributeField {
            name: name.to_string(),
            field_type: field_type,
            field_length: field_length,
            decimal_count: decimal_count,
        }
    }

    /// Renders a value into exactly `field_length` bytes. Numbers are right
    /// aligned, text and logicals left aligned; values that do not fit are
    /// truncated.
    fn format_value(&self, value: &FieldData) -> Vec<u8> {
        let fl = self.field_length as usize;
        let s = match value {
            FieldData::Null => String::new(),
            FieldData::Int(v) => format!("{:>width$}", v, width = fl),
            FieldData::Real(v) => format!(
                "{:>width$.prec$}",
                v,
                width = fl,
                prec = self.decimal_count as usize
            ),
            FieldData::Bool(v) => {
                if *v {
                    "T".to_string()
                } else {
                    "F".to_string()
                }
            }
            FieldData::Text(v) => {
                let mut end = v.len().min(fl);
                while !v.is_char_boundary(end) {
                    end -= 1;
                }
                v[..end].to_string()
            }
        };
        let mut bytes = s.into_bytes();
        if bytes.len() > fl {
            // keep the least significant digits of an oversized number
            let cut = bytes.len() - fl;
            bytes.drain(0..cut);
        }
        bytes.resize(fl, b' ');
        bytes
    }
}

/// The attribute table written alongside the geometry, one row per record.
#[derive(Clone, Debug, Default)]
pub struct AttributeTable {
    pub fields: Vec<AttributeField>,
    records: Vec<Vec<FieldData>>,
}

impl AttributeTable {
    pub fn new(fields: Vec<AttributeField>) -> AttributeTable {
        AttributeTable {
            fields: fields,
            records: vec![],
        }
    }

    /// A single numeric `ID` column holding 1-based record numbers.
    pub fn with_record_ids(num_records: usize) -> AttributeTable {
        let mut table = AttributeTable::new(vec![AttributeField::new("ID", FieldDataType::Int, 10, 0)]);
        for i in 0..num_records {
            table.records.push(vec![FieldData::Int(i as i64 + 1)]);
        }
        table
    }

    pub fn add_record(&mut self, rec: Vec<FieldData>) -> Result<(), ShapefileError> {
        if rec.len() != self.fields.len() {
            return Err(ShapefileError::InvalidAttributes(format!(
                "attribute record has {} values but the table has {} fields",
                rec.len(),
                self.fields.len()
            )));
        }
        self.records.push(rec);
        Ok(())
    }

    pub fn num_records(&self) -> usize {
        self.records.len()
    }

    pub fn get_record(&self, index: usize) -> Option<&Vec<FieldData>> {
        self.records.get(index)
    }

    fn bytes_in_record(&self) -> u16 {
        // leading deletion flag
        1u16 + self.fields.iter().map(|f| f.field_length as u16).sum::<u16>()
    }
}

/// Writes an `AttributeTable` as a dBASE III file.
pub struct DbfWriter<W: Write> {
    bow: ByteOrderWriter<W>,
}

impl<W: Write> DbfWriter<W> {
    pub fn new(writer: W) -> DbfWriter<W> {
        DbfWriter {
            bow: ByteOrderWriter::new(writer, Endianness::LittleEndian),
        }
    }

    pub fn write_table(mut self, table: &AttributeTable) -> Result<(), ShapefileError> {
        self.bow.write_u8(3u8)?;

        // date of last update
        let now = Local::now();
        self.bow.write_u8((now.year() - 1900) as u8)?;
        self.bow.write_u8(now.month() as u8)?;
        self.bow.write_u8(now.day() as u8)?;

        self.bow.write_u32(table.num_records() as u32)?;
        let header_size = 32u16 + table.fields.len() as u16 * 32u16 + 1u16;
        self.bow.write_u16(header_size)?;
        self.bow.write_u16(table.bytes_in_record())?;

        // reserved or unused bytes
        self.bow.write_bytes(&[0u8; 20])?;

        // Field descriptor array
        for field in &table.fields {
            let mut name = field.name.as_bytes().to_vec();
            name.truncate(10);
            name.resize(11, 0u8);
            self.bow.write_bytes(&name)?;
            self.bow.write_u8(field.field_type.to_char() as u8)?;
            self.bow.write_bytes(&[0u8; 4])?;
            self.bow.write_u8(field.field_length)?;
            self.bow.write_u8(field.decimal_count)?;
            self.bow.write_bytes(&[0u8; 14])?;
        }

        self.bow.write_u8(0x0D)?; // terminator byte

        for rec in &table.records {
            self.bow.write_u8(0x20)?; // not deleted
            for (field, value) in table.fields.iter().zip(rec.iter()) {
                self.bow.write_bytes(&field.format_value(value))?;
            }
        }

        self.bow.write_u8(0x1A)?; // end of file
        self.bow.flush()?;
        Ok(())
    }
}

/// Record count and field names read back from a .dbf header.
#[derive(Clone, Debug, PartialEq)]
pub struct DbfSummary {
    pub num_records: u32,
    pub field_names: Vec<String>,
}

impl DbfSummary {
    pub fn from_bytes(buffer: Vec<u8>) -> Result<DbfSummary, ShapefileError> {
        let mut bor = ByteOrderReader::new(buffer, Endianness::LittleEndian);
        let version = bor.read_u8()?;
        if version != 3 {
            return Err(ShapefileError::InvalidFile(format!(
                "dBASE version byte is {}, expected 3",
                version
            )));
        }
        bor.seek(4);
        let num_records = bor.read_u32()?;
        let header_size = bor.read_u16()? as usize;
        if header_size < 33 {
            return Err(ShapefileError::InvalidFile(format!(
                "dBASE header size {} is too small",
                header_size
            )));
        }
        let num_fields = (header_size - 33) / 32;
        let mut field_names = Vec::with_capacity(num_fields);
        for i in 0..num_fields {
            bor.seek(32 + i * 32);
            let name = bor.read_utf8(11)?;
            field_names.push(name.trim_end_matches('\0').to_string());
        }
        Ok(DbfSummary {
            num_records: num_records,
            field_names: field_names,
        })
    }
}
