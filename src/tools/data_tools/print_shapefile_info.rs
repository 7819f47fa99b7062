/*
This tool is part of the OpenMap tools library.
Created: 18/10/2026
Last Modified: 18/10/2026
License: MIT
*/

use crate::tools::*;
use crate::vector::shapefile::{DbfSummary, Shapefile};
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::Path;

/// This tool prints the header of an ESRI Shapefile, along with a summary of
/// its index (.shx) file, to the standard output. When `--records` is given,
/// each record's number, part count, point count and bounding box are
/// printed as well.
pub struct PrintShapefileInfo {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

impl PrintShapefileInfo {
    pub fn new() -> PrintShapefileInfo {
        // public constructor
        let name = "PrintShapefileInfo".to_string();
        let toolbox = "Data Tools".to_string();
        let description = "Prints the header and records of a Shapefile.".to_string();

        let mut parameters = vec![];
        parameters.push(ToolParameter {
            name: "Input Shapefile".to_owned(),
            flags: vec!["-i".to_owned(), "--input".to_owned()],
            description: "Input .shp file.".to_owned(),
            parameter_type: ParameterType::ExistingFile(ParameterFileType::Vector(VectorGeometryType::Any)),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Print records?".to_owned(),
            flags: vec!["--records".to_owned()],
            description: "Print a line for every record.".to_owned(),
            parameter_type: ParameterType::Boolean,
            default_value: Some("false".to_owned()),
            optional: true,
        });

        let usage = usage_string(&name, "--input=roads.shp --records");

        PrintShapefileInfo {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }

    fn report(&self, sf: &Shapefile, dbf: Option<&DbfSummary>, print_records: bool) -> String {
        let mut s = format!("{}\n", sf.header);
        s.push_str(&format!("num_records: {}\n", sf.num_records()));
        if let (Some(first), Some(last)) = (sf.index.offsets.first(), sf.index.offsets.last()) {
            s.push_str(&format!("index offsets: {}..{} words\n", first, last));
        }
        if let Some(dbf) = dbf {
            s.push_str(&format!(
                "attributes: {} records, fields [{}]\n",
                dbf.num_records,
                dbf.field_names.join(", ")
            ));
        }
        if print_records {
            for rec in &sf.records {
                s.push_str(&format!(
                    "record {}: {} parts, {} points, extents {}\n",
                    rec.record_number,
                    rec.parts.len(),
                    rec.num_points(),
                    rec.extents
                ));
            }
        }
        s
    }
}

impl MapTool for PrintShapefileInfo {
    fn get_tool_name(&self) -> String {
        self.name.clone()
    }

    fn get_tool_description(&self) -> String {
        self.description.clone()
    }

    fn get_tool_parameters(&self) -> String {
        match serde_json::to_string(&self.parameters) {
            Ok(json_str) => format!("{{\"parameters\":{}}}", json_str),
            Err(err) => format!("{:?}", err),
        }
    }

    fn get_example_usage(&self) -> String {
        self.example_usage.clone()
    }

    fn get_toolbox(&self) -> String {
        self.toolbox.clone()
    }

    fn run<'a>(&self, args: Vec<String>, working_directory: &'a str, verbose: bool) -> Result<(), Error> {
        if args.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Tool run with no parameters.",
            ));
        }
        let input_file = get_arg_value(&args, &["-i", "--input"]).ok_or_else(|| {
            Error::new(ErrorKind::InvalidInput, "An input file must be specified.")
        })?;
        let print_records = has_flag(&args, &["--records"]);

        if verbose {
            println!("***************{}", "*".repeat(self.get_tool_name().len()));
            println!("* Welcome to {} *", self.get_tool_name());
            println!("***************{}", "*".repeat(self.get_tool_name().len()));
        }

        let input_file = resolve_path(&input_file, working_directory);

        // make sure that it is a shapefile
        if !input_file.to_lowercase().ends_with(".shp") {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "The input file must be a Shapefile (.shp).",
            ));
        }

        let sf = Shapefile::read(&input_file).map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
        let dbf_file = Path::new(&input_file).with_extension("dbf");
        let dbf = if dbf_file.exists() {
            Some(
                DbfSummary::from_bytes(fs::read(&dbf_file)?)
                    .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?,
            )
        } else {
            None
        };
        println!("{}", self.report(&sf, dbf.as_ref(), print_records));
        Ok(())
    }
}
