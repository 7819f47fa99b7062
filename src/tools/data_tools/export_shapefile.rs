/*
This tool is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 18/10/2026
License: MIT
*/

use crate::tools::*;
use crate::vector::shapefile::{
    AttributeField, AttributeTable, FieldData, GeometryList, ShapefileExporter,
};
use serde::Deserialize;
use std::fs;
use std::io::{Error, ErrorKind};
use std::time::Instant;

/// This tool writes a geometry list held in a JSON document to an ESRI
/// Shapefile. The document holds a `shape_type` (Point, PolyLine or Polygon),
/// an optional `extents` object and a `shapes` array. A shape is either an
/// array of `{"lat": .., "lon": ..}` coordinates or a multi-part object with
/// a `parts` array. Attribute `fields` and `records` are optional; without
/// them the .dbf holds a single ID column.
///
/// The .shp, .shx and .dbf files are written side by side. When a
/// `--projection` file is given its WKT is copied to a .prj file.
pub struct ExportShapefile {
    name: String,
    description: String,
    toolbox: String,
    parameters: Vec<ToolParameter>,
    example_usage: String,
}

#[derive(Deserialize)]
struct ExportDocument {
    #[serde(flatten)]
    geometry: GeometryList,
    #[serde(default)]
    fields: Vec<AttributeField>,
    #[serde(default)]
    records: Vec<Vec<FieldData>>,
}

impl ExportShapefile {
    pub fn new() -> ExportShapefile {
        // public constructor
        let name = "ExportShapefile".to_string();
        let toolbox = "Data Tools".to_string();
        let description = "Writes a JSON geometry list to a Shapefile.".to_string();

        let mut parameters = vec![];
        parameters.push(ToolParameter {
            name: "Input Geometry File".to_owned(),
            flags: vec!["-i".to_owned(), "--input".to_owned()],
            description: "Input JSON geometry list.".to_owned(),
            parameter_type: ParameterType::ExistingFile(ParameterFileType::Json),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Output Shapefile".to_owned(),
            flags: vec!["-o".to_owned(), "--output".to_owned()],
            description: "Output .shp file.".to_owned(),
            parameter_type: ParameterType::NewFile(ParameterFileType::Vector(VectorGeometryType::Any)),
            default_value: None,
            optional: false,
        });

        parameters.push(ToolParameter {
            name: "Projection File".to_owned(),
            flags: vec!["--projection".to_owned()],
            description: "Optional WKT file copied to the output .prj.".to_owned(),
            parameter_type: ParameterType::ExistingFile(ParameterFileType::Any),
            default_value: None,
            optional: true,
        });

        let usage = usage_string(&name, "-i=roads.json -o=roads.shp");

        ExportShapefile {
            name: name,
            description: description,
            toolbox: toolbox,
            parameters: parameters,
            example_usage: usage,
        }
    }
}

impl MapTool for ExportShapefile {
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
        let output_file = get_arg_value(&args, &["-o", "--output"]).ok_or_else(|| {
            Error::new(ErrorKind::InvalidInput, "An output file must be specified.")
        })?;
        let projection_file = get_arg_value(&args, &["--projection"]);

        if verbose {
            println!("***************{}", "*".repeat(self.get_tool_name().len()));
            println!("* Welcome to {} *", self.get_tool_name());
            println!("***************{}", "*".repeat(self.get_tool_name().len()));
        }

        let start = Instant::now();

        let input_file = resolve_path(&input_file, working_directory);
        let mut output_file = resolve_path(&output_file, working_directory);
        if !output_file.to_lowercase().ends_with(".shp") {
            output_file.push_str(".shp");
        }

        if verbose {
            println!("Reading data...")
        };
        let contents = fs::read_to_string(&input_file)?;
        let doc: ExportDocument = serde_json::from_str(&contents)
            .map_err(|e| Error::new(ErrorKind::InvalidData, format!("Error parsing {}: {}", input_file, e)))?;
        let mut list = doc.geometry;
        if !list.shape_type.is_writable() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("{} geometry cannot be exported; use Point, PolyLine or Polygon.", list.shape_type),
            ));
        }
        if list.extents.is_unset() {
            list.recompute_extents();
        }

        let attributes = if doc.fields.is_empty() {
            None
        } else {
            let mut table = AttributeTable::new(doc.fields);
            for rec in doc.records {
                table
                    .add_record(rec)
                    .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;
            }
            Some(table)
        };

        let mut exporter = ShapefileExporter::new();
        if let Some(prj) = projection_file {
            let wkt = fs::read_to_string(resolve_path(&prj, working_directory))?;
            exporter = exporter.with_projection(wkt.trim());
        }

        if verbose {
            println!("Saving data...")
        };
        let index = exporter
            .export(&output_file, &list, attributes.as_ref())
            .map_err(|e| Error::new(ErrorKind::InvalidData, e.to_string()))?;

        if verbose {
            println!("Records written: {}", index.len());
            println!("Output file length: {} words", index.file_length_words());
            println!("Elapsed Time: {:.3}s", start.elapsed().as_secs_f64());
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::ExportShapefile;
    use crate::tools::MapTool;
    use crate::vector::shapefile::{ShapeType, Shapefile};
    use std::fs;

    #[test]
    fn test_export_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let wd = format!("{}/", dir.path().display());
        let doc = r#"{
            "shape_type": "Polygon",
            "shapes": [
                [{"lat": 0.0, "lon": 0.0}, {"lat": 1.0, "lon": 0.0}, {"lat": 1.0, "lon": 1.0}, {"lat": 0.0, "lon": 0.0}],
                {"parts": [
                    [{"lat": 5.0, "lon": 5.0}, {"lat": 6.0, "lon": 5.0}, {"lat": 5.0, "lon": 5.0}],
                    [{"lat": 7.0, "lon": 7.0}, {"lat": 8.0, "lon": 7.0}, {"lat": 7.0, "lon": 7.0}]
                ]}
            ],
            "fields": [{"name": "NAME", "field_type": "Text", "field_length": 10}],
            "records": [["pond"], ["lake"]]
        }"#;
        fs::write(dir.path().join("water.json"), doc).unwrap();
        fs::write(dir.path().join("wgs84.wkt"), "GEOGCS[\"WGS 84\"]\n").unwrap();

        let args = vec![
            "-i=water.json".to_string(),
            "-o=water".to_string(),
            "--projection=wgs84.wkt".to_string(),
        ];
        ExportShapefile::new().run(args, &wd, false).unwrap();

        let sf = Shapefile::read(dir.path().join("water.shp")).unwrap();
        assert_eq!(sf.header.shape_type, ShapeType::Polygon);
        assert_eq!(sf.num_records(), 2);
        // extents were recomputed from the coordinates
        assert_eq!(sf.header.x_min, 0.0);
        assert_eq!(sf.header.y_max, 8.0);
        assert_eq!(sf.records[1].parts.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("water.prj")).unwrap(),
            "GEOGCS[\"WGS 84\"]"
        );
    }

    #[test]
    fn test_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let wd = format!("{}/", dir.path().display());
        fs::write(dir.path().join("bad.json"), r#"{"shape_type": "MultiPoint", "shapes": []}"#).unwrap();
        let tool = ExportShapefile::new();
        assert!(tool.run(vec![], &wd, false).is_err());
        assert!(tool
            .run(vec!["-i=bad.json".to_string(), "-o=bad.shp".to_string()], &wd, false)
            .is_err());
    }
}
