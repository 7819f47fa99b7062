/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 18/10/2026
License: MIT
*/
pub mod data_tools;

use serde::{Deserialize, Serialize};
use std::io::{Error, ErrorKind};

#[derive(Default)]
pub struct ToolManager {
    pub working_dir: String,
    pub verbose: bool,
    tool_names: Vec<String>,
}

impl ToolManager {
    pub fn new<'a>(working_directory: &'a str, verbose_mode: &'a bool) -> Result<ToolManager, Error> {
        let mut tool_names = vec![];
        // data_tools
        tool_names.push("ExportShapefile".to_string());
        tool_names.push("PrintShapefileInfo".to_string());

        tool_names.sort();

        let tm = ToolManager {
            working_dir: working_directory.to_string(),
            verbose: *verbose_mode,
            tool_names: tool_names,
        };
        Ok(tm)
    }

    fn get_tool(&self, tool_name: &str) -> Option<Box<dyn MapTool + 'static>> {
        match tool_name.to_lowercase().replace("_", "").as_ref() {
            // data_tools
            "exportshapefile" => Some(Box::new(data_tools::ExportShapefile::new())),
            "printshapefileinfo" => Some(Box::new(data_tools::PrintShapefileInfo::new())),

            _ => None,
        }
    }

    pub fn run_tool(&self, tool_name: String, args: Vec<String>) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => tool.run(args, &self.working_dir, self.verbose),
            None => Err(Error::new(
                ErrorKind::NotFound,
                format!("Unrecognized tool name {}.", tool_name),
            )),
        }
    }

    pub fn tool_help(&self, tool_name: String) -> Result<(), Error> {
        if !tool_name.is_empty() {
            match self.get_tool(tool_name.as_ref()) {
                Some(tool) => println!("{}", get_help(tool)),
                None => {
                    return Err(Error::new(
                        ErrorKind::NotFound,
                        format!("Unrecognized tool name {}.", tool_name),
                    ))
                }
            }
        } else {
            let mut i = 1;
            for val in &self.tool_names {
                if let Some(tool) = self.get_tool(val) {
                    println!("{}. {}\n", i, get_help(tool));
                    i += 1;
                }
            }
        }
        Ok(())
    }

    pub fn tool_parameters(&self, tool_name: String) -> Result<(), Error> {
        match self.get_tool(tool_name.as_ref()) {
            Some(tool) => println!("{}", tool.get_tool_parameters()),
            None => {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    format!("Unrecognized tool name {}.", tool_name),
                ))
            }
        }
        Ok(())
    }

    pub fn list_tools(&self) {
        let mut tool_details: Vec<(String, String)> = Vec::new();

        for val in &self.tool_names {
            if let Some(tool) = self.get_tool(val) {
                tool_details.push((tool.get_tool_name(), tool.get_tool_description()));
            }
        }

        let mut ret = format!("All {} Available Tools:\n", tool_details.len());
        for (name, description) in &tool_details {
            ret.push_str(&format!("{}: {}\n\n", name, description));
        }
        println!("{}", ret);
    }
}

pub trait MapTool {
    fn get_tool_name(&self) -> String;
    fn get_tool_description(&self) -> String;
    fn get_tool_parameters(&self) -> String;
    fn get_example_usage(&self) -> String;
    fn get_toolbox(&self) -> String;
    fn run<'a>(&self, args: Vec<String>, working_directory: &'a str, verbose: bool) -> Result<(), Error>;
}

fn get_help<'a>(wt: Box<dyn MapTool + 'a>) -> String {
    let tool_name = wt.get_tool_name();
    let description = wt.get_tool_description();
    let toolbox = wt.get_toolbox();
    let parameters: serde_json::Value =
        serde_json::from_str(&wt.get_tool_parameters()).unwrap_or(serde_json::Value::Null);
    let mut p = String::new();
    p.push_str("Flag               Description\n");
    p.push_str("-----------------  -----------\n");
    if let Some(a) = parameters["parameters"].as_array() {
        for d in a {
            let flags = d["flags"]
                .as_array()
                .map(|f| f.iter().filter_map(|v| v.as_str()).collect::<Vec<&str>>().join(", "))
                .unwrap_or_default();
            p.push_str(&format!(
                "{:width$} {}\n",
                flags,
                d["description"].as_str().unwrap_or(""),
                width = 18
            ));
        }
    }
    format!(
        "{}
Description:\n{}
Toolbox: {}
Parameters:\n
{}

Example usage:
{}
",
        tool_name,
        description,
        toolbox,
        p,
        wt.get_example_usage()
    )
}

/// Resolves a bare file name against the working directory.
pub(crate) fn resolve_path(file_name: &str, working_directory: &str) -> String {
    let sep = std::path::MAIN_SEPARATOR.to_string();
    if !file_name.contains(&sep) && !file_name.contains('/') {
        format!("{}{}", working_directory, file_name)
    } else {
        file_name.to_string()
    }
}

/// Splits `--flag=value` and `--flag value` style arguments, returning the
/// value for any of `flags`.
pub(crate) fn get_arg_value(args: &[String], flags: &[&str]) -> Option<String> {
    for i in 0..args.len() {
        let arg = args[i].replace('\"', "").replace('\'', "");
        let vec = arg.splitn(2, '=').collect::<Vec<&str>>();
        if flags.contains(&vec[0].to_lowercase().as_str()) {
            if vec.len() > 1 {
                return Some(vec[1].to_string());
            } else if i + 1 < args.len() {
                return Some(args[i + 1].replace('\"', "").replace('\'', ""));
            }
        }
    }
    None
}

/// True when a boolean flag is present, either bare or as `--flag=true`.
pub(crate) fn has_flag(args: &[String], flags: &[&str]) -> bool {
    args.iter().any(|arg| {
        let arg = arg.replace('\"', "").replace('\'', "").to_lowercase();
        let vec = arg.splitn(2, '=').collect::<Vec<&str>>();
        flags.contains(&vec[0]) && (vec.len() == 1 || vec[1] == "true")
    })
}

pub(crate) fn usage_string(tool_name: &str, rest: &str) -> String {
    let sep: String = std::path::MAIN_SEPARATOR.to_string();
    format!(
        ">>.*openmap_tools -r={} -v --wd=\"*path*to*data*\" {}",
        tool_name, rest
    )
    .replace('*', &sep)
}

#[derive(Serialize, Deserialize, Debug)]
struct ToolParameter {
    name: String,
    flags: Vec<String>,
    description: String,
    parameter_type: ParameterType,
    default_value: Option<String>,
    optional: bool,
}

#[derive(Serialize, Deserialize, Debug)]
enum ParameterType {
    Boolean,
    ExistingFile(ParameterFileType),
    NewFile(ParameterFileType),
}

#[derive(Serialize, Deserialize, Debug)]
enum ParameterFileType {
    Any,
    Json,
    Vector(VectorGeometryType),
}

#[derive(Serialize, Deserialize, Debug)]
enum VectorGeometryType {
    Any,
}
