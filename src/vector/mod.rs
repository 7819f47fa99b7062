/*
This file is part of the OpenMap tools library.
Created: 14/10/2026
Last Modified: 17/10/2026
License: MIT
*/

/*
Only the ESRI Shapefile format is supported as an export target.
*/

// private sub-module defined in other files
pub mod shapefile;

// exports identifiers from private sub-modules in the current module namespace
pub use crate::vector::shapefile::attributes::*;
pub use crate::vector::shapefile::geometry::*;
pub use crate::vector::shapefile::{Shapefile, ShapefileError, ShapefileExporter};
