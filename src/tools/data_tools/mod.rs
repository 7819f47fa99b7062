// private sub-module defined in other files
mod export_shapefile;
mod print_shapefile_info;

// exports identifiers from private sub-modules in the current module namespace
pub use self::export_shapefile::ExportShapefile;
pub use self::print_shapefile_info::PrintShapefileInfo;
