// private sub-module defined in other files
mod extents;
mod lat_lon_point;

// exports identifiers from private sub-modules in the current module namespace
pub use self::extents::Extents;
pub use self::lat_lon_point::LatLonPoint;
