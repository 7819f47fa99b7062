/*
This file is part of the OpenMap tools library.
Created: 14/10/2026
Last Modified: 14/10/2026
License: MIT
*/
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic coordinate in decimal degrees, with lat and lon fields.
#[derive(Default, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct LatLonPoint {
    pub lat: f64,
    pub lon: f64,
}

impl fmt::Display for LatLonPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(lat: {}, lon: {})", self.lat, self.lon)
    }
}

impl LatLonPoint {
    /// Creates a new LatLonPoint.
    pub fn new(lat: f64, lon: f64) -> LatLonPoint {
        LatLonPoint { lat: lat, lon: lon }
    }

    /// Returns the point in shapefile axis order, i.e. (x = lon, y = lat).
    pub fn to_xy(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }

    /// Builds a point from shapefile axis order.
    pub fn from_xy(x: f64, y: f64) -> LatLonPoint {
        LatLonPoint { lat: y, lon: x }
    }
}

impl PartialEq for LatLonPoint {
    fn eq(&self, other: &Self) -> bool {
        self.lat == other.lat && self.lon == other.lon
    }
}
