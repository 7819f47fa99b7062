/*
This file is part of the OpenMap tools library.
Created: 14/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use super::LatLonPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic extents in decimal degrees.
///
/// A freshly created `Extents` holds the inverted sentinel
/// `(min_lat: 90, min_lon: 180, max_lat: -90, max_lon: -180)` so that the
/// first point added collapses it onto that point. Writers must never emit
/// the sentinel; use `or_full_globe` when an unset box may reach the wire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Default for Extents {
    fn default() -> Extents {
        Extents::unset()
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "(lat {} to {}, lon {} to {})",
            self.min_lat, self.max_lat, self.min_lon, self.max_lon
        )
    }
}

impl Extents {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Extents {
        let (lat1, lat2) = if min_lat < max_lat {
            (min_lat, max_lat)
        } else {
            (max_lat, min_lat)
        };
        let (lon1, lon2) = if min_lon < max_lon {
            (min_lon, max_lon)
        } else {
            (max_lon, min_lon)
        };
        Extents {
            min_lat: lat1,
            min_lon: lon1,
            max_lat: lat2,
            max_lon: lon2,
        }
    }

    /// The uninitialized sentinel.
    pub fn unset() -> Extents {
        Extents {
            min_lat: 90f64,
            min_lon: 180f64,
            max_lat: -90f64,
            max_lon: -180f64,
        }
    }

    pub fn full_globe() -> Extents {
        Extents {
            min_lat: -90f64,
            min_lon: -180f64,
            max_lat: 90f64,
            max_lon: 180f64,
        }
    }

    /// True only for the exact sentinel values.
    pub fn is_unset(&self) -> bool {
        self.min_lat == 90f64
            && self.min_lon == 180f64
            && self.max_lat == -90f64
            && self.max_lon == -180f64
    }

    /// Returns the full-globe extent in place of the sentinel.
    pub fn or_full_globe(&self) -> Extents {
        if self.is_unset() {
            Extents::full_globe()
        } else {
            *self
        }
    }

    pub fn add(&mut self, p: &LatLonPoint) {
        if p.lat < self.min_lat {
            self.min_lat = p.lat;
        }
        if p.lat > self.max_lat {
            self.max_lat = p.lat;
        }
        if p.lon < self.min_lon {
            self.min_lon = p.lon;
        }
        if p.lon > self.max_lon {
            self.max_lon = p.lon;
        }
    }

    pub fn expand_to(&mut self, other: &Extents) {
        if other.is_unset() {
            return;
        }
        self.add(&LatLonPoint::new(other.min_lat, other.min_lon));
        self.add(&LatLonPoint::new(other.max_lat, other.max_lon));
    }

    pub fn from_points(points: &[LatLonPoint]) -> Extents {
        let mut e = Extents::unset();
        for p in points {
            e.add(p);
        }
        e
    }

    pub fn get_height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn get_width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn contains(&self, p: &LatLonPoint) -> bool {
        !(self.max_lat < p.lat || self.max_lon < p.lon || self.min_lat > p.lat || self.min_lon > p.lon)
    }
}

#[cfg(test)]
mod test {
    use super::Extents;
    use crate::structures::LatLonPoint;

    #[test]
    fn test_sentinel_substitution() {
        let e = Extents::default();
        assert!(e.is_unset());
        assert_eq!(e.or_full_globe(), Extents::full_globe());
    }

    #[test]
    fn test_first_point_collapses_sentinel() {
        let mut e = Extents::unset();
        e.add(&LatLonPoint::new(10.0, 20.0));
        assert!(!e.is_unset());
        assert_eq!(e, Extents::new(10.0, 20.0, 10.0, 20.0));
        e.add(&LatLonPoint::new(-5.0, 30.0));
        assert_eq!(e.get_height(), 15.0);
        assert_eq!(e.get_width(), 10.0);
        assert!(e.contains(&LatLonPoint::new(0.0, 25.0)));
    }

    #[test]
    fn test_expand_ignores_unset() {
        let mut e = Extents::new(0.0, 0.0, 1.0, 1.0);
        e.expand_to(&Extents::unset());
        assert_eq!(e, Extents::new(0.0, 0.0, 1.0, 1.0));
        e.expand_to(&Extents::new(-1.0, -2.0, 0.5, 3.0));
        assert_eq!(e, Extents::new(-1.0, -2.0, 1.0, 3.0));
    }
}
