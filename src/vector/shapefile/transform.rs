/*
This file is part of the OpenMap tools library.
Created: 14/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use crate::structures::Extents;

/// A forward coordinate transform applied to every coordinate before it is
/// written, e.g. into a projected coordinate system.
pub trait CoordTransform {
    /// Maps a (lat, lon) pair in decimal degrees to output (x, y).
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64);
}

/// Projects (lat, lon) into shapefile (x, y), swapping axes when no
/// transform is supplied.
pub(crate) fn project(transform: Option<&dyn CoordTransform>, lat: f64, lon: f64) -> (f64, f64) {
    match transform {
        Some(t) => t.forward(lat, lon),
        None => (lon, lat),
    }
}

/// Axis-aligned bounds in output (x, y) space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XyBounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl XyBounds {
    /// Projects the two corners of an extent. The unset sentinel is widened
    /// to the full globe first, so it is never written verbatim.
    pub fn from_extents(extents: &Extents, transform: Option<&dyn CoordTransform>) -> XyBounds {
        let e = extents.or_full_globe();
        let (x1, y1) = project(transform, e.min_lat, e.min_lon);
        let (x2, y2) = project(transform, e.max_lat, e.max_lon);
        XyBounds {
            x_min: x1.min(x2),
            y_min: y1.min(y2),
            x_max: x1.max(x2),
            y_max: y1.max(y2),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{CoordTransform, XyBounds};
    use crate::structures::Extents;

    struct Scale(f64);

    impl CoordTransform for Scale {
        fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
            (lon * self.0, lat * self.0)
        }
    }

    #[test]
    fn test_unset_extents_become_full_globe() {
        let b = XyBounds::from_extents(&Extents::unset(), None);
        assert_eq!(
            b,
            XyBounds {
                x_min: -180.0,
                y_min: -90.0,
                x_max: 180.0,
                y_max: 90.0
            }
        );
    }

    #[test]
    fn test_transformed_corners() {
        let e = Extents::new(10.0, 20.0, 30.0, 40.0);
        let b = XyBounds::from_extents(&e, Some(&Scale(-2.0)));
        assert_eq!(b.x_min, -80.0);
        assert_eq!(b.x_max, -40.0);
        assert_eq!(b.y_min, -60.0);
        assert_eq!(b.y_max, -20.0);
    }
}
