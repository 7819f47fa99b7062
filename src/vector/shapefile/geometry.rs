/*
This file is part of the OpenMap tools library.
Created: 14/10/2026
Last Modified: 17/10/2026
License: MIT
*/
use super::ShapefileError;
use crate::structures::{Extents, LatLonPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A list of geometries that all share one ESRI shape type.
///
/// Coordinates are held in (lat, lon) order; the writers swap them into
/// shapefile (x, y) order on the way out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeometryList {
    pub shape_type: ShapeType,
    #[serde(default)]
    pub extents: Extents,
    #[serde(default)]
    pub shapes: Vec<EsriShape>,
}

impl GeometryList {
    pub fn new(shape_type: ShapeType) -> GeometryList {
        GeometryList {
            shape_type: shape_type,
            extents: Extents::unset(),
            shapes: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Adds a single point record.
    pub fn add_point(&mut self, p: LatLonPoint) {
        self.extents.add(&p);
        self.shapes.push(EsriShape::Single(vec![p]));
    }

    /// Adds a single-part polyline or polygon record.
    pub fn add_part(&mut self, points: Vec<LatLonPoint>) {
        for p in &points {
            self.extents.add(p);
        }
        self.shapes.push(EsriShape::Single(points));
    }

    /// Adds a multi-part record. The sub-shape gets its own extents.
    pub fn add_multi_part(&mut self, parts: Vec<Vec<LatLonPoint>>) {
        let mut extents = Extents::unset();
        for part in &parts {
            for p in part {
                extents.add(p);
            }
        }
        self.extents.expand_to(&extents);
        self.shapes.push(EsriShape::Multi(MultiPart {
            parts: parts,
            extents: extents,
        }));
    }

    /// Rebuilds the list extents from the coordinates it holds. Lists loaded
    /// from a document without an explicit extent start out unset. Multi-part
    /// records with unset extents get theirs filled in too.
    pub fn recompute_extents(&mut self) {
        let mut extents = Extents::unset();
        for shape in self.shapes.iter_mut() {
            if let EsriShape::Multi(multi) = shape {
                if multi.extents.is_unset() {
                    for part in &multi.parts {
                        for p in part {
                            multi.extents.add(p);
                        }
                    }
                }
            }
        }
        for shape in &self.shapes {
            for part in shape.parts() {
                for p in part {
                    extents.add(p);
                }
            }
        }
        self.extents = extents;
    }

    /// Point lists must hold exactly one coordinate per record.
    pub(crate) fn check_points(&self) -> Result<(), ShapefileError> {
        for (i, shape) in self.shapes.iter().enumerate() {
            match shape {
                EsriShape::Single(points) if points.len() == 1 => {}
                _ => {
                    return Err(ShapefileError::InvalidGeometry(format!(
                        "record {} of a Point list holds {} coordinates, expected 1",
                        i + 1,
                        shape.num_points()
                    )))
                }
            }
        }
        Ok(())
    }
}

/// One record: either a single ordered sequence of coordinates or a
/// multi-part shape with its own extents.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EsriShape {
    Single(Vec<LatLonPoint>),
    Multi(MultiPart),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultiPart {
    pub parts: Vec<Vec<LatLonPoint>>,
    #[serde(default)]
    pub extents: Extents,
}

impl EsriShape {
    pub fn parts(&self) -> Vec<&[LatLonPoint]> {
        match self {
            EsriShape::Single(points) => vec![&points[..]],
            EsriShape::Multi(mp) => mp.parts.iter().map(|p| &p[..]).collect(),
        }
    }

    pub fn num_parts(&self) -> usize {
        match self {
            EsriShape::Single(_) => 1,
            EsriShape::Multi(mp) => mp.parts.len(),
        }
    }

    pub fn num_points(&self) -> usize {
        match self {
            EsriShape::Single(points) => points.len(),
            EsriShape::Multi(mp) => mp.parts.iter().map(|p| p.len()).sum(),
        }
    }

    /// The extents written into the record's bounding box. Single parts are
    /// measured from their coordinates; multi-part shapes use their declared
    /// extents, with the unset sentinel widened to the full globe.
    pub fn record_extents(&self) -> Extents {
        match self {
            EsriShape::Single(points) => Extents::from_points(points).or_full_globe(),
            EsriShape::Multi(mp) => mp.extents.or_full_globe(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ShapeType {
    Null = 0,
    Point = 1,
    PolyLine = 3,
    Polygon = 5,
    MultiPoint = 8,
    PointZ = 11,
    PolyLineZ = 13,
    PolygonZ = 15,
    MultiPointZ = 18,
    PointM = 21,
    PolyLineM = 23,
    PolygonM = 25,
    MultiPointM = 28,
    MultiPatch = 31,
}

impl ShapeType {
    pub fn from_int(value: i32) -> Result<ShapeType, ShapefileError> {
        match value {
            0 => Ok(ShapeType::Null),
            1 => Ok(ShapeType::Point),
            3 => Ok(ShapeType::PolyLine),
            5 => Ok(ShapeType::Polygon),
            8 => Ok(ShapeType::MultiPoint),
            11 => Ok(ShapeType::PointZ),
            13 => Ok(ShapeType::PolyLineZ),
            15 => Ok(ShapeType::PolygonZ),
            18 => Ok(ShapeType::MultiPointZ),
            21 => Ok(ShapeType::PointM),
            23 => Ok(ShapeType::PolyLineM),
            25 => Ok(ShapeType::PolygonM),
            28 => Ok(ShapeType::MultiPointM),
            31 => Ok(ShapeType::MultiPatch),
            _ => Err(ShapefileError::UnknownShapeType(value)),
        }
    }

    pub fn to_int(&self) -> i32 {
        *self as i32
    }

    /// Whether this crate knows how to emit records of this type.
    pub fn is_writable(&self) -> bool {
        match self {
            ShapeType::Point | ShapeType::PolyLine | ShapeType::Polygon => true,
            _ => false,
        }
    }
}

impl Default for ShapeType {
    fn default() -> ShapeType {
        ShapeType::Null
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ShapeType::Null => "Null",
            ShapeType::Point => "Point",
            ShapeType::PolyLine => "PolyLine",
            ShapeType::Polygon => "Polygon",
            ShapeType::MultiPoint => "MultiPoint",
            ShapeType::PointZ => "PointZ",
            ShapeType::PolyLineZ => "PolyLineZ",
            ShapeType::PolygonZ => "PolygonZ",
            ShapeType::MultiPointZ => "MultiPointZ",
            ShapeType::PointM => "PointM",
            ShapeType::PolyLineM => "PolyLineM",
            ShapeType::PolygonM => "PolygonM",
            ShapeType::MultiPointM => "MultiPointM",
            ShapeType::MultiPatch => "MultiPatch",
        };
        write!(f, "{}", printable)
    }
}
