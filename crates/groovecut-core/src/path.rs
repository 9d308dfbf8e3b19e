//! Engraving path model
//!
//! An [`EngravingPath`] is the ordered, append-only list of tool-tip positions
//! produced by the path sequencer. Once generation stops, the path is only
//! read by downstream consumers.

use crate::geometry::CylPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A tool-tip position in cylindrical coordinates.
pub type PathPoint = CylPoint;

/// Surface the groove is cut into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Helical groove along the outside of a cylinder
    #[default]
    Cylinder,
    /// Spiral groove on the flat face of a disc, running inwards
    Disc,
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cylinder => write!(f, "cylinder"),
            Self::Disc => write!(f, "disc"),
        }
    }
}

impl FromStr for SurfaceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cylinder" | "cyl" => Ok(Self::Cylinder),
            "disc" | "disk" => Ok(Self::Disc),
            _ => Err(format!("Unknown surface kind: {}", s)),
        }
    }
}

/// Ordered sequence of path points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngravingPath {
    points: Vec<PathPoint>,
}

impl EngravingPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point at the end of the path
    pub fn push(&mut self, point: PathPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PathPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PathPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathPoint> {
        self.points.iter()
    }
}

impl From<Vec<PathPoint>> for EngravingPath {
    fn from(points: Vec<PathPoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<PathPoint> for EngravingPath {
    fn from_iter<I: IntoIterator<Item = PathPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EngravingPath {
    type Item = &'a PathPoint;
    type IntoIter = std::slice::Iter<'a, PathPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
