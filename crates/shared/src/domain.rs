use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Smallest vertex count the host accepts for a polygon boundary.
pub const MIN_VERTICES: usize = 3;

macro_rules! string_id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id_newtype!(PolygonId);

/// A polygon vertex, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f64, pub f64);

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self(x, y)
    }
}

/// Cursor position or scroll delta carried by host events, serialized as `{x, y}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered polygon boundary with at least [`MIN_VERTICES`] finite points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Vertices(Vec<Point>);

impl Vertices {
    pub fn into_inner(self) -> Vec<Point> {
        self.0
    }
}

impl TryFrom<Vec<Point>> for Vertices {
    type Error = ProtocolError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        if points.len() < MIN_VERTICES {
            return Err(ProtocolError::PointsNotEnough(points.len()));
        }
        if let Some(index) = points
            .iter()
            .position(|Point(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(ProtocolError::NonFinitePoint(index));
        }
        Ok(Self(points))
    }
}
