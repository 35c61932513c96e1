//! Graph and spatial values
//!
//! `Node` and `Relationship` mirror what a Bolt driver hands back for graph
//! entities: labels (or a type), a property map, and an optional string
//! element id. `Point` is the spatial scalar and, unlike the graph entities,
//! is bindable as a parameter.

use super::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// SRID of the 2D cartesian coordinate reference system
pub const CARTESIAN_SRID: u32 = 7203;
/// SRID of the 2D WGS-84 geographic coordinate reference system
pub const WGS84_SRID: u32 = 4326;

/// A graph node as returned in result rows
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    pub labels: Vec<String>,
    pub properties: BTreeMap<String, Value>,
}

impl Node {
    pub fn new(labels: Vec<String>, properties: BTreeMap<String, Value>) -> Self {
        Node {
            element_id: None,
            labels,
            properties,
        }
    }

    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// A graph relationship as returned in result rows
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    /// Relationship type (e.g. "HAS_ORDER")
    pub rel_type: String,
    pub properties: BTreeMap<String, Value>,
}

impl Relationship {
    pub fn new(rel_type: impl Into<String>, properties: BTreeMap<String, Value>) -> Self {
        Relationship {
            element_id: None,
            rel_type: rel_type.into(),
            properties,
        }
    }

    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// A 2D or 3D point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub srid: u32,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Point {
    pub fn cartesian(x: f64, y: f64) -> Self {
        Point {
            srid: CARTESIAN_SRID,
            x,
            y,
            z: None,
        }
    }

    /// Geographic point; `x` is longitude and `y` latitude.
    pub fn wgs84(longitude: f64, latitude: f64) -> Self {
        Point {
            srid: WGS84_SRID,
            x: longitude,
            y: latitude,
            z: None,
        }
    }
}
