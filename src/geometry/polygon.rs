use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Bbox, Point2};

/// Polygon outline as a flat `x0, y0, x1, y1, ...` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Polygon {
    coords: Vec<f64>,
}

impl Polygon {
    pub fn new(coords: Vec<f64>) -> Result<Self> {
        if coords.len() % 2 != 0 {
            return Err(Error::Geometry(format!(
                "polygon has an odd number of coordinates ({})",
                coords.len()
            )));
        }
        Ok(Self { coords })
    }

    /// Four-vertex polygon tracing `bbox` clockwise from its top-left corner.
    pub fn from_bbox(bbox: &Bbox) -> Self {
        let [x1, y1, x2, y2] = bbox.x1y1x2y2();
        Self {
            coords: vec![x1, y1, x2, y1, x2, y2, x1, y2],
        }
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|v| v.is_finite())
    }

    pub fn points(&self) -> impl Iterator<Item = Point2> + '_ {
        self.coords.chunks_exact(2).map(|c| Point2::new(c[0], c[1]))
    }

    pub fn scale(&mut self, factor: f64) -> &mut Self {
        self.coords.iter_mut().for_each(|c| *c *= factor);
        self
    }

    /// Mean of the vertices.
    pub fn centroid(&self) -> Option<Point2> {
        let n = self.coords.len() / 2;
        if n == 0 {
            return None;
        }
        let (sx, sy) = self
            .points()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point2::new(sx / n as f64, sy / n as f64))
    }
}

impl TryFrom<Vec<f64>> for Polygon {
    type Error = Error;

    fn try_from(coords: Vec<f64>) -> Result<Self> {
        Polygon::new(coords)
    }
}

impl From<Polygon> for Vec<f64> {
    fn from(polygon: Polygon) -> Self {
        polygon.coords
    }
}
