use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{Bbox, Point2};

/// Keypoints stored as a flat `x, y, v` list, where `v` is the visibility.
///
/// A keypoint with `v <= 0` is not labelled and yields no anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Keypoints {
    coords: Vec<f64>,
}

impl Keypoints {
    pub fn new(coords: Vec<f64>) -> Result<Self> {
        if coords.len() % 3 != 0 {
            return Err(Error::Geometry(format!(
                "keypoints length {} is not a multiple of 3",
                coords.len()
            )));
        }
        Ok(Self { coords })
    }

    /// Number of keypoints, visible or not.
    pub fn len(&self) -> usize {
        self.coords.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|v| v.is_finite())
    }

    /// Iterate over `(position, visibility)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point2, f64)> + '_ {
        self.coords
            .chunks_exact(3)
            .map(|c| (Point2::new(c[0], c[1]), c[2]))
    }

    pub fn position(&self, i: usize) -> Option<Point2> {
        self.coords
            .get(3 * i..3 * i + 2)
            .map(|c| Point2::new(c[0], c[1]))
    }

    /// Move keypoint `i` to `p`, keeping its visibility.
    pub fn set_position(&mut self, i: usize, p: Point2) -> Result<()> {
        let len = self.len();
        match self.coords.get_mut(3 * i..3 * i + 2) {
            Some(c) => {
                c[0] = p.x;
                c[1] = p.y;
                Ok(())
            }
            None => Err(Error::Geometry(format!(
                "keypoint {i} out of range ({len} keypoints)"
            ))),
        }
    }

    /// Scale positions by `factor`; visibilities are left alone.
    pub fn scale(&mut self, factor: f64) -> &mut Self {
        for c in self.coords.chunks_exact_mut(3) {
            c[0] *= factor;
            c[1] *= factor;
        }
        self
    }

    /// Anchors for visible keypoints: squares of half-side `factor`, keyed by
    /// keypoint index.
    pub fn anchors(&self, factor: f64) -> Vec<(usize, Bbox)> {
        self.iter()
            .enumerate()
            .filter(|(_, (_, v))| *v > 0.0)
            .map(|(i, (p, _))| {
                (
                    i,
                    Bbox::from_x1y1x2y2(p.x - factor, p.y - factor, p.x + factor, p.y + factor),
                )
            })
            .collect()
    }

    /// Mean of the visible keypoints.
    pub fn centroid(&self) -> Option<Point2> {
        let visible: Vec<Point2> = self
            .iter()
            .filter(|(_, v)| *v > 0.0)
            .map(|(p, _)| p)
            .collect();
        if visible.is_empty() {
            return None;
        }
        let n = visible.len() as f64;
        let (sx, sy) = visible
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point2::new(sx / n, sy / n))
    }
}

impl TryFrom<Vec<f64>> for Keypoints {
    type Error = Error;

    fn try_from(coords: Vec<f64>) -> Result<Self> {
        Keypoints::new(coords)
    }
}

impl From<Keypoints> for Vec<f64> {
    fn from(keypoints: Keypoints) -> Self {
        keypoints.coords
    }
}
