use lyon_path::math::Point;
use std::fmt::{Display, Error, Formatter};

/// The two points of a point set that lie furthest apart.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FurthestPair {
    pub first: Point,
    pub second: Point,
    pub first_index: usize,
    pub second_index: usize,
    pub squared_distance: f32,
}

impl FurthestPair {
    pub fn distance(&self) -> f32 {
        self.squared_distance.sqrt()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FurthestPairError {
    InsufficientPoints(usize),
    NoPairFound,
}

/// Finds the pair of points with the greatest separation by checking every
/// pair. When several pairs share the maximum, the first one scanned wins.
pub fn furthest_pair(points: &[Point]) -> Result<FurthestPair, FurthestPairError> {
    if points.len() < 2 {
        return Err(FurthestPairError::InsufficientPoints(points.len()));
    }

    let mut max_squared = 0f32;
    let mut max_pair = None;

    for (i, p) in points.iter().enumerate() {
        for (j, q) in points.iter().enumerate().skip(i + 1) {
            let squared = squared_distance(*p, *q);

            // strictly greater so earlier pairs keep ties
            if squared > max_squared {
                max_squared = squared;
                max_pair = Some((i, j));
            }
        }
    }

    let (first_index, second_index) = max_pair.ok_or(FurthestPairError::NoPairFound)?;

    Ok(FurthestPair {
        first: points[first_index],
        second: points[second_index],
        first_index,
        second_index,
        squared_distance: max_squared,
    })
}

fn squared_distance(p: Point, q: Point) -> f32 {
    let dx = p.x - q.x;
    let dy = p.y - q.y;
    dx * dx + dy * dy
}

impl Display for FurthestPairError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            FurthestPairError::InsufficientPoints(count) => f.write_fmt(format_args!(
                "Need at least two nodes to create a line, found {}",
                count
            )),
            FurthestPairError::NoPairFound => f.write_str("No two distinct nodes were found"),
        }
    }
}
