//! The fixed two-axis phase-space point.
//!
//! Per the design notes, the source's open string-keyed mapping from
//! axis-name to real is replaced with a closed `{x, v}` record: the entire
//! system only ever uses those two keys, so this eliminates the
//! key-missing/mismatched class of bug outright. Because the key set is now
//! always identical by construction, the "take the intersection, empty means
//! no evidence" fallback described for confidence updates is unreachable
//! here; the confidence update simply averages over both axes.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub x: f64,
    pub v: f64,
}

impl Add for Axis {
    type Output = Axis;
    fn add(self, rhs: Axis) -> Axis {
        Axis::new(self.x + rhs.x, self.v + rhs.v)
    }
}

impl AddAssign for Axis {
    fn add_assign(&mut self, rhs: Axis) {
        self.x += rhs.x;
        self.v += rhs.v;
    }
}

impl Sub for Axis {
    type Output = Axis;
    fn sub(self, rhs: Axis) -> Axis {
        Axis::new(self.x - rhs.x, self.v - rhs.v)
    }
}

impl Mul<f64> for Axis {
    type Output = Axis;
    fn mul(self, scalar: f64) -> Axis {
        Axis::new(self.x * scalar, self.v * scalar)
    }
}

impl Div<f64> for Axis {
    type Output = Axis;
    fn div(self, scalar: f64) -> Axis {
        Axis::new(self.x / scalar, self.v / scalar)
    }
}

impl Axis {
    pub fn new(x: f64, v: f64) -> Self {
        Axis { x, v }
    }

    pub fn distance_to(&self, other: &Axis) -> f64 {
        let dx = self.x - other.x;
        let dv = self.v - other.v;
        (dx * dx + dv * dv).sqrt()
    }

    /// Mean absolute error across both axes, used by the confidence EMA update.
    pub fn mean_abs_error(&self, other: &Axis) -> f64 {
        ((self.x - other.x).abs() + (self.v - other.v).abs()) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Axis::new(0.0, 0.0);
        let b = Axis::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn default_is_origin() {
        assert_eq!(Axis::default(), Axis::new(0.0, 0.0));
    }

    #[test]
    fn arithmetic_is_elementwise() {
        let a = Axis::new(1.0, 2.0);
        let b = Axis::new(3.0, 4.0);
        assert_eq!(a + b, Axis::new(4.0, 6.0));
        assert_eq!(b - a, Axis::new(2.0, 2.0));
        assert_eq!(a * 2.0, Axis::new(2.0, 4.0));
        assert_eq!(b / 2.0, Axis::new(1.5, 2.0));
    }
}
