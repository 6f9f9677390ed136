// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::{Error, Result};

/// An inclusive range of positions along one axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min: f64,
    max: f64,
}
impl Bounds {
    /// Fails if `min` is greater than `max`, or if either is NaN.
    pub fn new_with(min: f64, max: f64) -> Result<Self> {
        if min <= max {
            Ok(Self { min, max })
        } else {
            Err(Error::InvalidConfiguration(format!(
                "bounds minimum {min} is greater than maximum {max}"
            )))
        }
    }

    // For compile-time constants that are known to be ordered.
    pub(crate) const fn from_raw(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, position: f64) -> bool {
        self.min <= position && position <= self.max
    }

    pub fn is_out_of_bounds(&self, position: f64) -> bool {
        !self.contains(position)
    }

    /// Returns these bounds shrunk by `margin` on each side. This is the
    /// travel envelope the planner actually uses.
    pub fn inset(&self, margin: f64) -> Result<Self> {
        Self::new_with(self.min + margin, self.max - margin).map_err(|_| {
            Error::InvalidConfiguration(format!(
                "safety margin {margin} leaves no room inside [{}, {}]",
                self.min, self.max
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_mainline() {
        let b = Bounds::new_with(0.0, 190.0).unwrap();
        assert!(b.contains(0.0), "min should be inclusive");
        assert!(b.contains(190.0), "max should be inclusive");
        assert!(b.contains(95.0));
        assert!(b.is_out_of_bounds(-0.001));
        assert!(b.is_out_of_bounds(190.001));
    }

    #[test]
    fn bounds_degenerate_range_is_allowed() {
        let b = Bounds::new_with(5.0, 5.0).unwrap();
        assert!(b.contains(5.0));
        assert!(b.is_out_of_bounds(5.1));
    }

    #[test]
    fn bounds_rejects_inverted_range() {
        assert!(matches!(
            Bounds::new_with(10.0, 0.0),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(Bounds::new_with(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn bounds_inset() {
        let b = Bounds::new_with(0.0, 190.0).unwrap().inset(10.0).unwrap();
        assert_eq!(b.min(), 10.0);
        assert_eq!(b.max(), 180.0);

        assert!(
            Bounds::new_with(0.0, 10.0).unwrap().inset(6.0).is_err(),
            "a margin wider than half the range should be rejected"
        );
    }
}
