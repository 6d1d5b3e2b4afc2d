/// A closed range of values along one axis.
///
/// Bounds built with [`Bound::new`] are always ordered (`min <= max`), so
/// callers that compute a range from a center and radius may pass the pair in
/// either order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    /// Create a bound from two endpoints in any order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Returns the size of the bound (max - min).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if x is within [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within (min, max).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Returns true if the two bounds share at least one value.
    pub fn overlaps(&self, other: &Bound) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Expands the bound by delta/2 on each side.
    pub fn expand(&self, delta: f64) -> Bound {
        let padding = delta / 2.0;
        Bound {
            min: self.min - padding,
            max: self.max + padding,
        }
    }

    /// Creates a bound that surrounds two other bounds.
    pub fn surrounding(a: &Bound, b: &Bound) -> Bound {
        Bound {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// An empty bound (min > max, contains nothing).
    pub const EMPTY: Bound = Bound {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_normalizes_order() {
        let bound = Bound::new(3.0, -1.0);
        assert_eq!(bound.min, -1.0);
        assert_eq!(bound.max, 3.0);
        assert_eq!(bound.size(), 4.0);
    }

    #[test]
    fn test_bound_contains() {
        let bound = Bound::new(0.0, 10.0);

        assert!(bound.contains(0.0));
        assert!(bound.contains(10.0));
        assert!(!bound.contains(-0.1));
        assert!(!bound.contains(10.1));

        assert!(!bound.surrounds(0.0));
        assert!(bound.surrounds(5.0));
    }

    #[test]
    fn test_bound_overlaps() {
        let a = Bound::new(0.0, 5.0);
        assert!(a.overlaps(&Bound::new(5.0, 6.0)));
        assert!(a.overlaps(&Bound::new(-1.0, 1.0)));
        assert!(!a.overlaps(&Bound::new(5.1, 6.0)));
    }

    #[test]
    fn test_bound_empty() {
        let empty = Bound::EMPTY;
        assert!(empty.min > empty.max);
        assert!(!empty.contains(0.0));

        let merged = Bound::surrounding(&empty, &Bound::new(1.0, 2.0));
        assert_eq!(merged, Bound::new(1.0, 2.0));
    }

    #[test]
    fn test_bound_expand() {
        let expanded = Bound::new(0.0, 10.0).expand(4.0);
        assert_eq!(expanded.min, -2.0);
        assert_eq!(expanded.max, 12.0);
    }
}
