use crate::{Bound, DVec3, Ray};

/// One of the three coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along this axis.
    pub fn unit(self) -> DVec3 {
        match self {
            Axis::X => DVec3::X,
            Axis::Y => DVec3::Y,
            Axis::Z => DVec3::Z,
        }
    }

    /// The coordinate of `v` along this axis.
    #[inline]
    pub fn component(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// The two remaining axes, in X, Y, Z order.
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// Axis-aligned bounding box, stored as one [`Bound`] per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingBox {
    pub x: Bound,
    pub y: Bound,
    pub z: Bound,
}

impl BoundingBox {
    /// Create a box from three per-axis bounds.
    ///
    /// Each bound is re-ordered so that `min <= max`, whatever order the
    /// caller computed it in.
    pub fn new(x: Bound, y: Bound, z: Bound) -> Self {
        Self {
            x: Bound::new(x.min, x.max),
            y: Bound::new(y.min, y.max),
            z: Bound::new(z.min, z.max),
        }
    }

    /// Create a box from two corner points.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        Self {
            x: Bound::new(a.x, b.x),
            y: Bound::new(a.y, b.y),
            z: Bound::new(a.z, b.z),
        }
    }

    /// The minimum corner.
    pub fn min(&self) -> DVec3 {
        DVec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// The maximum corner.
    pub fn max(&self) -> DVec3 {
        DVec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Get the bound for a specific axis.
    pub fn bound(&self, axis: Axis) -> Bound {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    fn bound_mut(&mut self, axis: Axis) -> &mut Bound {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Smallest box enclosing both `self` and `other`.
    pub fn enclose(&self, other: &BoundingBox) -> BoundingBox {
        Self {
            x: Bound::surrounding(&self.x, &other.x),
            y: Bound::surrounding(&self.y, &other.y),
            z: Bound::surrounding(&self.z, &other.z),
        }
    }

    /// Grow each axis by `delta` (half on each side).
    pub fn expand(&self, delta: f64) -> BoundingBox {
        Self {
            x: self.x.expand(delta),
            y: self.y.expand(delta),
            z: self.z.expand(delta),
        }
    }

    pub fn is_within(&self, axis: Axis, value: f64) -> bool {
        self.bound(axis).contains(value)
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: DVec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// True if the two boxes share any volume, faces included.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.x.overlaps(&other.x) && self.y.overlaps(&other.y) && self.z.overlaps(&other.z)
    }

    /// Total area of the six faces.
    pub fn surface_area(&self) -> f64 {
        let (hx, hy, hz) = (self.x.size(), self.y.size(), self.z.size());
        2.0 * (hx * hy + hx * hz + hy * hz)
    }

    /// True when every axis is ordered and finite.
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|b| b.min <= b.max && b.min.is_finite() && b.max.is_finite())
    }

    /// True when some axis contains nothing.
    pub fn is_empty(&self) -> bool {
        self.x.min > self.x.max || self.y.min > self.y.max || self.z.min > self.z.max
    }

    /// Cut the box by the plane perpendicular to `axis` at `coordinate`.
    ///
    /// Returns `(lower, upper)`; the lower box keeps this box's minimum on
    /// that axis.
    pub fn split(&self, axis: Axis, coordinate: f64) -> (BoundingBox, BoundingBox) {
        let mut lower = *self;
        let mut upper = *self;
        lower.bound_mut(axis).max = coordinate;
        upper.bound_mut(axis).min = coordinate;
        (lower, upper)
    }

    /// Ray-box test used by the KD-tree.
    ///
    /// A ray starting inside the box always intersects it. Otherwise the ray
    /// is intersected with each of the six face planes and accepted if the
    /// crossing point lies within the face's other two ranges.
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        if self.contains_point(ray.origin) {
            return true;
        }

        for axis in Axis::ALL {
            let (a, b) = axis.others();
            let bound = self.bound(axis);
            for coordinate in [bound.min, bound.max] {
                if let Some(p) = plane_crossing(ray, axis, coordinate) {
                    if self.is_within(a, a.component(p)) && self.is_within(b, b.component(p)) {
                        return true;
                    }
                }
            }
        }

        false
    }

    pub const EMPTY: BoundingBox = BoundingBox {
        x: Bound::EMPTY,
        y: Bound::EMPTY,
        z: Bound::EMPTY,
    };
}

/// Where the ray meets the axis-aligned plane `axis == coordinate`, if it
/// heads toward it.
fn plane_crossing(ray: &Ray, axis: Axis, coordinate: f64) -> Option<DVec3> {
    let direction = axis.component(ray.direction);
    if direction == 0.0 {
        return None;
    }
    let k = (coordinate - axis.component(ray.origin)) / direction;
    if k < 0.0 {
        return None;
    }
    Some(ray.at(k))
}
