//! KD-tree acceleration structure.
//!
//! Built top-down over shape bounding boxes. Each node probes a handful of
//! evenly spaced split planes on every axis and keeps the one with the lowest
//! surface-area cost, or becomes a leaf when no split beats leaving the shapes
//! together. Shapes that straddle a split plane are referenced from both
//! children.
//!
//! Traversal visits the child on the ray origin's side of the split first and
//! only stops there when the nearest hit lies inside that child's box; any
//! other hit is checked against the far child as well.

use crate::intersection::IntersectionInfo;
use crate::Shape;
use kdray_math::{Axis, BoundingBox, Ray};
use serde::{Deserialize, Serialize};

/// Nodes with at least this many shapes build their children in parallel.
const PARALLEL_BUILD_THRESHOLD: usize = 64;

/// Tuning for the split search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdTreeSettings {
    /// The box is probed at `max_splits - 1` evenly spaced positions per axis.
    pub max_splits: usize,
    /// Flat cost added to every candidate split.
    pub split_cost: f64,
    /// Nodes at this depth always become leaves.
    pub max_depth: usize,
    /// Nodes with this many shapes or fewer always become leaves.
    pub leaf_threshold: usize,
}

impl Default for KdTreeSettings {
    fn default() -> Self {
        Self {
            max_splits: 5,
            split_cost: 5.0,
            max_depth: 20,
            leaf_threshold: 1,
        }
    }
}

/// Orientation of a split plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPlane {
    /// Perpendicular to Z.
    XY,
    /// Perpendicular to Y.
    XZ,
    /// Perpendicular to X.
    YZ,
}

impl SplitPlane {
    pub const ALL: [SplitPlane; 3] = [SplitPlane::XY, SplitPlane::XZ, SplitPlane::YZ];

    /// The axis the plane cuts.
    pub fn axis(self) -> Axis {
        match self {
            SplitPlane::XY => Axis::Z,
            SplitPlane::XZ => Axis::Y,
            SplitPlane::YZ => Axis::X,
        }
    }
}

/// KD-tree node. Children are owned by their parent.
#[derive(Debug)]
pub enum KdNode {
    /// Indices into the scene's shape list.
    Leaf { shapes: Vec<usize> },
    Internal {
        plane: SplitPlane,
        coordinate: f64,
        left: Box<KdNode>,
        right: Box<KdNode>,
    },
}

/// Summary of a built tree, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KdTreeStats {
    pub internal_nodes: usize,
    pub leaves: usize,
    pub depth: usize,
    /// Total shape references across leaves; exceeds the shape count when
    /// shapes straddle split planes.
    pub shape_refs: usize,
}

/// KD-tree over a scene's shapes.
#[derive(Debug)]
pub struct KdTree {
    root: KdNode,
    bounding_box: BoundingBox,
}

impl KdTree {
    /// Build a tree over `shapes`. Leaves refer to shapes by their index in
    /// the slice, so the same slice must be passed to queries.
    pub fn build(shapes: &[Shape], settings: &KdTreeSettings) -> Self {
        let bounding_box = shapes
            .iter()
            .fold(BoundingBox::EMPTY, |acc, s| acc.enclose(s.bounding_box()));
        let indices = (0..shapes.len()).collect();
        let root = build_node(shapes, indices, bounding_box, 0, settings);

        Self { root, bounding_box }
    }

    pub fn root(&self) -> &KdNode {
        &self.root
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn stats(&self) -> KdTreeStats {
        let mut stats = KdTreeStats::default();
        collect_stats(&self.root, 0, &mut stats);
        stats
    }

    /// Nearest hit along the ray, or the miss sentinel.
    pub fn find_intersection(&self, shapes: &[Shape], ray: &Ray) -> IntersectionInfo {
        if !self.bounding_box.intersects_ray(ray) {
            return IntersectionInfo::MISS;
        }
        find_in_node(&self.root, &self.bounding_box, shapes, ray)
    }
}

fn build_node(
    shapes: &[Shape],
    indices: Vec<usize>,
    bbox: BoundingBox,
    depth: usize,
    settings: &KdTreeSettings,
) -> KdNode {
    let Some((plane, coordinate)) = find_split(shapes, &indices, &bbox, depth, settings) else {
        return KdNode::Leaf { shapes: indices };
    };

    let (left_box, right_box) = bbox.split(plane.axis(), coordinate);
    let (left_indices, right_indices) = partition(shapes, &indices, &left_box, &right_box);

    let (left, right) = if indices.len() >= PARALLEL_BUILD_THRESHOLD {
        rayon::join(
            || build_node(shapes, left_indices, left_box, depth + 1, settings),
            || build_node(shapes, right_indices, right_box, depth + 1, settings),
        )
    } else {
        (
            build_node(shapes, left_indices, left_box, depth + 1, settings),
            build_node(shapes, right_indices, right_box, depth + 1, settings),
        )
    };

    KdNode::Internal {
        plane,
        coordinate,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Split the shape set between two adjacent boxes. A shape overlapping both
/// boxes is placed in both.
fn partition(
    shapes: &[Shape],
    indices: &[usize],
    left_box: &BoundingBox,
    right_box: &BoundingBox,
) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();

    for &i in indices {
        let shape_box = shapes[i].bounding_box();
        let in_left = shape_box.overlaps(left_box);
        let in_right = shape_box.overlaps(right_box);
        if in_left {
            left.push(i);
        }
        if in_right || !in_left {
            right.push(i);
        }
    }

    (left, right)
}

fn count_overlapping(shapes: &[Shape], indices: &[usize], bbox: &BoundingBox) -> usize {
    indices
        .iter()
        .filter(|&&i| shapes[i].bounding_box().overlaps(bbox))
        .count()
}

/// Search for the split plane with the lowest surface-area cost.
///
/// The three face areas of the box are normalized to sum to 1. For a split
/// at fraction `l` along the cut axis, with `r = 1 - l`:
///
/// ```text
/// cost = (s_split + l * s_rest) * n_left + (s_split + r * s_rest) * n_right + split_cost
/// ```
///
/// where `s_split` is the area of the face parallel to the plane. Returns
/// `None` when nothing beats the unsplit cost, which is the shape count.
fn find_split(
    shapes: &[Shape],
    indices: &[usize],
    bbox: &BoundingBox,
    depth: usize,
    settings: &KdTreeSettings,
) -> Option<(SplitPlane, f64)> {
    if depth >= settings.max_depth || indices.len() <= settings.leaf_threshold {
        return None;
    }

    let hx = bbox.x.size();
    let hy = bbox.y.size();
    let hz = bbox.z.size();

    let sum = hx * hy + hx * hz + hy * hz;
    if !(sum > 0.0 && sum.is_finite()) {
        return None;
    }
    let sxy = hx * hy / sum;
    let sxz = hx * hz / sum;
    let syz = hy * hz / sum;

    let mut best_cost = indices.len() as f64;
    let mut best = None;

    for plane in SplitPlane::ALL {
        let (s_split, s_rest) = match plane {
            SplitPlane::XY => (sxy, sxz + syz),
            SplitPlane::XZ => (sxz, sxy + syz),
            SplitPlane::YZ => (syz, sxy + sxz),
        };
        let axis = plane.axis();
        let bound = bbox.bound(axis);

        for i in 1..settings.max_splits {
            let l = i as f64 / settings.max_splits as f64;
            let r = 1.0 - l;
            let coordinate = bound.min + l * bound.size();

            let (left_box, right_box) = bbox.split(axis, coordinate);
            let n_left = count_overlapping(shapes, indices, &left_box) as f64;
            let n_right = count_overlapping(shapes, indices, &right_box) as f64;

            let cost = (s_split + l * s_rest) * n_left
                + (s_split + r * s_rest) * n_right
                + settings.split_cost;

            if cost < best_cost {
                best_cost = cost;
                best = Some((plane, coordinate));
            }
        }
    }

    best
}

fn find_in_node(node: &KdNode, bbox: &BoundingBox, shapes: &[Shape], ray: &Ray) -> IntersectionInfo {
    match node {
        KdNode::Leaf { shapes: indices } => indices
            .iter()
            .map(|&i| shapes[i].intersect(ray))
            .filter(|info| info.distance >= 0.0)
            .fold(IntersectionInfo::MISS, IntersectionInfo::nearest),

        KdNode::Internal {
            plane,
            coordinate,
            left,
            right,
        } => {
            let axis = plane.axis();
            let coordinate = *coordinate;
            let (left_box, right_box) = bbox.split(axis, coordinate);

            let origin = axis.component(ray.origin);
            let min = bbox.bound(axis).min;
            let left_is_front = (coordinate > min && coordinate > origin)
                || (coordinate < min && coordinate < origin);

            let (front, front_box, back, back_box) = if left_is_front {
                (left, left_box, right, right_box)
            } else {
                (right, right_box, left, left_box)
            };

            let mut best = IntersectionInfo::MISS;
            if front_box.intersects_ray(ray) {
                best = find_in_node(front, &front_box, shapes, ray);
                // A hit inside the front box precedes anything in the back box
                if best.is_hit() && front_box.contains_point(best.position) {
                    return best;
                }
            }
            if back_box.intersects_ray(ray) {
                best = best.nearest(find_in_node(back, &back_box, shapes, ray));
            }
            best
        }
    }
}

fn collect_stats(node: &KdNode, depth: usize, stats: &mut KdTreeStats) {
    stats.depth = stats.depth.max(depth);
    match node {
        KdNode::Leaf { shapes } => {
            stats.leaves += 1;
            stats.shape_refs += shapes.len();
        }
        KdNode::Internal { left, right, .. } => {
            stats.internal_nodes += 1;
            collect_stats(left, depth + 1, stats);
            collect_stats(right, depth + 1, stats);
        }
    }
}
