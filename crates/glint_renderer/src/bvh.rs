//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built once, top-down, by sorting on the longest axis of
//! each node's bounds and splitting at the median. Every node has exactly
//! two children; a single object is stored as both.

use crate::{HitRecord, Hittable, HittableList, RenderError, RenderResult};
use glint_math::{Aabb, Interval, Ray};
use std::cmp::Ordering;
use std::sync::Arc;

/// Internal BVH node owning two children.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
    stats: BvhStats,
}

/// Shape summary of a (sub)tree, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BvhStats {
    /// Number of `BvhNode`s, this one included
    pub nodes: usize,
    /// Longest chain of `BvhNode`s from this one down
    pub depth: usize,
}

impl BvhNode {
    /// Build a BVH over the members of a list.
    pub fn from_list(list: &HittableList) -> RenderResult<Self> {
        Self::new(list.objects())
    }

    /// Build a BVH over a slice of objects.
    pub fn new(objects: &[Arc<dyn Hittable>]) -> RenderResult<Self> {
        if objects.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let node = Self::build(objects.to_vec());
        log::debug!(
            "Built BVH over {} objects: {} nodes, depth {}",
            objects.len(),
            node.stats.nodes,
            node.stats.depth
        );
        Ok(node)
    }

    /// Recursive construction over a non-empty set of objects.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::union(&acc, &o.bounding_box()));
        let axis = bbox.longest_axis();
        let n = objects.len();

        if n <= 2 {
            // One object is stored as both children.
            return Self {
                left: Arc::clone(&objects[0]),
                right: Arc::clone(&objects[n - 1]),
                bbox,
                stats: BvhStats { nodes: 1, depth: 1 },
            };
        }

        // Stable: objects with equal keys keep their input order.
        objects.sort_by(|a, b| box_compare(a.as_ref(), b.as_ref(), axis));

        let right_objects = objects.split_off(n / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        let stats = BvhStats {
            nodes: 1 + left.stats.nodes + right.stats.nodes,
            depth: 1 + left.stats.depth.max(right.stats.depth),
        };

        Self {
            left: Arc::new(left),
            right: Arc::new(right),
            bbox,
            stats,
        }
    }

    /// Node count and depth of the tree rooted here.
    pub fn stats(&self) -> BvhStats {
        self.stats
    }
}

/// Order two objects by the minimum of their bounds on `axis`.
fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
    let a_min = a.bounding_box().axis_interval(axis).min;
    let b_min = b.bounding_box().axis_interval(axis).min;
    a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let hit_left = self.left.hit(ray, ray_t);

        // The right subtree may only improve on the left hit.
        let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
        let hit_right = self.right.hit(ray, Interval::new(ray_t.min, right_max));

        match (hit_left, hit_right) {
            (Some(l), Some(r)) => Some(if l.t < r.t { l } else { r }),
            (l, None) => l,
            (None, r) => r,
        }
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
