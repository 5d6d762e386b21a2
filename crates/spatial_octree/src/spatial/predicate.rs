//! Overlap predicates shared by every node of a tree
//!
//! The predicate decides whether an item's spatial footprint overlaps a box.
//! Its meaning (point containment, box overlap, sphere overlap, ...) is up to
//! the caller; the tree only ever asks it yes/no questions.

use crate::foundation::math::Vec3;
use crate::spatial::Bounds;
use std::fmt;
use std::sync::Arc;

type OverlapFn<T> = dyn Fn(&T, &Bounds) -> bool + Send + Sync;

/// Caller-supplied overlap test, cloned cheaply into every child node
pub struct OverlapPredicate<T> {
    test: Arc<OverlapFn<T>>,
}

impl<T> OverlapPredicate<T> {
    /// Wrap an arbitrary `(item, box) -> bool` closure
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&T, &Bounds) -> bool + Send + Sync + 'static,
    {
        Self { test: Arc::new(test) }
    }

    /// Items are points; they overlap a box when the point lies inside it
    pub fn point<F>(position_of: F) -> Self
    where
        F: Fn(&T) -> Vec3 + Send + Sync + 'static,
    {
        Self::new(move |item, bounds| bounds.contains_point(position_of(item)))
    }

    /// Items carry their own box; they overlap when the two boxes intersect
    pub fn bounds<F>(bounds_of: F) -> Self
    where
        F: Fn(&T) -> Bounds + Send + Sync + 'static,
    {
        Self::new(move |item, bounds| bounds.intersects(&bounds_of(item)))
    }

    /// Items are spheres given as `(center, radius)`
    pub fn sphere<F>(sphere_of: F) -> Self
    where
        F: Fn(&T) -> (Vec3, f32) + Send + Sync + 'static,
    {
        Self::new(move |item, bounds| {
            let (center, radius) = sphere_of(item);
            bounds.intersects_sphere(center, radius)
        })
    }

    /// Run the test for one item against one box
    #[inline]
    pub fn overlaps(&self, item: &T, bounds: &Bounds) -> bool {
        (self.test)(item, bounds)
    }

    /// Whether two handles share the same underlying closure
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.test, &other.test)
    }
}

impl<T> Clone for OverlapPredicate<T> {
    fn clone(&self) -> Self {
        Self { test: Arc::clone(&self.test) }
    }
}

impl<T> fmt::Debug for OverlapPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlapPredicate").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_predicate() {
        let predicate = OverlapPredicate::point(|p: &Vec3| *p);
        let bounds = Bounds::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));

        assert!(predicate.overlaps(&Vec3::new(0.5, -0.5, 1.0), &bounds));
        assert!(!predicate.overlaps(&Vec3::new(1.5, 0.0, 0.0), &bounds));
    }

    #[test]
    fn test_bounds_predicate() {
        let predicate = OverlapPredicate::bounds(|b: &Bounds| *b);
        let bounds = Bounds::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));

        let straddling = Bounds::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let outside = Bounds::new(Vec3::new(4.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(predicate.overlaps(&straddling, &bounds));
        assert!(!predicate.overlaps(&outside, &bounds));
    }

    #[test]
    fn test_sphere_predicate() {
        let predicate = OverlapPredicate::sphere(|s: &(Vec3, f32)| *s);
        let bounds = Bounds::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0));

        assert!(predicate.overlaps(&(Vec3::new(1.5, 0.0, 0.0), 1.0), &bounds));
        assert!(!predicate.overlaps(&(Vec3::new(3.0, 3.0, 3.0), 1.0), &bounds));
    }

    #[test]
    fn test_clone_shares_closure() {
        let predicate = OverlapPredicate::new(|_: &u32, _: &Bounds| true);
        let copy = predicate.clone();
        let other = OverlapPredicate::new(|_: &u32, _: &Bounds| true);

        assert!(predicate.ptr_eq(&copy));
        assert!(!predicate.ptr_eq(&other));
    }
}
