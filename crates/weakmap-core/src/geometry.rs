//! Layout-space geometry.
//!
//! Node boxes, edge anchors and the canvas are all expressed in SVG user
//! units: the origin is the top-left corner, `x` grows to the right and `y`
//! grows downwards. [`Point`] is a position or offset, [`Size`] an extent and
//! [`Bounds`] an axis-aligned box used for node placement and hit-testing.

use serde::Serialize;

/// A position or offset in layout space.
///
/// # Examples
///
/// ```
/// # use weakmap_core::geometry::Point;
/// let source = Point::new(186.0, 44.0);
/// let target = Point::new(276.0, 44.0);
///
/// assert_eq!(source.midpoint(target), Point::new(231.0, 44.0));
/// assert_eq!(target.sub_point(source), Point::new(90.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// The point halfway to `other`; edge curves bend around it.
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Multiplies both coordinates by `factor`, as a zoom does.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

/// Width and height of a node box or of the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Component-wise maximum, used to enforce the minimum canvas.
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// An axis-aligned box, stored as its minimum and maximum corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// The top-left corner, which is where a node is drawn from.
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Returns true if the point lies inside the bounds or on its edge.
    ///
    /// # Examples
    ///
    /// ```
    /// # use weakmap_core::geometry::{Bounds, Point, Size};
    /// let node = Bounds::new_from_top_left(Point::new(16.0, 16.0), Size::new(170.0, 56.0));
    ///
    /// assert!(node.contains(Point::new(100.0, 40.0)));
    /// assert!(node.contains(Point::new(186.0, 72.0)));
    /// assert!(!node.contains(Point::new(187.0, 40.0)));
    /// ```
    pub fn contains(self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use float_cmp::approx_eq;
    use proptest::{prelude::*, test_runner::TestCaseError};

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert_eq!(point.x(), 0.0);
        assert_eq!(point.y(), 0.0);
    }

    #[test]
    fn test_point_sub() {
        let result = Point::new(5.0, 7.0).sub_point(Point::new(2.0, 3.0));
        assert_eq!(result, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_size_max_keeps_larger_extent() {
        let canvas = Size::new(656.0, 200.0).max(Size::new(640.0, 320.0));
        assert_eq!(canvas, Size::new(656.0, 320.0));
        assert_eq!(canvas.scale(0.5), Size::new(328.0, 160.0));
    }

    #[test]
    fn test_node_box_anchors() {
        let node = Bounds::new_from_top_left(Point::new(16.0, 16.0), Size::new(170.0, 56.0));
        assert_eq!(node.min_point(), Point::new(16.0, 16.0));
        assert_eq!(node.max_x(), 186.0);
        assert_eq!(node.max_y(), 72.0);
        assert_eq!(node.center(), Point::new(101.0, 44.0));
        assert_eq!(node.width(), 170.0);
        assert_eq!(node.height(), 56.0);
    }

    #[test]
    fn test_bounds_contains_edges() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(bounds.contains(Point::new(0.0, 0.0)));
        assert!(bounds.contains(Point::new(10.0, 10.0)));
        assert!(!bounds.contains(Point::new(-0.1, 5.0)));
        assert!(!bounds.contains(Point::new(5.0, 10.1)));
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), 0.0f32..500.0, 0.0f32..500.0)
            .prop_map(|(p, w, h)| Bounds::new_from_top_left(p, Size::new(w, h)))
    }

    /// A box contains its own center and corners.
    fn check_bounds_contains_center(bounds: Bounds) -> Result<(), TestCaseError> {
        prop_assert!(bounds.contains(bounds.center()));
        prop_assert!(bounds.contains(bounds.min_point()));
        prop_assert!(bounds.contains(Point::new(bounds.max_x(), bounds.max_y())));
        Ok(())
    }

    fn check_midpoint_is_between_points(p1: Point, p2: Point) -> Result<(), TestCaseError> {
        let mid = p1.midpoint(p2);

        prop_assert!(mid.x() >= p1.x().min(p2.x()) && mid.x() <= p1.x().max(p2.x()));
        prop_assert!(mid.y() >= p1.y().min(p2.y()) && mid.y() <= p1.y().max(p2.y()));
        Ok(())
    }

    /// Scaling then offsetting is undone by removing the offset and dividing.
    fn check_scale_offset_inverse(
        point: Point,
        offset: Point,
        factor: f32,
    ) -> Result<(), TestCaseError> {
        let restored = point
            .scale(factor)
            .add_point(offset)
            .sub_point(offset)
            .scale(1.0 / factor);

        prop_assert!(approx_eq!(f32, restored.x(), point.x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, restored.y(), point.y(), epsilon = 0.01));
        Ok(())
    }

    proptest! {
        #[test]
        fn bounds_contains_center(bounds in bounds_strategy()) {
            check_bounds_contains_center(bounds)?;
        }

        #[test]
        fn midpoint_is_between_points(p1 in point_strategy(), p2 in point_strategy()) {
            check_midpoint_is_between_points(p1, p2)?;
        }

        #[test]
        fn scale_offset_inverse(
            point in point_strategy(),
            offset in point_strategy(),
            factor in 0.25f32..4.0,
        ) {
            check_scale_offset_inverse(point, offset, factor)?;
        }
    }
}
