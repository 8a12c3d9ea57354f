//! Geometric primitives for thread layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in layout space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//! - [`Span`] - A half-open vertical interval `[top, bottom)`
//!
//! # Coordinate System
//!
//! Threadmap uses screen coordinates:
//!
//! ```text
//!   (0,0) ────────► +X   (columns, by depth)
//!     │
//!     │
//!     ▼
//!    +Y                  (rows, packed top to bottom)
//! ```

/// A 2D point in layout space.
///
/// # Examples
///
/// ```
/// # use threadmap_core::geometry::Point;
/// let p = Point::new(10.0, 20.0).translate_y(5.0);
/// assert_eq!(p.x(), 10.0);
/// assert_eq!(p.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns the point moved vertically by `dy`
    pub fn translate_y(self, dy: f32) -> Self {
        Self {
            x: self.x,
            y: self.y + dy,
        }
    }

    /// Creates bounds with this point as the top-left corner
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_top_left(self, size)
    }
}

/// Width and height of a laid out element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
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
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
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

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Returns the vertical extent of the bounds
    pub fn vertical_span(self) -> Span {
        Span::new(self.min_y, self.max_y)
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use threadmap_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let b = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// A half-open vertical interval `[top, bottom)`.
///
/// Column packing reasons about threads purely through their spans: two
/// threads of one column must keep their spans apart by the configured gap.
///
/// # Examples
///
/// ```
/// # use threadmap_core::geometry::Span;
/// let upper = Span::from_top(40.0, 100.0);
/// let lower = Span::from_top(154.0, 100.0);
///
/// assert_eq!(upper.gap_to(&lower), 14.0);
/// assert_eq!(upper.union(&lower).center(), 147.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Span {
    top: f32,
    bottom: f32,
}

impl Span {
    /// Creates a span; the ends are swapped if given in reverse order.
    pub fn new(top: f32, bottom: f32) -> Self {
        if top <= bottom {
            Self { top, bottom }
        } else {
            Self {
                top: bottom,
                bottom: top,
            }
        }
    }

    /// Creates a span starting at `top` and extending `height` downwards
    pub fn from_top(top: f32, height: f32) -> Self {
        Self::new(top, top + height)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn height(self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// Returns the smallest span covering both spans
    pub fn union(&self, other: &Self) -> Self {
        Self {
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Distance from the bottom of `self` to the top of `other`.
    ///
    /// Negative when `other` starts above the bottom of `self`.
    pub fn gap_to(&self, other: &Self) -> f32 {
        other.top - self.bottom
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn span_strategy() -> impl Strategy<Value = Span> {
        (-1000.0f32..1000.0, 0.0f32..500.0).prop_map(|(top, h)| Span::from_top(top, h))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    proptest! {
        #[test]
        fn span_union_contains_both(a in span_strategy(), b in span_strategy()) {
            let union = a.union(&b);
            prop_assert!(union.top() <= a.top() && union.top() <= b.top());
            prop_assert!(union.bottom() >= a.bottom() && union.bottom() >= b.bottom());
        }

        #[test]
        fn span_union_is_commutative(a in span_strategy(), b in span_strategy()) {
            prop_assert_eq!(a.union(&b), b.union(&a));
        }

        #[test]
        fn span_gap_to_touching_span_is_zero(top in -1000.0f32..1000.0, h in 0.0f32..500.0) {
            let a = Span::from_top(top, h);
            let b = Span::from_top(a.bottom(), h);
            prop_assert_eq!(a.gap_to(&b), 0.0);
            prop_assert!(b.gap_to(&a) <= 0.0);
        }

        #[test]
        fn bounds_merge_is_commutative(a in bounds_strategy(), b in bounds_strategy()) {
            let ab = a.merge(&b);
            let ba = b.merge(&a);
            prop_assert!(approx_eq!(f32, ab.min_x(), ba.min_x()));
            prop_assert!(approx_eq!(f32, ab.min_y(), ba.min_y()));
            prop_assert!(approx_eq!(f32, ab.max_x(), ba.max_x()));
            prop_assert!(approx_eq!(f32, ab.max_y(), ba.max_y()));
        }
    }
}
