//! Geometric primitives for label layout.
//!
//! Coordinates are PDF user-space points: the origin is the lower-left
//! corner of the page and `y` grows upwards.

/// Points per millimetre (72 / 25.4).
pub const POINTS_PER_MM: f32 = 2.834_645_7;

/// Convert millimetres to PDF points.
///
/// # Examples
///
/// ```
/// use sscc_labels::geometry::mm_to_pt;
///
/// assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-3);
/// ```
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of the lower-left corner
    pub x: f32,
    /// Y coordinate of the lower-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from its lower-left corner and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use sscc_labels::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.top(), 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Check if `other` lies entirely inside this rectangle (edges inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// use sscc_labels::geometry::Rect;
    ///
    /// let page = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// assert!(page.contains_rect(&Rect::new(10.0, 10.0, 80.0, 80.0)));
    /// assert!(!page.contains_rect(&Rect::new(50.0, 50.0, 80.0, 10.0)));
    /// ```
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.bottom() >= self.bottom()
            && other.top() <= self.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 20.0);
        assert_eq!(r.top(), 70.0);
    }

    #[test]
    fn test_rect_contains_rect() {
        let page = Rect::new(0.0, 0.0, 420.0, 298.0);
        assert!(page.contains_rect(&page));
        assert!(page.contains_rect(&Rect::new(20.0, 30.0, 380.0, 119.0)));
        assert!(!page.contains_rect(&Rect::new(-1.0, 30.0, 10.0, 10.0)));
        assert!(!page.contains_rect(&Rect::new(20.0, 290.0, 10.0, 10.0)));
    }

    #[test]
    fn test_mm_to_pt_a6() {
        assert!((mm_to_pt(148.0) - 419.528).abs() < 0.01);
        assert!((mm_to_pt(105.0) - 297.638).abs() < 0.01);
    }
}
