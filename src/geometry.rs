//! Rectangle geometry in canvas pixel space

/// An axis-aligned rectangle in canvas coordinates.
///
/// Invariant: `left <= right` and `top <= bottom`. Interactive updates go
/// through [`Rect::from_drag`], which canonicalizes the two endpoints, so a
/// rectangle with negative extent is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from already-ordered bounds.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        debug_assert!(left <= right && top <= bottom);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rectangle from two drag endpoints in any order.
    pub fn from_drag(anchor: (i32, i32), cursor: (i32, i32)) -> Self {
        Self {
            left: anchor.0.min(cursor.0),
            top: anchor.1.min(cursor.1),
            right: anchor.0.max(cursor.0),
            bottom: anchor.1.max(cursor.1),
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    pub fn perimeter(&self) -> i32 {
        2 * (self.width() + self.height())
    }

    /// Point containment with half-open intervals (standard raster
    /// convention): `left <= x < right` and `top <= y < bottom`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.left <= x && x < self.right && self.top <= y && y < self.bottom
    }

    /// Clamp all four bounds into `canvas`.
    pub fn clamped_to(&self, canvas: Rect) -> Rect {
        Rect {
            left: self.left.clamp(canvas.left, canvas.right),
            top: self.top.clamp(canvas.top, canvas.bottom),
            right: self.right.clamp(canvas.left, canvas.right),
            bottom: self.bottom.clamp(canvas.top, canvas.bottom),
        }
    }

    /// Intersection with another rectangle, or `None` when they do not
    /// overlap by any positive area.
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect::new(left, top, right, bottom))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_drag_canonicalizes() {
        let r = Rect::from_drag((10, 10), (5, 5));
        assert_eq!(
            r,
            Rect {
                left: 5,
                top: 5,
                right: 10,
                bottom: 10
            }
        );
    }

    #[test]
    fn test_from_drag_mixed_order() {
        let r = Rect::from_drag((3, 40), (20, 7));
        assert_eq!(r.left, 3);
        assert_eq!(r.top, 7);
        assert_eq!(r.right, 20);
        assert_eq!(r.bottom, 40);
    }

    #[test]
    fn test_derived_measurements() {
        let r = Rect::new(10, 20, 110, 70);
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 50);
        assert_eq!(r.area(), 5000);
        assert_eq!(r.perimeter(), 300);
    }

    #[test]
    fn test_contains_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(0, 0));
        assert!(r.contains(9, 9));
        assert!(!r.contains(10, 0));
        assert!(!r.contains(0, 10));
        assert!(!r.contains(-1, 5));
    }

    #[test]
    fn test_clamped_to_canvas() {
        let canvas = Rect::new(0, 0, 640, 480);
        let r = Rect::new(-20, 100, 700, 500).clamped_to(canvas);
        assert_eq!(r, Rect::new(0, 100, 640, 480));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 150, 150);
        assert_eq!(a.intersect(b), Some(Rect::new(50, 50, 100, 100)));

        let c = Rect::new(100, 0, 200, 100);
        assert_eq!(a.intersect(c), None);
    }

    #[test]
    fn test_zero_extent() {
        let r = Rect::from_drag((5, 5), (5, 5));
        assert_eq!(r.area(), 0);
        assert!(!r.contains(5, 5));
    }
}
