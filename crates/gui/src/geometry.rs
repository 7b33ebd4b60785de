//! Rectangle helpers shared by the z-order policy and the renderer.

use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
};

/// Shorthand constructor usable in `const` items.
pub const fn rect(x: i32, y: i32, width: u32, height: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(width, height))
}

/// Overlap test used for hiding and popup eviction.
pub trait RectExt {
    /// `true` when both rectangles share at least one pixel.
    ///
    /// Touching edges do not count, and an empty rectangle overlaps nothing.
    fn overlaps(&self, other: &Rectangle) -> bool;
}

impl RectExt for Rectangle {
    fn overlaps(&self, other: &Rectangle) -> bool {
        !self.is_zero_sized() && !other.is_zero_sized() && !self.intersection(other).is_zero_sized()
    }
}
