// SPDX-License-Identifier: GPL-3.0-only

//! Geometry and handle types shared between the viewfinder and capture backends

use crate::orientation::CaptureOrientation;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A point in surface coordinates (points, origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Same size with the axes swapped
    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Square of the given edge centered on `center`
    pub fn centered_square(center: Point, edge: f32) -> Self {
        Self::new(center.x - edge / 2.0, center.y - edge / 2.0, edge, edge)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@({},{})", self.size, self.origin.x, self.origin.y)
    }
}

/// Focus point in sensor space, both axes in `[0, 1]`
///
/// `(0, 0)` is the top-left of the sensor in its native landscape
/// orientation, independent of the preview surface's pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFocusPoint {
    x: f32,
    y: f32,
}

impl NormalizedFocusPoint {
    /// Build a point, clamping both axes into range
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }
}

impl fmt::Display for NormalizedFocusPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.5
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Capabilities of the session's active video connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionInfo {
    /// The connection accepts orientation changes
    pub orientation_supported: bool,
    /// Frames are mirrored horizontally (typically the front lens)
    pub mirrored: bool,
}

/// Snapshot of the preview surface handed to the capture command
///
/// The backend uses it to match the photo's framing and rotation to what
/// the user saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSurfaceRef {
    pub id: Uuid,
    pub bounds: Rect,
    pub orientation: Option<CaptureOrientation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_point_is_clamped() {
        let p = NormalizedFocusPoint::new(-0.2, 1.7);
        assert_eq!((p.x(), p.y()), (0.0, 1.0));
        let nan = NormalizedFocusPoint::new(f32::NAN, 0.25);
        assert_eq!((nan.x(), nan.y()), (0.5, 0.25));
    }

    #[test]
    fn test_centered_square() {
        let r = Rect::centered_square(Point::new(100.0, 50.0), 110.0);
        assert_eq!(r.center(), Point::new(100.0, 50.0));
        assert_eq!(r.width(), 110.0);
    }
}
