//! Geometry value types shared by every component.
//!
//! All pixel rectangles are [`Rect`]s.  Unless a function says otherwise, a
//! `Rect` is *monitor-relative*: its origin is the top-left corner of a
//! specific monitor, not of the whole desktop.  Fractional layouts are
//! [`FracRect`]s and are resolved to pixels only at use time.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A pixel rectangle.  Width and height are unsigned, so a `Rect` can never
/// describe a negative size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `(x, y)` (desktop coordinates) lies inside this rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.width as i32
            && y < self.y + self.height as i32
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// A rectangle expressed as fractions of a monitor's width and height.
///
/// Every field lies in `[0.0, 1.0]`.  Fractions are immutable once the
/// layout table is built; they are resolved against a concrete monitor with
/// [`FracRect::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FracRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl FracRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Whether all four fields are within `[0.0, 1.0]`.
    pub fn in_range(&self) -> bool {
        [self.x, self.y, self.w, self.h]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }

    /// Resolve to a pixel rectangle against a monitor of the given size.
    ///
    /// Truncates toward zero (floor, since fractions are non-negative).
    /// Resolving the same fraction against the same monitor size always
    /// yields the same pixel rectangle, which is what makes repeated
    /// cycling idempotent.
    pub fn resolve(&self, monitor: &Rect) -> Rect {
        Rect {
            x: (self.x * monitor.width as f64) as i32,
            y: (self.y * monitor.height as f64) as i32,
            width: (self.w * monitor.width as f64) as u32,
            height: (self.h * monitor.height as f64) as u32,
        }
    }
}

// On the wire (config file) a FracRect is a plain 4-element array
// `[x, y, w, h]`, which keeps hand-written layout overrides readable.

impl Serialize for FracRect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.x, self.y, self.w, self.h].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FracRect {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y, w, h] = <[f64; 4]>::deserialize(deserializer)?;
        let rect = FracRect { x, y, w, h };
        if !rect.in_range() {
            return Err(DeError::custom(format!(
                "fraction out of range [0, 1]: [{}, {}, {}, {}]",
                x, y, w, h
            )));
        }
        Ok(rect)
    }
}

/// Pixel thickness of the window-manager decorations around a client area.
///
/// `border` wraps the left, right, and bottom edges; `titlebar` sits on top.
/// Extents are queried fresh for every command — a theme change or a
/// maximize transition can alter them at any time, so they are never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameExtents {
    pub border: u32,
    pub titlebar: u32,
}

/// A physical monitor as enumerated by the window system.
///
/// `rect` is desktop-relative.  Indices run `0..monitor_count()` and are
/// stable only within a single process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    pub index: usize,
    pub rect: Rect,
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(10, 20, 100, 50);
        assert!(r.contains(10, 20));
        assert!(r.contains(109, 69));
        assert!(!r.contains(110, 20));
        assert!(!r.contains(10, 70));
        assert!(!r.contains(9, 20));
    }

    #[test]
    fn resolve_thirds_on_1920() {
        let monitor = Rect::new(0, 0, 1920, 1200);
        let frac = FracRect::new(1.0 / 3.0, 0.0, 1.0 / 3.0, 1.0);
        let r = frac.resolve(&monitor);
        assert_eq!(r.x, 640);
        assert_eq!(r.width, 640);
        assert_eq!(r.height, 1200);
    }

    #[test]
    fn resolve_truncates_toward_zero() {
        let monitor = Rect::new(0, 0, 1366, 768);
        let frac = FracRect::new(0.0, 0.0, 1.0 / 3.0, 1.0);
        // 1366 / 3 = 455.33…, which must floor to 455, not round to 456.
        assert_eq!(frac.resolve(&monitor).width, 455);
    }

    #[test]
    fn resolve_is_idempotent() {
        let monitor = Rect::new(0, 0, 1366, 768);
        let frac = FracRect::new(0.5, 0.0, 0.5, 1.0);
        assert_eq!(frac.resolve(&monitor), frac.resolve(&monitor));
    }

    #[test]
    fn resolve_full_monitor() {
        let monitor = Rect::new(1920, 0, 1024, 768);
        let frac = FracRect::new(0.0, 0.0, 1.0, 1.0);
        // Resolution ignores the monitor's desktop position; the result is
        // monitor-relative.
        assert_eq!(frac.resolve(&monitor), Rect::new(0, 0, 1024, 768));
    }

    #[test]
    fn frac_rect_in_range() {
        assert!(FracRect::new(0.0, 0.0, 1.0, 1.0).in_range());
        assert!(!FracRect::new(-0.1, 0.0, 1.0, 1.0).in_range());
        assert!(!FracRect::new(0.0, 0.0, 1.1, 1.0).in_range());
    }

    #[test]
    fn frac_rect_deserializes_from_array() {
        let f: FracRect = serde_json::from_str("[0.5, 0.0, 0.5, 1.0]").unwrap();
        assert_eq!(f, FracRect::new(0.5, 0.0, 0.5, 1.0));
    }

    #[test]
    fn frac_rect_rejects_out_of_range() {
        let r = serde_json::from_str::<FracRect>("[0.0, 0.0, 2.0, 1.0]");
        assert!(r.is_err());
    }

    #[test]
    fn frac_rect_serialize_round_trip() {
        let f = FracRect::new(0.25, 0.5, 0.75, 1.0);
        let json = serde_json::to_string(&f).unwrap();
        let back: FracRect = serde_json::from_str(&json).unwrap();
        assert_eq!(f, back);
    }
}
