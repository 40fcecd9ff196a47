//! Rectangular arena geometry
//!
//! Body positions are confined to the box
//! `[border, width - diameter - border] × [border, height - diameter - border]`.

use serde::{Deserialize, Serialize};

use crate::Vector2;
use crate::settings::Settings;

/// Arena bounds for bodies of a uniform diameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    pub border: f64,
    pub diameter: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64, border: f64, diameter: f64) -> Self {
        Self {
            width,
            height,
            border,
            diameter,
        }
    }

    #[inline]
    pub fn x_min(&self) -> f64 {
        self.border
    }

    #[inline]
    pub fn x_max(&self) -> f64 {
        self.width - self.diameter - self.border
    }

    #[inline]
    pub fn y_min(&self) -> f64 {
        self.border
    }

    #[inline]
    pub fn y_max(&self) -> f64 {
        self.height - self.diameter - self.border
    }

    /// Lower corner of the position box
    #[inline]
    pub fn min(&self) -> Vector2 {
        Vector2::new(self.x_min(), self.y_min())
    }

    /// Upper corner of the position box
    #[inline]
    pub fn max(&self) -> Vector2 {
        Vector2::new(self.x_max(), self.y_max())
    }

    /// Clamp a position into the box
    #[inline]
    pub fn clamp(&self, pos: Vector2) -> Vector2 {
        pos.clamp(self.min(), self.max())
    }

    /// Check if a position lies inside the box (bounds inclusive)
    pub fn contains(&self, pos: Vector2) -> bool {
        pos.x >= self.x_min() && pos.x <= self.x_max() && pos.y >= self.y_min() && pos.y <= self.y_max()
    }
}

impl From<&Settings> for Arena {
    fn from(settings: &Settings) -> Self {
        Self::new(
            settings.width,
            settings.height,
            settings.border,
            settings.diameter,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds() {
        let arena = Arena::from(&Settings::default());
        assert_eq!(arena.x_min(), 4.0);
        assert_eq!(arena.x_max(), 376.0);
        assert_eq!(arena.y_min(), 4.0);
        assert_eq!(arena.y_max(), 396.0);
    }

    #[test]
    fn test_clamp() {
        let arena = Arena::new(400.0, 420.0, 4.0, 20.0);
        assert_eq!(arena.clamp(Vector2::new(-5.0, 500.0)), Vector2::new(4.0, 396.0));
        assert_eq!(arena.clamp(Vector2::new(100.0, 100.0)), Vector2::new(100.0, 100.0));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let arena = Arena::new(400.0, 420.0, 4.0, 20.0);
        assert!(arena.contains(Vector2::new(4.0, 396.0)));
        assert!(!arena.contains(Vector2::new(3.9, 100.0)));
        assert!(!arena.contains(Vector2::new(100.0, 396.1)));
    }
}
