//! Accepted ray parameter window.

/// Open range (min, max) of ray parameters a hit may fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound, excluded
    pub min: f32,
    /// Upper bound, excluded
    pub max: f32,
}

impl Interval {
    /// Window between `min` and `max`.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Window with no upper bound yet.
    pub fn beyond(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    /// Strictly inside the window.
    pub fn surrounds(&self, t: f32) -> bool {
        self.min < t && t < self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_excluded() {
        let window = Interval::new(1e-4, 2.0);
        assert!(window.surrounds(1.0));
        assert!(!window.surrounds(2.0));
        assert!(!window.surrounds(1e-4));
        assert!(!window.surrounds(f32::NAN));
    }

    #[test]
    fn open_window_rejects_only_infinity() {
        let window = Interval::beyond(0.5);
        assert!(window.surrounds(1e30));
        assert!(!window.surrounds(f32::INFINITY));
        assert!(!window.surrounds(0.25));
    }
}
