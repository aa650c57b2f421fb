//! Easing shapes for animated inputs.
//!
//! A [`Curve`] does not know about frames or values. It holds two optional
//! relative handle vectors, each a `(time fraction, value fraction)` pair, that
//! say how far a keyframe's Bezier handle reaches toward its neighbour. The
//! absolute handle positions are worked out by [`crate::compute_handles`].
//!
//! | Shape | left hand | right hand |
//! |-------|-----------|------------|
//! | `linear` | none | none |
//! | `ease_in` | `(s, 0)` | none |
//! | `ease_out` | none | `(s, 0)` |
//! | `ease_in_and_out` / `flat` | `(s, 0)` | `(s, 0)` |
//! | `decelerate_in` | `(0, s)` | none |
//! | `decelerate_out` | none | `(0, s)` |
//! | `decelerate_in_and_out` | `(0, s)` | `(0, s)` |
//!
//! `s` is the strength, ⅓ unless given.

use crate::{Error, Number, Result};
use log::warn;
use std::fmt;

/// Default handle strength: a third of the way to the neighbouring keyframe.
pub const DEFAULT_STRENGTH: f64 = 1.0 / 3.0;

/// A relative handle vector: (fraction of the frame gap, fraction of the value gap).
pub type HandleShape = (Number, Number);

/// A parameterized easing shape.
///
/// # Examples
///
/// ```rust
/// use fusion_table::{Curve, Number};
///
/// let curve = Curve::ease_out();
/// assert!(curve.left_hand.is_none());
/// assert_eq!(curve.right_hand, Some((Number::Float(1.0 / 3.0), Number::Integer(0))));
///
/// assert_eq!(Curve::flat(), Curve::ease_in_and_out());
/// assert!(Curve::smooth().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Curve {
    pub left_hand: Option<HandleShape>,
    pub right_hand: Option<HandleShape>,
}

impl Curve {
    #[must_use]
    pub const fn new(left_hand: Option<HandleShape>, right_hand: Option<HandleShape>) -> Self {
        Curve {
            left_hand,
            right_hand,
        }
    }

    /// No handles: straight segments between keyframes.
    #[must_use]
    pub const fn linear() -> Self {
        Curve::new(None, None)
    }

    #[must_use]
    pub fn ease_in() -> Self {
        Self::ease_in_with(DEFAULT_STRENGTH)
    }

    #[must_use]
    pub fn ease_in_with(strength: f64) -> Self {
        Curve::new(Some(ease(strength)), None)
    }

    #[must_use]
    pub fn ease_out() -> Self {
        Self::ease_out_with(DEFAULT_STRENGTH)
    }

    #[must_use]
    pub fn ease_out_with(strength: f64) -> Self {
        Curve::new(None, Some(ease(strength)))
    }

    #[must_use]
    pub fn ease_in_and_out() -> Self {
        Self::ease_in_and_out_with(DEFAULT_STRENGTH)
    }

    #[must_use]
    pub fn ease_in_and_out_with(strength: f64) -> Self {
        Curve::new(Some(ease(strength)), Some(ease(strength)))
    }

    #[must_use]
    pub fn decelerate_in() -> Self {
        Self::decelerate_in_with(DEFAULT_STRENGTH)
    }

    #[must_use]
    pub fn decelerate_in_with(strength: f64) -> Self {
        Curve::new(Some(decelerate(strength)), None)
    }

    #[must_use]
    pub fn decelerate_out() -> Self {
        Self::decelerate_out_with(DEFAULT_STRENGTH)
    }

    #[must_use]
    pub fn decelerate_out_with(strength: f64) -> Self {
        Curve::new(None, Some(decelerate(strength)))
    }

    #[must_use]
    pub fn decelerate_in_and_out() -> Self {
        Self::decelerate_in_and_out_with(DEFAULT_STRENGTH)
    }

    #[must_use]
    pub fn decelerate_in_and_out_with(strength: f64) -> Self {
        Curve::new(Some(decelerate(strength)), Some(decelerate(strength)))
    }

    /// Alias of [`Curve::ease_in_and_out`].
    #[must_use]
    pub fn flat() -> Self {
        Self::ease_in_and_out()
    }

    #[must_use]
    pub fn flat_with(strength: f64) -> Self {
        Self::ease_in_and_out_with(strength)
    }

    /// Tangents derived from the slope of the neighbouring keyframes.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`]: there is no slope-based
    /// tangent algorithm yet, and substituting another shape would silently
    /// change the animation.
    pub fn smooth() -> Result<Self> {
        Err(Error::not_implemented(
            "smooth curve (auto tangents from neighbouring slope)",
        ))
    }

    #[must_use]
    pub const fn is_linear(&self) -> bool {
        self.left_hand.is_none() && self.right_hand.is_none()
    }
}

fn ease(strength: f64) -> HandleShape {
    (Number::Float(clamp_strength(strength)), Number::Integer(0))
}

fn decelerate(strength: f64) -> HandleShape {
    (Number::Integer(0), Number::Float(clamp_strength(strength)))
}

fn clamp_strength(strength: f64) -> f64 {
    if strength.is_nan() {
        warn!("curve strength is NaN, using {}", DEFAULT_STRENGTH);
        return DEFAULT_STRENGTH;
    }
    if !(0.0..=1.0).contains(&strength) {
        let clamped = strength.clamp(0.0, 1.0);
        warn!("curve strength {} outside [0, 1], clamped to {}", strength, clamped);
        return clamped;
    }
    strength
}

fn fmt_hand(f: &mut fmt::Formatter<'_>, hand: &Option<HandleShape>) -> fmt::Result {
    match hand {
        Some((x, y)) => write!(f, "({}, {})", x, y),
        None => f.write_str("None"),
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Curve(LH=")?;
        fmt_hand(f, &self.left_hand)?;
        f.write_str(", RH=")?;
        fmt_hand(f, &self.right_hand)?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shapes() {
        let third = Number::Float(DEFAULT_STRENGTH);
        let zero = Number::Integer(0);

        assert!(Curve::linear().is_linear());
        assert_eq!(Curve::ease_in(), Curve::new(Some((third, zero)), None));
        assert_eq!(Curve::ease_out(), Curve::new(None, Some((third, zero))));
        assert_eq!(Curve::decelerate_in(), Curve::new(Some((zero, third)), None));
        assert_eq!(Curve::decelerate_out(), Curve::new(None, Some((zero, third))));
        assert_eq!(
            Curve::decelerate_in_and_out(),
            Curve::new(Some((zero, third)), Some((zero, third)))
        );
    }

    #[test]
    fn test_ease_value_fraction_is_integer_zero() {
        let (_, y) = Curve::ease_out().right_hand.unwrap();
        assert!(y.is_integer());
    }

    #[test]
    fn test_flat_is_ease_in_and_out() {
        assert_eq!(Curve::flat(), Curve::ease_in_and_out());
        assert_eq!(Curve::flat_with(0.75), Curve::ease_in_and_out_with(0.75));
    }

    #[test]
    fn test_smooth_is_not_implemented() {
        assert!(matches!(Curve::smooth(), Err(Error::NotImplemented(_))));
    }

    #[test]
    fn test_strength_clamped() {
        assert_eq!(Curve::ease_in_with(2.0), Curve::ease_in_with(1.0));
        assert_eq!(Curve::ease_out_with(-1.0), Curve::ease_out_with(0.0));
        assert_eq!(Curve::ease_in_with(f64::NAN), Curve::ease_in());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Curve::decelerate_out_with(1.0).to_string(),
            "Curve(LH=None, RH=(0, 1.0))"
        );
        assert_eq!(Curve::linear().to_string(), "Curve(LH=None, RH=None)");
    }
}
