//! Configuration for building compositions.
//!
//! ```rust
//! use fusion_table::{CompOptions, Curve, Number, Rgba};
//!
//! let options = CompOptions::new()
//!     .with_grid_scale(100, 30)
//!     .with_default_curve(Curve::ease_in_and_out())
//!     .with_spline_color(Rgba::rgb(0.0, 0.5, 1.0));
//!
//! assert_eq!(options.node_position(2, 1), (Number::from(200), Number::from(30)));
//! ```

use crate::{Curve, Number, Rgba};

/// Settings shared by every tool and spline in a composition.
#[derive(Clone, Debug, PartialEq)]
pub struct CompOptions {
    /// Flow units per grid cell, (x, y).
    pub grid_scale: (Number, Number),
    /// Color of splines created by `animate`.
    pub spline_color: Rgba,
    /// Colors of the X and Y splines created by `animate_position`.
    pub x_spline_color: Rgba,
    pub y_spline_color: Rgba,
    /// Curve used when `animate` is not given one.
    pub default_curve: Curve,
}

impl Default for CompOptions {
    fn default() -> Self {
        CompOptions {
            grid_scale: (Number::Integer(110), Number::Integer(33)),
            spline_color: Rgba::magenta(),
            x_spline_color: Rgba::red(),
            y_spline_color: Rgba::green(),
            default_curve: Curve::linear(),
        }
    }
}

impl CompOptions {
    /// Creates default options (110 x 33 grid, magenta splines, linear curve).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fusion_table::{CompOptions, Curve};
    ///
    /// let options = CompOptions::new();
    /// assert_eq!(options.default_curve, Curve::linear());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_grid_scale<X: Into<Number>, Y: Into<Number>>(mut self, x: X, y: Y) -> Self {
        self.grid_scale = (x.into(), y.into());
        self
    }

    #[must_use]
    pub fn with_spline_color(mut self, color: Rgba) -> Self {
        self.spline_color = color;
        self
    }

    #[must_use]
    pub fn with_xy_spline_colors(mut self, x: Rgba, y: Rgba) -> Self {
        self.x_spline_color = x;
        self.y_spline_color = y;
        self
    }

    #[must_use]
    pub fn with_default_curve(mut self, curve: Curve) -> Self {
        self.default_curve = curve;
        self
    }

    /// Converts grid coordinates into flow coordinates.
    pub fn node_position<X: Into<Number>, Y: Into<Number>>(&self, x: X, y: Y) -> (Number, Number) {
        (x.into() * self.grid_scale.0, y.into() * self.grid_scale.1)
    }
}
