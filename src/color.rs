//! Colors as Fusion expects them.
//!
//! Tool inputs take 0..1 floats per channel, premultiplied by alpha unless
//! asked otherwise. Spline colors are 0..255 integers. Macro tile colors are
//! `{ R, G, B }` floats.

use crate::Table;

/// An RGB + alpha color using 0..1 floats.
///
/// # Examples
///
/// ```rust
/// use fusion_table::Rgba;
///
/// let half = Rgba::new(1.0, 0.5, 0.0, 0.5);
/// assert_eq!(half.red, 0.5);
/// assert_eq!(half.green, 0.25);
///
/// let straight = Rgba::straight(1.0, 0.5, 0.0, 0.5);
/// assert_eq!(straight.red, 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Default for Rgba {
    /// Opaque black.
    fn default() -> Self {
        Rgba::rgb(0.0, 0.0, 0.0)
    }
}

impl Rgba {
    /// Creates a premultiplied color.
    #[must_use]
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Rgba {
            red: red * alpha,
            green: green * alpha,
            blue: blue * alpha,
            alpha,
        }
    }

    /// Creates an opaque color.
    #[must_use]
    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Rgba::new(red, green, blue, 1.0)
    }

    /// Creates a color whose channels are stored as given.
    #[must_use]
    pub fn straight(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Rgba {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub fn red() -> Self {
        Rgba::rgb(1.0, 0.0, 0.0)
    }

    #[must_use]
    pub fn green() -> Self {
        Rgba::rgb(0.0, 1.0, 0.0)
    }

    #[must_use]
    pub fn magenta() -> Self {
        Rgba::rgb(1.0, 0.0, 1.0)
    }

    /// `SplineColor = { Red = 255, Green = 0, Blue = 255, }`
    #[must_use]
    pub fn to_spline_color(&self) -> Table {
        Table::unnamed()
            .with("Red", to_byte(self.red))
            .with("Green", to_byte(self.green))
            .with("Blue", to_byte(self.blue))
            .with_force_unindent()
    }

    /// `TileColor = { R = 0.5, G = 1.0, B = 1.0, }`
    #[must_use]
    pub fn to_tile_color(&self) -> Table {
        Table::unnamed()
            .with("R", self.red)
            .with("G", self.green)
            .with("B", self.blue)
            .with_force_unindent()
    }
}

fn to_byte(channel: f64) -> i64 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spline_color() {
        assert_eq!(
            Rgba::magenta().to_spline_color().to_string(),
            "{ Red = 255, Green = 0, Blue = 255, }"
        );
    }

    #[test]
    fn test_tile_color() {
        assert_eq!(
            Rgba::rgb(0.5, 1.0, 1.0).to_tile_color().to_string(),
            "{ R = 0.5, G = 1.0, B = 1.0, }"
        );
    }

    #[test]
    fn test_default_is_opaque_black() {
        let black = Rgba::default();
        assert_eq!((black.red, black.alpha), (0.0, 1.0));
    }
}
