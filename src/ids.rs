//! Identifiers known to the target application.
//!
//! [`FuId`] values are enumerated option names (blur filters, apply modes)
//! rendered as `FuID { "name" }`. The [`tool`] module lists the registry ids
//! of common tools.

use crate::Value;
use std::fmt;

/// An enumerated identifier, rendered `FuID { "name" }`.
///
/// # Examples
///
/// ```rust
/// use fusion_table::{render_value, FuId, Value};
///
/// let filter = Value::from(FuId::fast_gaussian());
/// assert_eq!(render_value(&filter).unwrap(), "FuID { \"Fast Gaussian\" }");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FuId(String);

impl FuId {
    pub fn new(name: impl Into<String>) -> Self {
        FuId(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    // Blur filters

    pub fn fast_gaussian() -> Self {
        FuId::new("Fast Gaussian")
    }

    pub fn gaussian() -> Self {
        FuId::new("Gaussian")
    }

    pub fn multi_box() -> Self {
        FuId::new("Multi-box")
    }

    pub fn box_filter() -> Self {
        FuId::new("Box")
    }

    pub fn bartlett() -> Self {
        FuId::new("Bartlett")
    }

    // Apply modes

    pub fn merge() -> Self {
        FuId::new("Merge")
    }

    pub fn add() -> Self {
        FuId::new("Add")
    }

    pub fn subtract() -> Self {
        FuId::new("Subtract")
    }

    pub fn minimum() -> Self {
        FuId::new("Minimum")
    }

    pub fn maximum() -> Self {
        FuId::new("Maximum")
    }

    pub fn average() -> Self {
        FuId::new("Average")
    }

    pub fn multiply() -> Self {
        FuId::new("Multiply")
    }

    pub fn replace() -> Self {
        FuId::new("Replace")
    }

    pub fn invert() -> Self {
        FuId::new("Invert")
    }

    pub fn copy() -> Self {
        FuId::new("Copy")
    }

    pub fn ignore() -> Self {
        FuId::new("Ignore")
    }
}

impl fmt::Display for FuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FuID {{ \"{}\" }}", self.0)
    }
}

impl From<FuId> for Value {
    fn from(value: FuId) -> Self {
        Value::FuId(value.0)
    }
}

/// Registry ids of common tools.
pub mod tool {
    // Media
    pub const MEDIA_IN: &str = "MediaIn";
    pub const MEDIA_OUT: &str = "MediaOut";
    pub const LOADER: &str = "Loader";
    pub const SAVER: &str = "Saver";

    // Generators
    pub const BACKGROUND: &str = "Background";
    pub const TEXT: &str = "TextPlus";
    pub const FAST_NOISE: &str = "FastNoise";
    pub const PAINT: &str = "Paint";

    // Effects
    pub const COLOR_CORRECTOR: &str = "ColorCorrector";
    pub const COLOR_CURVES: &str = "ColorCurves";
    pub const BRIGHTNESS_CONTRAST: &str = "BrightnessContrast";
    pub const BLUR: &str = "Blur";

    // Transform and composite
    pub const TRANSFORM: &str = "Transform";
    pub const MERGE: &str = "Merge";
    pub const DISSOLVE: &str = "Dissolve";
    pub const CHANNEL_BOOLEANS: &str = "ChannelBooleans";
    pub const MATTE_CONTROL: &str = "MatteControl";

    // Masks
    pub const RECTANGLE_MASK: &str = "RectangleMask";
    pub const ELLIPSE_MASK: &str = "EllipseMask";
    pub const POLYGON_MASK: &str = "PolylineMask";
    pub const BSPLINE_MASK: &str = "BSplineMask";

    // Shapes
    pub const S_RECTANGLE: &str = "sRectangle";
    pub const S_ELLIPSE: &str = "sEllipse";
    pub const S_NGON: &str = "sNGon";
    pub const S_RENDER: &str = "sRender";
    pub const S_MERGE: &str = "sMerge";
    pub const S_TRANSFORM: &str = "sTransform";
    pub const S_OUTLINE: &str = "sOutline";

    // Modifiers
    pub const BEZIER_SPLINE: &str = "BezierSpline";
    pub const XY_PATH: &str = "XYPath";
    pub const PUBLISH_NUMBER: &str = "PublishNumber";
    pub const PUBLISH_TEXT: &str = "PublishText";
    pub const PUBLISH_POINT: &str = "PublishPoint";
    pub const PUBLISH_FUID: &str = "PublishFuID";

    pub const MACRO: &str = "MacroOperator";
}

/// `LINKID_DataType` values for user controls.
pub mod data_type {
    pub const NUMBER: &str = "Number";
    pub const POINT: &str = "Point";
    pub const TEXT: &str = "Text";
}

/// `INPID_InputControl` values for user controls.
pub mod input_control {
    pub const SLIDER: &str = "SliderControl";
    pub const COMBO: &str = "ComboControl";
    pub const SCREW: &str = "ScrewControl";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fu_id_value() {
        assert_eq!(Value::from(FuId::multi_box()), Value::FuId("Multi-box".to_string()));
        assert_eq!(FuId::replace().to_string(), "FuID { \"Replace\" }");
    }
}
