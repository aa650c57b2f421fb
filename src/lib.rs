//! # fusion_table
//!
//! Builds node graphs for the Fusion compositor and renders them in its
//! brace-delimited scene description format, the text that is pasted into
//! the node editor or saved as a `.setting` file.
//!
//! ## What it does
//!
//! - **Table rendering**: a [`Table`] is a type tag plus ordered entries.
//!   Small tables stay on one line, bigger ones become tab-indented blocks,
//!   and null entries disappear.
//! - **Keyframe animation**: a [`Spline`] holds keyframes, and a [`Curve`]
//!   shapes the Bezier handles between them. Handles are recomputed from the
//!   neighbouring keyframes every time the spline is rendered.
//! - **Composition building**: [`Tool`], [`Macro`] and [`Composition`] wire
//!   inputs, masks, published values and animated inputs together.
//! - **Serde bridge**: any `Serialize` struct can become a named table.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! fusion_table = "0.1"
//! ```
//!
//! ### Rendering a table
//!
//! ```rust
//! use fusion_table::{to_string, Table};
//!
//! let inputs = Table::unnamed()
//!     .with("Width", Table::new("Input").with("Value", 1920))
//!     .with("Height", Table::new("Input").with("Value", 1080));
//! let bg = Table::new("Background").with("Inputs", inputs);
//!
//! assert_eq!(
//!     to_string(&bg).unwrap(),
//!     "Background { \n\
//!      \tInputs = { \n\
//!      \t\tWidth = Input { Value = 1920, }, \n\
//!      \t\tHeight = Input { Value = 1080, }, \n\
//!      \t}, \n\
//!      }"
//! );
//! ```
//!
//! ### Animating an input
//!
//! ```rust
//! use fusion_table::{Composition, Curve, Tool};
//!
//! let mut comp = Composition::new();
//! comp.add_tool(Tool::new("Blur", "Blur1"));
//!
//! comp.animate("Blur1", "XBlurSize", Some(Curve::ease_in_and_out()))
//!     .unwrap()
//!     .add_keyframes([(0, 0), (24, 1)], None);
//!
//! let text = comp.to_text().unwrap();
//! assert!(text.contains("[0] = { 0, RH = { 8.0, 0 }, }"));
//! assert!(text.contains("[24] = { 1, LH = { 16.0, 1 }, }"));
//! ```
//!
//! ### Building tables with the table! macro
//!
//! ```rust
//! use fusion_table::table;
//!
//! let mask = table!(RectangleMask {
//!     Inputs = { MaskWidth = Input { Value = 1920 } },
//! });
//! assert_eq!(
//!     mask.to_string(),
//!     "RectangleMask { Inputs = { MaskWidth = Input { Value = 1920, }, }, }"
//! );
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Rendering is all-or-nothing: unsupported values (NaN, nested tables in
//!   point tuples) return an [`Error`] and no partial text
//! - `Display` reports unsupported values as `fmt::Error`; use [`to_string`]
//!   to get the typed error instead
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - tables by hand and the layout rules
//! - **`macro.rs`** - the table! macro
//! - **`animation.rs`** - splines, curves and XY paths in a composition
//! - **`macro_tool.rs`** - grouping tools into a macro with exposed controls
//!
//! Run any example with: `cargo run --example <name>`

pub mod color;
pub mod comp;
pub mod curve;
pub mod error;
pub mod ids;
pub mod macros;
pub mod options;
pub mod render;
pub mod ser;
pub mod spline;
pub mod table;
pub mod value;

pub use color::Rgba;
pub use comp::{
    Composition, Input, InstanceInput, InstanceOutput, Macro, Modifier, Operator, PathMethod, Tool,
    UserControl, XyPath,
};
pub use curve::{Curve, HandleShape, DEFAULT_STRENGTH};
pub use error::{Error, Result};
pub use ids::FuId;
pub use options::CompOptions;
pub use render::{must_indent, render_table, render_value};
pub use ser::{to_value, ValueSerializer};
pub use spline::{compute_handles, Handle, Handles, Keyframe, KeyframeFlags, KeyframeValue, Spline};
pub use table::{Key, Table};
pub use value::{Number, Value};

use serde::Serialize;
use std::io;

/// Renders a table to text.
///
/// # Examples
///
/// ```rust
/// use fusion_table::{to_string, Table};
///
/// let info = Table::new("GroupInfo").with("Pos", (0, 0));
/// assert_eq!(to_string(&info).unwrap(), "GroupInfo { Pos = { 0, 0 }, }");
/// ```
///
/// # Errors
///
/// Returns an error if the table holds a value the format cannot express.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(table: &Table) -> Result<String> {
    render_table(table)
}

/// Renders a table into a writer.
///
/// # Examples
///
/// ```rust
/// use fusion_table::{to_writer, Table};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Table::new("Polyline")).unwrap();
/// assert_eq!(buffer, b"Polyline { }");
/// ```
///
/// # Errors
///
/// Returns an error if rendering fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, table: &Table) -> Result<()>
where
    W: io::Write,
{
    let text = render_table(table)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Converts any `T: Serialize` through [`to_value`] and renders the result.
///
/// Structs render as tables named after the struct; other values render as
/// they would on the right-hand side of an entry.
///
/// # Examples
///
/// ```rust
/// use fusion_table::value_to_string;
/// use serde::Serialize;
///
/// #[allow(non_snake_case)]
/// #[derive(Serialize)]
/// struct OperatorInfo { Pos: (i32, i32) }
///
/// let text = value_to_string(&OperatorInfo { Pos: (110, 0) }).unwrap();
/// assert_eq!(text, "OperatorInfo { Pos = { 110, 0 }, }");
/// assert_eq!(value_to_string(&0.5).unwrap(), "0.5");
/// ```
///
/// # Errors
///
/// Returns an error if conversion fails, the value is null, or it holds
/// something the format cannot express.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn value_to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    match to_value(value)? {
        Value::Table(table) => render_table(&table),
        other => render_value(&other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[allow(non_snake_case)]
    #[derive(Serialize)]
    struct Input {
        Value: f64,
    }

    #[allow(non_snake_case)]
    #[derive(Serialize)]
    struct Transform {
        Size: Input,
        Angle: Input,
        Pivot: Option<(f64, f64)>,
    }

    #[test]
    fn test_value_to_string_struct() {
        let xf = Transform {
            Size: Input { Value: 2.0 },
            Angle: Input { Value: 45.0 },
            Pivot: None,
        };
        assert_eq!(
            value_to_string(&xf).unwrap(),
            "Transform { \n\tSize = Input { Value = 2.0, }, \n\tAngle = Input { Value = 45.0, }, \n}"
        );
    }

    #[test]
    fn test_value_to_string_scalar() {
        assert_eq!(value_to_string("Mask").unwrap(), "\"Mask\"");
        assert!(value_to_string(&Option::<i32>::None).is_err());
    }

    #[test]
    fn test_to_writer_matches_to_string() {
        let table = Table::new("Input").with("Value", 1);
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &table).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), to_string(&table).unwrap());
    }

    #[test]
    fn test_to_writer_propagates_render_errors() {
        let table = Table::unnamed().with("Value", f64::INFINITY);
        assert!(matches!(
            to_writer(Vec::new(), &table),
            Err(Error::UnsupportedValue(_))
        ));
    }
}
