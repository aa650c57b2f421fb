//! Table rendering.
//!
//! This module turns a [`Table`] tree into the brace-delimited, tab-indented
//! text the Fusion scene loader reads:
//!
//! ```text
//! [name ]{ [<newline>] entry, entry, ... [<newline, closing-indent>]}
//! ```
//!
//! ## Layout
//!
//! Every table decides for itself whether it is written as an indented block
//! or on one line ([`must_indent`]):
//!
//! - `force_unindent` always means one line
//! - otherwise two or more non-null entries, `force_indent`, a nested table
//!   that is itself a block, or a nested sequence with two or more items all
//!   mean a block
//!
//! A block puts each entry on its own line behind `level` tabs and closes
//! behind `level - 1` tabs. Each nested table or sequence is one level deeper,
//! whether or not it ends up collapsed.
//!
//! ## Values
//!
//! | Value | Text |
//! |-------|------|
//! | `Null` | entry skipped |
//! | `Bool` | `true` / `false` |
//! | `Number` | `1920`, `0.25`, `8.0` |
//! | `Text` | `"Mask"` |
//! | `Tuple` | `{ 0.25, 0.5 }` |
//! | `FuId` | `FuID { "Merge" }` |
//! | `Table` | nested table, one level deeper |
//! | `Sequence` | `[` block of items `]`, one level deeper |
//!
//! ```rust
//! use fusion_table::{render_table, Table};
//!
//! let info = Table::new("OperatorInfo").with("Pos", (110, 0));
//! assert_eq!(render_table(&info).unwrap(), "OperatorInfo { Pos = { 110, 0 }, }");
//! ```

use crate::{Error, Key, Number, Result, Table, Value};
use log::trace;

/// Renders a table at the top level.
///
/// # Errors
///
/// Returns [`Error::UnsupportedValue`] if anything in the tree has no
/// spelling in the grammar. No partial text is returned.
pub fn render_table(table: &Table) -> Result<String> {
    let mut output = String::with_capacity(256);
    write_table(&mut output, table, 1)?;
    Ok(output)
}

/// Renders a single value as it would appear on the right of `key = `.
///
/// # Errors
///
/// Fails for `Null` (which has no text of its own) and for any unsupported
/// value inside the tree.
pub fn render_value(value: &Value) -> Result<String> {
    let mut output = String::with_capacity(64);
    write_value(&mut output, value, 1)?;
    Ok(output)
}

/// Decides whether a table is written as a multi-line block.
#[must_use]
pub fn must_indent(table: &Table) -> bool {
    if table.forces_unindent() {
        return false;
    }

    table.forces_indent()
        || table.len() >= 2
        || table.values().any(|value| match value {
            Value::Table(nested) => must_indent(nested),
            Value::Sequence(items) => non_null_count(items) >= 2,
            _ => false,
        })
}

fn non_null_count(items: &[Value]) -> usize {
    items.iter().filter(|v| !v.is_null()).count()
}

fn write_indent(output: &mut String, level: usize) {
    output.push_str(&"\t".repeat(level));
}

fn write_table(output: &mut String, table: &Table, level: usize) -> Result<()> {
    let block = must_indent(table);
    trace!(
        "table {:?} at level {}: {}",
        table.name(),
        level,
        if block { "block" } else { "inline" }
    );

    if !table.name().is_empty() {
        output.push_str(table.name());
        output.push(' ');
    }
    output.push_str("{ ");
    if block {
        output.push('\n');
    }

    for (key, value) in table.render_order() {
        if value.is_null() {
            continue;
        }

        if block {
            write_indent(output, level);
        }
        if !matches!(key, Key::Index(_)) {
            write_key(output, key)?;
            output.push_str(" = ");
        }
        write_value(output, value, level)?;
        output.push_str(", ");
        if block {
            output.push('\n');
        }
    }

    if block {
        write_indent(output, level.saturating_sub(1));
    }
    output.push('}');
    Ok(())
}

fn write_key(output: &mut String, key: &Key) -> Result<()> {
    if let Key::Frame(frame) = key {
        check_finite(frame)?;
    }
    output.push_str(&key.to_string());
    Ok(())
}

/// Writes a value that sits at `level`; nested tables and sequences go one deeper.
fn write_value(output: &mut String, value: &Value, level: usize) -> Result<()> {
    match value {
        Value::Null => Err(Error::unsupported_value(
            "null has no text outside of a table entry",
        )),
        Value::Table(nested) => write_table(output, nested, level + 1),
        Value::Sequence(items) => write_sequence(output, items, level + 1),
        Value::Tuple(items) => write_tuple(output, items),
        scalar => write_scalar(output, scalar),
    }
}

fn write_scalar(output: &mut String, value: &Value) -> Result<()> {
    match value {
        Value::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            check_finite(n)?;
            output.push_str(&n.to_string());
        }
        Value::Text(s) => {
            output.push('"');
            output.push_str(s);
            output.push('"');
        }
        Value::FuId(id) => {
            output.push_str("FuID { \"");
            output.push_str(id);
            output.push_str("\" }");
        }
        other => {
            return Err(Error::unsupported_value(format!(
                "expected a scalar, found {other:?}"
            )))
        }
    }
    Ok(())
}

fn write_tuple(output: &mut String, items: &[Value]) -> Result<()> {
    if items.is_empty() {
        output.push_str("{ }");
        return Ok(());
    }

    output.push_str("{ ");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            output.push_str(", ");
        }
        if !item.is_scalar() {
            return Err(Error::unsupported_value(format!(
                "tuple members must be scalars, found {item:?}"
            )));
        }
        write_scalar(output, item)?;
    }
    output.push_str(" }");
    Ok(())
}

fn write_sequence(output: &mut String, items: &[Value], level: usize) -> Result<()> {
    output.push_str("[\n");
    for item in items.iter().filter(|v| !v.is_null()) {
        write_indent(output, level);
        write_value(output, item, level)?;
        output.push_str(",\n");
    }
    write_indent(output, level.saturating_sub(1));
    output.push(']');
    Ok(())
}

fn check_finite(n: &Number) -> Result<()> {
    if n.is_finite() {
        Ok(())
    } else {
        Err(Error::unsupported_value(format!("non-finite number {n}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(value: impl Into<Value>) -> Table {
        Table::new("Input").with("Value", value)
    }

    #[test]
    fn test_single_entry_collapses() {
        assert_eq!(render_table(&input(1)).unwrap(), "Input { Value = 1, }");
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(render_table(&Table::new("RectangleMask")).unwrap(), "RectangleMask { }");
        assert_eq!(render_table(&Table::unnamed()).unwrap(), "{ }");
        assert_eq!(
            render_table(&Table::new("Polyline").with_force_indent()).unwrap(),
            "Polyline { \n}"
        );
    }

    #[test]
    fn test_two_entries_indent() {
        let table = Table::new("Input")
            .with("SourceOp", "Rectangle")
            .with("Source", "Mask");
        assert_eq!(
            render_table(&table).unwrap(),
            "Input { \n\tSourceOp = \"Rectangle\", \n\tSource = \"Mask\", \n}"
        );
    }

    #[test]
    fn test_force_unindent_wins() {
        let mut table = Table::unnamed()
            .with("Red", 255)
            .with("Green", 0)
            .with_force_indent()
            .with_force_unindent();
        assert_eq!(render_table(&table).unwrap(), "{ Red = 255, Green = 0, }");

        table.set_force_unindent(false);
        assert!(must_indent(&table));
    }

    #[test]
    fn test_nested_block_propagates_upward() {
        let inputs = Table::unnamed().with("Width", input(1920)).with("Height", input(1080));
        let tool = Table::new("Background").with("Inputs", inputs);

        assert!(must_indent(&tool));
        assert_eq!(
            render_table(&tool).unwrap(),
            "Background { \n\
             \tInputs = { \n\
             \t\tWidth = Input { Value = 1920, }, \n\
             \t\tHeight = Input { Value = 1080, }, \n\
             \t}, \n\
             }"
        );
    }

    #[test]
    fn test_nulls_are_invisible() {
        let with_null = Table::unnamed().with("A", 1).with("B", Value::Null);
        let without = Table::unnamed().with("A", 1);
        assert_eq!(render_table(&with_null).unwrap(), render_table(&without).unwrap());
        assert_eq!(render_table(&without).unwrap(), "{ A = 1, }");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(render_value(&Value::from(true)).unwrap(), "true");
        assert_eq!(render_value(&Value::from(false)).unwrap(), "false");
        assert_eq!(render_value(&Value::from("Hello")).unwrap(), "\"Hello\"");
        assert_eq!(render_value(&Value::from(0.5)).unwrap(), "0.5");
        assert_eq!(
            render_value(&Value::FuId("Fast Gaussian".to_string())).unwrap(),
            "FuID { \"Fast Gaussian\" }"
        );
    }

    #[test]
    fn test_point_tuple() {
        assert_eq!(render_value(&Value::from((0.25, 0.5))).unwrap(), "{ 0.25, 0.5 }");
        let nested = Table::unnamed().with("A", Table::new("X").with("Pos", (0.25, 0.5)));
        assert!(render_table(&nested).unwrap().contains("Pos = { 0.25, 0.5 }"));
    }

    #[test]
    fn test_frame_and_index_keys() {
        let kf = Table::unnamed()
            .with(Key::Index(0), 0)
            .with("RH", (8.0, 0))
            .with_force_unindent();
        let frames = Table::unnamed().with(Key::frame(0), kf);
        assert_eq!(render_table(&frames).unwrap(), "{ [0] = { 0, RH = { 8.0, 0 }, }, }");
    }

    #[test]
    fn test_sequence_layout() {
        let points = vec![
            Table::unnamed().with("PublishID", "Point0"),
            Table::unnamed().with("PublishID", "Point1"),
        ];
        let polyline = Table::new("Polyline").with("Points", points);
        assert_eq!(
            render_table(&polyline).unwrap(),
            "Polyline { \n\
             \tPoints = [\n\
             \t\t{ PublishID = \"Point0\", },\n\
             \t\t{ PublishID = \"Point1\", },\n\
             \t], \n\
             }"
        );
    }

    #[test]
    fn test_single_item_sequence_keeps_bracket_shape() {
        let table = Table::unnamed().with("Points", vec![1]);
        assert!(!must_indent(&table));
        assert_eq!(render_table(&table).unwrap(), "{ Points = [\n\t\t1,\n\t], }");
    }

    #[test]
    fn test_sequence_nulls_skipped_and_not_counted() {
        let table = Table::unnamed().with("Points", vec![Value::from(1), Value::Null]);
        assert!(!must_indent(&table));
    }

    #[test]
    fn test_unsupported_values_fail() {
        let nan = Table::unnamed().with("Value", f64::NAN);
        assert!(matches!(render_table(&nan), Err(Error::UnsupportedValue(_))));

        let bad_tuple = Table::unnamed().with("Pos", Value::Tuple(vec![Value::from(Table::unnamed())]));
        assert!(matches!(render_table(&bad_tuple), Err(Error::UnsupportedValue(_))));

        let bad_frame = Table::unnamed().with(Key::frame(f64::INFINITY), 1);
        assert!(render_table(&bad_frame).is_err());

        assert!(render_value(&Value::Null).is_err());
    }
}
