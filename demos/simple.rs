//! Building tables by hand and the layout rules.
//!
//! Run with: cargo run --example simple

use fusion_table::{to_string, FuId, Key, Table, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // One non-null entry stays on one line
    let size = Table::new("Input").with("Value", 0.2).with("Expression", Value::Null);
    println!("Inline:\n{}\n", to_string(&size)?);

    // Two or more entries become a block
    let connected = Table::new("Input")
        .with("SourceOp", "Background1")
        .with("Source", "Output");
    println!("Block:\n{}\n", to_string(&connected)?);

    // Nesting a block child makes the parent a block as well
    let blur = Table::new("Blur")
        .with(
            "Inputs",
            Table::unnamed()
                .with("Filter", Table::new("Input").with("Value", FuId::gaussian()))
                .with("Input", connected),
        )
        .with("ViewInfo", Table::new("OperatorInfo").with("Pos", (110, 0)));
    println!("Tool:\n{}\n", to_string(&blur)?);

    // Frame keys sort numerically in ordered tables
    let mut keyframes = Table::unnamed().with_ordered_keys().with_force_indent();
    keyframes.insert(Key::frame(24), Table::unnamed().with(Key::Index(0), 1));
    keyframes.insert(Key::frame(0), Table::unnamed().with(Key::Index(0), 0));
    println!("Keyframes:\n{}", to_string(&keyframes)?);

    Ok(())
}
