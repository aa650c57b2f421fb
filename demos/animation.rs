//! A title that slides in over a background.
//!
//! Run with: cargo run --example animation

use fusion_table::{Composition, Curve, Rgba, Tool};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut comp = Composition::new();

    let mut title = Tool::text("MyTitle", "This is my title");
    title
        .set_input("Font", "Open Sans")
        .set_input("Size", 0.2)
        .set_input("Red1", 0.15)
        .set_input("Green1", 0.2)
        .set_input("Blue1", 0.9);
    comp.add_tool(title);

    let position = comp.animate_position(
        "MyTitle",
        "Center",
        Some(Curve::ease_in_with(0.75)),
        Some(Curve::linear()),
    )?;
    position.set(0, (-0.5, 0.5));
    position.set_x(24, 0.5);

    comp.animate("MyTitle", "Size", Some(Curve::ease_in_and_out()))?
        .add_keyframes([(0, 0.1), (12, 0.25), (24, 0.2)], None);

    comp.add_tool(Tool::background("OrangeBG", Rgba::rgb(1.0, 0.4, 0.1)).at(-1, 1));
    comp.add_merge("MergeTitle", Some("OrangeBG"), Some("MyTitle"), (0, 1))?;

    println!("{}", comp.to_text()?);
    Ok(())
}
