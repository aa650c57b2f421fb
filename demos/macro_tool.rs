//! Grouping tools into a macro with exposed controls.
//!
//! Run with: cargo run --example macro_tool

use fusion_table::{Composition, Macro, Rgba, Table, Tool, UserControl};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let bg = Tool::background("TestBG", Rgba::rgb(1.0, 1.0, 0.2));
    let mut title = Tool::text("TestTXT", "Hello world!").at(0, 1);
    title.add_user_control(
        UserControl::new("Glow Amount")
            .on_page("Controls")
            .with_scale(0, 1)
            .with_default(0.25),
    );
    let mut merge = Tool::new("Merge", "TestMerge").at(0, 2);
    merge
        .connect_source("Background", "TestBG", "Output")
        .connect_source("Foreground", "TestTXT", "Output");

    let mut group = Macro::new("TitleCard")
        .with_tool(bg)
        .with_tool(title)
        .with_tool(merge);

    let page = Table::unnamed().with("Page", "Controls");
    group.add_color_input("TestBG", 1, "TopLeft", "", &page)?;
    group
        .add_instance_input("TestTXT", "StyledText")?
        .set_property("Name", "Title");
    group
        .add_instance_input("TestTXT", "Size")?
        .set_default(0.08);
    group.add_instance_output("TestMerge")?;
    group.set_tile_color(Rgba::rgb(0.5, 1.0, 0.0));

    let mut comp = Composition::new();
    comp.add_macro(group);
    comp.save(std::env::temp_dir().join("TitleCard.setting"))?;

    println!("{}", comp.to_text()?);
    Ok(())
}
