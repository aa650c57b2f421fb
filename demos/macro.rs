//! Using the table! macro to write tables in their rendered shape.
//!
//! Run with: cargo run --example macro

use fusion_table::{table, to_string, FuId};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let input = table!(Input { Value = 42 });
    println!("Input:\n  {}\n", to_string(&input)?);

    let width = 1920;
    let mask = table!(RectangleMask {
        Inputs = {
            MaskWidth = Input { Value = width },
            MaskHeight = Input { Value = 1080 },
            Center = Input { Value = (0.5, 0.5) },
            Filter = Input { Value = FuId::fast_gaussian() },
            Invert = null,
        },
        ViewInfo = OperatorInfo { Pos = (0, 33) },
    });
    println!("Mask:\n{}\n", to_string(&mask)?);

    let spline = table!(BezierSpline {
        SplineColor = { Red = 255, Green = 0, Blue = 255 },
        KeyFrames = {
            [0] = { Value = 0 },
            [24] = { Value = 1 },
        },
    });
    println!("Spline:\n{}", to_string(&spline)?);

    Ok(())
}
