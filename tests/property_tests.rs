//! Property-based tests for the layout rules and keyframe handles.
//!
//! The layout rules only look at how many non-null entries a table has and at
//! its nested children, so tables are generated with a mix of scalars and
//! nulls and checked against those rules.

use fusion_table::{
    compute_handles, must_indent, render_table, Curve, KeyframeValue, Number, Table, Value,
};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[A-Za-z][A-Za-z0-9]{0,8}".prop_map(Value::from),
    ]
}

fn flat_table() -> impl Strategy<Value = Table> {
    prop::collection::vec(scalar(), 0..6).prop_map(|values| {
        let mut table = Table::new("Input");
        for (i, value) in values.into_iter().enumerate() {
            table.insert(format!("Key{i}"), value);
        }
        table
    })
}

fn curve() -> impl Strategy<Value = Curve> {
    (0usize..7, 0.0f64..=1.0).prop_map(|(kind, s)| match kind {
        0 => Curve::linear(),
        1 => Curve::ease_in_with(s),
        2 => Curve::ease_out_with(s),
        3 => Curve::ease_in_and_out_with(s),
        4 => Curve::decelerate_in_with(s),
        5 => Curve::decelerate_out_with(s),
        _ => Curve::decelerate_in_and_out_with(s),
    })
}

proptest! {
    #[test]
    fn prop_collapse_follows_non_null_count(table in flat_table()) {
        let text = render_table(&table).unwrap();
        if table.len() <= 1 {
            prop_assert!(!must_indent(&table));
            prop_assert!(!text.contains('\n'));
        } else {
            prop_assert!(must_indent(&table));
            prop_assert!(text.starts_with("Input { \n"), "text must start with the Input opener");
            prop_assert!(text.ends_with("\n}"), "text must end with the closing brace");
        }
    }

    #[test]
    fn prop_nulls_are_never_rendered(table in flat_table()) {
        let text = render_table(&table).unwrap();
        for (key, value) in &table {
            let entry = format!("{key} =");
            prop_assert_eq!(text.contains(&entry), !value.is_null());
        }
    }

    #[test]
    fn prop_rendering_is_deterministic(table in flat_table()) {
        prop_assert_eq!(render_table(&table).unwrap(), render_table(&table.clone()).unwrap());
    }

    #[test]
    fn prop_force_unindent_wins(table in flat_table()) {
        let table = table.with_force_indent().with_force_unindent();
        prop_assert!(!must_indent(&table));
        prop_assert!(!render_table(&table).unwrap().contains('\n'));
    }

    #[test]
    fn prop_force_indent_always_blocks(table in flat_table()) {
        let table = table.with_force_indent();
        prop_assert!(must_indent(&table));
        prop_assert!(render_table(&table).unwrap().starts_with("Input { \n"), "rendered table must start with the Input opener");
    }

    #[test]
    fn prop_block_child_makes_parent_block(table in flat_table()) {
        let parent = Table::new("Tool").with("Inputs", table.clone());
        prop_assert_eq!(must_indent(&parent), must_indent(&table));
    }

    #[test]
    fn prop_first_and_last_keyframes_have_outer_handles_absent(
        values in prop::collection::vec(-1000i64..1000, 1..8),
        curve in curve(),
    ) {
        let keyframes: Vec<(Number, KeyframeValue)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (Number::from(i as i64 * 6), KeyframeValue::from(*v)))
            .collect();
        let handles = compute_handles(&keyframes, &vec![curve; keyframes.len()]);

        prop_assert_eq!(handles.len(), keyframes.len());
        prop_assert!(handles[0].left.is_none());
        prop_assert!(handles[handles.len() - 1].right.is_none());
    }

    #[test]
    fn prop_handles_stay_between_neighbouring_frames(
        values in prop::collection::vec(-1000i64..1000, 2..8),
        curve in curve(),
    ) {
        let keyframes: Vec<(Number, KeyframeValue)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (Number::from(i as i64 * 6), KeyframeValue::from(*v)))
            .collect();
        let handles = compute_handles(&keyframes, &vec![curve; keyframes.len()]);

        for (i, h) in handles.iter().enumerate() {
            let frame = keyframes[i].0.as_f64();
            if let Some((x, _)) = h.left {
                prop_assert!(x.as_f64() <= frame);
                prop_assert!(x.as_f64() >= keyframes[i - 1].0.as_f64());
            }
            if let Some((x, _)) = h.right {
                prop_assert!(x.as_f64() >= frame);
                prop_assert!(x.as_f64() <= keyframes[i + 1].0.as_f64());
            }
        }
    }
}
