/// Builds a [`Table`](crate::Table) with the same shape it renders to.
///
/// Keys are bare identifiers or `[frame]` expressions. Values may be nested
/// `Name { .. }` or `{ .. }` tables, `[a, b]` sequences, `(x, y)` point
/// tuples, `null`, or any expression convertible into a
/// [`Value`](crate::Value).
///
/// ```rust
/// use fusion_table::table;
///
/// let bg = table!(Background {
///     Inputs = {
///         Width = Input { Value = 1920 },
///         Height = Input { Value = 1080 },
///     },
///     ViewInfo = OperatorInfo { Pos = (0, 66) },
/// });
///
/// assert_eq!(bg.name(), "Background");
/// assert!(bg.to_string().contains("ViewInfo = OperatorInfo { Pos = { 0, 66 }, }"));
/// ```
#[macro_export]
macro_rules! table {
    ($name:ident { $($body:tt)* }) => {{
        #[allow(unused_mut)]
        let mut table = $crate::Table::new(stringify!($name));
        $crate::table!(@entries table $($body)*);
        table
    }};

    ({ $($body:tt)* }) => {{
        #[allow(unused_mut)]
        let mut table = $crate::Table::unnamed();
        $crate::table!(@entries table $($body)*);
        table
    }};

    (@entries $t:ident) => {};

    // Named nested table
    (@entries $t:ident $key:tt = $name:ident { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $t.insert($crate::table!(@key $key), $crate::table!($name { $($inner)* }));
        $crate::table!(@entries $t $($($rest)*)?);
    };

    // Anonymous nested table
    (@entries $t:ident $key:tt = { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $t.insert($crate::table!(@key $key), $crate::table!({ $($inner)* }));
        $crate::table!(@entries $t $($($rest)*)?);
    };

    // Sequence
    (@entries $t:ident $key:tt = [ $($item:tt),* $(,)? ] $(, $($rest:tt)*)?) => {
        $t.insert(
            $crate::table!(@key $key),
            $crate::Value::Sequence(vec![$($crate::table!(@item $item)),*]),
        );
        $crate::table!(@entries $t $($($rest)*)?);
    };

    // Point tuple
    (@entries $t:ident $key:tt = ( $($elem:expr),+ $(,)? ) $(, $($rest:tt)*)?) => {
        $t.insert(
            $crate::table!(@key $key),
            $crate::Value::Tuple(vec![$($crate::Value::from($elem)),+]),
        );
        $crate::table!(@entries $t $($($rest)*)?);
    };

    (@entries $t:ident $key:tt = null $(, $($rest:tt)*)?) => {
        $t.insert($crate::table!(@key $key), $crate::Value::Null);
        $crate::table!(@entries $t $($($rest)*)?);
    };

    (@entries $t:ident $key:tt = $value:expr $(, $($rest:tt)*)?) => {
        $t.insert($crate::table!(@key $key), $value);
        $crate::table!(@entries $t $($($rest)*)?);
    };

    (@key [$frame:expr]) => {
        $crate::Key::frame($frame)
    };

    (@key $name:ident) => {
        stringify!($name)
    };

    (@item null) => {
        $crate::Value::Null
    };

    (@item { $($inner:tt)* }) => {
        $crate::Value::Table($crate::table!({ $($inner)* }))
    };

    (@item ( $($elem:expr),+ $(,)? )) => {
        $crate::Value::Tuple(vec![$($crate::Value::from($elem)),+])
    };

    (@item $value:expr) => {
        $crate::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Key, Number, Table, Value};

    #[test]
    fn test_table_macro_empty() {
        assert_eq!(table!(RectangleMask {}), Table::new("RectangleMask"));
        assert_eq!(table!({}), Table::unnamed());
    }

    #[test]
    fn test_table_macro_scalars() {
        let size = 2.5;
        let t = table!({
            Flag = true,
            Count = 3,
            Offset = -1,
            Size = size,
            Label = "Mask",
            Missing = null,
        });

        assert_eq!(t.get("Flag"), Some(&Value::Bool(true)));
        assert_eq!(t.get("Count"), Some(&Value::Number(Number::Integer(3))));
        assert_eq!(t.get("Offset"), Some(&Value::Number(Number::Integer(-1))));
        assert_eq!(t.get("Size"), Some(&Value::from(2.5)));
        assert_eq!(t.get("Label"), Some(&Value::from("Mask")));
        assert_eq!(t.raw_len(), 6);
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn test_table_macro_frames_and_sequences() {
        let t = table!({
            [0] = { Red = 255 },
            Points = [{ PublishID = "Point0" }, (0.5, 0.5), null],
        });

        assert!(t.get(Key::frame(0)).unwrap().is_table());
        let points = t.get("Points").unwrap().as_sequence().unwrap();
        assert_eq!(points.len(), 3);
        assert!(points[1].is_tuple());
    }
}
