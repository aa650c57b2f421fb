//! The [`Table`] type: the unit every Fusion object serializes to.
//!
//! A table is an optional type tag (`Background`, `Input`, `BezierSpline`, ...)
//! in front of an ordered map of entries. Entries keep insertion order, backed
//! by [`IndexMap`], because the target application reads tools and inputs in
//! the order they are written. Keyframe tables are the exception: they are
//! marked [`Table::with_ordered_keys`] and always render in ascending frame
//! order.
//!
//! ## Examples
//!
//! ```rust
//! use fusion_table::{Key, Table, Value};
//!
//! let mut input = Table::new("Input");
//! input.insert("Value", 1920);
//! input.insert("Expression", None::<String>);
//!
//! // Null entries are kept but do not count
//! assert_eq!(input.len(), 1);
//! assert_eq!(input.raw_len(), 2);
//! assert_eq!(input.to_string(), "Input { Value = 1920, }");
//!
//! let mut keyframes = Table::unnamed().with_ordered_keys();
//! keyframes.insert(Key::frame(24), 1);
//! keyframes.insert(Key::frame(0), 0);
//! let frames: Vec<_> = keyframes.keys().map(|k| k.to_string()).collect();
//! assert_eq!(frames, vec!["[24]", "[0]"]);
//! ```

use crate::{Number, Value};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

/// A table key.
///
/// - `Name` renders bare: `Width = 1920`
/// - `Frame` renders in brackets: `[24] = { 1 }`
/// - `Index` is a positional entry and renders only its value: `{ 0, RH = { 8.0, 0 } }`
#[derive(Clone, Debug)]
pub enum Key {
    Name(String),
    Frame(Number),
    Index(usize),
}

impl Key {
    /// Creates a frame key.
    pub fn frame<N: Into<Number>>(frame: N) -> Self {
        Key::Frame(frame.into())
    }

    fn rank(&self) -> u8 {
        match self {
            Key::Index(_) => 0,
            Key::Frame(_) => 1,
            Key::Name(_) => 2,
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Name(a), Key::Name(b)) => a == b,
            (Key::Frame(a), Key::Frame(b)) => a == b,
            (Key::Index(a), Key::Index(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Key::Name(name) => name.hash(state),
            // 24 and 24.0 are the same frame; -0.0 folds into 0.0
            Key::Frame(n) => (n.as_f64() + 0.0).to_bits().hash(state),
            Key::Index(i) => i.hash(state),
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Name(a), Key::Name(b)) => a.cmp(b),
            (Key::Frame(a), Key::Frame(b)) => a.total_cmp(b),
            (Key::Index(a), Key::Index(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Frame(n) => write!(f, "[{}]", n),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Name(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Name(value)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Key::Name(value.clone())
    }
}

impl From<Number> for Key {
    fn from(value: Number) -> Self {
        Key::Frame(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Frame(Number::from(value))
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Frame(Number::from(value))
    }
}

impl From<f64> for Key {
    fn from(value: f64) -> Self {
        Key::Frame(Number::from(value))
    }
}

/// A named or anonymous table of ordered entries.
///
/// Layout is decided at render time (see [`crate::render`]): a table with two
/// or more non-null entries becomes an indented block, a smaller one stays on
/// one line. The two flags override that decision, and `force_unindent` wins
/// whenever both are set.
///
/// # Examples
///
/// ```rust
/// use fusion_table::Table;
///
/// let mut bg = Table::new("Background");
/// bg.insert("TopLeftRed", 1);
/// bg.insert("UseFrameFormatSettings", 1);
///
/// assert_eq!(
///     bg.to_string(),
///     "Background { \n\tTopLeftRed = 1, \n\tUseFrameFormatSettings = 1, \n}"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    name: String,
    entries: IndexMap<Key, Value>,
    force_indent: bool,
    force_unindent: bool,
    ordered: bool,
}

impl Table {
    /// Creates an empty table with a type tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates an empty anonymous table.
    #[must_use]
    pub fn unnamed() -> Self {
        Self::default()
    }

    /// Always render as a multi-line block.
    #[must_use]
    pub fn with_force_indent(mut self) -> Self {
        self.force_indent = true;
        self
    }

    /// Always render on one line. Takes precedence over `force_indent`.
    #[must_use]
    pub fn with_force_unindent(mut self) -> Self {
        self.force_unindent = true;
        self
    }

    /// Render entries sorted by key instead of insertion order.
    #[must_use]
    pub fn with_ordered_keys(mut self) -> Self {
        self.ordered = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn forces_indent(&self) -> bool {
        self.force_indent
    }

    pub fn set_force_indent(&mut self, force: bool) {
        self.force_indent = force;
    }

    #[must_use]
    pub fn forces_unindent(&self) -> bool {
        self.force_unindent
    }

    pub fn set_force_unindent(&mut self, force: bool) {
        self.force_unindent = force;
    }

    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// Inserts an entry, returning the value it replaced.
    ///
    /// Writing an existing key overwrites in place and keeps the key's
    /// original position.
    pub fn insert<K: Into<Key>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`Table::insert`].
    #[must_use]
    pub fn with<K: Into<Key>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get<K: Into<Key>>(&self, key: K) -> Option<&Value> {
        self.entries.get(&key.into())
    }

    pub fn get_mut<K: Into<Key>>(&mut self, key: K) -> Option<&mut Value> {
        self.entries.get_mut(&key.into())
    }

    /// Returns the nested table stored under `key`, if any.
    pub fn table_mut<K: Into<Key>>(&mut self, key: K) -> Option<&mut Table> {
        self.get_mut(key).and_then(Value::as_table_mut)
    }

    /// Removes an entry while keeping the order of the others.
    pub fn remove<K: Into<Key>>(&mut self, key: K) -> Option<Value> {
        self.entries.shift_remove(&key.into())
    }

    #[must_use]
    pub fn contains_key<K: Into<Key>>(&self, key: K) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Number of non-null entries. This is the count the renderer uses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().filter(|v| !v.is_null()).count()
    }

    /// Number of stored entries, nulls included.
    #[must_use]
    pub fn raw_len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no non-null entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, Key, Value> {
        self.entries.values()
    }

    /// Iterates entries in insertion order, nulls included.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.entries.iter()
    }

    /// Entries in the order they are written out.
    pub(crate) fn render_order(&self) -> Vec<(&Key, &Value)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        if self.ordered {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }
        entries
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = crate::render::render_table(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Index<&str> for Table {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if the key is not present, like `HashMap` indexing.
    fn index(&self, key: &str) -> &Value {
        match self.entries.get(&Key::from(key)) {
            Some(value) => value,
            None => panic!("no entry named {key:?} in table {:?}", self.name),
        }
    }
}

impl IndexMut<&str> for Table {
    /// Inserts a null entry first when the key is missing.
    fn index_mut(&mut self, key: &str) -> &mut Value {
        self.entries.entry(Key::from(key)).or_insert(Value::Null)
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for Table {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Table {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Table::unnamed();
        table.extend(iter);
        table
    }
}

impl IntoIterator for Table {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_integer_frames_stay_distinct() {
        let two_53 = 1i64 << 53;
        let mut table = Table::unnamed().with_ordered_keys();
        table.insert(Key::frame(two_53 + 1), 1);
        table.insert(Key::frame(two_53), 2);
        table.insert(Key::frame(two_53 as f64), 3);

        assert_eq!(table.raw_len(), 2);
        assert_eq!(table.get(Key::frame(two_53)), Some(&Value::from(3)));
        assert!(Key::frame(two_53) < Key::frame(two_53 + 1));
        assert_ne!(Key::frame(two_53), Key::frame(two_53 + 1));
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut table = Table::unnamed();
        table.insert("A", 1);
        table.insert("B", 2);
        let old = table.insert("A", 3);

        assert_eq!(old, Some(Value::from(1)));
        let keys: Vec<_> = table.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(table["A"], Value::from(3));
    }

    #[test]
    fn test_len_ignores_nulls() {
        let table = Table::new("Input")
            .with("Value", 1)
            .with("Expression", Value::Null);
        assert_eq!(table.len(), 1);
        assert_eq!(table.raw_len(), 2);
        assert!(!table.is_empty());
        assert!(Table::unnamed().with("A", Value::Null).is_empty());
    }

    #[test]
    fn test_frame_keys_compare_numerically() {
        let mut table = Table::unnamed();
        table.insert(Key::frame(24), 1);
        table.insert(Key::frame(24.0), 2);
        assert_eq!(table.raw_len(), 1);
        assert_eq!(table.get(Key::frame(24)), Some(&Value::from(2)));
    }

    #[test]
    fn test_render_order_sorts_only_when_ordered() {
        let mut table = Table::unnamed();
        table.insert(Key::frame(12), 1);
        table.insert(Key::frame(0), 0);

        let insertion: Vec<_> = table.render_order().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(insertion, vec!["[12]", "[0]"]);

        let table = table.with_ordered_keys();
        let sorted: Vec<_> = table.render_order().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(sorted, vec!["[0]", "[12]"]);
    }

    #[test]
    fn test_key_ordering_by_kind() {
        let mut keys = vec![
            Key::from("RH"),
            Key::frame(3),
            Key::Index(0),
            Key::from("LH"),
        ];
        keys.sort();
        let rendered: Vec<_> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(rendered, vec!["0", "[3]", "LH", "RH"]);
    }

    #[test]
    fn test_index_mut_inserts_missing_key() {
        let mut table = Table::new("Tool");
        table["Inputs"] = Value::from(Table::unnamed());
        assert!(table["Inputs"].is_table());
        assert!(table.table_mut("Inputs").is_some());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut table: Table = vec![("A", 1), ("B", 2), ("C", 3)].into_iter().collect();
        table.remove("B");
        let keys: Vec<_> = table.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["A", "C"]);
    }
}
