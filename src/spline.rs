//! Keyframes, Bezier splines and handle computation.
//!
//! A [`Spline`] collects keyframes for one animated input. Handles are never
//! stored on the spline: every call to [`Spline::keyframes`] or
//! [`Spline::to_table`] sorts the current keyframes and runs
//! [`compute_handles`] again, so adding a keyframe between two others updates
//! their handles too.
//!
//! ## Handle math
//!
//! For keyframe `i` at `(t, v)` with curve hands `(rx, ry)`:
//!
//! ```text
//! left  = (t - (t - t_prev) * rx, v - (v - v_prev) * ry)
//! right = (t + (t_next - t) * rx, v + (v_next - v) * ry)
//! ```
//!
//! The first keyframe never gets a left handle and the last never gets a
//! right one.
//!
//! ```rust
//! use fusion_table::{Curve, Number, Spline};
//!
//! let mut spline = Spline::new("Blur1Blur");
//! spline.add_keyframes([(0, 0), (24, 1)], Some(Curve::ease_in_and_out()));
//!
//! let keyframes = spline.keyframes();
//! assert_eq!(keyframes[0].right_hand, Some((Number::from(8.0), Number::from(0))));
//! assert_eq!(keyframes[1].left_hand, Some((Number::from(16.0), Number::from(1))));
//! assert!(keyframes[0].left_hand.is_none());
//! assert!(keyframes[1].right_hand.is_none());
//! ```

use crate::{Curve, Key, Number, Rgba, Table, Value};
use std::cmp::Ordering;

/// An absolute handle position: (frame, value).
pub type Handle = (Number, Number);

/// The value of a keyframe.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyframeValue {
    Number(Number),
    Text(String),
}

impl KeyframeValue {
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            KeyframeValue::Number(n) => Some(*n),
            KeyframeValue::Text(_) => None,
        }
    }
}

impl From<Number> for KeyframeValue {
    fn from(value: Number) -> Self {
        KeyframeValue::Number(value)
    }
}

impl From<i32> for KeyframeValue {
    fn from(value: i32) -> Self {
        KeyframeValue::Number(Number::from(value))
    }
}

impl From<i64> for KeyframeValue {
    fn from(value: i64) -> Self {
        KeyframeValue::Number(Number::from(value))
    }
}

impl From<f64> for KeyframeValue {
    fn from(value: f64) -> Self {
        KeyframeValue::Number(Number::from(value))
    }
}

impl From<&str> for KeyframeValue {
    fn from(value: &str) -> Self {
        KeyframeValue::Text(value.to_string())
    }
}

impl From<String> for KeyframeValue {
    fn from(value: String) -> Self {
        KeyframeValue::Text(value)
    }
}

impl From<KeyframeValue> for Value {
    fn from(value: KeyframeValue) -> Self {
        match value {
            KeyframeValue::Number(n) => Value::Number(n),
            KeyframeValue::Text(s) => Value::Text(s),
        }
    }
}

/// Per-keyframe animation flags. Unset flags are not written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyframeFlags {
    pub loop_: Option<bool>,
    pub ping_pong: Option<bool>,
    pub loop_rel: Option<bool>,
    pub step_in: Option<bool>,
    pub step_out: Option<bool>,
}

impl KeyframeFlags {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loop_.is_none()
            && self.ping_pong.is_none()
            && self.loop_rel.is_none()
            && self.step_in.is_none()
            && self.step_out.is_none()
    }

    /// `Flags = { Loop = true, StepIn = false, }`, or `None` when nothing is set.
    #[must_use]
    pub fn to_table(&self) -> Option<Table> {
        if self.is_empty() {
            return None;
        }
        Some(
            Table::unnamed()
                .with("Loop", self.loop_)
                .with("PingPong", self.ping_pong)
                .with("LoopRel", self.loop_rel)
                .with("StepIn", self.step_in)
                .with("StepOut", self.step_out)
                .with_force_unindent(),
        )
    }
}

/// One point on an animation curve.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    pub frame: Number,
    pub value: KeyframeValue,
    /// Explicit left handle; replaces the computed one.
    pub left_hand: Option<Handle>,
    /// Explicit right handle; replaces the computed one.
    pub right_hand: Option<Handle>,
    pub curve: Option<Curve>,
    pub flags: KeyframeFlags,
}

impl Keyframe {
    pub fn new<F: Into<Number>, V: Into<KeyframeValue>>(frame: F, value: V) -> Self {
        Keyframe {
            frame: frame.into(),
            value: value.into(),
            left_hand: None,
            right_hand: None,
            curve: None,
            flags: KeyframeFlags::default(),
        }
    }

    #[must_use]
    pub fn with_left_hand<X: Into<Number>, Y: Into<Number>>(mut self, x: X, y: Y) -> Self {
        self.left_hand = Some((x.into(), y.into()));
        self
    }

    #[must_use]
    pub fn with_right_hand<X: Into<Number>, Y: Into<Number>>(mut self, x: X, y: Y) -> Self {
        self.right_hand = Some((x.into(), y.into()));
        self
    }

    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = Some(curve);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: KeyframeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// `{ value, LH = { x, y }, RH = { x, y }, Flags = { .. }, }`, always on one line.
    #[must_use]
    pub fn to_table(&self) -> Table {
        Table::unnamed()
            .with(Key::Index(0), self.value.clone())
            .with("LH", self.left_hand)
            .with("RH", self.right_hand)
            .with("Flags", self.flags.to_table())
            .with_force_unindent()
    }
}

/// Computed handles for one keyframe.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Handles {
    pub left: Option<Handle>,
    pub right: Option<Handle>,
}

/// Computes absolute handles for keyframes sorted ascending by frame.
///
/// `curves[i]` is the shape of keyframe `i`; a missing entry counts as linear.
/// A side whose own value or neighbour value is text gets no handle.
///
/// # Examples
///
/// ```rust
/// use fusion_table::{compute_handles, Curve, KeyframeValue, Number};
///
/// let keys = [
///     (Number::from(0), KeyframeValue::from(0)),
///     (Number::from(12), KeyframeValue::from(2)),
/// ];
/// let handles = compute_handles(&keys, &[Curve::ease_in(), Curve::ease_in()]);
///
/// assert!(handles[0].left.is_none());
/// assert_eq!(handles[1].left, Some((Number::from(8.0), Number::from(2))));
/// ```
#[must_use]
pub fn compute_handles(keyframes: &[(Number, KeyframeValue)], curves: &[Curve]) -> Vec<Handles> {
    let last = keyframes.len().saturating_sub(1);

    keyframes
        .iter()
        .enumerate()
        .map(|(i, (frame, value))| {
            let curve = curves.get(i).copied().unwrap_or_default();
            let mut handles = Handles::default();

            if i > 0 {
                if let Some((rx, ry)) = curve.left_hand {
                    let (prev_frame, prev_value) = &keyframes[i - 1];
                    handles.left = numeric_pair(value, prev_value).map(|(v, prev_v)| {
                        (
                            *frame - (*frame - *prev_frame) * rx,
                            v - (v - prev_v) * ry,
                        )
                    });
                }
            }

            if i < last {
                if let Some((rx, ry)) = curve.right_hand {
                    let (next_frame, next_value) = &keyframes[i + 1];
                    handles.right = numeric_pair(value, next_value).map(|(v, next_v)| {
                        (
                            *frame + (*next_frame - *frame) * rx,
                            v + (next_v - v) * ry,
                        )
                    });
                }
            }

            handles
        })
        .collect()
}

fn numeric_pair(a: &KeyframeValue, b: &KeyframeValue) -> Option<(Number, Number)> {
    Some((a.as_number()?, b.as_number()?))
}

fn by_frame(a: &Keyframe, b: &Keyframe) -> Ordering {
    a.frame.total_cmp(&b.frame)
}

/// An animated input: keyframes keyed by frame plus a default curve.
///
/// Frames are unique; writing a frame that already exists overwrites it.
#[derive(Clone, Debug, PartialEq)]
pub struct Spline {
    name: String,
    default_curve: Curve,
    color: Option<Rgba>,
    keyframes: Vec<Keyframe>,
}

impl Spline {
    /// Creates an empty spline with a linear default curve.
    pub fn new(name: impl Into<String>) -> Self {
        Spline {
            name: name.into(),
            default_curve: Curve::linear(),
            color: None,
            keyframes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.default_curve = curve;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn default_curve(&self) -> Curve {
        self.default_curve
    }

    #[must_use]
    pub fn color(&self) -> Option<Rgba> {
        self.color
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = Some(color);
    }

    /// Adds a keyframe, replacing any keyframe on the same frame.
    ///
    /// A keyframe without a curve takes the spline's default curve.
    pub fn add_keyframe(&mut self, mut keyframe: Keyframe) -> &mut Self {
        if keyframe.curve.is_none() {
            keyframe.curve = Some(self.default_curve);
        }
        match self.position(keyframe.frame) {
            Some(i) => self.keyframes[i] = keyframe,
            None => self.keyframes.push(keyframe),
        }
        self
    }

    /// Adds `(frame, value)` pairs sharing one curve (the default curve when `None`).
    pub fn add_keyframes<I, F, V>(&mut self, pairs: I, curve: Option<Curve>) -> &mut Self
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<Number>,
        V: Into<KeyframeValue>,
    {
        let curve = curve.unwrap_or(self.default_curve);
        for (frame, value) in pairs {
            self.add_keyframe(Keyframe::new(frame, value).with_curve(curve));
        }
        self
    }

    /// Writes the value at `frame`, keeping that keyframe's curve, handles and flags.
    pub fn set<F: Into<Number>, V: Into<KeyframeValue>>(&mut self, frame: F, value: V) -> &mut Self {
        let frame = frame.into();
        match self.position(frame) {
            Some(i) => self.keyframes[i].value = value.into(),
            None => {
                self.add_keyframe(Keyframe::new(frame, value));
            }
        }
        self
    }

    /// Uses `curve` for every existing keyframe and for keyframes added later.
    pub fn apply_curve(&mut self, curve: Curve) -> &mut Self {
        self.default_curve = curve;
        for keyframe in &mut self.keyframes {
            keyframe.curve = Some(curve);
        }
        self
    }

    #[must_use]
    pub fn get<F: Into<Number>>(&self, frame: F) -> Option<&Keyframe> {
        let frame = frame.into();
        self.keyframes.iter().find(|k| k.frame == frame)
    }

    pub fn get_mut<F: Into<Number>>(&mut self, frame: F) -> Option<&mut Keyframe> {
        let frame = frame.into();
        self.keyframes.iter_mut().find(|k| k.frame == frame)
    }

    pub fn remove<F: Into<Number>>(&mut self, frame: F) -> Option<Keyframe> {
        let i = self.position(frame.into())?;
        Some(self.keyframes.remove(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Frames in ascending order.
    #[must_use]
    pub fn frames(&self) -> Vec<Number> {
        self.sorted().into_iter().map(|k| k.frame).collect()
    }

    /// Keyframes sorted by frame with handles resolved.
    ///
    /// Explicit handles win over computed ones, but the first keyframe never
    /// keeps a left handle and the last never keeps a right handle.
    #[must_use]
    pub fn keyframes(&self) -> Vec<Keyframe> {
        let mut sorted = self.sorted();
        let pairs: Vec<_> = sorted.iter().map(|k| (k.frame, k.value.clone())).collect();
        let curves: Vec<_> = sorted
            .iter()
            .map(|k| k.curve.unwrap_or(self.default_curve))
            .collect();
        let handles = compute_handles(&pairs, &curves);

        let last = sorted.len().saturating_sub(1);
        for (i, (keyframe, computed)) in sorted.iter_mut().zip(handles).enumerate() {
            keyframe.left_hand = if i == 0 {
                None
            } else {
                keyframe.left_hand.or(computed.left)
            };
            keyframe.right_hand = if i == last {
                None
            } else {
                keyframe.right_hand.or(computed.right)
            };
        }
        sorted
    }

    /// `BezierSpline { SplineColor = { .. }, KeyFrames = { [f] = { .. }, }, }`
    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut keyframes = Table::unnamed().with_ordered_keys().with_force_indent();
        for keyframe in self.keyframes() {
            keyframes.insert(Key::Frame(keyframe.frame), keyframe.to_table());
        }

        Table::new("BezierSpline")
            .with("SplineColor", self.color.map(|c| c.to_spline_color()))
            .with("KeyFrames", keyframes)
    }

    fn position(&self, frame: Number) -> Option<usize> {
        self.keyframes.iter().position(|k| k.frame == frame)
    }

    fn sorted(&self) -> Vec<Keyframe> {
        let mut sorted = self.keyframes.clone();
        sorted.sort_by(by_frame);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n<T: Into<Number>>(v: T) -> Number {
        v.into()
    }

    #[test]
    fn test_ease_in_and_out_handles() {
        let mut spline = Spline::new("S");
        spline.add_keyframes([(0, 0), (24, 1)], Some(Curve::ease_in_and_out()));

        let kfs = spline.keyframes();
        assert_eq!(kfs[0].right_hand, Some((n(8.0), n(0))));
        assert_eq!(kfs[1].left_hand, Some((n(16.0), n(1))));
        assert!(kfs[0].left_hand.is_none());
        assert!(kfs[1].right_hand.is_none());
    }

    #[test]
    fn test_single_keyframe_has_no_handles() {
        let mut spline = Spline::new("S").with_curve(Curve::ease_in_and_out());
        spline.set(12, 15);
        let kfs = spline.keyframes();
        assert_eq!(kfs.len(), 1);
        assert!(kfs[0].left_hand.is_none() && kfs[0].right_hand.is_none());
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let mut a = Spline::new("S");
        a.add_keyframes([(24, 1), (0, 0), (12, 5)], Some(Curve::ease_in_and_out()));
        let mut b = Spline::new("S");
        b.add_keyframes([(0, 0), (12, 5), (24, 1)], Some(Curve::ease_in_and_out()));

        assert_eq!(a.keyframes(), b.keyframes());
        assert_eq!(a.frames(), vec![n(0), n(12), n(24)]);
    }

    #[test]
    fn test_new_keyframe_moves_neighbour_handles() {
        let mut spline = Spline::new("S").with_curve(Curve::ease_in_and_out());
        spline.add_keyframes([(0, 0), (24, 20)], None);
        assert_eq!(spline.keyframes()[0].right_hand, Some((n(8.0), n(0))));

        spline.set(12, 15);
        let kfs = spline.keyframes();
        assert_eq!(kfs[0].right_hand, Some((n(4.0), n(0))));
        assert_eq!(kfs[1].left_hand, Some((n(8.0), n(15))));
        assert_eq!(kfs[1].right_hand, Some((n(16.0), n(15))));
        assert_eq!(kfs[2].left_hand, Some((n(20.0), n(20))));
    }

    #[test]
    fn test_decelerate_uses_value_fraction() {
        let mut spline = Spline::new("S");
        spline.add_keyframes([(0, 0.0), (10, 3.0)], Some(Curve::decelerate_out_with(0.5)));
        let kfs = spline.keyframes();
        assert_eq!(kfs[0].right_hand, Some((n(0), n(1.5))));
    }

    #[test]
    fn test_duplicate_frame_last_write_wins() {
        let mut spline = Spline::new("S");
        spline.add_keyframes([(0, 1), (0, 2)], None);
        assert_eq!(spline.len(), 1);
        assert_eq!(spline.get(0).map(|k| k.value.clone()), Some(KeyframeValue::from(2)));
    }

    #[test]
    fn test_explicit_handles_respect_first_and_last() {
        let mut spline = Spline::new("S");
        spline.add_keyframe(Keyframe::new(1, 0.5).with_left_hand(0, 0).with_right_hand(8, 0.3));
        spline.add_keyframe(Keyframe::new(24, 0.75).with_left_hand(18, 0.1).with_right_hand(30, 1));
        let kfs = spline.keyframes();
        assert_eq!(kfs[0].left_hand, None);
        assert_eq!(kfs[0].right_hand, Some((n(8), n(0.3))));
        assert_eq!(kfs[1].left_hand, Some((n(18), n(0.1))));
        assert_eq!(kfs[1].right_hand, None);
    }

    #[test]
    fn test_text_values_get_no_handles() {
        let keys = [(n(0), KeyframeValue::from("a")), (n(10), KeyframeValue::from("b"))];
        let handles = compute_handles(&keys, &[Curve::ease_in_and_out(), Curve::ease_in_and_out()]);
        assert_eq!(handles, vec![Handles::default(), Handles::default()]);
    }

    #[test]
    fn test_apply_curve() {
        let mut spline = Spline::new("S");
        spline.add_keyframes([(0, 0), (12, 2)], None);
        assert!(spline.keyframes()[0].right_hand.is_none());

        spline.apply_curve(Curve::ease_in());
        let kfs = spline.keyframes();
        assert!(kfs[0].right_hand.is_none());
        assert_eq!(kfs[1].left_hand, Some((n(8.0), n(2))));
    }

    #[test]
    fn test_keyframe_table() {
        let mut kf = Keyframe::new(24, 0.75).with_left_hand(18, 0.1);
        kf.flags.loop_ = Some(true);
        assert_eq!(
            kf.to_table().to_string(),
            "{ 0.75, LH = { 18, 0.1 }, Flags = { Loop = true, }, }"
        );
    }

    #[test]
    fn test_spline_table() {
        let mut spline = Spline::new("Blur1Blur").with_color(Rgba::magenta());
        spline.add_keyframes([(24, 1), (0, 0)], Some(Curve::ease_in_and_out()));
        assert_eq!(
            spline.to_table().to_string(),
            "BezierSpline { \n\
             \tSplineColor = { Red = 255, Green = 0, Blue = 255, }, \n\
             \tKeyFrames = { \n\
             \t\t[0] = { 0, RH = { 8.0, 0 }, }, \n\
             \t\t[24] = { 1, LH = { 16.0, 1 }, }, \n\
             \t}, \n\
             }"
        );
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let mut spline = Spline::new("S");
        spline.add_keyframes([(0, 0), (12, 3), (24, 1)], Some(Curve::flat()));
        assert_eq!(spline.to_table().to_string(), spline.to_table().to_string());
    }
}
