//! Tools, macros, modifiers and the composition that holds them.
//!
//! These types are thin builders: each one knows how to turn itself into a
//! [`Table`], and [`Composition::render`] stitches the tables together into
//! the clipboard/`.setting` layout:
//!
//! ```text
//! {
//!     Tools = ordered() {
//!         Blur1 = Blur { Inputs = { .. }, ViewInfo = OperatorInfo { Pos = { 0, 0 }, }, },
//!         Blur1Blur = BezierSpline { .. },
//!     },
//!     ActiveTool = "Blur1",
//! }
//! ```
//!
//! ```rust
//! use fusion_table::{Composition, Curve, Tool};
//!
//! let mut comp = Composition::new();
//! comp.add_tool(Tool::new("Background", "MyBackground"));
//! comp.add_tool(Tool::new("Blur", "MyBlur").at(1, 0));
//! comp.connect("MyBackground", "MyBlur", "Output", "Input").unwrap();
//!
//! let spline = comp.animate("MyBlur", "Blur", Some(Curve::ease_in_and_out())).unwrap();
//! spline.add_keyframes([(0, 0), (24, 20)], None);
//!
//! let text = comp.to_text().unwrap();
//! assert!(text.contains("MyBlurBlur = BezierSpline"));
//! assert!(text.ends_with("\tActiveTool = \"MyBlur\", \n}"));
//! ```

use crate::ids::tool as tool_id;
use crate::ids::{data_type, input_control};
use crate::{render_table, CompOptions, Curve, Error, Number, Result, Rgba, Spline, Table, Value};
use indexmap::IndexMap;
use log::debug;
use std::fmt;
use std::path::Path;

const ORDERED: &str = "ordered()";
const CHANNELS: [&str; 4] = ["Red", "Green", "Blue", "Alpha"];

/// One input of a tool: a constant, an expression, or a connection.
///
/// Unset fields are left out of the rendered `Input { .. }` table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Input {
    name: String,
    pub value: Value,
    pub expression: Option<String>,
    pub source_op: Option<String>,
    pub source: Option<String>,
}

impl Input {
    /// `Width = Input { Value = 1920, }`
    pub fn value(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Input {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// `Size = Input { Expression = "time / 24", }`
    pub fn expression(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Input {
            name: name.into(),
            expression: Some(expression.into()),
            ..Default::default()
        }
    }

    /// `Input = Input { SourceOp = "Blur1", Source = "Output", }`
    pub fn connected(
        name: impl Into<String>,
        source_op: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Input {
            name: name.into(),
            source_op: Some(source_op.into()),
            source: Some(source.into()),
            ..Default::default()
        }
    }

    /// `EffectMask = Input { SourceOp = "<mask>", Source = "Mask", }`
    pub fn mask(source_op: impl Into<String>) -> Self {
        Input::connected("EffectMask", source_op, "Mask")
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.source_op.is_some()
    }

    #[must_use]
    pub fn to_table(&self) -> Table {
        Table::new("Input")
            .with("Value", self.value.clone())
            .with("Expression", self.expression.clone())
            .with("SourceOp", self.source_op.clone())
            .with("Source", self.source.clone())
    }
}

/// A custom control shown on a tool's inspector page.
///
/// Renders as `{ LINKS_Name = "..", LINKID_DataType = "..", INPID_InputControl = "..", .. }`
/// under the tool's `UserControls`, keyed by the pretty name without spaces.
#[derive(Clone, Debug, PartialEq)]
pub struct UserControl {
    pretty_name: String,
    pub input_control: String,
    pub data_type: String,
    pub preview_control: Option<String>,
    pub integer: bool,
    pub page: Option<String>,
    pub default: Option<Value>,
    pub min_scale: Option<Number>,
    pub max_scale: Option<Number>,
    pub min_allowed: Option<Number>,
    pub max_allowed: Option<Number>,
}

impl UserControl {
    /// A number slider labelled `pretty_name`.
    pub fn new(pretty_name: impl Into<String>) -> Self {
        UserControl {
            pretty_name: pretty_name.into(),
            input_control: input_control::SLIDER.to_string(),
            data_type: data_type::NUMBER.to_string(),
            preview_control: None,
            integer: false,
            page: None,
            default: None,
            min_scale: None,
            max_scale: None,
            min_allowed: None,
            max_allowed: None,
        }
    }

    /// The key under `UserControls`: the pretty name with spaces removed.
    #[must_use]
    pub fn name(&self) -> String {
        self.pretty_name.replace(' ', "")
    }

    #[must_use]
    pub fn pretty_name(&self) -> &str {
        &self.pretty_name
    }

    #[must_use]
    pub fn with_input_control(mut self, control: impl Into<String>) -> Self {
        self.input_control = control.into();
        self
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    #[must_use]
    pub fn with_preview_control(mut self, control: impl Into<String>) -> Self {
        self.preview_control = Some(control.into());
        self
    }

    /// Restricts the control to whole numbers.
    #[must_use]
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    #[must_use]
    pub fn on_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Slider range shown in the inspector.
    #[must_use]
    pub fn with_scale<A: Into<Number>, B: Into<Number>>(mut self, min: A, max: B) -> Self {
        self.min_scale = Some(min.into());
        self.max_scale = Some(max.into());
        self
    }

    /// Hard limits on the value.
    #[must_use]
    pub fn with_allowed<A: Into<Number>, B: Into<Number>>(mut self, min: A, max: B) -> Self {
        self.min_allowed = Some(min.into());
        self.max_allowed = Some(max.into());
        self
    }

    #[must_use]
    pub fn to_table(&self) -> Table {
        Table::unnamed()
            .with("LINKS_Name", self.pretty_name.as_str())
            .with("LINKID_DataType", self.data_type.as_str())
            .with("INPID_InputControl", self.input_control.as_str())
            .with("INPID_PreviewControl", self.preview_control.clone())
            .with("INP_Integer", self.integer)
            .with("ICS_ControlPage", self.page.clone())
            .with("INP_MinScale", self.min_scale)
            .with("INP_MaxScale", self.max_scale)
            .with("INP_MinAllowed", self.min_allowed)
            .with("INP_MaxAllowed", self.max_allowed)
            .with("INP_Default", self.default.clone())
    }
}

/// A node in the flow.
///
/// Tools without a position are modifiers (published values and the like)
/// and render without `ViewInfo`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tool {
    id: String,
    name: String,
    position: Option<(Number, Number)>,
    inputs: IndexMap<String, Input>,
    user_controls: IndexMap<String, UserControl>,
    output: String,
}

impl Tool {
    /// Creates a tool at grid position (0, 0).
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Tool {
            id: id.into(),
            name: name.into(),
            position: Some((Number::Integer(0), Number::Integer(0))),
            inputs: IndexMap::new(),
            user_controls: IndexMap::new(),
            output: "Output".to_string(),
        }
    }

    /// Creates a modifier: a tool with no place in the flow view.
    pub fn modifier(id: impl Into<String>, name: impl Into<String>) -> Self {
        Tool {
            position: None,
            ..Tool::new(id, name)
        }
    }

    /// A solid color `Background`.
    pub fn background(name: impl Into<String>, color: Rgba) -> Self {
        Tool::new(tool_id::BACKGROUND, name)
            .with_input("TopLeftRed", color.red)
            .with_input("TopLeftGreen", color.green)
            .with_input("TopLeftBlue", color.blue)
            .with_input("TopLeftAlpha", color.alpha)
    }

    /// A `TextPlus` tool showing `text`.
    pub fn text(name: impl Into<String>, text: &str) -> Self {
        Tool::new(tool_id::TEXT, name).with_input("StyledText", text)
    }

    /// Moves the tool to a grid position.
    #[must_use]
    pub fn at<X: Into<Number>, Y: Into<Number>>(mut self, x: X, y: Y) -> Self {
        self.position = Some((x.into(), y.into()));
        self
    }

    /// Builder-style [`Tool::set_input`].
    #[must_use]
    pub fn with_input(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set_input(name, value);
        self
    }

    /// Names the output other tools connect to. Defaults to `Output`.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn position(&self) -> Option<(Number, Number)> {
        self.position
    }

    #[must_use]
    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.get(name)
    }

    pub fn input_mut(&mut self, name: &str) -> Option<&mut Input> {
        self.inputs.get_mut(name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Input> {
        self.inputs.values()
    }

    /// Adds an input, replacing one with the same name.
    pub fn add_input(&mut self, input: Input) -> &mut Self {
        self.inputs.insert(input.name.clone(), input);
        self
    }

    pub fn add_inputs<I: IntoIterator<Item = Input>>(&mut self, inputs: I) -> &mut Self {
        for input in inputs {
            self.add_input(input);
        }
        self
    }

    /// Sets the constant value of an input, keeping its other fields.
    pub fn set_input(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        match self.inputs.get_mut(name) {
            Some(input) => input.value = value.into(),
            None => {
                self.add_input(Input::value(name, value));
            }
        }
        self
    }

    /// Feeds `input` from `source` on `source_op`.
    pub fn connect_source(&mut self, input: &str, source_op: &str, source: &str) -> &mut Self {
        self.add_input(Input::connected(input, source_op, source))
    }

    /// Adds a custom inspector control, replacing one with the same name.
    pub fn add_user_control(&mut self, control: UserControl) -> &mut Self {
        self.user_controls.insert(control.name(), control);
        self
    }

    #[must_use]
    pub fn user_control(&self, name: &str) -> Option<&UserControl> {
        self.user_controls.get(name)
    }

    pub fn add_mask(&mut self, mask: &str) -> &mut Self {
        self.add_input(Input::mask(mask))
    }

    /// Publishes a polyline made of `points`, named `<point_name>0`, `<point_name>1`, ...
    pub fn add_published_polyline<I, X, Y>(&mut self, points: I, point_name: &str) -> &mut Self
    where
        I: IntoIterator<Item = (X, Y)>,
        X: Into<Number>,
        Y: Into<Number>,
    {
        let mut ids = Vec::new();
        let mut point_inputs = Vec::new();
        for (i, (x, y)) in points.into_iter().enumerate() {
            let id = format!("{point_name}{i}");
            let point: (Number, Number) = (x.into(), y.into());
            ids.push(Table::unnamed().with("PublishID", id.as_str()));
            point_inputs.push(Input::value(id, point));
        }

        let polyline = Table::new("Polyline").with("Points", ids).with_force_indent();
        self.add_input(Input::value("Polyline", polyline));
        self.add_inputs(point_inputs)
    }

    /// Shifts the tool by a grid offset. Modifiers have no position and are left alone.
    pub fn offset_position<X: Into<Number>, Y: Into<Number>>(&mut self, dx: X, dy: Y) -> &mut Self {
        if let Some((x, y)) = self.position {
            let (dx, dy): (Number, Number) = (dx.into(), dy.into());
            self.position = Some((x + dx, y + dy));
        }
        self
    }

    /// `Name = Id { Inputs = { .. }, ViewInfo = OperatorInfo { Pos = { x, y }, }, }`
    #[must_use]
    pub fn to_table(&self, options: &CompOptions) -> Table {
        let inputs: Table = self
            .inputs
            .iter()
            .map(|(name, input)| (name.as_str(), input.to_table()))
            .collect();

        let view_info = self.position.map(|(x, y)| {
            Table::new("OperatorInfo").with("Pos", options.node_position(x, y))
        });

        let user_controls = (!self.user_controls.is_empty()).then(|| {
            let mut controls = Table::new(ORDERED);
            controls.extend(self.user_controls.iter().map(|(name, c)| (name.as_str(), c.to_table())));
            controls
        });

        Table::new(self.id.as_str())
            .with("Inputs", inputs)
            .with("ViewInfo", view_info)
            .with("UserControls", user_controls)
    }
}

/// Modifier kinds that can animate a point input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PathMethod {
    /// Separate X and Y splines feeding an `XYPath`.
    #[default]
    XyPath,
    /// A polyline `Path` with a displacement spline.
    Path,
}

/// A spline pair driving a point input.
#[derive(Clone, Debug, PartialEq)]
pub struct XyPath {
    name: String,
    x: Spline,
    y: Spline,
    pub show_key_points: bool,
}

impl XyPath {
    /// Creates the path and its `<name>X` / `<name>Y` splines.
    pub fn new(name: impl Into<String>, x_curve: Curve, y_curve: Curve, options: &CompOptions) -> Self {
        let name = name.into();
        XyPath {
            x: Spline::new(format!("{name}X"))
                .with_curve(x_curve)
                .with_color(options.x_spline_color),
            y: Spline::new(format!("{name}Y"))
                .with_curve(y_curve)
                .with_color(options.y_spline_color),
            name,
            show_key_points: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn x(&self) -> &Spline {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &Spline {
        &self.y
    }

    pub fn x_mut(&mut self) -> &mut Spline {
        &mut self.x
    }

    pub fn y_mut(&mut self) -> &mut Spline {
        &mut self.y
    }

    /// Keys both coordinates at `frame`.
    pub fn set<F, X, Y>(&mut self, frame: F, (x, y): (X, Y)) -> &mut Self
    where
        F: Into<Number>,
        X: Into<Number>,
        Y: Into<Number>,
    {
        let frame: Number = frame.into();
        let (x, y): (Number, Number) = (x.into(), y.into());
        self.x.set(frame, x);
        self.y.set(frame, y);
        self
    }

    pub fn set_x<F: Into<Number>, X: Into<Number>>(&mut self, frame: F, x: X) -> &mut Self {
        let x: Number = x.into();
        self.x.set(frame, x);
        self
    }

    pub fn set_y<F: Into<Number>, Y: Into<Number>>(&mut self, frame: F, y: Y) -> &mut Self {
        let y: Number = y.into();
        self.y.set(frame, y);
        self
    }

    pub fn add_keyframes<I, F, X, Y>(&mut self, keyframes: I) -> &mut Self
    where
        I: IntoIterator<Item = (F, (X, Y))>,
        F: Into<Number>,
        X: Into<Number>,
        Y: Into<Number>,
    {
        for (frame, point) in keyframes {
            self.set(frame, point);
        }
        self
    }

    /// `XYPath { Inputs = { X = .., Y = .., }, ShowKeyPoints = false, }`
    #[must_use]
    pub fn to_table(&self) -> Table {
        let inputs = Table::unnamed()
            .with("X", Input::connected("X", self.x.name(), "Value").to_table())
            .with("Y", Input::connected("Y", self.y.name(), "Value").to_table());

        Table::new(tool_id::XY_PATH)
            .with("Inputs", inputs)
            .with("ShowKeyPoints", self.show_key_points)
    }
}

/// An operator without a place in the flow, listed after the tools.
#[derive(Clone, Debug, PartialEq)]
pub enum Modifier {
    /// Published values and other input-only modifiers.
    Tool(Tool),
    Spline(Spline),
    XyPath(XyPath),
}

impl Modifier {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Modifier::Tool(t) => t.name(),
            Modifier::Spline(s) => s.name(),
            Modifier::XyPath(p) => p.name(),
        }
    }

    /// Writes this modifier's entries. An XY path writes itself and both splines.
    fn write_into(&self, tools: &mut Table, options: &CompOptions) {
        match self {
            Modifier::Tool(t) => {
                tools.insert(t.name(), t.to_table(options));
            }
            Modifier::Spline(s) => {
                tools.insert(s.name(), s.to_table());
            }
            Modifier::XyPath(p) => {
                tools.insert(p.name(), p.to_table());
                tools.insert(p.x.name(), p.x.to_table());
                tools.insert(p.y.name(), p.y.to_table());
            }
        }
    }
}

/// A macro control mapped onto a tool input.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceInput {
    name: String,
    source_op: String,
    source: String,
    pub default: Option<Value>,
    /// Extra control settings such as `ControlGroup` or `Name`.
    pub properties: Table,
}

impl InstanceInput {
    pub fn new(
        name: impl Into<String>,
        source_op: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        InstanceInput {
            name: name.into(),
            source_op: source_op.into(),
            source: source.into(),
            default: None,
            properties: Table::unnamed(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_default(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.properties.insert(key, value);
        self
    }

    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut table = Table::new("InstanceInput")
            .with("SourceOp", self.source_op.as_str())
            .with("Source", self.source.as_str())
            .with("Default", self.default.clone());
        table.extend(self.properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        table
    }
}

/// A macro output mapped onto a tool output.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceOutput {
    name: String,
    source_op: String,
    source: String,
}

impl InstanceOutput {
    pub fn new(
        name: impl Into<String>,
        source_op: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        InstanceOutput {
            name: name.into(),
            source_op: source_op.into(),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn to_table(&self) -> Table {
        Table::new("InstanceOutput")
            .with("SourceOp", self.source_op.as_str())
            .with("Source", self.source.as_str())
    }
}

/// A group of tools exposed as one node with its own controls.
#[derive(Clone, Debug, PartialEq)]
pub struct Macro {
    name: String,
    tools: IndexMap<String, Tool>,
    position: (Number, Number),
    inputs: IndexMap<String, InstanceInput>,
    outputs: Vec<InstanceOutput>,
    tile_color: Option<Rgba>,
}

impl Macro {
    pub fn new(name: impl Into<String>) -> Self {
        Macro {
            name: name.into(),
            tools: IndexMap::new(),
            position: (Number::Integer(0), Number::Integer(0)),
            inputs: IndexMap::new(),
            outputs: Vec::new(),
            tile_color: None,
        }
    }

    #[must_use]
    pub fn at<X: Into<Number>, Y: Into<Number>>(mut self, x: X, y: Y) -> Self {
        self.position = (x.into(), y.into());
        self
    }

    #[must_use]
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.add_tool(tool);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_tool(&mut self, tool: Tool) -> &mut Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    pub fn tool_mut(&mut self, name: &str) -> Option<&mut Tool> {
        self.tools.get_mut(name)
    }

    #[must_use]
    pub fn input(&self, name: &str) -> Option<&InstanceInput> {
        self.inputs.get(name)
    }

    pub fn set_tile_color(&mut self, color: Rgba) -> &mut Self {
        self.tile_color = Some(color);
        self
    }

    /// Exposes `tool.input` as a macro control named `<tool><input>`.
    ///
    /// Only the tool is checked. `input` may name one of the tool's built-in
    /// inputs, which are never stored on the [`Tool`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if `tool` is not part of the macro.
    pub fn add_instance_input(&mut self, tool: &str, input: &str) -> Result<&mut InstanceInput> {
        if !self.tools.contains_key(tool) {
            return Err(Error::unknown_tool(tool));
        }
        let name = format!("{tool}{input}");
        let (index, _) = self
            .inputs
            .insert_full(name.clone(), InstanceInput::new(name, tool, input));
        Ok(&mut self.inputs[index])
    }

    /// Exposes the four color channels of `tool` as one control group.
    ///
    /// Channel inputs are named `<prefix><Channel><suffix>`, e.g.
    /// `TopLeftRed` on a `Background` or `Red1` on a `TextPlus`. Entries of
    /// `properties` are copied onto all four channels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if `tool` is not part of the macro.
    pub fn add_color_input(
        &mut self,
        tool: &str,
        group: i64,
        prefix: &str,
        suffix: &str,
        properties: &Table,
    ) -> Result<&mut Self> {
        for (i, channel) in CHANNELS.iter().enumerate() {
            let input = self.add_instance_input(tool, &format!("{prefix}{channel}{suffix}"))?;
            if i == 0 {
                input.set_property("Name", "Color");
            }
            input.set_property("ControlGroup", group);
            for (key, value) in properties.iter() {
                input.properties.insert(key.clone(), value.clone());
            }
        }
        Ok(self)
    }

    /// Exposes the output of `tool`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if `tool` is not part of the macro.
    pub fn add_instance_output(&mut self, tool: &str) -> Result<&mut Self> {
        let source = self
            .tools
            .get(tool)
            .map(|t| t.output.clone())
            .ok_or_else(|| Error::unknown_tool(tool))?;
        let name = match self.outputs.len() {
            0 => "Output".to_string(),
            n => format!("Output{}", n + 1),
        };
        self.outputs.push(InstanceOutput::new(name, tool, source));
        Ok(self)
    }

    /// Declared outputs, or the last tool's output when none were declared.
    #[must_use]
    pub fn outputs(&self) -> Vec<InstanceOutput> {
        if !self.outputs.is_empty() {
            return self.outputs.clone();
        }
        self.tools
            .last()
            .map(|(name, t)| vec![InstanceOutput::new("Output", name.as_str(), t.output.as_str())])
            .unwrap_or_default()
    }

    /// `MacroOperator { Inputs = ordered() { .. }, Outputs = { .. }, Tools = ordered() { .. }, .. }`
    #[must_use]
    pub fn to_table(&self, options: &CompOptions) -> Table {
        let inputs = (!self.inputs.is_empty()).then(|| {
            let mut inputs = Table::new(ORDERED);
            inputs.extend(self.inputs.iter().map(|(name, i)| (name.as_str(), i.to_table())));
            inputs
        });

        let outputs: Table = self
            .outputs()
            .iter()
            .map(|o| (o.name().to_string(), o.to_table()))
            .collect();

        let mut tools = Table::new(ORDERED);
        tools.extend(self.tools.iter().map(|(name, t)| (name.as_str(), t.to_table(options))));

        let (x, y) = self.position;
        let colors = self
            .tile_color
            .map(|c| Table::unnamed().with("TileColor", c.to_tile_color()));

        Table::new(tool_id::MACRO)
            .with("Inputs", inputs)
            .with("Outputs", outputs)
            .with("Tools", tools)
            .with("ViewInfo", Table::new("GroupInfo").with("Pos", options.node_position(x, y)))
            .with("Colors", colors)
    }
}

/// A top-level node: a tool or a macro.
#[derive(Clone, Debug, PartialEq)]
pub enum Operator {
    Tool(Tool),
    Macro(Macro),
}

impl Operator {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Operator::Tool(t) => t.name(),
            Operator::Macro(m) => m.name(),
        }
    }

    /// The output other tools connect to.
    #[must_use]
    pub fn output(&self) -> String {
        match self {
            Operator::Tool(t) => t.output.clone(),
            Operator::Macro(m) => m
                .outputs()
                .first()
                .map_or_else(|| "Output".to_string(), |o| o.name().to_string()),
        }
    }

    #[must_use]
    pub fn to_table(&self, options: &CompOptions) -> Table {
        match self {
            Operator::Tool(t) => t.to_table(options),
            Operator::Macro(m) => m.to_table(options),
        }
    }
}

/// A node graph ready to paste into the target application.
#[derive(Clone, Debug, Default)]
pub struct Composition {
    options: CompOptions,
    tools: IndexMap<String, Operator>,
    modifiers: IndexMap<String, Modifier>,
    active_tool: Option<String>,
    last_added: Option<String>,
}

impl Composition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: CompOptions) -> Self {
        Composition {
            options,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn options(&self) -> &CompOptions {
        &self.options
    }

    /// Adds a tool, replacing any operator with the same name.
    pub fn add_tool(&mut self, tool: Tool) -> &mut Self {
        self.add_operator(Operator::Tool(tool))
    }

    pub fn add_macro(&mut self, macro_: Macro) -> &mut Self {
        self.add_operator(Operator::Macro(macro_))
    }

    fn add_operator(&mut self, operator: Operator) -> &mut Self {
        let name = operator.name().to_string();
        debug!("adding {} to the composition", name);
        self.last_added = Some(name.clone());
        self.tools.insert(name, operator);
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name) || self.modifiers.contains_key(name)
    }

    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&Tool> {
        match self.tools.get(name)? {
            Operator::Tool(t) => Some(t),
            Operator::Macro(_) => None,
        }
    }

    pub fn tool_mut(&mut self, name: &str) -> Option<&mut Tool> {
        match self.tools.get_mut(name)? {
            Operator::Tool(t) => Some(t),
            Operator::Macro(_) => None,
        }
    }

    pub fn macro_mut(&mut self, name: &str) -> Option<&mut Macro> {
        match self.tools.get_mut(name)? {
            Operator::Macro(m) => Some(m),
            Operator::Tool(_) => None,
        }
    }

    #[must_use]
    pub fn modifier(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.get(name)
    }

    #[must_use]
    pub fn spline(&self, name: &str) -> Option<&Spline> {
        match self.modifiers.get(name)? {
            Modifier::Spline(s) => Some(s),
            _ => None,
        }
    }

    pub fn spline_mut(&mut self, name: &str) -> Option<&mut Spline> {
        match self.modifiers.get_mut(name)? {
            Modifier::Spline(s) => Some(s),
            _ => None,
        }
    }

    pub fn xy_path_mut(&mut self, name: &str) -> Option<&mut XyPath> {
        match self.modifiers.get_mut(name)? {
            Modifier::XyPath(p) => Some(p),
            _ => None,
        }
    }

    /// Number of tools, macros and modifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len() + self.modifiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn output_of(&self, name: &str) -> Result<String> {
        if let Some(operator) = self.tools.get(name) {
            return Ok(operator.output());
        }
        if self.modifiers.contains_key(name) {
            return Ok("Value".to_string());
        }
        Err(Error::unknown_tool(name))
    }

    /// Connects `from.output` into `to.input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if either end is missing, or if `to` is
    /// not a tool.
    pub fn connect(&mut self, from: &str, to: &str, output: &str, input: &str) -> Result<&mut Self> {
        if !self.contains(from) {
            return Err(Error::unknown_tool(from));
        }
        self.tool_mut(to)
            .ok_or_else(|| Error::unknown_tool(to))?
            .connect_source(input, from, output);
        Ok(self)
    }

    /// Adds a `Merge` fed by the main outputs of `background` and `foreground`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if a named input operator is missing.
    pub fn add_merge<X: Into<Number>, Y: Into<Number>>(
        &mut self,
        name: &str,
        background: Option<&str>,
        foreground: Option<&str>,
        position: (X, Y),
    ) -> Result<&mut Self> {
        let mut merge = Tool::new(tool_id::MERGE, name).at(position.0, position.1);
        for (input, source) in [("Background", background), ("Foreground", foreground)] {
            if let Some(source) = source {
                let output = self.output_of(source)?;
                merge.connect_source(input, source, &output);
            }
        }
        Ok(self.add_tool(merge))
    }

    /// Animates `tool.input` with a new spline named `<tool><input>`.
    ///
    /// The spline takes `curve`, or the configured default curve.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if `tool` is not in the composition.
    pub fn animate(&mut self, tool: &str, input: &str, curve: Option<Curve>) -> Result<&mut Spline> {
        let name = format!("{tool}{input}");
        self.tool_mut(tool)
            .ok_or_else(|| Error::unknown_tool(tool))?
            .connect_source(input, &name, "Value");

        let spline = Spline::new(name.as_str())
            .with_curve(curve.unwrap_or(self.options.default_curve))
            .with_color(self.options.spline_color);
        debug!("animating {}.{} with spline {}", tool, input, name);
        self.modifiers.insert(name.clone(), Modifier::Spline(spline));

        self.spline_mut(&name).ok_or_else(|| Error::unknown_tool(&name))
    }

    /// Like [`Composition::animate`], adding `tool` first if it is not already present.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Composition::animate`].
    pub fn animate_tool(&mut self, tool: Tool, input: &str, curve: Option<Curve>) -> Result<&mut Spline> {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            debug!("{} is animated but not in the composition yet, adding it", name);
            self.add_tool(tool);
        }
        self.animate(&name, input, curve)
    }

    /// Animates a point input through an `XYPath` named `<tool><input>XYPath`.
    ///
    /// The Y spline falls back to the X curve, then to the default curve.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if `tool` is not in the composition.
    pub fn animate_position(
        &mut self,
        tool: &str,
        input: &str,
        curve_x: Option<Curve>,
        curve_y: Option<Curve>,
    ) -> Result<&mut XyPath> {
        self.animate_path(tool, input, PathMethod::XyPath, curve_x, curve_y)
    }

    /// Animates a point input with the given path modifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotImplemented`] for [`PathMethod::Path`] and
    /// [`Error::UnknownTool`] if `tool` is not in the composition. Nothing is
    /// changed on error.
    pub fn animate_path(
        &mut self,
        tool: &str,
        input: &str,
        method: PathMethod,
        curve_x: Option<Curve>,
        curve_y: Option<Curve>,
    ) -> Result<&mut XyPath> {
        if method == PathMethod::Path {
            return Err(Error::not_implemented("Path modifier for animated positions"));
        }
        let name = format!("{tool}{input}XYPath");
        self.tool_mut(tool)
            .ok_or_else(|| Error::unknown_tool(tool))?
            .connect_source(input, &name, "Value");

        let default = self.options.default_curve;
        let x_curve = curve_x.unwrap_or(default);
        let y_curve = curve_y.or(curve_x).unwrap_or(default);
        let path = XyPath::new(name.as_str(), x_curve, y_curve, &self.options);
        debug!("animating {}.{} with path {}", tool, input, name);
        self.modifiers.insert(name.clone(), Modifier::XyPath(path));

        self.xy_path_mut(&name).ok_or_else(|| Error::unknown_tool(&name))
    }

    /// Drives `tool.input` from a published value modifier named `Publish<tool><input>`.
    ///
    /// The modifier kind follows the value: numbers, text, point tuples and
    /// FuIDs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] for a missing tool and
    /// [`Error::UnsupportedValue`] for values that cannot be published.
    pub fn publish(&mut self, tool: &str, input: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let value = value.into();
        let id = match &value {
            Value::Number(_) => tool_id::PUBLISH_NUMBER,
            Value::Text(_) => tool_id::PUBLISH_TEXT,
            Value::Tuple(_) => tool_id::PUBLISH_POINT,
            Value::FuId(_) => tool_id::PUBLISH_FUID,
            other => {
                return Err(Error::unsupported_value(format!(
                    "cannot publish {other:?}"
                )))
            }
        };

        let name = format!("Publish{tool}{input}");
        self.tool_mut(tool)
            .ok_or_else(|| Error::unknown_tool(tool))?
            .connect_source(input, &name, "Value");

        let published = Tool::modifier(id, name.as_str()).with_input("Value", value);
        self.modifiers.insert(name, Modifier::Tool(published));
        Ok(self)
    }

    /// Drives `to.input` from an existing published value, so several inputs
    /// can share one control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if `published` is not a modifier here or
    /// `to` is not a tool.
    pub fn connect_published(&mut self, published: &str, to: &str, input: &str) -> Result<&mut Self> {
        if !self.modifiers.contains_key(published) {
            return Err(Error::unknown_tool(published));
        }
        self.connect(published, to, "Value", input)
    }

    /// Selects the tool shown as active when pasted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTool`] if `name` is not a tool or macro here.
    pub fn set_active_tool(&mut self, name: &str) -> Result<&mut Self> {
        if !self.tools.contains_key(name) {
            return Err(Error::unknown_tool(name));
        }
        self.active_tool = Some(name.to_string());
        Ok(self)
    }

    /// The explicit active tool, or the last tool added.
    #[must_use]
    pub fn active_tool(&self) -> Option<&str> {
        self.active_tool.as_deref().or(self.last_added.as_deref())
    }

    /// `{ Tools = ordered() { .. }, ActiveTool = "..", }`
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyComposition`] when there is nothing to render.
    pub fn render(&self) -> Result<Table> {
        if self.is_empty() {
            return Err(Error::EmptyComposition);
        }

        let mut operators = Table::new(ORDERED).with_force_indent();
        for (name, operator) in &self.tools {
            operators.insert(name, operator.to_table(&self.options));
        }
        for modifier in self.modifiers.values() {
            modifier.write_into(&mut operators, &self.options);
        }

        if self.active_tool.is_none() {
            if let Some(name) = &self.last_added {
                debug!("no active tool set, using {}", name);
            }
        }

        Ok(Table::unnamed()
            .with("Tools", operators)
            .with("ActiveTool", self.active_tool()))
    }

    /// Renders the composition to text.
    ///
    /// # Errors
    ///
    /// Fails for an empty composition or an unsupported value anywhere in the graph.
    pub fn to_text(&self) -> Result<String> {
        render_table(&self.render()?)
    }

    /// Writes the rendered text to `path`, typically a `.setting` file.
    ///
    /// # Errors
    ///
    /// Rendering errors, or [`Error::Io`] when the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = self.to_text()?;
        std::fs::write(path.as_ref(), text)?;
        debug!("saved composition to {}", path.as_ref().display());
        Ok(())
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_text().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
