use crate::colour::Colour;
use crate::error::PresetError;
use crate::ordered::OrderedMap;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnError, DeserializeFromStr, serde_as};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const DEFAULT_PRESET: &str = "Default";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Label(String);

crate::impl_string_newtype!(Label);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PresetName(String);

crate::impl_string_newtype!(PresetName);

impl PresetName {
    pub fn default_preset() -> Self {
        Self::new(DEFAULT_PRESET)
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_PRESET
    }
}

/// A primary sector or one of its children. Children of children are not
/// kept: the tree is exactly two levels deep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionNode {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub on_release: String,
    #[serde(default)]
    pub on_double: String,
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub children: OrderedMap<Label, SectionNode>,
}

impl SectionNode {
    /// The node the editor creates for a fresh label.
    pub fn placeholder(label: &str) -> Self {
        Self {
            description: label.to_string(),
            command: format!("print('{label}')"),
            ..Self::default()
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Drops any nesting below the child level. Returns true if anything was removed.
    pub fn strip_grandchildren(&mut self) -> bool {
        let mut stripped = false;
        for child in self.children.values_mut() {
            if child.has_children() {
                child.children = OrderedMap::new();
                stripped = true;
            }
        }
        stripped
    }
}

/// Returns `base` if no sibling uses it, otherwise the first free `base_N`.
pub fn unique_label<V>(siblings: &OrderedMap<Label, V>, base: &str) -> Label {
    if !siblings.contains_key(base) {
        return Label::new(base);
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !siblings.contains_key(candidate))
        .map(Label::new)
        .unwrap_or_else(|| Label::new(base))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawColourConfig")]
pub struct ColourConfig {
    pub inner_colour: Colour,
    #[serde(rename = "innerHighlight_colour")]
    pub inner_highlight_colour: Colour,
    #[serde(rename = "innerLine_colour")]
    pub inner_line_colour: Colour,
    pub child_colour: Colour,
    #[serde(rename = "childLine_colour")]
    pub child_line_colour: Colour,
    pub child_text_color: Colour,
    #[serde(rename = "child_textOutline_color")]
    pub child_text_outline_color: Colour,
    pub child_outline_thickness: f64,
}

impl Default for ColourConfig {
    fn default() -> Self {
        Self {
            inner_colour: Colour::rgb(0x45, 0x45, 0x45),
            inner_highlight_colour: Colour::rgb(0x28, 0x28, 0x28),
            inner_line_colour: Colour::rgb(0x1E, 0x1E, 0x1E),
            child_colour: Colour::rgb(0x52, 0x85, 0xA6),
            child_line_colour: Colour::rgb(0x1E, 0x1E, 0x1E),
            child_text_color: Colour::rgb(0xFF, 0xFF, 0xFF),
            child_text_outline_color: Colour::rgb(0, 0, 0),
            child_outline_thickness: 1.0,
        }
    }
}

/// Which of the seven colour slots a setter targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "snake_case")]
pub enum ColourSlot {
    Inner,
    InnerHighlight,
    InnerLine,
    Child,
    ChildLine,
    ChildText,
    ChildTextOutline,
}

impl ColourConfig {
    pub fn get(&self, slot: ColourSlot) -> Colour {
        match slot {
            ColourSlot::Inner => self.inner_colour,
            ColourSlot::InnerHighlight => self.inner_highlight_colour,
            ColourSlot::InnerLine => self.inner_line_colour,
            ColourSlot::Child => self.child_colour,
            ColourSlot::ChildLine => self.child_line_colour,
            ColourSlot::ChildText => self.child_text_color,
            ColourSlot::ChildTextOutline => self.child_text_outline_color,
        }
    }

    pub fn set(&mut self, slot: ColourSlot, colour: Colour) {
        let field = match slot {
            ColourSlot::Inner => &mut self.inner_colour,
            ColourSlot::InnerHighlight => &mut self.inner_highlight_colour,
            ColourSlot::InnerLine => &mut self.inner_line_colour,
            ColourSlot::Child => &mut self.child_colour,
            ColourSlot::ChildLine => &mut self.child_line_colour,
            ColourSlot::ChildText => &mut self.child_text_color,
            ColourSlot::ChildTextOutline => &mut self.child_text_outline_color,
        };
        *field = colour;
    }
}

#[serde_as]
#[derive(Deserialize, Default)]
struct RawColourConfig {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    inner_colour: Option<Colour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, rename = "innerHighlight_colour")]
    inner_highlight_colour: Option<Colour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, rename = "innerLine_colour")]
    inner_line_colour: Option<Colour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    child_colour: Option<Colour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, rename = "childLine_colour")]
    child_line_colour: Option<Colour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    child_text_color: Option<Colour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, rename = "child_textOutline_color")]
    child_text_outline_color: Option<Colour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    child_fill_color: Option<Colour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    child_outline_color: Option<Colour>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    child_outline_thickness: Option<f64>,
}

impl From<RawColourConfig> for ColourConfig {
    fn from(raw: RawColourConfig) -> Self {
        let d = Self::default();
        Self {
            inner_colour: raw.inner_colour.unwrap_or(d.inner_colour),
            inner_highlight_colour: raw.inner_highlight_colour.unwrap_or(d.inner_highlight_colour),
            inner_line_colour: raw.inner_line_colour.unwrap_or(d.inner_line_colour),
            child_colour: raw.child_colour.unwrap_or(d.child_colour),
            child_line_colour: raw.child_line_colour.unwrap_or(d.child_line_colour),
            child_text_color: raw
                .child_text_color
                .or(raw.child_fill_color)
                .unwrap_or(d.child_text_color),
            child_text_outline_color: raw
                .child_text_outline_color
                .or(raw.child_outline_color)
                .unwrap_or(d.child_text_outline_color),
            child_outline_thickness: raw
                .child_outline_thickness
                .filter(|t| t.is_finite() && *t >= 0.0)
                .unwrap_or(d.child_outline_thickness),
        }
    }
}

pub const DEFAULT_RADIUS: f64 = 150.0;
const HOLE_FRACTION: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSizeConfig")]
pub struct SizeConfig {
    pub radius: f64,
    pub ring_gap: f64,
    pub outer_ring_width: f64,
    pub child_angle_multiplier: f64,
    pub inner_hole_radius: f64,
    pub text_scale: f64,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            ring_gap: 5.0,
            outer_ring_width: 25.0,
            child_angle_multiplier: 1.0,
            inner_hole_radius: default_hole(DEFAULT_RADIUS),
            text_scale: 1.0,
        }
    }
}

fn default_hole(radius: f64) -> f64 {
    (radius * HOLE_FRACTION).floor().max(0.0)
}

impl SizeConfig {
    /// Clamps every field into a usable range: radii are never negative,
    /// `radius >= 1` and the hole always sits strictly inside the inner ring.
    pub fn sanitized(self) -> Self {
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        let d = Self::default();

        let radius = finite_or(self.radius, d.radius).max(1.0);
        let hole = finite_or(self.inner_hole_radius, 0.0).max(0.0);
        let positive_or = |v: f64, fallback: f64| {
            let v = finite_or(v, fallback);
            if v > 0.0 { v } else { fallback }
        };

        Self {
            radius,
            ring_gap: finite_or(self.ring_gap, d.ring_gap).max(0.0),
            outer_ring_width: finite_or(self.outer_ring_width, d.outer_ring_width).max(0.0),
            child_angle_multiplier: positive_or(self.child_angle_multiplier, 1.0),
            inner_hole_radius: if hole < radius {
                hole
            } else {
                default_hole(radius)
            },
            text_scale: positive_or(self.text_scale, 1.0),
        }
    }
}

#[serde_as]
#[derive(Deserialize, Default)]
struct RawSizeConfig {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    radius: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    ring_gap: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    outer_ring_width: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    child_angle_multiplier: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    inner_hole_radius: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    text_scale: Option<f64>,
}

impl From<RawSizeConfig> for SizeConfig {
    fn from(raw: RawSizeConfig) -> Self {
        let d = Self::default();
        let radius = raw.radius.unwrap_or(d.radius);
        Self {
            radius,
            ring_gap: raw.ring_gap.unwrap_or(d.ring_gap),
            outer_ring_width: raw.outer_ring_width.unwrap_or(d.outer_ring_width),
            child_angle_multiplier: raw.child_angle_multiplier.unwrap_or(d.child_angle_multiplier),
            inner_hole_radius: raw
                .inner_hole_radius
                .unwrap_or_else(|| default_hole(radius)),
            text_scale: raw.text_scale.unwrap_or(d.text_scale),
        }
        .sanitized()
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SmartMode {
    Department,
    #[default]
    Selection,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub size: SizeConfig,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub smart_mode: SmartMode,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub colour: ColourConfig,
    #[serde(default)]
    pub inner_section: OrderedMap<Label, SectionNode>,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            active: true,
            colour: ColourConfig::default(),
            inner_section: OrderedMap::new(),
        }
    }
}

impl Preset {
    /// A preset seeded with a single starter sector.
    pub fn starter() -> Self {
        let mut inner_section = OrderedMap::new();
        inner_section.insert(
            Label::new("New Section"),
            SectionNode {
                description: "New Section".to_string(),
                ..SectionNode::default()
            },
        );
        Self {
            inner_section,
            ..Self::default()
        }
    }

    pub fn sector(&self, label: &str) -> Option<&SectionNode> {
        self.inner_section.get(label)
    }

    pub fn child(&self, parent: &str, child: &str) -> Option<&SectionNode> {
        self.sector(parent)?.children.get(child)
    }

    pub fn labels(&self) -> Vec<Label> {
        self.inner_section.keys().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuDocument {
    #[serde(default = "PresetName::default_preset")]
    pub active_preset: PresetName,
    #[serde(default)]
    pub presets: OrderedMap<PresetName, Preset>,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for MenuDocument {
    fn default() -> Self {
        let mut presets = OrderedMap::new();
        presets.insert(PresetName::default_preset(), Preset::starter());
        Self {
            active_preset: PresetName::default_preset(),
            presets,
            ui: UiConfig::default(),
        }
    }
}

impl MenuDocument {
    /// Restores the document invariants. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;

        if !self.presets.contains_key(DEFAULT_PRESET) {
            self.presets
                .insert_at(0, PresetName::default_preset(), Preset::default());
            changed = true;
        }

        if !self.presets.contains_key(&self.active_preset) {
            if let Some((first, _)) = self.presets.first() {
                log::warn!(
                    "Active preset '{}' does not exist, using '{}'",
                    self.active_preset,
                    first
                );
                self.active_preset = first.clone();
            }
            changed = true;
        }

        for preset in self.presets.values_mut() {
            for sector in preset.inner_section.values_mut() {
                changed |= sector.strip_grandchildren();
            }
        }

        let size = self.ui.size.sanitized();
        if size != self.ui.size {
            self.ui.size = size;
            changed = true;
        }

        changed
    }

    pub fn preset_names(&self) -> Vec<PresetName> {
        self.presets.keys().cloned().collect()
    }

    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    pub fn preset_mut(&mut self, name: &str) -> Option<&mut Preset> {
        self.presets.get_mut(name)
    }

    pub fn active(&self) -> Option<&Preset> {
        self.presets.get(&self.active_preset)
    }

    pub fn create_preset(
        &mut self,
        name: &str,
        clone_from: Option<&str>,
    ) -> Result<PresetName, PresetError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::InvalidName);
        }
        if self.presets.contains_key(name) {
            return Err(PresetError::AlreadyExists(PresetName::new(name)));
        }

        let preset = match clone_from {
            Some(source) => self
                .presets
                .get(source)
                .cloned()
                .ok_or_else(|| PresetError::NotFound(PresetName::new(source)))?,
            None => Preset::starter(),
        };

        let name = PresetName::new(name);
        self.presets.insert(name.clone(), preset);
        Ok(name)
    }

    pub fn delete_preset(&mut self, name: &str) -> Result<(), PresetError> {
        if name == DEFAULT_PRESET {
            return Err(PresetError::ProtectedDefault);
        }
        if self.presets.remove(name).is_none() {
            return Err(PresetError::NotFound(PresetName::new(name)));
        }
        if self.active_preset == name {
            self.active_preset = self.fallback_preset();
        }
        Ok(())
    }

    fn fallback_preset(&self) -> PresetName {
        if self.presets.contains_key(DEFAULT_PRESET) {
            return PresetName::default_preset();
        }
        self.presets
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(PresetName::default_preset)
    }

    pub fn set_active_preset(&mut self, name: &str) -> Result<(), PresetError> {
        if !self.presets.contains_key(name) {
            return Err(PresetError::NotFound(PresetName::new(name)));
        }
        self.active_preset = PresetName::new(name);
        Ok(())
    }

    /// Missing presets read as enabled.
    pub fn is_preset_enabled(&self, name: &str) -> bool {
        self.presets.get(name).is_none_or(|p| p.active)
    }

    /// Whether the preset takes part in popup wheel cycling.
    pub fn is_cycle_eligible(&self, name: &str) -> bool {
        name == DEFAULT_PRESET || self.is_preset_enabled(name)
    }

    pub fn set_preset_enabled(&mut self, name: &str, enabled: bool) -> Result<(), PresetError> {
        if name == DEFAULT_PRESET && !enabled {
            return Err(PresetError::ProtectedDefault);
        }
        let preset = self
            .presets
            .get_mut(name)
            .ok_or_else(|| PresetError::NotFound(PresetName::new(name)))?;
        preset.active = enabled;

        if !enabled && self.active_preset == name {
            self.active_preset = self.fallback_preset();
        }
        Ok(())
    }

    /// The preset `step` places away from `current` in insertion order,
    /// wrapping at both ends. With `skip_inactive` set, presets that are not
    /// cycle-eligible are passed over.
    pub fn cycle_from(&self, current: &str, step: i32, skip_inactive: bool) -> Option<PresetName> {
        let len = self.presets.len();
        if len == 0 || step == 0 {
            return None;
        }
        let start = self.presets.position(current).unwrap_or(0) as i64;
        let dir = step.signum() as i64;
        let mut remaining = step.unsigned_abs();
        let mut idx = start;

        for _ in 0..len * (remaining as usize).max(1) {
            idx = (idx + dir).rem_euclid(len as i64);
            let (name, _) = self.presets.get_index(idx as usize)?;
            if skip_inactive && !self.is_cycle_eligible(name) {
                continue;
            }
            remaining -= 1;
            if remaining == 0 {
                return Some(name.clone());
            }
        }
        None
    }
}
