//! Selection bookkeeping for one menu surface.
//!
//! Nothing is accumulated between pointer samples: every move rebuilds the
//! selection from the pointer position, the ring metrics and the current
//! lock or drag.

use crate::geometry::{
    AngleMap, Point, RingMetrics, RingZone, angle_distance_from_center, angles_for_labels,
    child_angles_for_parent, child_step, outer_sector_from_angle, sector_from_angle,
};
use crate::model::{Label, Preset, PresetName, SectionNode, SizeConfig};
use crate::selection::{DragKind, DragSession, SectorRef, SelectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    PointerMoved(Point),
    Pressed(MouseButton, Point),
    Released(MouseButton, Point),
    /// Positive is forward.
    WheelScrolled(f64),
    ContextRequested(Point),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEvent {
    SelectionChanged,
    Locked(SectorRef),
    /// The lock was toggled off or an empty spot was clicked.
    Cleared,
    /// Two siblings traded places. `parent` is set for children.
    Swapped {
        parent: Option<Label>,
        a: Label,
        b: Label,
    },
    CyclePreset(i32),
    ContextMenu(Option<SectorRef>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Layout {
    Centered(Point),
    Fitted { width: f64, height: f64 },
}

#[derive(Debug, Clone)]
pub struct InteractionEngine {
    preset_name: PresetName,
    preset: Preset,
    size: SizeConfig,
    layout: Layout,
    metrics: RingMetrics,
    center: Point,
    angles: AngleMap,
    selection: SelectionState,
    pointer: Option<Point>,
}

impl InteractionEngine {
    pub fn new(preset_name: PresetName, preset: Preset, size: SizeConfig) -> Self {
        let angles = angles_for_labels(preset.inner_section.keys());
        Self {
            preset_name,
            preset,
            size,
            layout: Layout::Centered(Point::default()),
            metrics: RingMetrics::from_size(&size),
            center: Point::default(),
            angles,
            selection: SelectionState::None,
            pointer: None,
        }
    }

    pub fn preset_name(&self) -> &PresetName {
        &self.preset_name
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn size(&self) -> &SizeConfig {
        &self.size
    }

    pub fn metrics(&self) -> &RingMetrics {
        &self.metrics
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn angles(&self) -> &AngleMap {
        &self.angles
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn child_step(&self) -> f64 {
        child_step(self.size.child_angle_multiplier)
    }

    /// Swaps in another preset. The selection never carries across.
    pub fn set_preset(&mut self, name: PresetName, preset: Preset) {
        self.preset_name = name;
        self.replace_sections(preset);
        self.selection = SelectionState::None;
    }

    /// Refreshes the sector data of the current preset after an edit. The
    /// selection survives as long as what it points at still exists.
    pub fn replace_sections(&mut self, preset: Preset) {
        self.preset = preset;
        self.angles = angles_for_labels(self.preset.inner_section.keys());
        if !self.selection_is_valid() {
            self.selection = SelectionState::None;
        }
    }

    pub fn set_size(&mut self, size: SizeConfig) {
        self.size = size;
        self.apply_layout();
    }

    /// Fixed-size rings around an absolute centre.
    pub fn set_center(&mut self, center: Point) {
        self.layout = Layout::Centered(center);
        self.apply_layout();
    }

    /// Rings centred on a `width` x `height` surface, shrunk to fit it.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.layout = Layout::Fitted { width, height };
        self.apply_layout();
    }

    fn apply_layout(&mut self) {
        match self.layout {
            Layout::Centered(center) => {
                self.center = center;
                self.metrics = RingMetrics::from_size(&self.size);
            }
            Layout::Fitted { width, height } => {
                self.center = Point::new(width / 2.0, height / 2.0);
                self.metrics = RingMetrics::fit(&self.size, width, height);
            }
        }
    }

    pub fn clear(&mut self) -> bool {
        self.replace_selection(SelectionState::None)
    }

    /// Locks onto `target` as if it had been clicked.
    pub fn focus(&mut self, target: SectorRef) -> bool {
        if self.node(&target).is_none() {
            return false;
        }
        self.selection = SelectionState::locked(target);
        true
    }

    pub fn handle(&mut self, input: Input) -> Vec<MenuEvent> {
        match input {
            Input::PointerMoved(pos) => self.pointer_moved(pos),
            Input::Pressed(MouseButton::Left, pos) => self.left_pressed(pos),
            Input::Pressed(MouseButton::Middle, pos) => self.middle_pressed(pos),
            Input::Released(MouseButton::Middle, pos) => self.middle_released(pos),
            Input::Pressed(MouseButton::Right, _) | Input::Released(_, _) => Vec::new(),
            Input::WheelScrolled(delta) => self.wheel(delta),
            Input::ContextRequested(pos) => {
                vec![MenuEvent::ContextMenu(self.context_target(pos))]
            }
        }
    }

    /// Re-resolves the hover at the last known pointer position, for when
    /// the content changed under a still pointer.
    pub fn refresh_hover(&mut self) -> bool {
        match self.pointer {
            Some(pos) => !self.pointer_moved(pos).is_empty(),
            None => false,
        }
    }

    /// The sector or child under `pos`, without touching the selection.
    /// Children are only hit when they are on screen.
    pub fn resolve_at(&self, pos: Point) -> Option<SectorRef> {
        let (angle, dist) = angle_distance_from_center(pos, self.center);
        match self.metrics.zone(dist) {
            RingZone::Inner => sector_from_angle(angle, &self.angles)
                .cloned()
                .map(SectorRef::inner),
            RingZone::Outer => {
                let (parent, node) = self.visible_children()?;
                let child_angles = self.child_angles_of(parent, node);
                let child = outer_sector_from_angle(angle, &child_angles, self.child_step())?;
                Some(SectorRef::child(parent.clone(), child.clone()))
            }
            _ => None,
        }
    }

    pub fn context_target(&self, pos: Point) -> Option<SectorRef> {
        self.resolve_at(pos)
    }

    /// The parent whose children are on screen right now.
    pub fn visible_children(&self) -> Option<(&Label, &SectionNode)> {
        let parent = match &self.selection {
            SelectionState::Hover { sector, .. } | SelectionState::Locked { sector, .. } => sector,
            SelectionState::Dragging(DragSession {
                parent: Some(parent),
                ..
            }) => parent,
            _ => return None,
        };
        self.preset
            .inner_section
            .iter()
            .find(|(label, _)| *label == parent)
            .filter(|(_, node)| node.has_children())
    }

    /// Start angles of the children currently on screen.
    pub fn child_angles(&self) -> AngleMap {
        self.visible_children()
            .map(|(parent, node)| self.child_angles_of(parent, node))
            .unwrap_or_default()
    }

    fn child_angles_of(&self, parent: &str, node: &SectionNode) -> AngleMap {
        let parent_angle = self.angles.get(parent).copied().unwrap_or(0.0);
        child_angles_for_parent(parent_angle, node.children.keys(), self.child_step())
    }

    pub fn node(&self, target: &SectorRef) -> Option<&SectionNode> {
        let sector = self.preset.sector(&target.sector)?;
        match &target.child {
            Some(child) => sector.children.get(child),
            None => Some(sector),
        }
    }

    /// Text for the line under the rings: the highlighted child's
    /// description, else the active sector's.
    pub fn description(&self) -> Option<&str> {
        let sector = self.preset.sector(self.selection.active_sector()?)?;
        let text = match self.selection.outer_active() {
            Some(child) => sector.children.get(child).map(|c| c.description.as_str()),
            None => Some(sector.description.as_str()),
        }?;
        (!text.is_empty()).then_some(text)
    }

    fn replace_selection(&mut self, next: SelectionState) -> bool {
        if self.selection == next {
            return false;
        }
        self.selection = next;
        true
    }

    fn changed(&mut self, next: SelectionState) -> Vec<MenuEvent> {
        if self.replace_selection(next) {
            vec![MenuEvent::SelectionChanged]
        } else {
            Vec::new()
        }
    }

    fn pointer_moved(&mut self, pos: Point) -> Vec<MenuEvent> {
        self.pointer = Some(pos);
        let (angle, dist) = angle_distance_from_center(pos, self.center);

        if let SelectionState::Dragging(session) = &self.selection {
            let mut session = session.clone();
            session.hover_target = self.drop_target(&session, angle, dist);
            return self.changed(SelectionState::Dragging(session));
        }

        let zone = self.metrics.zone(dist);
        if zone == RingZone::Hole {
            return self.changed(SelectionState::None);
        }

        if let SelectionState::Locked { sector, child, .. } = &self.selection {
            let (sector, child) = (sector.clone(), child.clone());
            let in_band_child = self
                .metrics
                .in_child_band(dist)
                .then(|| self.child_at(&sector, angle))
                .flatten();
            let hovered_child = in_band_child.or_else(|| child.clone());
            return self.changed(SelectionState::Locked {
                sector,
                child,
                hovered_child,
            });
        }

        let next = match zone {
            RingZone::Inner => match sector_from_angle(angle, &self.angles) {
                Some(sector) => SelectionState::Hover {
                    sector: sector.clone(),
                    child: None,
                },
                None => SelectionState::None,
            },
            RingZone::Outer => {
                let anchor = self
                    .hovered_parent_with_children()
                    .or_else(|| self.parent_with_children_at(angle));
                match anchor {
                    Some(sector) => {
                        let child = self.child_at(&sector, angle);
                        SelectionState::Hover { sector, child }
                    }
                    None => SelectionState::None,
                }
            }
            _ if self.metrics.in_retention_band(dist) => {
                match self.hovered_parent_with_children() {
                    Some(sector) => SelectionState::Hover {
                        sector,
                        child: None,
                    },
                    None => SelectionState::None,
                }
            }
            _ => SelectionState::None,
        };
        self.changed(next)
    }

    fn hovered_parent_with_children(&self) -> Option<Label> {
        match &self.selection {
            SelectionState::Hover { sector, .. }
                if self.preset.sector(sector).is_some_and(SectionNode::has_children) =>
            {
                Some(sector.clone())
            }
            _ => None,
        }
    }

    fn parent_with_children_at(&self, angle: f64) -> Option<Label> {
        let sector = sector_from_angle(angle, &self.angles)?;
        self.preset
            .sector(sector)
            .is_some_and(SectionNode::has_children)
            .then(|| sector.clone())
    }

    fn child_at(&self, parent: &Label, angle: f64) -> Option<Label> {
        let node = self.preset.sector(parent)?;
        if !node.has_children() {
            return None;
        }
        let child_angles = self.child_angles_of(parent, node);
        outer_sector_from_angle(angle, &child_angles, self.child_step()).cloned()
    }

    fn left_pressed(&mut self, pos: Point) -> Vec<MenuEvent> {
        self.pointer = Some(pos);
        if self.selection.is_dragging() {
            return Vec::new();
        }
        let target = self.resolve_at(pos);
        let current = self.selection.sticky();

        match target {
            Some(target) if current.as_ref() != Some(&target) => {
                self.selection = SelectionState::locked(target.clone());
                vec![MenuEvent::SelectionChanged, MenuEvent::Locked(target)]
            }
            _ => {
                let mut events = self.changed(SelectionState::None);
                events.push(MenuEvent::Cleared);
                events
            }
        }
    }

    fn middle_pressed(&mut self, pos: Point) -> Vec<MenuEvent> {
        self.pointer = Some(pos);
        let Some(target) = self.resolve_at(pos) else {
            return Vec::new();
        };
        let session = match target.child {
            Some(child) => DragSession {
                kind: DragKind::Child,
                hover_target: Some(child.clone()),
                label: child,
                parent: Some(target.sector),
            },
            None => DragSession {
                kind: DragKind::Inner,
                hover_target: Some(target.sector.clone()),
                label: target.sector,
                parent: None,
            },
        };
        log::debug!("Drag started on '{}'", session.label);
        self.changed(SelectionState::Dragging(session))
    }

    fn drop_target(&self, session: &DragSession, angle: f64, dist: f64) -> Option<Label> {
        match session.kind {
            DragKind::Inner => (dist <= self.metrics.inner_radius)
                .then(|| sector_from_angle(angle, &self.angles).cloned())
                .flatten(),
            DragKind::Child => {
                let parent = session.parent.as_ref()?;
                (dist > self.metrics.outer_inner && dist <= self.metrics.outer_outer)
                    .then(|| self.child_at(parent, angle))
                    .flatten()
            }
        }
    }

    fn middle_released(&mut self, pos: Point) -> Vec<MenuEvent> {
        let SelectionState::Dragging(session) = std::mem::take(&mut self.selection) else {
            return Vec::new();
        };
        let (angle, dist) = angle_distance_from_center(pos, self.center);
        let mut events = Vec::new();

        if let Some(target) = self.drop_target(&session, angle, dist)
            && target != session.label
            && self.swap(&session, &target)
        {
            events.push(MenuEvent::Swapped {
                parent: session.parent.clone(),
                a: session.label.clone(),
                b: target,
            });
        }

        // resolve hover against the new order; a dropped child keeps its
        // parent's children on screen
        if let Some(parent) = session.parent {
            self.selection = SelectionState::Hover {
                sector: parent,
                child: None,
            };
        }
        self.pointer_moved(pos);
        events.push(MenuEvent::SelectionChanged);
        events
    }

    fn swap(&mut self, session: &DragSession, target: &Label) -> bool {
        let swapped = match &session.parent {
            Some(parent) => self
                .preset
                .inner_section
                .get_mut(parent)
                .is_some_and(|node| node.children.swap_keys(&session.label, target)),
            None => self.preset.inner_section.swap_keys(&session.label, target),
        };
        if swapped {
            self.angles = angles_for_labels(self.preset.inner_section.keys());
        }
        swapped
    }

    fn wheel(&mut self, delta: f64) -> Vec<MenuEvent> {
        if delta == 0.0 || self.selection.is_dragging() {
            return Vec::new();
        }
        vec![MenuEvent::CyclePreset(if delta < 0.0 { -1 } else { 1 })]
    }

    fn selection_is_valid(&self) -> bool {
        match &self.selection {
            SelectionState::None => true,
            SelectionState::Dragging(session) => {
                let dragged = match &session.parent {
                    Some(parent) => SectorRef::child(parent.clone(), session.label.clone()),
                    None => SectorRef::inner(session.label.clone()),
                };
                self.node(&dragged).is_some()
            }
            other => other.target().is_some_and(|t| self.node(&t).is_some())
                && other
                    .sticky()
                    .is_none_or(|sticky| self.node(&sticky).is_some()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::normalize_degrees;
    use crate::ordered::OrderedMap;

    const LEAF: &[&str] = &[];

    const CENTER: Point = Point { x: 300.0, y: 300.0 };

    fn node(children: &[&str]) -> SectionNode {
        SectionNode {
            description: "sector".to_string(),
            children: children
                .iter()
                .map(|c| {
                    (
                        Label::new(*c),
                        SectionNode {
                            description: format!("{c} child"),
                            ..SectionNode::default()
                        },
                    )
                })
                .collect(),
            ..SectionNode::default()
        }
    }

    fn engine(sectors: &[(&str, &[&str])]) -> InteractionEngine {
        let mut preset = Preset::default();
        for (label, children) in sectors {
            preset.inner_section.insert(Label::new(*label), node(children));
        }
        let mut engine = InteractionEngine::new(PresetName::new("P"), preset, SizeConfig::default());
        engine.set_center(CENTER);
        engine
    }

    fn at(angle: f64, dist: f64) -> Point {
        let rad = angle.to_radians();
        Point::new(CENTER.x + dist * rad.cos(), CENTER.y + dist * rad.sin())
    }

    fn labels(map: &OrderedMap<Label, SectionNode>) -> Vec<String> {
        map.keys().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_hover_inner_sector() {
        let mut e = engine(&[("A", &[]), ("B", &[]), ("C", &[]), ("D", &[])]);
        let events = e.handle(Input::PointerMoved(at(0.0, 100.0)));
        assert_eq!(events, vec![MenuEvent::SelectionChanged]);
        assert_eq!(e.selection().active_sector().unwrap(), "B");
        assert!(e.handle(Input::PointerMoved(at(1.0, 110.0))).is_empty());
    }

    #[test]
    fn test_tools_example_picks_first_child() {
        let mut e = engine(&[("Tools", &["Move", "Rotate"])]);
        e.handle(Input::PointerMoved(at(270.0, 100.0)));
        e.handle(Input::PointerMoved(at(270.0, 170.0)));
        assert_eq!(e.selection().active_sector().unwrap(), "Tools");
        assert_eq!(e.selection().outer_active().unwrap(), "Move");
    }

    #[test]
    fn test_outer_band_without_anchor_resolves_parent() {
        let mut e = engine(&[("Tools", &["Move", "Rotate"])]);
        e.handle(Input::PointerMoved(at(280.0, 170.0)));
        assert_eq!(e.selection().active_sector().unwrap(), "Tools");
        assert_eq!(e.selection().outer_active().unwrap(), "Rotate");
    }

    #[test]
    fn test_hysteresis_retains_but_never_selects() {
        let mut e = engine(&[("Tools", &["Move", "Rotate"])]);
        e.handle(Input::PointerMoved(at(270.0, 170.0)));
        e.handle(Input::PointerMoved(at(270.0, 190.0)));
        assert_eq!(e.selection().active_sector().unwrap(), "Tools");
        assert!(e.selection().outer_active().is_none());
        assert!(e.visible_children().is_some());

        e.handle(Input::PointerMoved(at(270.0, 200.0)));
        assert_eq!(e.selection(), &SelectionState::None);
    }

    #[test]
    fn test_gap_without_children_clears() {
        let mut e = engine(&[("A", &[]), ("B", &[])]);
        e.handle(Input::PointerMoved(at(270.0, 100.0)));
        e.handle(Input::PointerMoved(at(270.0, 152.0)));
        assert_eq!(e.selection(), &SelectionState::None);
    }

    #[test]
    fn test_hole_clears_hover_and_lock() {
        let mut e = engine(&[("A", &["x"]), ("B", &[])]);
        e.handle(Input::Pressed(MouseButton::Left, at(270.0, 100.0)));
        assert!(e.selection().is_locked());
        e.handle(Input::PointerMoved(at(0.0, 10.0)));
        assert_eq!(e.selection(), &SelectionState::None);
    }

    #[test]
    fn test_click_toggles_lock() {
        let mut e = engine(&[("A", &[]), ("B", &[])]);
        let events = e.handle(Input::Pressed(MouseButton::Left, at(270.0, 100.0)));
        assert!(events.contains(&MenuEvent::Locked(SectorRef::inner(Label::new("A")))));

        let events = e.handle(Input::Pressed(MouseButton::Left, at(271.0, 90.0)));
        assert!(events.contains(&MenuEvent::Cleared));
        assert!(e.selection().active_sector().is_none());
        assert!(e.visible_children().is_none());
    }

    #[test]
    fn test_click_elsewhere_moves_lock_and_empty_click_clears() {
        let mut e = engine(&[("A", &[]), ("B", &[])]);
        e.handle(Input::Pressed(MouseButton::Left, at(270.0, 100.0)));
        e.handle(Input::Pressed(MouseButton::Left, at(90.0, 100.0)));
        assert_eq!(e.selection().sticky().unwrap().sector, "B");
        let events = e.handle(Input::Pressed(MouseButton::Left, at(90.0, 400.0)));
        assert!(events.contains(&MenuEvent::Cleared));
        assert_eq!(e.selection(), &SelectionState::None);
    }

    #[test]
    fn test_locked_parent_wins_over_neighbouring_sector() {
        let mut e = engine(&[("A", &["a1", "a2"]), ("B", &["b1"])]);
        e.handle(Input::Pressed(MouseButton::Left, at(270.0, 100.0)));
        // pointer drifts over B's part of the hysteresis band and inner ring
        e.handle(Input::PointerMoved(at(100.0, 190.0)));
        assert_eq!(e.selection().active_sector().unwrap(), "A");
        e.handle(Input::PointerMoved(at(90.0, 100.0)));
        assert_eq!(e.selection().active_sector().unwrap(), "A");
        assert_eq!(e.visible_children().unwrap().0, "A");
    }

    #[test]
    fn test_locked_child_tracks_pointer_only_in_band() {
        let mut e = engine(&[("A", &["a1", "a2"])]);
        e.handle(Input::PointerMoved(at(270.0, 100.0)));
        e.handle(Input::Pressed(MouseButton::Left, at(260.0, 170.0)));
        assert_eq!(e.selection().sticky().unwrap().child.unwrap(), "a1");

        e.handle(Input::PointerMoved(at(280.0, 170.0)));
        assert_eq!(e.selection().outer_active().unwrap(), "a2");
        e.handle(Input::PointerMoved(at(280.0, 250.0)));
        assert_eq!(e.selection().outer_active().unwrap(), "a1");
    }

    #[test]
    fn test_drag_swaps_inner_sectors() {
        let names = ["s0", "s1", "s2", "s3", "s4"];
        let sectors: Vec<(&str, &[&str])> = names.iter().map(|n| (*n, LEAF)).collect();
        let mut e = engine(&sectors);
        let angle_of = |e: &InteractionEngine, l: &str| *e.angles().get(l).unwrap();

        let from = at(angle_of(&e, "s2"), 100.0);
        let to = at(angle_of(&e, "s0"), 100.0);
        e.handle(Input::Pressed(MouseButton::Middle, from));
        assert!(e.selection().is_dragging());
        e.handle(Input::PointerMoved(at(0.0, 10.0)));
        assert!(e.selection().is_dragging());
        e.handle(Input::PointerMoved(to));
        assert_eq!(e.selection().drag().unwrap().hover_target.as_ref().unwrap(), "s0");

        let events = e.handle(Input::Released(MouseButton::Middle, to));
        assert!(events.contains(&MenuEvent::Swapped {
            parent: None,
            a: Label::new("s2"),
            b: Label::new("s0"),
        }));
        assert_eq!(labels(&e.preset().inner_section), vec!["s2", "s1", "s0", "s3", "s4"]);
        assert!(!e.selection().is_dragging());
        assert_eq!(e.selection().active_sector().unwrap(), "s2");
    }

    #[test]
    fn test_drag_release_on_origin_or_outside_is_noop() {
        let mut e = engine(&[("A", &[]), ("B", &[]), ("C", &[])]);
        let origin = at(270.0, 100.0);
        e.handle(Input::Pressed(MouseButton::Middle, origin));
        let events = e.handle(Input::Released(MouseButton::Middle, origin));
        assert!(!events.iter().any(|ev| matches!(ev, MenuEvent::Swapped { .. })));

        e.handle(Input::Pressed(MouseButton::Middle, origin));
        let events = e.handle(Input::Released(MouseButton::Middle, at(90.0, 400.0)));
        assert!(!events.iter().any(|ev| matches!(ev, MenuEvent::Swapped { .. })));
        assert_eq!(labels(&e.preset().inner_section), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_drag_swaps_children() {
        let mut e = engine(&[("A", &["a1", "a2", "a3"])]);
        e.handle(Input::PointerMoved(at(270.0, 100.0)));
        let child_angles = e.child_angles();
        let step = e.child_step();
        let mid = |l: &str| normalize_degrees(child_angles.get(l).unwrap() + step / 2.0);

        e.handle(Input::Pressed(MouseButton::Middle, at(mid("a1"), 170.0)));
        assert_eq!(
            e.selection().drag(),
            Some(&DragSession {
                kind: DragKind::Child,
                label: Label::new("a1"),
                parent: Some(Label::new("A")),
                hover_target: Some(Label::new("a1")),
            })
        );
        let events = e.handle(Input::Released(MouseButton::Middle, at(mid("a3"), 170.0)));
        assert!(events.contains(&MenuEvent::Swapped {
            parent: Some(Label::new("A")),
            a: Label::new("a1"),
            b: Label::new("a3"),
        }));
        let children = &e.preset().sector("A").unwrap().children;
        assert_eq!(labels(children), vec!["a3", "a2", "a1"]);
    }

    #[test]
    fn test_wheel_requests_cycle() {
        let mut e = engine(&[("A", &[])]);
        assert_eq!(e.handle(Input::WheelScrolled(120.0)), vec![MenuEvent::CyclePreset(1)]);
        assert_eq!(e.handle(Input::WheelScrolled(-1.0)), vec![MenuEvent::CyclePreset(-1)]);
        assert!(e.handle(Input::WheelScrolled(0.0)).is_empty());
    }

    #[test]
    fn test_set_preset_clears_selection() {
        let mut e = engine(&[("A", &[])]);
        e.handle(Input::Pressed(MouseButton::Left, at(270.0, 100.0)));
        e.set_preset(PresetName::new("Q"), Preset::default());
        assert_eq!(e.selection(), &SelectionState::None);
        assert!(e.angles().is_empty());
        assert!(e.resolve_at(at(270.0, 100.0)).is_none());
    }

    #[test]
    fn test_context_target_scopes_to_child() {
        let mut e = engine(&[("A", &["a1"])]);
        assert_eq!(e.context_target(at(270.0, 170.0)), None);
        e.handle(Input::PointerMoved(at(270.0, 100.0)));
        let events = e.handle(Input::ContextRequested(at(270.0, 170.0)));
        assert_eq!(
            events,
            vec![MenuEvent::ContextMenu(Some(SectorRef::child(
                Label::new("A"),
                Label::new("a1")
            )))]
        );
    }

    #[test]
    fn test_description_prefers_child() {
        let mut e = engine(&[("A", &["a1"])]);
        e.handle(Input::PointerMoved(at(270.0, 100.0)));
        assert_eq!(e.description(), Some("sector"));
        e.handle(Input::PointerMoved(at(270.0, 170.0)));
        assert_eq!(e.description(), Some("a1 child"));
    }
}
