//! Editing logic behind the editor window.
//!
//! The session previews one preset at a time through its own
//! [`InteractionEngine`] and writes every structural change straight through
//! the [`PresetStore`].

use crate::colour::Colour;
use crate::error::{EditError, EditResult, PresetError};
use crate::interaction::{Input, InteractionEngine, MenuEvent};
use crate::model::{
    ColourSlot, Label, MenuDocument, Preset, PresetName, SectionNode, SizeConfig, SmartMode,
    unique_label,
};
use crate::selection::{SectorRef, SelectionState};
use crate::store::PresetStore;
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};

const NEW_SECTION: &str = "new_section";
const NEW_CHILD: &str = "new_child";

/// Text shown in the editor form, plus the node it belongs to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorFields {
    pub target: Option<SectorRef>,
    pub label: String,
    pub description: String,
    pub command: String,
    pub on_release: String,
    pub on_double: String,
}

impl EditorFields {
    fn from_node(target: SectorRef, node: &SectionNode) -> Self {
        Self {
            label: target.label().to_string(),
            target: Some(target),
            description: node.description.clone(),
            command: node.command.clone(),
            on_release: node.on_release.clone(),
            on_double: node.on_double.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A copied node, deep, including its children.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardEntry {
    Inner { label: Label, node: SectionNode },
    Child { label: Label, node: SectionNode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, StrumDisplay)]
pub enum ContextAction {
    #[strum(to_string = "Add Child")]
    AddChild,
    #[strum(to_string = "Remove")]
    Remove,
    #[strum(to_string = "Copy")]
    Copy,
    #[strum(to_string = "Paste")]
    Paste,
}

pub struct EditorSession {
    store: PresetStore,
    doc: MenuDocument,
    preview: PresetName,
    engine: InteractionEngine,
    fields: EditorFields,
    clipboard: Option<ClipboardEntry>,
    context_target: Option<SectorRef>,
}

impl EditorSession {
    pub fn open(store: PresetStore) -> EditResult<Self> {
        let doc = store.load()?;
        let preview = doc.active_preset.clone();
        let preset = doc.active().cloned().unwrap_or_default();
        let engine = InteractionEngine::new(preview.clone(), preset, doc.ui.size);
        Ok(Self {
            store,
            doc,
            preview,
            engine,
            fields: EditorFields::default(),
            clipboard: None,
            context_target: None,
        })
    }

    pub fn store(&self) -> &PresetStore {
        &self.store
    }

    pub fn document(&self) -> &MenuDocument {
        &self.doc
    }

    pub fn preview(&self) -> &PresetName {
        &self.preview
    }

    pub fn preview_preset(&self) -> &Preset {
        self.engine.preset()
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    pub fn fields(&self) -> &EditorFields {
        &self.fields
    }

    /// The form text is edited freely; nothing is stored until
    /// [`save_sector_info`](Self::save_sector_info).
    pub fn fields_mut(&mut self) -> &mut EditorFields {
        &mut self.fields
    }

    pub fn clipboard(&self) -> Option<&ClipboardEntry> {
        self.clipboard.as_ref()
    }

    pub fn context_target(&self) -> Option<&SectorRef> {
        self.context_target.as_ref()
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.engine.set_viewport(width, height);
    }

    /// Feeds one pointer input to the preview and applies what it asks for.
    /// The events are returned so the window knows what to redraw.
    pub fn handle(&mut self, input: Input) -> Vec<MenuEvent> {
        let events = self.engine.handle(input);
        for event in &events {
            match event {
                MenuEvent::Locked(target) => self.fill_fields(target.clone()),
                MenuEvent::Cleared => self.fields = EditorFields::default(),
                MenuEvent::SelectionChanged => {
                    if *self.engine.selection() == SelectionState::None {
                        self.fields = EditorFields::default();
                    }
                }
                MenuEvent::Swapped { parent, a, b } => {
                    if let Err(e) = self.persist_swap(parent.as_ref(), a, b) {
                        log::warn!("Reorder not saved: {e}");
                    }
                }
                MenuEvent::CyclePreset(step) => {
                    if let Some(next) = self.doc.cycle_from(&self.preview, *step, false)
                        && let Err(e) = self.preview_preset_named(&next)
                    {
                        log::warn!("{e}");
                    }
                }
                MenuEvent::ContextMenu(target) => self.context_target = target.clone(),
            }
        }
        events
    }

    fn fill_fields(&mut self, target: SectorRef) {
        self.fields = match self.engine.node(&target) {
            Some(node) => EditorFields::from_node(target, node),
            None => EditorFields::default(),
        };
    }

    /// Applies `f` to the previewed preset on disk and refreshes the session
    /// from the written document.
    fn edit_preset<T>(&mut self, f: impl FnOnce(&mut Preset) -> EditResult<T>) -> EditResult<T> {
        let name = self.preview.clone();
        let (out, doc) = self.store.update(|doc| {
            let preset = doc
                .preset_mut(&name)
                .ok_or_else(|| PresetError::NotFound(name.clone()))?;
            let out = f(preset)?;
            Ok::<_, EditError>((out, doc.clone()))
        })?;
        self.apply_document(doc);
        Ok(out)
    }

    fn edit_document<T>(
        &mut self,
        f: impl FnOnce(&mut MenuDocument) -> EditResult<T>,
    ) -> EditResult<T> {
        let (out, doc) = self.store.update(|doc| {
            let out = f(doc)?;
            Ok::<_, EditError>((out, doc.clone()))
        })?;
        self.apply_document(doc);
        Ok(out)
    }

    fn apply_document(&mut self, doc: MenuDocument) {
        self.doc = doc;
        self.engine.set_size(self.doc.ui.size);
        match self.doc.preset(&self.preview).cloned() {
            Some(preset) => self.engine.replace_sections(preset),
            None => {
                self.preview = self.doc.active_preset.clone();
                let preset = self.doc.active().cloned().unwrap_or_default();
                self.engine.set_preset(self.preview.clone(), preset);
            }
        }
        if let Some(target) = &self.fields.target
            && self.engine.node(target).is_none()
        {
            self.fields = EditorFields::default();
        }
        if let Some(target) = &self.context_target
            && self.engine.node(target).is_none()
        {
            self.context_target = None;
        }
    }

    /// Re-reads the document, e.g. after it changed on disk.
    pub fn reload(&mut self) -> EditResult<()> {
        let doc = self.store.load()?;
        self.apply_document(doc);
        Ok(())
    }

    fn persist_swap(&mut self, parent: Option<&Label>, a: &Label, b: &Label) -> EditResult<()> {
        self.edit_preset(|preset| {
            let swapped = match parent {
                Some(parent) => preset
                    .inner_section
                    .get_mut(parent)
                    .ok_or_else(|| EditError::SectorNotFound(parent.clone()))?
                    .children
                    .swap_keys(a, b),
                None => preset.inner_section.swap_keys(a, b),
            };
            if !swapped {
                return Err(EditError::SectorNotFound(a.clone()));
            }
            Ok(())
        })?;
        log::info!("Swapped '{a}' and '{b}'");
        Ok(())
    }

    // Presets

    /// Shows `name` without committing it. Clears the selection and form.
    pub fn preview_preset_named(&mut self, name: &str) -> EditResult<()> {
        let preset = self
            .doc
            .preset(name)
            .cloned()
            .ok_or_else(|| PresetError::NotFound(PresetName::new(name)))?;
        self.preview = PresetName::new(name);
        self.engine.set_preset(self.preview.clone(), preset);
        self.fields = EditorFields::default();
        self.context_target = None;
        Ok(())
    }

    /// Persists the previewed preset as the active one.
    pub fn commit_preview(&mut self) -> EditResult<()> {
        let name = self.preview.clone();
        self.edit_document(|doc| Ok(doc.set_active_preset(&name)?))?;
        log::info!("Committed preset '{name}'");
        Ok(())
    }

    pub fn create_preset(&mut self, name: &str) -> EditResult<PresetName> {
        let created = self
            .edit_document(|doc| Ok(doc.create_preset(name, None)?))
            .inspect_err(|e| log::warn!("{e}"))?;
        self.preview_preset_named(&created)?;
        Ok(created)
    }

    /// Creates `name` as a deep copy of the previewed preset.
    pub fn duplicate_preset(&mut self, name: &str) -> EditResult<PresetName> {
        let source = self.preview.clone();
        let created = self
            .edit_document(|doc| Ok(doc.create_preset(name, Some(&source))?))
            .inspect_err(|e| log::warn!("{e}"))?;
        self.preview_preset_named(&created)?;
        Ok(created)
    }

    /// Deletes the previewed preset and previews the active one afterwards.
    pub fn delete_preview(&mut self) -> EditResult<()> {
        let name = self.preview.clone();
        self.edit_document(|doc| Ok(doc.delete_preset(&name)?))
            .inspect_err(|e| log::warn!("{e}"))?;
        let active = self.doc.active_preset.clone();
        self.preview_preset_named(&active)
    }

    pub fn set_preview_enabled(&mut self, enabled: bool) -> EditResult<()> {
        let name = self.preview.clone();
        self.edit_document(|doc| Ok(doc.set_preset_enabled(&name, enabled)?))
            .inspect_err(|e| log::warn!("{e}"))
    }

    pub fn set_smart_mode(&mut self, mode: SmartMode) -> EditResult<()> {
        self.edit_document(|doc| {
            doc.ui.smart_mode = mode;
            Ok(())
        })
    }

    // Sectors

    pub fn add_inner(&mut self) -> EditResult<Label> {
        let label = self.edit_preset(|preset| {
            let label = unique_label(&preset.inner_section, NEW_SECTION);
            preset
                .inner_section
                .insert(label.clone(), SectionNode::placeholder(&label));
            Ok(label)
        })?;
        self.focus(SectorRef::inner(label.clone()));
        Ok(label)
    }

    /// Adds a child under the selected sector, or beside the selected child.
    pub fn add_child(&mut self) -> EditResult<Label> {
        let Some(target) = self.fields.target.clone() else {
            log::warn!("Select an inner section first");
            return Err(EditError::NothingSelected);
        };
        self.add_child_to(&target.sector)
    }

    fn add_child_to(&mut self, parent: &Label) -> EditResult<Label> {
        let label = self.edit_preset(|preset| {
            let node = preset
                .inner_section
                .get_mut(parent)
                .ok_or_else(|| EditError::SectorNotFound(parent.clone()))?;
            let label = unique_label(&node.children, NEW_CHILD);
            node.children
                .insert(label.clone(), SectionNode::placeholder(&label));
            Ok(label)
        })?;
        self.focus(SectorRef::child(parent.clone(), label.clone()));
        Ok(label)
    }

    fn focus(&mut self, target: SectorRef) {
        if self.engine.focus(target.clone()) {
            self.fill_fields(target);
        }
    }

    /// Writes the form into the selected node, renaming it in place.
    pub fn save_sector_info(&mut self) -> EditResult<SectorRef> {
        let Some(target) = self.fields.target.clone() else {
            log::warn!("Nothing selected to save");
            return Err(EditError::NothingSelected);
        };
        let new_label = self.fields.label.trim().to_string();
        if new_label.is_empty() {
            log::warn!("Label cannot be empty");
            return Err(EditError::EmptyLabel);
        }
        let new_label = Label::new(new_label);
        let fields = self.fields.clone();

        let saved = self
            .edit_preset(|preset| {
                let siblings = match &target.child {
                    Some(_) => {
                        &mut preset
                            .inner_section
                            .get_mut(&target.sector)
                            .ok_or_else(|| EditError::SectorNotFound(target.sector.clone()))?
                            .children
                    }
                    None => &mut preset.inner_section,
                };
                let old_label = target.label();
                let node = siblings.get_mut(old_label).ok_or_else(|| match &target.child {
                    Some(child) => EditError::ChildNotFound {
                        parent: target.sector.clone(),
                        child: child.clone(),
                    },
                    None => EditError::SectorNotFound(target.sector.clone()),
                })?;
                node.description = fields.description;
                node.command = fields.command;
                node.on_release = fields.on_release;
                node.on_double = fields.on_double;

                if new_label != *old_label && !siblings.rename(old_label, new_label.clone()) {
                    return Err(EditError::LabelTaken(new_label.clone()));
                }
                Ok(match &target.child {
                    Some(_) => SectorRef::child(target.sector.clone(), new_label),
                    None => SectorRef::inner(new_label),
                })
            })
            .inspect_err(|e| log::warn!("{e}"))?;

        self.focus(saved.clone());
        Ok(saved)
    }

    // Context menu

    /// Actions offered for the node the context menu was opened on.
    pub fn context_actions(&self) -> Vec<ContextAction> {
        ContextAction::iter()
            .filter(|action| self.is_available(*action))
            .collect()
    }

    fn is_available(&self, action: ContextAction) -> bool {
        let target = self.context_target.as_ref();
        match action {
            ContextAction::AddChild => target.is_some_and(|t| !t.is_child()),
            ContextAction::Remove | ContextAction::Copy => target.is_some(),
            ContextAction::Paste => match &self.clipboard {
                Some(ClipboardEntry::Inner { .. }) => true,
                Some(ClipboardEntry::Child { .. }) => target.is_some(),
                None => false,
            },
        }
    }

    pub fn run_context_action(&mut self, action: ContextAction) -> EditResult<()> {
        let target = self.context_target.clone();
        let result = match (action, target) {
            (ContextAction::AddChild, Some(target)) if !target.is_child() => {
                self.add_child_to(&target.sector).map(|_| ())
            }
            (ContextAction::Remove, Some(target)) => self.remove(&target),
            (ContextAction::Copy, Some(target)) => self.copy(&target),
            (ContextAction::Paste, target) => self.paste(target.as_ref()).map(|_| ()),
            _ => Err(EditError::NothingSelected),
        };
        self.context_target = None;
        result.inspect_err(|e| log::warn!("{action} failed: {e}"))
    }

    fn remove(&mut self, target: &SectorRef) -> EditResult<()> {
        self.edit_preset(|preset| {
            let removed = match &target.child {
                Some(child) => preset
                    .inner_section
                    .get_mut(&target.sector)
                    .and_then(|node| node.children.remove(child))
                    .is_some(),
                None => preset.inner_section.remove(&target.sector).is_some(),
            };
            if removed {
                Ok(())
            } else {
                Err(not_found(target))
            }
        })?;
        log::info!("Removed '{}'", target.label());
        Ok(())
    }

    fn copy(&mut self, target: &SectorRef) -> EditResult<()> {
        let node = self
            .engine
            .node(target)
            .cloned()
            .ok_or_else(|| not_found(target))?;
        let label = target.label().clone();
        self.clipboard = Some(if target.is_child() {
            ClipboardEntry::Child { label, node }
        } else {
            ClipboardEntry::Inner { label, node }
        });
        Ok(())
    }

    /// Pastes the clipboard as a new node. Inner copies become new sectors;
    /// child copies land under the target's sector. Colliding labels get a
    /// `_N` suffix.
    fn paste(&mut self, target: Option<&SectorRef>) -> EditResult<SectorRef> {
        let entry = self.clipboard.clone().ok_or(EditError::ClipboardEmpty)?;
        let pasted = match entry {
            ClipboardEntry::Inner { label, node } => self.edit_preset(|preset| {
                let label = unique_label(&preset.inner_section, &label);
                preset.inner_section.insert(label.clone(), node);
                Ok(SectorRef::inner(label))
            })?,
            ClipboardEntry::Child { label, mut node } => {
                let parent = target.ok_or(EditError::NothingSelected)?.sector.clone();
                node.children = Default::default();
                self.edit_preset(|preset| {
                    let siblings = &mut preset
                        .inner_section
                        .get_mut(&parent)
                        .ok_or_else(|| EditError::SectorNotFound(parent.clone()))?
                        .children;
                    let label = unique_label(siblings, &label);
                    siblings.insert(label.clone(), node);
                    Ok(SectorRef::child(parent.clone(), label))
                })?
            }
        };
        self.focus(pasted.clone());
        Ok(pasted)
    }

    // Styling

    pub fn set_colour(&mut self, slot: ColourSlot, colour: Colour) -> EditResult<()> {
        self.edit_preset(|preset| {
            preset.colour.set(slot, colour);
            Ok(())
        })
    }

    pub fn set_outline_thickness(&mut self, thickness: f64) -> EditResult<()> {
        let thickness = if thickness.is_finite() {
            thickness.max(0.0)
        } else {
            1.0
        };
        self.edit_preset(|preset| {
            preset.colour.child_outline_thickness = thickness;
            Ok(())
        })
    }

    pub fn set_size(&mut self, size: SizeConfig) -> EditResult<SizeConfig> {
        self.edit_document(|doc| {
            doc.ui.size = size.sanitized();
            Ok(doc.ui.size)
        })
    }
}

fn not_found(target: &SectorRef) -> EditError {
    match &target.child {
        Some(child) => EditError::ChildNotFound {
            parent: target.sector.clone(),
            child: child.clone(),
        },
        None => EditError::SectorNotFound(target.sector.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::interaction::MouseButton;
    use crate::model::DEFAULT_PRESET;

    const W: f64 = 600.0;

    fn session() -> (tempfile::TempDir, EditorSession) {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::new(dir.path().join("menu.json"));
        let mut session = EditorSession::open(store).unwrap();
        session.set_viewport(W, W);
        (dir, session)
    }

    fn at(angle: f64, dist: f64) -> Point {
        let rad = angle.to_radians();
        Point::new(W / 2.0 + dist * rad.cos(), W / 2.0 + dist * rad.sin())
    }

    fn click(session: &mut EditorSession, pos: Point) -> Vec<MenuEvent> {
        session.handle(Input::PointerMoved(pos));
        session.handle(Input::Pressed(MouseButton::Left, pos))
    }

    fn stored(session: &EditorSession) -> Preset {
        session
            .store()
            .load()
            .unwrap()
            .preset(session.preview())
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_click_fills_then_clears_fields() {
        let (_dir, mut s) = session();
        click(&mut s, at(270.0, 100.0));
        assert_eq!(s.fields().label, "New Section");
        assert_eq!(s.fields().description, "New Section");

        click(&mut s, at(270.0, 100.0));
        assert!(s.fields().is_empty());
        assert!(s.engine().selection().active_sector().is_none());
        assert!(s.engine().visible_children().is_none());
    }

    #[test]
    fn test_add_inner_and_child_use_unique_labels() {
        let (_dir, mut s) = session();
        assert_eq!(s.add_inner().unwrap(), "new_section");
        assert_eq!(s.add_inner().unwrap(), "new_section_1");
        assert_eq!(s.fields().command, "print('new_section_1')");

        assert_eq!(s.add_child().unwrap(), "new_child");
        assert_eq!(s.add_child().unwrap(), "new_child_1");
        let preset = stored(&s);
        let children = &preset.sector("new_section_1").unwrap().children;
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_add_child_needs_selection() {
        let (_dir, mut s) = session();
        assert!(matches!(s.add_child(), Err(EditError::NothingSelected)));
    }

    #[test]
    fn test_save_renames_in_place() {
        let (_dir, mut s) = session();
        s.add_inner().unwrap();
        s.add_inner().unwrap();
        s.fields_mut().label = "Tools".to_string();
        s.fields_mut().command = "echo tools".to_string();
        s.save_sector_info().unwrap();

        let preset = stored(&s);
        let labels: Vec<_> = preset.labels().iter().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["New Section", "new_section", "Tools"]);
        assert_eq!(preset.sector("Tools").unwrap().command, "echo tools");
        assert_eq!(s.fields().label, "Tools");
    }

    #[test]
    fn test_save_rejects_empty_and_taken_labels() {
        let (_dir, mut s) = session();
        s.add_inner().unwrap();
        s.fields_mut().label = "   ".to_string();
        assert!(matches!(s.save_sector_info(), Err(EditError::EmptyLabel)));
        s.fields_mut().label = "New Section".to_string();
        assert!(matches!(s.save_sector_info(), Err(EditError::LabelTaken(_))));
        assert!(stored(&s).sector("new_section").is_some());
    }

    #[test]
    fn test_copy_paste_deep_copies_with_suffix() {
        let (_dir, mut s) = session();
        click(&mut s, at(270.0, 100.0));
        s.add_child().unwrap();
        s.handle(Input::ContextRequested(at(270.0, 100.0)));
        assert_eq!(
            s.context_actions(),
            vec![ContextAction::AddChild, ContextAction::Remove, ContextAction::Copy]
        );
        s.run_context_action(ContextAction::Copy).unwrap();
        s.handle(Input::ContextRequested(at(270.0, 100.0)));
        s.run_context_action(ContextAction::Paste).unwrap();

        let preset = stored(&s);
        let copy = preset.sector("New Section_1").unwrap();
        assert_eq!(copy.children.len(), 1);
        assert_eq!(copy, preset.sector("New Section").unwrap());
    }

    #[test]
    fn test_paste_child_without_target_needs_selection() {
        let (_dir, mut s) = session();
        assert!(matches!(
            s.run_context_action(ContextAction::Paste),
            Err(EditError::ClipboardEmpty)
        ));

        click(&mut s, at(270.0, 100.0));
        s.add_child().unwrap();
        s.handle(Input::PointerMoved(at(270.0, 100.0)));
        s.handle(Input::ContextRequested(at(270.0, 170.0)));
        s.run_context_action(ContextAction::Copy).unwrap();

        s.handle(Input::ContextRequested(at(0.0, 10.0)));
        assert!(s.context_target().is_none());
        assert!(!s.context_actions().contains(&ContextAction::Paste));
        assert!(matches!(
            s.run_context_action(ContextAction::Paste),
            Err(EditError::NothingSelected)
        ));
    }

    #[test]
    fn test_remove_last_child_drops_children_block() {
        let (_dir, mut s) = session();
        click(&mut s, at(270.0, 100.0));
        s.add_child().unwrap();
        s.handle(Input::PointerMoved(at(270.0, 100.0)));
        s.handle(Input::ContextRequested(at(270.0, 170.0)));
        assert!(s.context_target().unwrap().is_child());
        s.run_context_action(ContextAction::Remove).unwrap();

        let raw = fs_err::read_to_string(s.store().path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let sector = &json["presets"][DEFAULT_PRESET]["inner_section"]["New Section"];
        assert!(sector.get("children").is_none());
        assert!(s.fields().is_empty());
    }

    #[test]
    fn test_wheel_previews_without_committing() {
        let (_dir, mut s) = session();
        s.create_preset("B").unwrap();
        s.create_preset("C").unwrap();
        s.preview_preset_named("B").unwrap();
        s.handle(Input::WheelScrolled(1.0));
        assert_eq!(s.preview(), "C");
        s.handle(Input::WheelScrolled(1.0));
        assert_eq!(s.preview(), DEFAULT_PRESET);
        s.handle(Input::WheelScrolled(-1.0));
        assert_eq!(s.preview(), "C");
        assert_eq!(s.store().active_preset().unwrap(), DEFAULT_PRESET);

        s.commit_preview().unwrap();
        assert_eq!(s.store().active_preset().unwrap(), "C");
    }

    #[test]
    fn test_preview_change_clears_selection() {
        let (_dir, mut s) = session();
        s.create_preset("B").unwrap();
        s.preview_preset_named(DEFAULT_PRESET).unwrap();
        click(&mut s, at(270.0, 100.0));
        assert!(!s.fields().is_empty());
        s.preview_preset_named("B").unwrap();
        assert!(s.fields().is_empty());
        assert_eq!(s.engine().selection(), &SelectionState::None);
    }

    #[test]
    fn test_default_preset_is_protected() {
        let (_dir, mut s) = session();
        assert!(matches!(
            s.delete_preview(),
            Err(EditError::Preset(PresetError::ProtectedDefault))
        ));
        assert!(s.set_preview_enabled(false).is_err());

        s.duplicate_preset("Copy").unwrap();
        assert_eq!(s.preview_preset(), s.document().preset(DEFAULT_PRESET).unwrap());
        s.delete_preview().unwrap();
        assert_eq!(s.preview(), DEFAULT_PRESET);
        assert!(s.document().preset("Copy").is_none());
    }

    #[test]
    fn test_drag_reorder_is_persisted() {
        let (_dir, mut s) = session();
        s.add_inner().unwrap();
        s.add_inner().unwrap();
        let angle_of = |s: &EditorSession, l: &str| *s.engine().angles().get(l).unwrap();
        let from = at(angle_of(&s, "new_section_1"), 100.0);
        let to = at(angle_of(&s, "New Section"), 100.0);
        s.handle(Input::Pressed(MouseButton::Middle, from));
        s.handle(Input::PointerMoved(to));
        s.handle(Input::Released(MouseButton::Middle, to));

        let labels: Vec<_> = stored(&s).labels().iter().map(|l| l.to_string()).collect();
        assert_eq!(labels, vec!["new_section_1", "new_section", "New Section"]);
    }

    #[test]
    fn test_styling_is_stored_per_preset() {
        let (_dir, mut s) = session();
        s.set_colour(ColourSlot::Inner, Colour::rgb(1, 2, 3)).unwrap();
        s.set_outline_thickness(-2.0).unwrap();
        let preset = stored(&s);
        assert_eq!(preset.colour.inner_colour, Colour::rgb(1, 2, 3));
        assert_eq!(preset.colour.child_outline_thickness, 0.0);

        let size = s
            .set_size(SizeConfig {
                radius: 200.0,
                ..SizeConfig::default()
            })
            .unwrap();
        assert_eq!(s.engine().size(), &size);
        assert_eq!(s.store().load().unwrap().ui.size.radius, 200.0);
    }
}
