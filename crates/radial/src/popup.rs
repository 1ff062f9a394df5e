//! Behaviour of the ephemeral popup: hover, wheel cycling and the single
//! script each gesture fires.

use crate::error::StoreResult;
use crate::geometry::Point;
use crate::interaction::{Input, InteractionEngine, MenuEvent, MouseButton};
use crate::model::{MenuDocument, PresetName};
use crate::script::{ScriptHook, ScriptKind, ScriptRunner, run_logged};
use crate::selection::SectorRef;
use crate::store::PresetStore;
use std::time::Duration;

/// What the window must do after feeding the controller an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEffect {
    Redraw,
    /// Start the single-shot timer; call
    /// [`click_timer_elapsed`](PopupController::click_timer_elapsed) when it fires.
    ArmClickTimer(Duration),
    CancelClickTimer,
    Close,
}

pub struct PopupController<R: ScriptRunner> {
    store: PresetStore,
    doc: MenuDocument,
    engine: InteractionEngine,
    runner: R,
    double_click: Duration,
    smart_enabled: bool,
    pending_click: Option<SectorRef>,
    closed: bool,
}

impl<R: ScriptRunner> PopupController<R> {
    /// Loads the committed preset and the global size.
    pub fn open(
        store: PresetStore,
        runner: R,
        double_click: Duration,
        smart_enabled: bool,
    ) -> StoreResult<Self> {
        let doc = store.load()?;
        let preset = doc.active().cloned().unwrap_or_default();
        let engine = InteractionEngine::new(doc.active_preset.clone(), preset, doc.ui.size);
        Ok(Self {
            store,
            doc,
            engine,
            runner,
            double_click,
            smart_enabled,
            pending_click: None,
            closed: false,
        })
    }

    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    pub fn document(&self) -> &MenuDocument {
        &self.doc
    }

    pub fn preset_name(&self) -> &PresetName {
        self.engine.preset_name()
    }

    pub fn is_smart_enabled(&self) -> bool {
        self.smart_enabled
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The line under the rings.
    pub fn description(&self) -> Option<&str> {
        self.engine.description()
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.engine.set_viewport(width, height);
    }

    /// Pins the rings around `center` at their configured size.
    pub fn set_center(&mut self, center: Point) {
        self.engine.set_center(center);
    }

    pub fn handle(&mut self, input: Input) -> Vec<PopupEffect> {
        if self.closed {
            return Vec::new();
        }
        match input {
            Input::PointerMoved(_) => self.forward(input),
            Input::WheelScrolled(_) if self.smart_enabled => Vec::new(),
            Input::WheelScrolled(_) => {
                let events = self.engine.handle(input);
                events
                    .into_iter()
                    .filter_map(|event| match event {
                        MenuEvent::CyclePreset(step) => self.cycle(step),
                        _ => None,
                    })
                    .collect()
            }
            Input::Pressed(MouseButton::Left, pos) => {
                let effects = self.forward(Input::PointerMoved(pos));
                self.pending_click = self.engine.resolve_at(pos);
                effects
            }
            Input::Released(MouseButton::Left, _) => match self.pending_click {
                Some(_) => vec![PopupEffect::ArmClickTimer(self.double_click)],
                None => Vec::new(),
            },
            Input::Released(MouseButton::Right | MouseButton::Middle, pos) => {
                let target = self.release_target(pos);
                let mut effects = self.cancel_pending();
                if let Some(target) = target {
                    self.fire(ScriptKind::Release, &target);
                }
                effects.extend(self.close());
                effects
            }
            Input::Pressed(_, _) | Input::ContextRequested(_) => Vec::new(),
        }
    }

    fn forward(&mut self, input: Input) -> Vec<PopupEffect> {
        if self.engine.handle(input).is_empty() {
            Vec::new()
        } else {
            vec![PopupEffect::Redraw]
        }
    }

    /// The highlighted node, or failing that whatever lies under `pos`.
    /// Clicks only ever hit the rings themselves, see `resolve_at`.
    fn release_target(&self, pos: Point) -> Option<SectorRef> {
        self.engine
            .selection()
            .target()
            .or_else(|| self.engine.resolve_at(pos))
    }

    fn cancel_pending(&mut self) -> Vec<PopupEffect> {
        match self.pending_click.take() {
            Some(_) => vec![PopupEffect::CancelClickTimer],
            None => Vec::new(),
        }
    }

    /// Commits the next eligible preset. The popup has no separate preview.
    fn cycle(&mut self, step: i32) -> Option<PopupEffect> {
        let current = self.engine.preset_name().clone();
        let next = self.doc.cycle_from(&current, step, true)?;
        if next == current {
            return None;
        }
        if let Err(e) = self.store.set_active_preset(&next) {
            log::warn!("Preset switch failed: {e}");
            return None;
        }
        if let Err(e) = self.doc.set_active_preset(&next) {
            log::warn!("{e}");
        }
        let preset = self.doc.preset(&next).cloned().unwrap_or_default();
        self.engine.set_preset(next, preset);
        self.engine.refresh_hover();
        Some(PopupEffect::Redraw)
    }

    /// The double-click interval passed without a second click.
    pub fn click_timer_elapsed(&mut self) -> Vec<PopupEffect> {
        let Some(target) = self.pending_click.take() else {
            return Vec::new();
        };
        self.fire(ScriptKind::Primary, &target);
        self.close()
    }

    /// A second click arrived in time. Replaces the pending single click.
    pub fn double_clicked(&mut self, pos: Point) -> Vec<PopupEffect> {
        if self.closed {
            return Vec::new();
        }
        let pending = self.pending_click.take();
        let mut effects = vec![PopupEffect::CancelClickTimer];
        if let Some(target) = pending.or_else(|| self.engine.resolve_at(pos)) {
            self.fire(ScriptKind::Double, &target);
        }
        effects.extend(self.close());
        effects
    }

    /// Picks up an edit of the document made while the popup is open. A
    /// changed committed preset replaces the shown one.
    pub fn reload(&mut self) -> Vec<PopupEffect> {
        if self.closed {
            return Vec::new();
        }
        let doc = match self.store.load() {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Keeping the open menu, reload failed: {e}");
                return Vec::new();
            }
        };
        let preset = doc.active().cloned().unwrap_or_default();
        self.engine.set_size(doc.ui.size);
        if doc.active_preset == *self.engine.preset_name() {
            self.engine.replace_sections(preset);
        } else {
            self.engine.set_preset(doc.active_preset.clone(), preset);
        }
        self.doc = doc;
        self.engine.refresh_hover();
        vec![PopupEffect::Redraw]
    }

    pub fn escape(&mut self) -> Vec<PopupEffect> {
        let mut effects = self.cancel_pending();
        effects.extend(self.close());
        effects
    }

    fn fire(&mut self, kind: ScriptKind, target: &SectorRef) {
        let Some(node) = self.engine.node(target) else {
            log::warn!("'{}' no longer exists", target.label());
            return;
        };
        if let Some(hook) = ScriptHook::for_node(kind, target.label(), node) {
            run_logged(&mut self.runner, &hook);
        }
    }

    fn close(&mut self) -> Vec<PopupEffect> {
        if self.closed {
            return Vec::new();
        }
        self.closed = true;
        vec![PopupEffect::Close]
    }
}
