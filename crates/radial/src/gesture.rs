//! Process-wide recognition of the right-button hold that opens the popup.

use crate::geometry::Point;
use crate::interaction::MouseButton;
use crate::model::PresetName;

#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub button: MouseButton,
    pub pos: Point,
    pub modifiers_held: bool,
    /// Names of the widget under the pointer and its ancestors, innermost first.
    pub widget_chain: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Press(PointerEvent),
    Release(PointerEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// The detector handled the event; the host must not see it.
    Consume,
    PassThrough,
}

/// Decides whether an event came from the 3D viewport.
pub trait ViewportProbe {
    fn is_viewport(&self, widget_chain: &[String]) -> bool;
}

/// A viewport is recognised by any widget in the chain whose name starts
/// with a fixed prefix.
#[derive(Debug, Clone)]
pub struct NamePrefixProbe {
    prefix: String,
}

impl NamePrefixProbe {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ViewportProbe for NamePrefixProbe {
    fn is_viewport(&self, widget_chain: &[String]) -> bool {
        is_viewport_chain(widget_chain, &self.prefix)
    }
}

pub fn is_viewport_chain(widget_chain: &[String], prefix: &str) -> bool {
    !prefix.is_empty() && widget_chain.iter().any(|name| name.starts_with(prefix))
}

/// Where popups live. Implemented by the shell.
pub trait PopupHost {
    /// Opens a fresh popup centred on `at`. `smart` tells it the preset was
    /// chosen automatically.
    fn open_popup(&mut self, at: Point, smart: bool);
    fn close_popup(&mut self);
    fn is_popup_open(&self) -> bool;
    /// Re-delivers a release to the open popup.
    fn deliver_release(&mut self, button: MouseButton, pos: Point);
}

/// Commits an automatically chosen preset before a popup opens.
pub trait PresetPicker {
    fn commit_smart_preset(&mut self) -> Option<PresetName>;
}

pub struct HoldGestureDetector<H: PopupHost> {
    host: H,
    probe: Box<dyn ViewportProbe>,
    picker: Option<Box<dyn PresetPicker>>,
    enabled: bool,
    smart_enabled: bool,
    shutting_down: bool,
}

impl<H: PopupHost> HoldGestureDetector<H> {
    pub fn new(host: H, probe: Box<dyn ViewportProbe>) -> Self {
        Self {
            host,
            probe,
            picker: None,
            enabled: true,
            smart_enabled: false,
            shutting_down: false,
        }
    }

    pub fn with_picker(mut self, picker: Box<dyn PresetPicker>) -> Self {
        self.picker = Some(picker);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_smart_enabled(&self) -> bool {
        self.smart_enabled
    }

    pub fn set_smart_enabled(&mut self, enabled: bool) {
        self.smart_enabled = enabled;
    }

    pub fn filter(&mut self, event: &HostEvent) -> FilterDecision {
        if !self.enabled || self.shutting_down {
            return FilterDecision::PassThrough;
        }

        match event {
            HostEvent::Press(press)
                if press.button == MouseButton::Right
                    && !press.modifiers_held
                    && self.probe.is_viewport(&press.widget_chain) =>
            {
                if self.host.is_popup_open() {
                    self.host.close_popup();
                }
                if self.smart_enabled
                    && let Some(picker) = self.picker.as_mut()
                    && let Some(name) = picker.commit_smart_preset()
                {
                    log::debug!("Smart preset '{name}' selected");
                }
                self.host.open_popup(press.pos, self.smart_enabled);
                FilterDecision::Consume
            }
            HostEvent::Release(release)
                if release.button == MouseButton::Right && self.host.is_popup_open() =>
            {
                self.host.deliver_release(release.button, release.pos);
                FilterDecision::Consume
            }
            _ => FilterDecision::PassThrough,
        }
    }

    /// Closes any live popup. Call before the host tears down.
    pub fn cleanup(&mut self) {
        if self.host.is_popup_open() {
            self.host.close_popup();
        }
    }

    fn shut_down(&mut self) {
        self.shutting_down = true;
        self.enabled = false;
        self.cleanup();
    }
}

/// Holds the one installed detector.
pub struct DetectorSlot<H: PopupHost> {
    detector: Option<HoldGestureDetector<H>>,
}

impl<H: PopupHost> Default for DetectorSlot<H> {
    fn default() -> Self {
        Self { detector: None }
    }
}

impl<H: PopupHost> DetectorSlot<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&HoldGestureDetector<H>> {
        self.detector.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut HoldGestureDetector<H>> {
        self.detector.as_mut()
    }

    pub fn is_installed(&self) -> bool {
        self.detector.is_some()
    }

    /// Installs `detector`, shutting down whichever one was there before so
    /// events are never seen twice.
    pub fn install(&mut self, detector: HoldGestureDetector<H>) {
        if let Some(mut previous) = self.detector.replace(detector) {
            previous.shut_down();
            log::info!("Replaced the previous gesture detector");
        } else {
            log::info!("Gesture detector installed");
        }
    }

    pub fn uninstall(&mut self) -> Option<HoldGestureDetector<H>> {
        let mut detector = self.detector.take()?;
        detector.shut_down();
        log::info!("Gesture detector uninstalled");
        Some(detector)
    }

    /// Installs a detector from `make` when none is present, otherwise
    /// flips (or forces) its enabled flag. Returns the resulting state.
    pub fn launch_or_toggle(
        &mut self,
        force: Option<bool>,
        make: impl FnOnce() -> HoldGestureDetector<H>,
    ) -> bool {
        match self.detector.as_mut() {
            Some(detector) => {
                let enabled = force.unwrap_or(!detector.is_enabled());
                detector.set_enabled(enabled);
                if !enabled {
                    detector.cleanup();
                }
                log::info!("Radial menu {}", if enabled { "enabled" } else { "disabled" });
                enabled
            }
            None => {
                let mut detector = make();
                let enabled = force.unwrap_or(true);
                detector.set_enabled(enabled);
                self.install(detector);
                enabled
            }
        }
    }

    /// Flips (or forces) smart preset selection. False without a detector.
    pub fn toggle_smart(&mut self, force: Option<bool>) -> bool {
        let Some(detector) = self.detector.as_mut() else {
            return false;
        };
        let enabled = force.unwrap_or(!detector.is_smart_enabled());
        detector.set_smart_enabled(enabled);
        log::info!("Smart preset {}", if enabled { "on" } else { "off" });
        enabled
    }

    pub fn filter(&mut self, event: &HostEvent) -> FilterDecision {
        match self.detector.as_mut() {
            Some(detector) => detector.filter(event),
            None => FilterDecision::PassThrough,
        }
    }
}
