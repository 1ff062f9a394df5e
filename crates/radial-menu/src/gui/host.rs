//! Stand-in host application: a viewport and a side panel, with the
//! hold-gesture detector watching every click and the popup drawn as an
//! overlay above both.

use crate::config::Settings;
use crate::events::{AppEvent, ControlCommand};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view::{self, RingView};
use crate::sys::script::ShellRunner;
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use radial::geometry::Point;
use radial::gesture::{
    DetectorSlot, FilterDecision, HoldGestureDetector, HostEvent, NamePrefixProbe, PointerEvent,
    PopupHost,
};
use radial::interaction::{Input, MouseButton};
use radial::popup::{PopupController, PopupEffect};
use radial::smart::{NoScene, SmartSwitch};
use radial::store::PresetStore;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const VIEWPORT_NAME: &str = "viewport3D";
const PLATFORM_DOUBLE_CLICK_MS: u64 = 400;

pub fn mouse_button(button: u32) -> Option<MouseButton> {
    match button {
        gdk::BUTTON_PRIMARY => Some(MouseButton::Left),
        gdk::BUTTON_MIDDLE => Some(MouseButton::Middle),
        gdk::BUTTON_SECONDARY => Some(MouseButton::Right),
        _ => None,
    }
}

fn modifiers_held(state: gdk::ModifierType) -> bool {
    state.intersects(
        gdk::ModifierType::SHIFT_MASK
            | gdk::ModifierType::CONTROL_MASK
            | gdk::ModifierType::ALT_MASK
            | gdk::ModifierType::SUPER_MASK,
    )
}

/// Names of the widget at (`x`, `y`) and all its ancestors, innermost first.
fn widget_chain(root: &impl IsA<gtk::Widget>, x: f64, y: f64) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = root.pick(x, y, gtk::PickFlags::DEFAULT);
    while let Some(widget) = current {
        chain.push(widget.widget_name().to_string());
        current = widget.parent();
    }
    chain
}

fn platform_double_click_ms() -> u64 {
    gtk::Settings::default()
        .map(|s| s.gtk_double_click_time())
        .and_then(|ms| u64::try_from(ms).ok())
        .unwrap_or(PLATFORM_DOUBLE_CLICK_MS)
}

/// Shared access to the open popup, its drawing surface and its click timer.
#[derive(Clone)]
pub struct PopupHandle {
    popup: Rc<RefCell<Option<PopupController<ShellRunner>>>>,
    area: gtk::DrawingArea,
    timer: Rc<RefCell<Option<glib::SourceId>>>,
}

impl PopupHandle {
    fn new() -> Self {
        let area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .can_target(false)
            .visible(false)
            .css_classes(["radial-popup"])
            .build();
        Self {
            popup: Rc::new(RefCell::new(None)),
            area,
            timer: Rc::new(RefCell::new(None)),
        }
    }

    pub fn is_open(&self) -> bool {
        self.popup.borrow().is_some()
    }

    /// Runs `f` on the open popup and carries out what it asks for.
    pub fn with_popup(&self, f: impl FnOnce(&mut PopupController<ShellRunner>) -> Vec<PopupEffect>) {
        let effects = match self.popup.borrow_mut().as_mut() {
            Some(popup) => f(popup),
            None => return,
        };
        self.apply(effects);
    }

    fn apply(&self, effects: Vec<PopupEffect>) {
        for effect in effects {
            match effect {
                PopupEffect::Redraw => self.area.queue_draw(),
                PopupEffect::ArmClickTimer(interval) => {
                    self.cancel_timer();
                    let handle = self.clone();
                    let id = glib::timeout_add_local_once(interval, move || {
                        handle.timer.borrow_mut().take();
                        handle.with_popup(|popup| popup.click_timer_elapsed());
                    });
                    *self.timer.borrow_mut() = Some(id);
                }
                PopupEffect::CancelClickTimer => self.cancel_timer(),
                PopupEffect::Close => self.dismiss(),
            }
        }
    }

    fn cancel_timer(&self) {
        if let Some(id) = self.timer.borrow_mut().take() {
            id.remove();
        }
    }

    fn dismiss(&self) {
        self.cancel_timer();
        self.popup.borrow_mut().take();
        self.area.set_visible(false);
    }

    fn draw(&self, cr: &cairo::Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let popup = self.popup.borrow();
        let Some(popup) = popup.as_ref() else {
            return Ok(());
        };
        let ring = RingView {
            engine: popup.engine(),
            colour: &popup.engine().preset().colour,
            smart: popup.is_smart_enabled(),
        };
        view::draw(cr, &ring, colors)
    }
}

/// Opens popups as an overlay of the host window.
pub struct OverlayHost {
    handle: PopupHandle,
    store: PresetStore,
    shell: String,
    double_click: Duration,
    status: relm4::Sender<HostMsg>,
}

impl PopupHost for OverlayHost {
    fn open_popup(&mut self, at: Point, smart: bool) {
        let runner = ShellRunner::new(self.shell.clone());
        match PopupController::open(self.store.clone(), runner, self.double_click, smart) {
            Ok(mut popup) => {
                popup.set_center(at);
                *self.handle.popup.borrow_mut() = Some(popup);
                self.handle.area.set_visible(true);
                self.handle.area.queue_draw();
            }
            Err(e) => {
                log::error!("Failed to open radial menu: {}", e);
                self.status
                    .emit(HostMsg::Status(format!("Radial menu unavailable: {e}")));
            }
        }
    }

    fn close_popup(&mut self) {
        self.handle.dismiss();
    }

    fn is_popup_open(&self) -> bool {
        self.handle.is_open()
    }

    fn deliver_release(&mut self, button: MouseButton, pos: Point) {
        self.handle
            .with_popup(|popup| popup.handle(Input::Released(button, pos)));
    }
}

pub struct HostModel {
    settings: Settings,
    store: PresetStore,
    detector: Rc<RefCell<DetectorSlot<OverlayHost>>>,
    handle: PopupHandle,
    status: String,
    sender: relm4::Sender<HostMsg>,
}

#[derive(Debug)]
pub enum HostMsg {
    Control(ControlCommand),
    DocumentChanged,
    Status(String),
}

impl From<AppEvent> for HostMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Control(cmd) => HostMsg::Control(cmd),
            AppEvent::DocumentChanged => HostMsg::DocumentChanged,
        }
    }
}

impl HostModel {
    fn make_detector(&self) -> HoldGestureDetector<OverlayHost> {
        let host = OverlayHost {
            handle: self.handle.clone(),
            store: self.store.clone(),
            shell: self.settings.script_shell.clone(),
            double_click: self.settings.double_click(platform_double_click_ms()),
            status: self.sender.clone(),
        };
        let probe = NamePrefixProbe::new(self.settings.viewport_prefix.clone());
        let mut detector = HoldGestureDetector::new(host, Box::new(probe))
            .with_picker(Box::new(SmartSwitch::new(self.store.clone(), NoScene)));
        detector.set_smart_enabled(self.settings.smart_preset);
        detector
    }

    fn control(&mut self, cmd: ControlCommand) {
        let mut slot = self.detector.borrow_mut();
        self.status = match cmd {
            ControlCommand::Toggle | ControlCommand::Enable | ControlCommand::Disable => {
                let force = match cmd {
                    ControlCommand::Enable => Some(true),
                    ControlCommand::Disable => Some(false),
                    _ => None,
                };
                let enabled = slot.launch_or_toggle(force, || self.make_detector());
                format!("Radial menu {}", if enabled { "enabled" } else { "disabled" })
            }
            ControlCommand::Smart(force) => {
                let on = slot.toggle_smart(force);
                format!("Smart preset {}", if on { "on" } else { "off" })
            }
            ControlCommand::Preset(name) => match self.store.set_active_preset(&name) {
                Ok(()) => format!("Preset '{name}' selected"),
                Err(e) => e.to_string(),
            },
            ControlCommand::Uninstall => match slot.uninstall() {
                Some(_) => "Radial menu uninstalled".to_string(),
                None => "Radial menu was not installed".to_string(),
            },
        };
    }
}

#[relm4::component(pub)]
impl SimpleComponent for HostModel {
    type Init = (
        Settings,
        PresetStore,
        async_channel::Receiver<AppEvent>,
    );
    type Input = HostMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Radial Menu"),
            set_default_size: (1100, 720),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[handle = model.handle.clone()] => move |_, key, _, _| {
                    if key == gdk::Key::Escape && handle.is_open() {
                        handle.with_popup(|popup| popup.escape());
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,

                #[name = "overlay"]
                gtk::Overlay {
                    set_vexpand: true,

                    #[wrap(Some)]
                    set_child = &gtk::Paned {
                        set_orientation: gtk::Orientation::Horizontal,
                        set_position: 220,

                        #[wrap(Some)]
                        set_start_child = &gtk::Box {
                            set_widget_name: "outliner",
                            set_orientation: gtk::Orientation::Vertical,
                            set_margin_all: 8,

                            gtk::Label {
                                set_label: "Outliner",
                                set_xalign: 0.0,
                            },
                        },

                        #[wrap(Some)]
                        set_end_child = &gtk::DrawingArea {
                            set_widget_name: VIEWPORT_NAME,
                            set_hexpand: true,
                            set_vexpand: true,
                            add_css_class: "radial-viewport",
                        },
                    },
                },

                gtk::Label {
                    set_xalign: 0.0,
                    set_margin_all: 4,
                    #[watch]
                    set_label: &model.status,
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (settings, store, rx) = init;

        theme::load_css();

        let handle = PopupHandle::new();
        let model = HostModel {
            settings,
            store,
            detector: Rc::new(RefCell::new(DetectorSlot::new())),
            handle,
            status: String::new(),
            sender: sender.input_sender().clone(),
        };

        let widgets = view_output!();
        widgets.overlay.add_overlay(&model.handle.area);

        let draw_handle = model.handle.clone();
        model.handle.area.set_draw_func(move |area, cr, _, _| {
            let colors = ThemeColors::from_context(&area.style_context());
            if let Err(e) = draw_handle.draw(cr, &colors) {
                log::error!("Drawing error: {}", e);
            }
        });

        install_input_controllers(&widgets.overlay, &model);

        let enabled = model.settings.enabled;
        model
            .detector
            .borrow_mut()
            .launch_or_toggle(Some(enabled), || model.make_detector());

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(HostMsg::from(event));
            }
        });

        let detector = model.detector.clone();
        root.connect_close_request(move |_| {
            if let Some(detector) = detector.borrow_mut().get_mut() {
                detector.cleanup();
            }
            glib::Propagation::Proceed
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            HostMsg::Control(cmd) => {
                self.control(cmd);
                log::info!("{}", self.status);
            }
            HostMsg::DocumentChanged => {
                log::debug!("Menu document changed on disk");
                self.handle.with_popup(|popup| popup.reload());
            }
            HostMsg::Status(text) => self.status = text,
        }
    }
}

/// Pointer input is watched in the capture phase so the detector sees every
/// press before the widget under the pointer does.
fn install_input_controllers(overlay: &gtk::Overlay, model: &HostModel) {
    let click = gtk::GestureClick::new();
    click.set_button(0);
    click.set_propagation_phase(gtk::PropagationPhase::Capture);

    {
        let detector = model.detector.clone();
        let handle = model.handle.clone();
        let overlay = overlay.clone();
        click.connect_pressed(move |gesture, n_press, x, y| {
            let Some(button) = mouse_button(gesture.current_button()) else {
                return;
            };
            let pos = Point::new(x, y);
            if button != MouseButton::Right && handle.is_open() {
                if button == MouseButton::Left && n_press >= 2 {
                    handle.with_popup(|popup| popup.double_clicked(pos));
                } else {
                    handle.with_popup(|popup| popup.handle(Input::Pressed(button, pos)));
                }
                gesture.set_state(gtk::EventSequenceState::Claimed);
                return;
            }
            let event = HostEvent::Press(PointerEvent {
                button,
                pos,
                modifiers_held: modifiers_held(gesture.current_event_state()),
                widget_chain: widget_chain(&overlay, x, y),
            });
            if detector.borrow_mut().filter(&event) == FilterDecision::Consume {
                gesture.set_state(gtk::EventSequenceState::Claimed);
            }
        });
    }

    {
        let detector = model.detector.clone();
        let handle = model.handle.clone();
        let overlay = overlay.clone();
        click.connect_released(move |gesture, _, x, y| {
            let Some(button) = mouse_button(gesture.current_button()) else {
                return;
            };
            let pos = Point::new(x, y);
            if button != MouseButton::Right {
                handle.with_popup(|popup| popup.handle(Input::Released(button, pos)));
                return;
            }
            let event = HostEvent::Release(PointerEvent {
                button,
                pos,
                modifiers_held: modifiers_held(gesture.current_event_state()),
                widget_chain: widget_chain(&overlay, x, y),
            });
            detector.borrow_mut().filter(&event);
        });
    }
    overlay.add_controller(click);

    let motion = gtk::EventControllerMotion::new();
    motion.set_propagation_phase(gtk::PropagationPhase::Capture);
    {
        let handle = model.handle.clone();
        motion.connect_motion(move |_, x, y| {
            handle.with_popup(|popup| popup.handle(Input::PointerMoved(Point::new(x, y))));
        });
    }
    overlay.add_controller(motion);

    let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
    scroll.set_propagation_phase(gtk::PropagationPhase::Capture);
    {
        let handle = model.handle.clone();
        scroll.connect_scroll(move |_, _, dy| {
            if !handle.is_open() {
                return glib::Propagation::Proceed;
            }
            // wheel away from the user scrolls up, which is forward
            handle.with_popup(|popup| popup.handle(Input::WheelScrolled(-dy)));
            glib::Propagation::Stop
        });
    }
    overlay.add_controller(scroll);
}
