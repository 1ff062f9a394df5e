//! Editor window: a live preview of one preset next to the form and the
//! preset, colour and size controls.

use crate::events::AppEvent;
use crate::gui::host::mouse_button;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view::{self, RingView};
use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use radial::colour::Colour;
use radial::editor::{ContextAction, EditorFields, EditorSession};
use radial::error::EditResult;
use radial::geometry::Point;
use radial::interaction::{Input, MenuEvent};
use radial::model::{ColourSlot, SizeConfig, SmartMode};
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use strum::IntoEnumIterator;

fn to_rgba(colour: Colour) -> gdk::RGBA {
    let (r, g, b, a) = colour.into_srgba().into_components();
    gdk::RGBA::new(r as f32, g as f32, b as f32, a as f32)
}

fn from_rgba(rgba: &gdk::RGBA) -> Colour {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Colour::rgba(
        byte(rgba.red()),
        byte(rgba.green()),
        byte(rgba.blue()),
        byte(rgba.alpha()),
    )
}

/// The form entries, in the order they are laid out.
struct FormEntries {
    label: gtk::Entry,
    description: gtk::Entry,
    command: gtk::Entry,
    on_release: gtk::Entry,
    on_double: gtk::Entry,
}

impl FormEntries {
    fn new() -> Self {
        let entry = |hint: &str| gtk::Entry::builder().placeholder_text(hint).build();
        Self {
            label: entry("Label"),
            description: entry("Description"),
            command: entry("Script run on click"),
            on_release: entry("Script run on release"),
            on_double: entry("Script run on double click"),
        }
    }

    fn rows(&self) -> [(&'static str, &gtk::Entry); 5] {
        [
            ("Label", &self.label),
            ("Description", &self.description),
            ("Command", &self.command),
            ("On release", &self.on_release),
            ("On double", &self.on_double),
        ]
    }

    fn show(&self, fields: &EditorFields) {
        self.label.set_text(&fields.label);
        self.description.set_text(&fields.description);
        self.command.set_text(&fields.command);
        self.on_release.set_text(&fields.on_release);
        self.on_double.set_text(&fields.on_double);
    }

    fn read_into(&self, fields: &mut EditorFields) {
        fields.label = self.label.text().to_string();
        fields.description = self.description.text().to_string();
        fields.command = self.command.text().to_string();
        fields.on_release = self.on_release.text().to_string();
        fields.on_double = self.on_double.text().to_string();
    }
}

struct SizeSpins {
    radius: gtk::SpinButton,
    ring_gap: gtk::SpinButton,
    outer_ring_width: gtk::SpinButton,
    child_angle_multiplier: gtk::SpinButton,
    inner_hole_radius: gtk::SpinButton,
    text_scale: gtk::SpinButton,
}

impl SizeSpins {
    fn new() -> Self {
        let spin = |min: f64, max: f64, step: f64, digits: u32| {
            let spin = gtk::SpinButton::with_range(min, max, step);
            spin.set_digits(digits);
            spin
        };
        Self {
            radius: spin(1.0, 1000.0, 1.0, 0),
            ring_gap: spin(0.0, 200.0, 1.0, 0),
            outer_ring_width: spin(1.0, 400.0, 1.0, 0),
            child_angle_multiplier: spin(0.1, 10.0, 0.05, 2),
            inner_hole_radius: spin(0.0, 1000.0, 1.0, 0),
            text_scale: spin(0.1, 10.0, 0.05, 2),
        }
    }

    fn rows(&self) -> [(&'static str, &gtk::SpinButton); 6] {
        [
            ("Radius", &self.radius),
            ("Ring gap", &self.ring_gap),
            ("Outer ring width", &self.outer_ring_width),
            ("Child angle multiplier", &self.child_angle_multiplier),
            ("Hole radius", &self.inner_hole_radius),
            ("Text scale", &self.text_scale),
        ]
    }

    fn show(&self, size: &SizeConfig) {
        self.radius.set_value(size.radius);
        self.ring_gap.set_value(size.ring_gap);
        self.outer_ring_width.set_value(size.outer_ring_width);
        self.child_angle_multiplier
            .set_value(size.child_angle_multiplier);
        self.inner_hole_radius.set_value(size.inner_hole_radius);
        self.text_scale.set_value(size.text_scale);
    }

    fn read(&self) -> SizeConfig {
        SizeConfig {
            radius: self.radius.value(),
            ring_gap: self.ring_gap.value(),
            outer_ring_width: self.outer_ring_width.value(),
            child_angle_multiplier: self.child_angle_multiplier.value(),
            inner_hole_radius: self.inner_hole_radius.value(),
            text_scale: self.text_scale.value(),
        }
    }
}

/// Widgets whose state mirrors the session and is pushed from code.
struct Controls {
    form: FormEntries,
    preset_names: gtk::StringList,
    presets: gtk::DropDown,
    preset_name: gtk::Entry,
    enabled: gtk::CheckButton,
    smart_mode: gtk::DropDown,
    colours: Vec<(ColourSlot, gtk::ColorButton)>,
    thickness: gtk::SpinButton,
    size: SizeSpins,
    context_menu: gtk::Popover,
    /// Set while values are pushed into the widgets, so their change
    /// handlers do not echo them back.
    syncing: Rc<Cell<bool>>,
}

impl Controls {
    fn new() -> Self {
        let preset_names = gtk::StringList::new(&[]);
        let presets = gtk::DropDown::new(Some(preset_names.clone()), None::<gtk::Expression>);
        presets.set_hexpand(true);

        let modes: Vec<String> = SmartMode::iter().map(|m| m.to_string()).collect();
        let modes: Vec<&str> = modes.iter().map(String::as_str).collect();

        let colours = ColourSlot::iter()
            .map(|slot| {
                let button = gtk::ColorButton::new();
                button.set_use_alpha(true);
                (slot, button)
            })
            .collect();

        let thickness = gtk::SpinButton::with_range(0.0, 20.0, 0.5);
        thickness.set_digits(1);

        let context_menu = gtk::Popover::new();
        context_menu.set_has_arrow(false);

        Self {
            form: FormEntries::new(),
            preset_names,
            presets,
            preset_name: gtk::Entry::builder().placeholder_text("New preset name").build(),
            enabled: gtk::CheckButton::with_label("Included when cycling"),
            smart_mode: gtk::DropDown::from_strings(&modes),
            colours,
            thickness,
            size: SizeSpins::new(),
            context_menu,
            syncing: Rc::new(Cell::new(false)),
        }
    }

    fn connect(&self, sender: &ComponentSender<EditorModel>) {
        let syncing = &self.syncing;
        let guard = |syncing: &Rc<Cell<bool>>| {
            let syncing = syncing.clone();
            move || !syncing.get()
        };

        let live = guard(syncing);
        let s = sender.clone();
        self.presets.connect_selected_notify(move |dd| {
            if live() {
                s.input(EditorMsg::PreviewPreset(dd.selected()));
            }
        });

        let live = guard(syncing);
        let s = sender.clone();
        self.enabled.connect_toggled(move |b| {
            if live() {
                s.input(EditorMsg::SetEnabled(b.is_active()));
            }
        });

        let live = guard(syncing);
        let s = sender.clone();
        self.smart_mode.connect_selected_notify(move |dd| {
            if live() {
                s.input(EditorMsg::SmartMode(dd.selected()));
            }
        });

        for (slot, button) in &self.colours {
            let live = guard(syncing);
            let s = sender.clone();
            let slot = *slot;
            button.connect_color_set(move |b| {
                if live() {
                    s.input(EditorMsg::Colour(slot, from_rgba(&b.rgba())));
                }
            });
        }

        let live = guard(syncing);
        let s = sender.clone();
        self.thickness.connect_value_changed(move |spin| {
            if live() {
                s.input(EditorMsg::Thickness(spin.value()));
            }
        });

        for (_, spin) in self.size.rows() {
            let live = guard(syncing);
            let s = sender.clone();
            spin.connect_value_changed(move |_| {
                if live() {
                    s.input(EditorMsg::Size);
                }
            });
        }

        let s = sender.clone();
        self.form
            .label
            .connect_activate(move |_| s.input(EditorMsg::Save));
    }

    /// Pushes the document state into every control.
    fn show(&self, session: &EditorSession) {
        self.syncing.set(true);

        let doc = session.document();
        let names = doc.preset_names();
        let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
        self.preset_names
            .splice(0, self.preset_names.n_items(), &names);
        let selected = names
            .iter()
            .position(|n| session.preview() == n)
            .unwrap_or(0);
        self.presets.set_selected(selected as u32);

        self.enabled
            .set_active(doc.is_preset_enabled(session.preview()));
        let mode = SmartMode::iter()
            .position(|m| m == doc.ui.smart_mode)
            .unwrap_or(0);
        self.smart_mode.set_selected(mode as u32);

        let colour = &session.preview_preset().colour;
        for (slot, button) in &self.colours {
            button.set_rgba(&to_rgba(colour.get(*slot)));
        }
        self.thickness.set_value(colour.child_outline_thickness);
        self.size.show(&doc.ui.size);

        self.syncing.set(false);
    }

    fn layout(&self) -> gtk::Box {
        let panel = gtk::Box::new(gtk::Orientation::Vertical, 6);

        let form = gtk::Grid::builder().row_spacing(4).column_spacing(8).build();
        for (row, (name, entry)) in self.form.rows().into_iter().enumerate() {
            entry.set_hexpand(true);
            form.attach(&gtk::Label::builder().label(name).xalign(0.0).build(), 0, row as i32, 1, 1);
            form.attach(entry, 1, row as i32, 1, 1);
        }
        panel.append(&section_title("Sector"));
        panel.append(&form);

        let presets = gtk::Box::new(gtk::Orientation::Horizontal, 4);
        presets.append(&self.presets);
        presets.append(&self.enabled);
        panel.append(&section_title("Presets"));
        panel.append(&presets);
        panel.append(&self.preset_name);

        let styling = gtk::Grid::builder().row_spacing(4).column_spacing(8).build();
        let mut row = 0;
        let mut attach = |name: &str, widget: &gtk::Widget| {
            styling.attach(&gtk::Label::builder().label(name).xalign(0.0).build(), 0, row, 1, 1);
            styling.attach(widget, 1, row, 1, 1);
            row += 1;
        };
        attach("Smart mode", self.smart_mode.upcast_ref());
        for (slot, button) in &self.colours {
            attach(&slot.to_string().replace('_', " "), button.upcast_ref());
        }
        attach("Outline thickness", self.thickness.upcast_ref());
        for (name, spin) in self.size.rows() {
            attach(name, spin.upcast_ref());
        }
        panel.append(&section_title("Appearance"));
        panel.append(&styling);

        panel
    }
}

fn section_title(text: &str) -> gtk::Label {
    let label = gtk::Label::builder().label(text).xalign(0.0).build();
    label.add_css_class("heading");
    label
}

pub struct EditorModel {
    session: Rc<RefCell<EditorSession>>,
    controls: Controls,
    preview: gtk::DrawingArea,
    /// Last form contents pushed to the entries.
    shown: EditorFields,
    status: String,
}

#[derive(Debug)]
pub enum EditorMsg {
    Pointer(Input),
    Resize(f64, f64),
    Save,
    AddSection,
    AddChild,
    ContextAction(ContextAction),
    PreviewPreset(u32),
    CreatePreset,
    DuplicatePreset,
    DeletePreset,
    CommitPreset,
    SetEnabled(bool),
    SmartMode(u32),
    Colour(ColourSlot, Colour),
    Thickness(f64),
    Size,
    DocumentChanged,
}

impl From<AppEvent> for EditorMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            // no control socket in the editor, only the watcher posts here
            AppEvent::Control(_) | AppEvent::DocumentChanged => EditorMsg::DocumentChanged,
        }
    }
}

impl EditorModel {
    fn report<T>(&mut self, result: EditResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.status.clear();
                Some(value)
            }
            Err(e) => {
                self.status = e.to_string();
                None
            }
        }
    }

    fn sync_form(&mut self) {
        let session = self.session.borrow();
        if *session.fields() != self.shown {
            self.controls.form.show(session.fields());
            self.shown = session.fields().clone();
        }
        drop(session);
        self.preview.queue_draw();
    }

    fn sync(&mut self) {
        self.controls.show(&self.session.borrow());
        self.sync_form();
    }

    fn pointer(&mut self, input: Input, sender: &ComponentSender<Self>) {
        let events = self.session.borrow_mut().handle(input);
        let mut preset_changed = false;
        for event in events {
            match event {
                MenuEvent::Swapped { a, b, .. } => self.status = format!("Swapped '{a}' and '{b}'"),
                MenuEvent::CyclePreset(_) => preset_changed = true,
                MenuEvent::ContextMenu(_) => {
                    if let Input::ContextRequested(pos) = input {
                        self.show_context_menu(pos, sender);
                    }
                }
                MenuEvent::SelectionChanged | MenuEvent::Locked(_) | MenuEvent::Cleared => {}
            }
        }
        if preset_changed {
            self.sync();
        } else {
            self.sync_form();
        }
    }

    fn show_context_menu(&self, pos: Point, sender: &ComponentSender<Self>) {
        let actions = self.session.borrow().context_actions();
        if actions.is_empty() {
            return;
        }
        let menu = &self.controls.context_menu;
        let list = gtk::Box::new(gtk::Orientation::Vertical, 2);
        for action in actions {
            let button = gtk::Button::with_label(&action.to_string());
            button.add_css_class("flat");
            let s = sender.clone();
            let popover = menu.clone();
            button.connect_clicked(move |_| {
                popover.popdown();
                s.input(EditorMsg::ContextAction(action));
            });
            list.append(&button);
        }
        menu.set_child(Some(&list));
        menu.set_pointing_to(Some(&gdk::Rectangle::new(pos.x as i32, pos.y as i32, 1, 1)));
        menu.popup();
    }

    fn edit<T>(&mut self, f: impl FnOnce(&mut EditorSession) -> EditResult<T>) -> Option<T> {
        let result = f(&mut self.session.borrow_mut());
        let value = self.report(result);
        self.sync();
        value
    }
}

#[relm4::component(pub)]
impl SimpleComponent for EditorModel {
    type Init = (EditorSession, async_channel::Receiver<AppEvent>);
    type Input = EditorMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Radial Menu Editor"),
            set_default_size: (1200, 760),

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,

                gtk::Paned {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_position: 700,
                    set_vexpand: true,

                    #[wrap(Some)]
                    set_start_child = &gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,
                        set_spacing: 6,
                        set_margin_all: 8,

                        #[name = "preview_slot"]
                        gtk::Box {
                            set_vexpand: true,
                        },

                        gtk::Box {
                            set_orientation: gtk::Orientation::Horizontal,
                            set_spacing: 6,

                            gtk::Button {
                                set_label: "Add Section",
                                connect_clicked => EditorMsg::AddSection,
                            },
                            gtk::Button {
                                set_label: "Add Child",
                                connect_clicked => EditorMsg::AddChild,
                            },
                            gtk::Button {
                                set_label: "Save",
                                add_css_class: "suggested-action",
                                connect_clicked => EditorMsg::Save,
                            },
                        },
                    },

                    #[wrap(Some)]
                    set_end_child = &gtk::ScrolledWindow {
                        set_hscrollbar_policy: gtk::PolicyType::Never,

                        #[name = "panel_slot"]
                        gtk::Box {
                            set_orientation: gtk::Orientation::Vertical,
                            set_spacing: 6,
                            set_margin_all: 8,

                            #[name = "preset_buttons"]
                            gtk::Box {
                                set_orientation: gtk::Orientation::Horizontal,
                                set_spacing: 4,

                                gtk::Button {
                                    set_label: "New",
                                    connect_clicked => EditorMsg::CreatePreset,
                                },
                                gtk::Button {
                                    set_label: "Duplicate",
                                    connect_clicked => EditorMsg::DuplicatePreset,
                                },
                                gtk::Button {
                                    set_label: "Delete",
                                    add_css_class: "destructive-action",
                                    connect_clicked => EditorMsg::DeletePreset,
                                },
                                gtk::Button {
                                    set_label: "Make Active",
                                    connect_clicked => EditorMsg::CommitPreset,
                                },
                            },
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
        let (session, rx) = init;

        theme::load_css();

        let preview = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .css_classes(["radial-preview"])
            .build();

        let model = EditorModel {
            session: Rc::new(RefCell::new(session)),
            controls: Controls::new(),
            preview: preview.clone(),
            shown: EditorFields::default(),
            status: String::new(),
        };

        let widgets = view_output!();

        widgets.preview_slot.append(&preview);
        model.controls.context_menu.set_parent(&preview);

        let panel = model.controls.layout();
        widgets.panel_slot.prepend(&panel);
        widgets
            .panel_slot
            .reorder_child_after(&widgets.preset_buttons, Some(&panel));

        let draw_session = model.session.clone();
        preview.set_draw_func(move |area, cr, _, _| {
            let colors = ThemeColors::from_context(&area.style_context());
            let session = draw_session.borrow();
            let ring = RingView {
                engine: session.engine(),
                colour: &session.preview_preset().colour,
                smart: false,
            };
            if let Err(e) = view::draw(cr, &ring, &colors) {
                log::error!("Drawing error: {}", e);
            }
        });

        install_preview_controllers(&preview, &sender);
        model.controls.connect(&sender);
        model.controls.show(&model.session.borrow());

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(EditorMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            EditorMsg::Pointer(input) => self.pointer(input, &sender),
            EditorMsg::Resize(width, height) => {
                self.session.borrow_mut().set_viewport(width, height);
                self.preview.queue_draw();
            }
            EditorMsg::Save => {
                self.controls
                    .form
                    .read_into(self.session.borrow_mut().fields_mut());
                if let Some(saved) = self.edit(|s| s.save_sector_info()) {
                    self.status = format!("Saved '{}'", saved.label());
                }
            }
            EditorMsg::AddSection => {
                self.edit(|s| s.add_inner());
            }
            EditorMsg::AddChild => {
                self.edit(|s| s.add_child());
            }
            EditorMsg::ContextAction(action) => {
                self.edit(|s| s.run_context_action(action));
            }
            EditorMsg::PreviewPreset(index) => {
                let name = self.controls.preset_names.string(index);
                if let Some(name) = name {
                    self.edit(|s| s.preview_preset_named(&name));
                }
            }
            EditorMsg::CreatePreset => {
                let name = self.controls.preset_name.text().to_string();
                if self.edit(|s| s.create_preset(&name)).is_some() {
                    self.controls.preset_name.set_text("");
                }
            }
            EditorMsg::DuplicatePreset => {
                let name = self.controls.preset_name.text().to_string();
                if self.edit(|s| s.duplicate_preset(&name)).is_some() {
                    self.controls.preset_name.set_text("");
                }
            }
            EditorMsg::DeletePreset => {
                self.edit(|s| s.delete_preview());
            }
            EditorMsg::CommitPreset => {
                if self.edit(|s| s.commit_preview()).is_some() {
                    self.status = format!("'{}' is now the active preset", self.session.borrow().preview());
                }
            }
            EditorMsg::SetEnabled(enabled) => {
                self.edit(|s| s.set_preview_enabled(enabled));
            }
            EditorMsg::SmartMode(index) => {
                if let Some(mode) = SmartMode::iter().nth(index as usize) {
                    self.edit(|s| s.set_smart_mode(mode));
                }
            }
            EditorMsg::Colour(slot, colour) => {
                self.edit(|s| s.set_colour(slot, colour));
            }
            EditorMsg::Thickness(thickness) => {
                self.edit(|s| s.set_outline_thickness(thickness));
            }
            EditorMsg::Size => {
                let size = self.controls.size.read();
                self.edit(|s| s.set_size(size));
            }
            EditorMsg::DocumentChanged => {
                log::debug!("Menu document changed on disk, reloading");
                self.edit(|s| s.reload());
            }
        }
    }
}

fn install_preview_controllers(area: &gtk::DrawingArea, sender: &ComponentSender<EditorModel>) {
    {
        let s = sender.clone();
        area.connect_resize(move |_, width, height| {
            s.input(EditorMsg::Resize(width as f64, height as f64));
        });
    }

    let motion = gtk::EventControllerMotion::new();
    {
        let s = sender.clone();
        motion.connect_motion(move |_, x, y| {
            s.input(EditorMsg::Pointer(Input::PointerMoved(Point::new(x, y))));
        });
    }
    area.add_controller(motion);

    let click = gtk::GestureClick::new();
    click.set_button(0);
    {
        let s = sender.clone();
        click.connect_pressed(move |gesture, _, x, y| {
            let pos = Point::new(x, y);
            let input = match mouse_button(gesture.current_button()) {
                Some(radial::interaction::MouseButton::Right) => Input::ContextRequested(pos),
                Some(button) => Input::Pressed(button, pos),
                None => return,
            };
            s.input(EditorMsg::Pointer(input));
        });
    }
    {
        let s = sender.clone();
        click.connect_released(move |gesture, _, x, y| {
            if let Some(button) = mouse_button(gesture.current_button()) {
                s.input(EditorMsg::Pointer(Input::Released(button, Point::new(x, y))));
            }
        });
    }
    area.add_controller(click);

    let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
    {
        let s = sender.clone();
        scroll.connect_scroll(move |_, _, dy| {
            s.input(EditorMsg::Pointer(Input::WheelScrolled(-dy)));
            glib::Propagation::Stop
        });
    }
    area.add_controller(scroll);
}
