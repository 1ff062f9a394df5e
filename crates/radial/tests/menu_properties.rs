use radial::editor::EditorSession;
use radial::error::{EditError, PresetError};
use radial::geometry::{Point, angles_for_labels, sector_from_angle};
use radial::interaction::{Input, InteractionEngine, MouseButton};
use radial::model::{Label, MenuDocument, Preset, PresetName, SectionNode, SizeConfig};
use radial::ordered::OrderedMap;
use radial::store::{PresetStore, decode};
use serde_json::{Value, json};

fn store() -> (tempfile::TempDir, PresetStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = PresetStore::new(dir.path().join("menu.json"));
    (dir, store)
}

fn polar(center: Point, angle: f64, dist: f64) -> Point {
    let rad = angle.to_radians();
    Point::new(center.x + dist * rad.cos(), center.y + dist * rad.sin())
}

fn read_raw(store: &PresetStore) -> Value {
    serde_json::from_str(&fs_err::read_to_string(store.path()).unwrap()).unwrap()
}

#[test]
fn test_every_angle_has_exactly_one_owner() {
    for n in 1..=12 {
        let labels: Vec<Label> = (0..n).map(|i| Label::new(format!("s{i}"))).collect();
        let angles = angles_for_labels(&labels);
        let mut seen = vec![false; n];
        for tenth in 0..3600 {
            let angle = tenth as f64 / 10.0;
            let owner = sector_from_angle(angle, &angles)
                .unwrap_or_else(|| panic!("no owner for {angle} with {n} labels"));
            let idx = labels.iter().position(|l| l == owner).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s), "some sector unreachable with {n} labels");
    }
}

#[test]
fn test_saved_document_loads_back_unchanged() {
    let (_dir, store) = store();
    store.create_preset("Anim", Some("Default")).unwrap();
    store.set_preset_enabled("Anim", false).unwrap();
    let loaded = store.load().unwrap();
    store.save(&loaded).unwrap();
    assert_eq!(store.load().unwrap(), loaded);

    let (again, rewritten) = decode(read_raw(&store)).unwrap();
    assert!(!rewritten);
    assert_eq!(again, loaded);
}

#[test]
fn test_legacy_document_is_migrated_on_load() {
    let (_dir, store) = store();
    let legacy = json!({
        "inner_section": {
            "Tools": {"description": "tools", "command": "t", "children": {"Move": {"command": "m"}}},
            "Render": {"command": "r"}
        },
        "colour": {"inner_colour": "#FF112233"}
    });
    fs_err::write(store.path(), legacy.to_string()).unwrap();

    let doc = store.load().unwrap();
    assert_eq!(doc.active_preset, "Default");
    let expected: OrderedMap<Label, SectionNode> =
        serde_json::from_value(legacy["inner_section"].clone()).unwrap();
    assert_eq!(doc.preset("Default").unwrap().inner_section, expected);

    let raw = read_raw(&store);
    assert_eq!(raw["presets"]["Default"]["inner_section"]["Tools"]["children"]["Move"]["command"], "m");
    assert_eq!(raw["presets"]["Default"]["colour"]["inner_colour"], "#FF112233");
    assert!(raw.get("inner_section").is_none());
}

#[test]
fn test_default_preset_cannot_be_deleted() {
    let (_dir, store) = store();
    let before = store.load().unwrap();
    assert!(matches!(
        store.delete_preset("Default"),
        Err(EditError::Preset(PresetError::ProtectedDefault))
    ));
    assert_eq!(store.load().unwrap(), before);
}

#[test]
fn test_duplicate_preset_name_is_rejected() {
    let (_dir, store) = store();
    store.create_preset("X", Some("Default")).unwrap();
    let count = store.list_presets().unwrap().len();
    assert!(matches!(
        store.create_preset("X", None),
        Err(EditError::Preset(PresetError::AlreadyExists(_)))
    ));
    assert_eq!(store.list_presets().unwrap().len(), count);
}

#[test]
fn test_wheel_order_wraps_both_ways() {
    let mut doc = MenuDocument::default();
    doc.create_preset("B", None).unwrap();
    doc.create_preset("C", None).unwrap();
    assert_eq!(doc.cycle_from("B", 1, false).unwrap(), "C");
    assert_eq!(doc.cycle_from("Default", -1, false).unwrap(), "C");
    assert_eq!(doc.cycle_from("C", 1, false).unwrap(), "Default");
}

#[test]
fn test_dragging_third_sector_onto_first_swaps_them() {
    let (_dir, store) = store();
    store
        .update(|doc| {
            let preset = doc.preset_mut("Default").unwrap();
            preset.inner_section = ["a", "b", "c", "d", "e"]
                .iter()
                .map(|l| (Label::new(*l), SectionNode::placeholder(l)))
                .collect();
            Ok::<_, radial::StoreError>(())
        })
        .unwrap();

    let mut session = EditorSession::open(store.clone()).unwrap();
    session.set_viewport(600.0, 600.0);
    let center = session.engine().center();
    let angle_of = |s: &EditorSession, l: &str| *s.engine().angles().get(l).unwrap();
    let from = polar(center, angle_of(&session, "c"), 100.0);
    let to = polar(center, angle_of(&session, "a"), 100.0);
    session.handle(Input::Pressed(MouseButton::Middle, from));
    session.handle(Input::PointerMoved(to));
    session.handle(Input::Released(MouseButton::Middle, to));

    let order: Vec<String> = store
        .load()
        .unwrap()
        .preset("Default")
        .unwrap()
        .labels()
        .iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(order, vec!["c", "b", "a", "d", "e"]);
}

#[test]
fn test_tools_child_under_twelve_o_clock() {
    let mut tools = SectionNode::placeholder("Tools");
    tools.children.insert(Label::new("Move"), SectionNode::placeholder("Move"));
    tools.children.insert(Label::new("Rotate"), SectionNode::placeholder("Rotate"));
    let mut preset = Preset::default();
    preset.inner_section.insert(Label::new("Tools"), tools);

    let size = SizeConfig::default();
    let mut engine = InteractionEngine::new(PresetName::new("Default"), preset, size);
    let center = Point::new(400.0, 400.0);
    engine.set_center(center);
    let band = size.radius + size.ring_gap + size.outer_ring_width / 2.0;

    engine.handle(Input::PointerMoved(polar(center, 270.0, 100.0)));
    engine.handle(Input::PointerMoved(polar(center, 270.0, band)));
    assert_eq!(engine.selection().outer_active().unwrap(), "Move");
}

#[test]
fn test_second_click_clears_selection_and_fields() {
    let (_dir, store) = store();
    store
        .update(|doc| {
            let preset = doc.preset_mut("Default").unwrap();
            let sector = preset.inner_section.get_mut("New Section").unwrap();
            sector.command = "echo hi".to_string();
            sector
                .children
                .insert(Label::new("child"), SectionNode::placeholder("child"));
            Ok::<_, radial::StoreError>(())
        })
        .unwrap();

    let mut session = EditorSession::open(store).unwrap();
    session.set_viewport(600.0, 600.0);
    let pos = polar(session.engine().center(), 270.0, 100.0);
    session.handle(Input::PointerMoved(pos));
    session.handle(Input::Pressed(MouseButton::Left, pos));
    assert_eq!(session.fields().command, "echo hi");
    assert!(session.engine().visible_children().is_some());

    session.handle(Input::Pressed(MouseButton::Left, pos));
    let fields = session.fields();
    assert!(session.engine().selection().active_sector().is_none());
    assert!(session.engine().visible_children().is_none());
    for text in [
        &fields.label,
        &fields.description,
        &fields.command,
        &fields.on_release,
        &fields.on_double,
    ] {
        assert!(text.is_empty());
    }
}
