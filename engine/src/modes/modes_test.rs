use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::config::{ConnectorInteractionMode, EngineConfig, HotkeyProfile};
use crate::coords::{Coords, Point};
use crate::input::{Button, ContextMenu, InputEvent, ItemControls, Modifiers, Tool};
use crate::model::{Connector, ConnectorAnchor, Model, ModelItem, Rectangle, View, ViewItem};

// =============================================================
// Helpers
// =============================================================

fn tile(x: i32, y: i32) -> Coords {
    Coords::new(x, y)
}

fn model_with_items(items: &[(&str, i32, i32)]) -> Model {
    let mut model = Model::default();
    let mut view = View::new("v1", "Main");
    for &(id, x, y) in items {
        model.items.push(ModelItem { id: id.into(), name: id.into(), description: None, icon: None });
        view.items.push(ViewItem { id: id.into(), tile: tile(x, y), label_height: None });
    }
    model.views.push(view);
    model
}

fn engine_from(model: Model, config: EngineConfig) -> Engine {
    Engine::with_model(model, config).0
}

fn engine_with(items: &[(&str, i32, i32)]) -> Engine {
    engine_from(model_with_items(items), EngineConfig::default())
}

fn tile_anchor(id: &str, x: i32, y: i32) -> ConnectorAnchor {
    ConnectorAnchor { id: id.into(), reference: AnchorRef::Tile(tile(x, y)) }
}

fn rect(id: &str, from: Coords, to: Coords) -> Rectangle {
    Rectangle { id: id.into(), color: None, custom_color: None, from, to }
}

fn down(engine: &mut Engine, x: i32, y: i32) {
    engine.handle_event(&InputEvent::mouse_down(tile(x, y)));
}

fn mv(engine: &mut Engine, x: i32, y: i32) {
    engine.handle_event(&InputEvent::mouse_move(tile(x, y)));
}

fn up(engine: &mut Engine, x: i32, y: i32) {
    engine.handle_event(&InputEvent::mouse_up(tile(x, y)));
}

fn click(engine: &mut Engine, x: i32, y: i32) {
    down(engine, x, y);
    up(engine, x, y);
}

fn key(engine: &mut Engine, name: &str) {
    engine.handle_event(&InputEvent::key_down(name, Modifiers::default()));
}

fn chord(engine: &mut Engine, name: &str, shift: bool) {
    let modifiers = Modifiers { ctrl: true, shift, ..Default::default() };
    engine.handle_event(&InputEvent::key_down(name, modifiers));
}

fn item_tile(engine: &Engine, id: &str) -> Coords {
    engine.current_view().unwrap().item(id).unwrap().tile
}

fn past_len(engine: &Engine) -> usize {
    engine.history().model_store().history().past.len()
}

fn selected(engine: &Engine) -> Option<&ItemReference> {
    engine.item_controls().and_then(ItemControls::item)
}

// =============================================================
// Hotkeys / corners
// =============================================================

#[test]
fn hotkey_profiles() {
    assert_eq!(keyboard::hotkey_tool(HotkeyProfile::Smnrct, "c"), Some(Tool::Connector));
    assert_eq!(keyboard::hotkey_tool(HotkeyProfile::Smnrct, "T"), Some(Tool::Text));
    assert_eq!(keyboard::hotkey_tool(HotkeyProfile::Qwerty, "t"), Some(Tool::Connector));
    assert_eq!(keyboard::hotkey_tool(HotkeyProfile::Qwerty, "y"), Some(Tool::Text));
    assert_eq!(keyboard::hotkey_tool(HotkeyProfile::Qwerty, "s"), None);
    assert_eq!(keyboard::hotkey_tool(HotkeyProfile::None, "s"), None);
}

#[test]
fn rectangle_corner_opposites() {
    assert_eq!(RectangleCorner::TopLeft.opposite(), RectangleCorner::BottomRight);
    assert_eq!(RectangleCorner::TopRight.opposite(), RectangleCorner::BottomLeft);
    assert_eq!(RectangleCorner::from_index(6), RectangleCorner::BottomRight);
}

#[test]
fn mode_serializes_with_dotted_tags() {
    let json = serde_json::to_value(Mode::RectangleDraw { id: None }).unwrap();
    assert_eq!(json["type"], "RECTANGLE.DRAW");
    let json = serde_json::to_value(Mode::drag_items(Vec::new())).unwrap();
    assert_eq!(json["type"], "DRAG_ITEMS");
}

// =============================================================
// Cursor
// =============================================================

#[test]
fn click_on_item_opens_its_controls() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    click(&mut engine, 0, 0);
    assert_eq!(selected(&engine), Some(&ItemReference::item("a")));
    assert_eq!(*engine.mode(), Mode::cursor());
}

#[test]
fn press_on_empty_tile_opens_empty_menu_and_closes_controls() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    click(&mut engine, 0, 0);
    click(&mut engine, 5, 5);
    assert!(engine.item_controls().is_none());
    assert_eq!(engine.context_menu(), Some(&ContextMenu::Empty { tile: tile(5, 5) }));
}

#[test]
fn drag_moves_item_as_one_undo_step() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    down(&mut engine, 0, 0);
    mv(&mut engine, 1, 0);
    mv(&mut engine, 2, 0);
    mv(&mut engine, 3, 1);
    up(&mut engine, 3, 1);

    assert_eq!(item_tile(&engine, "a"), tile(3, 1));
    assert_eq!(*engine.mode(), Mode::cursor());
    assert!(engine.item_controls().is_none());
    assert_eq!(past_len(&engine), 1);

    assert!(engine.undo());
    assert_eq!(item_tile(&engine, "a"), tile(0, 0));
}

#[test]
fn drag_onto_occupied_tile_lands_nearby() {
    let mut engine = engine_with(&[("a", 0, 0), ("b", 2, 0)]);
    down(&mut engine, 0, 0);
    mv(&mut engine, 1, 0);
    mv(&mut engine, 2, 0);
    up(&mut engine, 2, 0);
    let landed = item_tile(&engine, "a");
    assert_ne!(landed, tile(2, 0));
    assert_eq!(landed, tile(2, -1));
    assert_eq!(item_tile(&engine, "b"), tile(2, 0));
}

#[test]
fn drag_on_empty_space_pans() {
    let mut engine = engine_with(&[]);
    engine.handle_event(&InputEvent::mouse_down(tile(5, 5)));
    engine.handle_event(&InputEvent::mouse_move(tile(6, 5)).at_screen(10.0, 0.0));
    assert_eq!(*engine.mode(), Mode::Pan { return_to_cursor: true });
    engine.handle_event(&InputEvent::mouse_move(tile(7, 5)).at_screen(30.0, 4.0));
    assert_eq!(engine.scroll().position, Point::new(20.0, 4.0));
    up(&mut engine, 7, 5);
    assert_eq!(*engine.mode(), Mode::cursor());
    assert!(!engine.can_undo());
}

#[test]
fn extreme_pointer_tiles_do_not_overflow() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    mv(&mut engine, i32::MIN, 0);
    mv(&mut engine, i32::MAX, 0);
    down(&mut engine, 0, 0);
    mv(&mut engine, i32::MIN, i32::MAX);
    mv(&mut engine, i32::MAX, i32::MIN);
    up(&mut engine, i32::MAX, i32::MIN);
    assert_eq!(*engine.mode(), Mode::cursor());
    assert_eq!(engine.model().views[0].items.len(), 1);
}

#[test]
fn dragging_a_connector_inserts_an_anchor() {
    let mut model = model_with_items(&[]);
    model.views[0]
        .connectors
        .push(Connector::new("c", vec![tile_anchor("t1", 0, 0), tile_anchor("t2", 4, 0)]));
    let mut engine = engine_from(model, EngineConfig::default());

    down(&mut engine, 2, 0);
    mv(&mut engine, 2, 1);
    mv(&mut engine, 2, 2);
    up(&mut engine, 2, 2);

    let view = engine.current_view().unwrap();
    let anchors = &view.connector("c").unwrap().anchors;
    assert_eq!(anchors.len(), 3);
    assert_eq!(anchors[0].id, "t1");
    assert_eq!(anchors[1].reference, AnchorRef::Tile(tile(2, 2)));
    assert_eq!(anchors[2].id, "t2");
    assert!(engine.item_controls().is_none());
    assert_eq!(past_len(&engine), 1);

    assert!(engine.undo());
    assert_eq!(engine.current_view().unwrap().connector("c").unwrap().anchors.len(), 2);
}

#[test]
fn dropping_an_anchor_on_another_connector_chains_them() {
    let mut model = model_with_items(&[]);
    let connectors = &mut model.views[0].connectors;
    connectors.push(Connector::new("c1", vec![tile_anchor("a1", 0, 0), tile_anchor("a2", 4, 0)]));
    connectors.push(Connector::new("c2", vec![tile_anchor("b1", 0, 4), tile_anchor("b2", 6, 4)]));
    let mut engine = engine_from(model, EngineConfig::default());

    down(&mut engine, 6, 4);
    mv(&mut engine, 6, 3);
    mv(&mut engine, 4, 0);
    up(&mut engine, 4, 0);

    let c2 = engine.current_view().unwrap().connector("c2").unwrap();
    assert_eq!(c2.anchors[1].id, "b2");
    assert_eq!(c2.anchors[1].reference, AnchorRef::Anchor("a2".into()));
    let path = engine.scene().connector_path("c2").unwrap();
    assert_eq!(path.tiles.last(), Some(&tile(4, 0)));
}

// =============================================================
// Pointer buttons
// =============================================================

#[test]
fn secondary_button_opens_item_menu_without_dispatch() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    engine.handle_event(&InputEvent::mouse_down(tile(0, 0)).with_button(Button::Secondary));
    assert_eq!(
        engine.context_menu(),
        Some(&ContextMenu::Item { item: ItemReference::item("a"), tile: tile(0, 0) })
    );
    assert_eq!(*engine.mode(), Mode::cursor());
    assert!(engine.mouse().mousedown.is_none());
}

#[test]
fn middle_button_pans_from_any_mode() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    engine.set_tool(Tool::Rectangle).unwrap();
    engine.handle_event(&InputEvent::mouse_down(tile(0, 0)).with_button(Button::Middle));
    assert_eq!(*engine.mode(), Mode::Pan { return_to_cursor: true });
    engine.handle_event(
        &InputEvent::mouse_move(tile(1, 0))
            .at_screen(10.0, 5.0)
            .with_button(Button::Middle),
    );
    assert_eq!(engine.scroll().position, Point::new(10.0, 5.0));
    engine.handle_event(&InputEvent::mouse_up(tile(1, 0)).with_button(Button::Middle));
    assert_eq!(*engine.mode(), Mode::cursor());
    assert_eq!(item_tile(&engine, "a"), tile(0, 0));
}

// =============================================================
// Place icon
// =============================================================

#[test]
fn placing_an_icon_avoids_occupied_tiles() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    engine.set_mode(Mode::PlaceIcon { id: Some("icon-1".into()) });
    click(&mut engine, 0, 0);

    let view = engine.current_view().unwrap();
    assert_eq!(view.items.len(), 2);
    let placed = view.items.iter().find(|i| i.id != "a").unwrap();
    assert_eq!(placed.tile, tile(0, -1));
    let model_item = engine.model_item(&placed.id).unwrap();
    assert_eq!(model_item.icon.as_deref(), Some("icon-1"));
    assert_eq!(model_item.name, "Untitled");
    assert_eq!(*engine.mode(), Mode::PlaceIcon { id: None });
    assert_eq!(past_len(&engine), 1);

    assert!(engine.undo());
    assert_eq!(engine.model().items.len(), 1);
    assert_eq!(engine.current_view().unwrap().items.len(), 1);
}

#[test]
fn place_icon_without_icon_hands_over_to_cursor() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    engine.set_tool(Tool::AddItem).unwrap();
    assert_eq!(engine.item_controls(), Some(&ItemControls::AddItem));
    click(&mut engine, 0, 0);
    assert_eq!(*engine.mode(), Mode::cursor());
    assert_eq!(selected(&engine), Some(&ItemReference::item("a")));
    assert_eq!(engine.model().items.len(), 1);
}

// =============================================================
// Connector
// =============================================================

#[test]
fn click_connector_between_two_tiles() {
    let mut engine = engine_with(&[]);
    engine.set_tool(Tool::Connector).unwrap();
    click(&mut engine, 1, 1);
    assert!(matches!(engine.mode(), Mode::Connector { id: Some(_), is_connecting: true, .. }));
    mv(&mut engine, 2, 2);
    mv(&mut engine, 3, 3);
    click(&mut engine, 3, 3);

    let view = engine.current_view().unwrap();
    assert_eq!(view.connectors.len(), 1);
    let tiles: Vec<_> = view.connectors[0]
        .anchors
        .iter()
        .map(|a| crate::geometry::resolve_anchor_tile(a, view))
        .collect();
    assert_eq!(tiles, [Some(tile(1, 1)), Some(tile(3, 3))]);
    assert_eq!(view.connectors[0].width, Some(crate::consts::DEFAULT_CONNECTOR_WIDTH));
    assert_eq!(*engine.mode(), Mode::connector());
    assert_eq!(past_len(&engine), 1);
}

#[test]
fn drag_connector_between_items() {
    let mut config = EngineConfig::default();
    config.connector_mode = ConnectorInteractionMode::Drag;
    let mut engine = engine_from(model_with_items(&[("a", 0, 0), ("b", 3, 0)]), config);
    engine.set_tool(Tool::Connector).unwrap();

    down(&mut engine, 0, 0);
    mv(&mut engine, 1, 0);
    mv(&mut engine, 3, 0);
    up(&mut engine, 3, 0);

    let view = engine.current_view().unwrap();
    let refs: Vec<_> = view.connectors[0].anchors.iter().map(|a| a.reference.clone()).collect();
    assert_eq!(refs, [AnchorRef::Item("a".into()), AnchorRef::Item("b".into())]);
    assert_eq!(*engine.mode(), Mode::connector());
    let color = view.connectors[0].color.as_deref();
    assert_eq!(color, engine.model().colors.first().map(|c| c.id.as_str()));
}

#[test]
fn escape_cancels_connector_in_progress() {
    let mut engine = engine_with(&[]);
    engine.set_tool(Tool::Connector).unwrap();
    click(&mut engine, 1, 1);
    mv(&mut engine, 2, 1);
    key(&mut engine, "Escape");
    assert!(engine.current_view().unwrap().connectors.is_empty());
    assert_eq!(*engine.mode(), Mode::connector());
}

#[test]
fn vanished_connector_resets_connector_mode() {
    let mut engine = engine_with(&[]);
    engine.set_tool(Tool::Connector).unwrap();
    click(&mut engine, 1, 1);
    let Mode::Connector { id: Some(id), .. } = engine.mode().clone() else {
        panic!("expected connector in progress");
    };
    engine.delete_connector(&id).unwrap();
    mv(&mut engine, 4, 4);
    assert_eq!(*engine.mode(), Mode::connector());
    click(&mut engine, 4, 4);
    assert_eq!(engine.current_view().unwrap().connectors.len(), 1);
}

// =============================================================
// Rectangles
// =============================================================

fn draw_rectangle(engine: &mut Engine, from: Coords, to: Coords) -> Id {
    engine.set_tool(Tool::Rectangle).unwrap();
    down(engine, from.x, from.y);
    mv(engine, to.x, to.y);
    up(engine, to.x, to.y);
    engine.current_view().unwrap().rectangles[0].id.clone()
}

#[test]
fn draw_rectangle_is_one_step() {
    let mut engine = engine_with(&[]);
    down(&mut engine, 9, 9);
    up(&mut engine, 9, 9);
    engine.set_tool(Tool::Rectangle).unwrap();
    down(&mut engine, 0, 0);
    mv(&mut engine, 1, 1);
    mv(&mut engine, 2, 2);
    up(&mut engine, 2, 2);

    let r = &engine.current_view().unwrap().rectangles[0];
    assert_eq!((r.from, r.to), (tile(0, 0), tile(2, 2)));
    assert_eq!(*engine.mode(), Mode::cursor());
    assert_eq!(past_len(&engine), 1);
}

#[test]
fn escape_cancels_rectangle_draw() {
    let mut engine = engine_with(&[]);
    engine.set_tool(Tool::Rectangle).unwrap();
    down(&mut engine, 0, 0);
    mv(&mut engine, 1, 1);
    key(&mut engine, "Escape");
    assert!(engine.current_view().unwrap().rectangles.is_empty());
    assert_eq!(*engine.mode(), Mode::RectangleDraw { id: None });
}

#[test]
fn transform_drags_a_corner() {
    let mut engine = engine_with(&[]);
    let id = draw_rectangle(&mut engine, tile(0, 0), tile(2, 2));

    click(&mut engine, 1, 1);
    assert_eq!(selected(&engine), Some(&ItemReference::rectangle(id.clone())));

    down(&mut engine, 2, 2);
    assert_eq!(
        *engine.mode(),
        Mode::RectangleTransform { id: id.clone(), selected_anchor: Some(RectangleCorner::BottomRight), moved: false }
    );
    mv(&mut engine, 3, 2);
    mv(&mut engine, 4, 3);
    up(&mut engine, 4, 3);

    let r = engine.current_view().unwrap().rectangle(&id).unwrap();
    assert_eq!((r.from, r.to), (tile(0, 0), tile(4, 3)));
    assert!(matches!(engine.mode(), Mode::RectangleTransform { selected_anchor: None, moved: false, .. }));
    assert_eq!(past_len(&engine), 2);

    assert!(engine.undo());
    let r = engine.current_view().unwrap().rectangle(&id).unwrap();
    assert_eq!((r.from, r.to), (tile(0, 0), tile(2, 2)));
}

#[test]
fn transform_press_off_corner_returns_to_cursor() {
    let mut engine = engine_with(&[]);
    let id = draw_rectangle(&mut engine, tile(0, 0), tile(2, 2));
    engine.set_mode(Mode::RectangleTransform { id, selected_anchor: None, moved: false });
    down(&mut engine, 1, 1);
    assert_eq!(*engine.mode(), Mode::cursor());
}

#[test]
fn dragging_a_rectangle_moves_both_corners() {
    let mut engine = engine_with(&[]);
    let id = draw_rectangle(&mut engine, tile(0, 0), tile(2, 2));
    down(&mut engine, 1, 1);
    mv(&mut engine, 2, 1);
    mv(&mut engine, 3, 2);
    up(&mut engine, 3, 2);
    let r = engine.current_view().unwrap().rectangle(&id).unwrap();
    assert_eq!((r.from, r.to), (tile(2, 1), tile(4, 3)));
    assert_eq!(past_len(&engine), 2);
}

// =============================================================
// Text boxes
// =============================================================

#[test]
fn text_hotkey_creates_box_that_follows_pointer() {
    let mut engine = engine_with(&[]);
    mv(&mut engine, 2, 1);
    key(&mut engine, "t");
    let Mode::TextBox { id } = engine.mode().clone() else {
        panic!("expected text box mode");
    };
    mv(&mut engine, 4, 1);
    click(&mut engine, 4, 1);

    let text_box = engine.current_view().unwrap().text_box(&id).unwrap();
    assert_eq!(text_box.tile, tile(4, 1));
    assert_eq!(text_box.content, "Text");
    assert_eq!(*engine.mode(), Mode::cursor());
    assert_eq!(selected(&engine), Some(&ItemReference::text_box(id)));
    assert_eq!(past_len(&engine), 1);
}

// =============================================================
// Lasso
// =============================================================

fn lasso_fixture() -> Engine {
    let mut model = model_with_items(&[("a", 0, 0), ("b", 1, 1), ("c", 5, 5)]);
    model.views[0].rectangles.push(rect("r1", tile(0, 0), tile(2, 2)));
    model.views[0].rectangles.push(rect("r2", tile(1, 1), tile(6, 6)));
    engine_from(model, EngineConfig::default())
}

fn lasso_items(engine: &Engine) -> Vec<ItemReference> {
    match engine.mode() {
        Mode::Lasso { selection: Some(s), .. } => s.items.clone(),
        _ => Vec::new(),
    }
}

#[test]
fn lasso_selects_items_and_enclosed_rectangles() {
    let mut engine = lasso_fixture();
    engine.set_tool(Tool::Lasso).unwrap();
    down(&mut engine, 0, 0);
    mv(&mut engine, 1, 1);
    assert_eq!(lasso_items(&engine), [ItemReference::item("a"), ItemReference::item("b")]);
    mv(&mut engine, 3, 3);
    up(&mut engine, 3, 3);
    assert_eq!(
        lasso_items(&engine),
        [ItemReference::item("a"), ItemReference::item("b"), ItemReference::rectangle("r1")]
    );
    assert!(matches!(engine.mode(), Mode::Lasso { is_dragging: false, .. }));
}

#[test]
fn pressing_inside_lasso_drags_selection() {
    let mut engine = lasso_fixture();
    engine.set_tool(Tool::Lasso).unwrap();
    down(&mut engine, 0, 0);
    mv(&mut engine, 3, 3);
    up(&mut engine, 3, 3);

    down(&mut engine, 1, 1);
    mv(&mut engine, 2, 1);
    assert!(matches!(engine.mode(), Mode::DragItems { .. }));
    mv(&mut engine, 3, 1);
    up(&mut engine, 3, 1);

    assert_eq!(item_tile(&engine, "a"), tile(2, 0));
    assert_eq!(item_tile(&engine, "b"), tile(3, 1));
    assert_eq!(item_tile(&engine, "c"), tile(5, 5));
    let r1 = engine.current_view().unwrap().rectangle("r1").unwrap();
    assert_eq!(r1.from, tile(0, 0));
    assert_eq!(*engine.mode(), Mode::cursor());
}

#[test]
fn pressing_outside_lasso_clears_selection() {
    let mut engine = lasso_fixture();
    engine.set_tool(Tool::Lasso).unwrap();
    down(&mut engine, 0, 0);
    mv(&mut engine, 1, 1);
    up(&mut engine, 1, 1);
    down(&mut engine, 8, 8);
    assert!(lasso_items(&engine).is_empty());
}

#[test]
fn freehand_lasso_closes_throttled_path() {
    let mut engine = engine_with(&[("inside", 2, 2), ("outside", 5, 5)]);
    engine.set_tool(Tool::FreehandLasso).unwrap();
    engine.handle_event(&InputEvent::mouse_down(tile(0, 0)));
    engine.handle_event(&InputEvent::mouse_move(tile(4, 0)).at_screen(40.0, 0.0));
    engine.handle_event(&InputEvent::mouse_move(tile(4, 4)).at_screen(40.0, 40.0));
    engine.handle_event(&InputEvent::mouse_move(tile(0, 4)).at_screen(0.0, 40.0));
    engine.handle_event(&InputEvent::mouse_move(tile(0, 4)).at_screen(2.0, 41.0));
    engine.handle_event(&InputEvent::mouse_up(tile(0, 4)).at_screen(2.0, 41.0));

    let Mode::FreehandLasso { path, selection: Some(selection), is_dragging } = engine.mode() else {
        panic!("expected a closed freehand selection");
    };
    assert_eq!(path.len(), 4);
    assert!(!is_dragging);
    assert_eq!(selection.path_tiles, [tile(0, 0), tile(4, 0), tile(4, 4), tile(0, 4)]);
    assert_eq!(selection.items, [ItemReference::item("inside")]);
}

#[test]
fn freehand_path_of_two_points_selects_nothing() {
    let mut engine = engine_with(&[("a", 1, 0)]);
    engine.set_tool(Tool::FreehandLasso).unwrap();
    engine.handle_event(&InputEvent::mouse_down(tile(0, 0)));
    engine.handle_event(&InputEvent::mouse_move(tile(3, 0)).at_screen(30.0, 0.0));
    engine.handle_event(&InputEvent::mouse_up(tile(3, 0)).at_screen(30.0, 0.0));
    assert!(matches!(engine.mode(), Mode::FreehandLasso { selection: None, .. }));
}

// =============================================================
// Runtime / disabled
// =============================================================

#[test]
fn runtime_click_reports_item_without_editing() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    let seen: Rc<RefCell<Vec<(ItemReference, Coords)>>> = Rc::default();
    let sink = Rc::clone(&seen);
    engine.set_runtime_action_handler(move |item, tile| sink.borrow_mut().push((item.clone(), tile)));
    engine.set_runtime(true);
    assert_eq!(*engine.mode(), Mode::runtime_cursor());

    click(&mut engine, 0, 0);
    click(&mut engine, 4, 4);
    down(&mut engine, 0, 0);
    mv(&mut engine, 2, 0);
    up(&mut engine, 2, 0);

    assert_eq!(
        *seen.borrow(),
        [(ItemReference::item("a"), tile(0, 0)), (ItemReference::item("a"), tile(2, 0))]
    );
    assert_eq!(item_tile(&engine, "a"), tile(0, 0));
    assert!(!engine.can_undo());
}

#[test]
fn runtime_ignores_editing_hotkeys() {
    let mut engine = engine_with(&[]);
    engine.set_runtime(true);
    key(&mut engine, "r");
    assert_eq!(*engine.mode(), Mode::runtime_cursor());
    key(&mut engine, "t");
    assert!(engine.current_view().unwrap().text_boxes.is_empty());
    key(&mut engine, "s");
    assert_eq!(*engine.mode(), Mode::runtime_cursor());
}

#[test]
fn disabled_interactions_ignore_pointer() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    engine.set_mode(Mode::InteractionsDisabled);
    click(&mut engine, 0, 0);
    mv(&mut engine, 3, 3);
    assert!(engine.item_controls().is_none());
    assert_eq!(engine.mouse().position.tile, tile(0, 0));
    assert_eq!(*engine.mode(), Mode::InteractionsDisabled);
}

// =============================================================
// Dispatcher
// =============================================================

#[test]
fn failing_handler_resets_to_neutral_mode() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    engine.set_mode(Mode::drag_items(vec![ItemReference::item("ghost")]));
    down(&mut engine, 0, 0);
    mv(&mut engine, 1, 0);
    assert_eq!(*engine.mode(), Mode::cursor());
    assert!(!engine.can_undo());
}

#[test]
fn events_without_a_handler_are_ignored() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    engine.set_mode(Mode::Pan { return_to_cursor: false });
    click(&mut engine, 0, 0);
    assert_eq!(*engine.mode(), Mode::Pan { return_to_cursor: false });
    assert!(engine.item_controls().is_none());
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn undo_and_redo_chords() {
    let mut engine = engine_with(&[]);
    draw_rectangle(&mut engine, tile(0, 0), tile(2, 2));

    chord(&mut engine, "z", false);
    assert!(engine.current_view().unwrap().rectangles.is_empty());
    chord(&mut engine, "y", false);
    assert_eq!(engine.current_view().unwrap().rectangles.len(), 1);
    chord(&mut engine, "Z", false);
    chord(&mut engine, "Z", true);
    assert_eq!(engine.current_view().unwrap().rectangles.len(), 1);
}

#[test]
fn command_chord_does_not_trigger_hotkey() {
    let mut config = EngineConfig::default();
    config.hotkeys = HotkeyProfile::Qwerty;
    let mut engine = engine_from(model_with_items(&[]), config);
    chord(&mut engine, "y", false);
    assert_eq!(*engine.mode(), Mode::cursor());
    assert!(engine.current_view().unwrap().text_boxes.is_empty());
}

#[test]
fn escape_closes_item_controls_first() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    click(&mut engine, 0, 0);
    assert!(engine.item_controls().is_some());
    key(&mut engine, "Escape");
    assert!(engine.item_controls().is_none());
}

#[test]
fn pan_tool_closes_controls() {
    let mut engine = engine_with(&[("a", 0, 0)]);
    click(&mut engine, 0, 0);
    key(&mut engine, "m");
    assert_eq!(*engine.mode(), Mode::Pan { return_to_cursor: false });
    assert!(engine.item_controls().is_none());
}
