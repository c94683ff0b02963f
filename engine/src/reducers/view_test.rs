use super::*;
use crate::coords::Coords;
use crate::model::{AnchorRef, Connector, ConnectorAnchor, Model, TextBox};
use crate::reducers::{connector, text_box};
use crate::scene::Scene;

fn populated() -> State {
    let mut model = Model::default();
    model.views.push(View::new("v1", "One"));
    model.views.push(View::new("v2", "Two"));
    let s = State::new(model, Scene::default());
    let c = Connector::new(
        "c",
        vec![
            ConnectorAnchor { id: "a".into(), reference: AnchorRef::Tile(Coords::zero()) },
            ConnectorAnchor { id: "b".into(), reference: AnchorRef::Tile(Coords::new(1, 0)) },
        ],
    );
    let s = connector::create_connector(s, "v1", c).unwrap();
    let t = TextBox { id: "t".into(), tile: Coords::zero(), content: "x".into(), font_size: None, orientation: None };
    text_box::create_text_box(s, "v1", t).unwrap()
}

#[test]
fn create_appends() {
    let s = create_view(populated(), View::new("v3", "Three"));
    assert_eq!(s.model.views.last().map(|v| v.id.as_str()), Some("v3"));
}

#[test]
fn update_renames() {
    let update = PartialView { name: Some("Renamed".into()), ..Default::default() };
    let s = update_view(populated(), "v2", &update).unwrap();
    assert_eq!(s.model.view("v2").unwrap().name, "Renamed");
    assert!(update_view(s, "zzz", &update).is_err());
}

#[test]
fn delete_drops_scene_entries() {
    let s = delete_view(populated(), "v1").unwrap();
    assert!(s.model.view("v1").is_none());
    assert!(s.scene.connectors.is_empty());
    assert!(s.scene.text_boxes.is_empty());
    let err = delete_view(s, "v1").unwrap_err();
    assert_eq!(err.kind, EntityKind::View);
}
