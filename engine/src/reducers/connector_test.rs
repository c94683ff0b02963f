use super::*;
use crate::coords::Coords;
use crate::model::{AnchorRef, ConnectorAnchor, Model, View, ViewItem};
use crate::reducers::EntityKind;
use crate::scene::Scene;

fn state() -> State {
    let mut model = Model::default();
    let mut view = View::new("v", "Main");
    view.items.push(ViewItem { id: "n1".into(), tile: Coords::new(0, 0), label_height: None });
    model.views.push(view);
    State::new(model, Scene::default())
}

fn anchor(id: &str, reference: AnchorRef) -> ConnectorAnchor {
    ConnectorAnchor { id: id.into(), reference }
}

fn connector(id: &str) -> Connector {
    Connector::new(
        id,
        vec![anchor(&format!("{id}-a"), AnchorRef::Item("n1".into())), anchor(&format!("{id}-b"), AnchorRef::Tile(Coords::new(2, 0)))],
    )
}

#[test]
fn create_unshifts_and_syncs() {
    let s = create_connector(state(), "v", connector("c1")).unwrap();
    let s = create_connector(s, "v", connector("c2")).unwrap();
    let view = s.model.view("v").unwrap();
    assert_eq!(view.connectors[0].id, "c2");
    assert_eq!(view.connectors[1].id, "c1");
    let path = s.scene.connector_path("c2").unwrap();
    assert_eq!(path.tiles, vec![Coords::new(0, 0), Coords::new(1, 0), Coords::new(2, 0)]);
}

#[test]
fn create_with_unresolvable_anchor_keeps_connector_with_empty_path() {
    let c = Connector::new(
        "c",
        vec![anchor("a", AnchorRef::Item("ghost".into())), anchor("b", AnchorRef::Tile(Coords::new(1, 1)))],
    );
    let s = create_connector(state(), "v", c).unwrap();
    assert!(s.model.view("v").unwrap().connector("c").is_some());
    assert!(s.scene.connector_path("c").unwrap().is_empty());
}

#[test]
fn create_in_missing_view_fails() {
    let err = create_connector(state(), "nope", connector("c")).unwrap_err();
    assert_eq!(err.kind, EntityKind::View);
    assert_eq!(err.id, "nope");
}

#[test]
fn update_without_anchors_does_not_resync() {
    let mut s = create_connector(state(), "v", connector("c")).unwrap();
    s.scene.connectors.remove("c");
    let update = PartialConnector { width: Some(4.0), ..Default::default() };
    let s = update_connector(s, "v", "c", &update).unwrap();
    assert_eq!(s.model.view("v").unwrap().connector("c").unwrap().width, Some(4.0));
    assert!(s.scene.connector_path("c").is_none());
}

#[test]
fn update_with_anchors_resyncs() {
    let s = create_connector(state(), "v", connector("c")).unwrap();
    let update = PartialConnector::anchors(vec![
        anchor("x", AnchorRef::Tile(Coords::new(0, 0))),
        anchor("y", AnchorRef::Tile(Coords::new(0, 2))),
    ]);
    let s = update_connector(s, "v", "c", &update).unwrap();
    let path = s.scene.connector_path("c").unwrap();
    assert_eq!(path.tiles, vec![Coords::new(0, 0), Coords::new(0, 1), Coords::new(0, 2)]);
}

#[test]
fn update_missing_connector_fails() {
    let err = update_connector(state(), "v", "ghost", &PartialConnector::default()).unwrap_err();
    assert_eq!(err, NotFoundError::new(EntityKind::Connector, "ghost"));
}

#[test]
fn delete_removes_model_and_scene_entries() {
    let s = create_connector(state(), "v", connector("c")).unwrap();
    let s = delete_connector(s, "v", "c").unwrap();
    assert!(s.model.view("v").unwrap().connectors.is_empty());
    assert!(s.scene.connectors.is_empty());
    assert!(delete_connector(s, "v", "c").is_err());
}

/// `c` from n1 to {2,0}, and `link` chained onto the {2,0} end of `c`.
fn chained_state() -> State {
    let s = create_connector(state(), "v", connector("c")).unwrap();
    let link = Connector::new(
        "link",
        vec![anchor("l1", AnchorRef::Anchor("c-b".into())), anchor("l2", AnchorRef::Tile(Coords::new(2, 2)))],
    );
    create_connector(s, "v", link).unwrap()
}

#[test]
fn update_with_anchors_resyncs_chained_connectors() {
    let update = PartialConnector::anchors(vec![
        anchor("c-a", AnchorRef::Item("n1".into())),
        anchor("c-b", AnchorRef::Tile(Coords::new(0, 2))),
    ]);
    let s = update_connector(chained_state(), "v", "c", &update).unwrap();
    let path = s.scene.connector_path("link").unwrap();
    assert_eq!(path.tiles, vec![Coords::new(0, 2), Coords::new(1, 2), Coords::new(2, 2)]);
}

#[test]
fn delete_removes_connectors_chained_onto_it() {
    let s = delete_connector(chained_state(), "v", "c").unwrap();
    assert!(s.model.view("v").unwrap().connectors.is_empty());
    assert!(s.scene.connectors.is_empty());
}

#[test]
fn delete_of_chained_connector_keeps_upstream() {
    let s = delete_connector(chained_state(), "v", "link").unwrap();
    let view = s.model.view("v").unwrap();
    assert!(view.connector("c").is_some());
    assert!(s.scene.connector_path("c").is_some());
    assert!(s.scene.connector_path("link").is_none());
}

#[test]
fn reducers_leave_caller_state_untouched() {
    let before = state();
    let after = create_connector(before.clone(), "v", connector("c")).unwrap();
    assert!(before.model.view("v").unwrap().connectors.is_empty());
    assert_ne!(before, after);
}
