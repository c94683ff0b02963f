use super::*;
use crate::coords::Coords;
use crate::model::{Model, View};
use crate::scene::Scene;

fn state() -> State {
    let mut model = Model::default();
    model.views.push(View::new("v", "Main"));
    State::new(model, Scene::default())
}

fn rect(id: &str) -> Rectangle {
    Rectangle { id: id.into(), color: None, custom_color: None, from: Coords::zero(), to: Coords::new(2, 2) }
}

#[test]
fn create_unshifts_without_touching_scene() {
    let s = create_rectangle(state(), "v", rect("r1")).unwrap();
    let s = create_rectangle(s, "v", rect("r2")).unwrap();
    assert_eq!(s.model.view("v").unwrap().rectangles[0].id, "r2");
    assert_eq!(s.scene, Scene::default());
}

#[test]
fn update_moves_corner() {
    let s = create_rectangle(state(), "v", rect("r")).unwrap();
    let update = PartialRectangle { to: Some(Coords::new(5, 6)), ..Default::default() };
    let s = update_rectangle(s, "v", "r", &update).unwrap();
    let r = s.model.view("v").unwrap().rectangle("r").unwrap();
    assert_eq!(r.from, Coords::zero());
    assert_eq!(r.to, Coords::new(5, 6));
}

#[test]
fn delete_then_missing() {
    let s = create_rectangle(state(), "v", rect("r")).unwrap();
    let s = delete_rectangle(s, "v", "r").unwrap();
    assert!(s.model.view("v").unwrap().rectangles.is_empty());
    let err = update_rectangle(s, "v", "r", &PartialRectangle::default()).unwrap_err();
    assert_eq!(err.kind, EntityKind::Rectangle);
}
