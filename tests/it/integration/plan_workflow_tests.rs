//! Integration tests for editing a floor plan through pointer input.

use crate::helpers::{TestPlanBuilder, approx, approx_point, ms};
use floorplan_view::input::{InputState, Modifiers, PointerButton, WheelDelta};
use floorplan_view::{Point, Rect, Room, Viewport};
use std::collections::HashMap;
use std::time::Instant;

fn two_room_plan() -> TestPlanBuilder {
    TestPlanBuilder::new(1000.0, 800.0)
        .viewport_size(500.0, 400.0)
        .with_rect_room(1, "West", 0.0, 0.0, 400.0, 400.0)
        .with_rect_room(2, "East", 600.0, 0.0, 400.0, 400.0)
        .with_object(10, 100.0, 100.0)
        .with_object(11, 200.0, 100.0)
        .with_object(12, 500.0, 600.0)
}

#[test]
fn test_open_fits_and_derives_rooms() {
    let (view, store) = two_room_plan().open(Instant::now());

    assert!(approx(view.viewport().zoom(), 0.5));
    assert!(approx_point(view.viewport().pan(), Point::ZERO));

    assert_eq!(view.object(10).unwrap().room_id, Some(1));
    assert_eq!(view.object(11).unwrap().room_id, Some(1));
    assert_eq!(view.object(12).unwrap().room_id, None);

    // Cached ids were stale (all None), so the derived ones were saved once
    let store = store.borrow();
    assert_eq!(store.assignments.len(), 1);
    assert_eq!(store.assignments[0].len(), 2);
}

#[test]
fn test_open_restores_last_viewport() {
    let saved = Viewport::new(1.0, Point::new(-250.0, -200.0));
    let (view, _) = two_room_plan().with_last_viewport(saved).open(Instant::now());
    assert_eq!(view.viewport().viewport(), saved);
}

#[test]
fn test_group_drag_commits_exact_positions_and_rooms() {
    let (mut view, store) = two_room_plan().open(Instant::now());
    let t0 = Instant::now();

    // Click object 10, then shift-click object 11
    assert!(view.pointer_down(Point::new(50.0, 50.0), PointerButton::Primary, Modifiers::NONE));
    assert!(!view.pointer_up(Point::new(50.0, 50.0)));
    assert!(view.pointer_down(Point::new(100.0, 50.0), PointerButton::Primary, Modifiers::SHIFT));
    view.pointer_up(Point::new(100.0, 50.0));
    assert_eq!(view.selection().len(), 2);

    // Drag the pair 500 world units right and 100 down, through jittery moves
    view.pointer_down(Point::new(50.0, 50.0), PointerButton::Primary, Modifiers::NONE);
    assert!(view.input_state().is_dragging());
    for (x, y) in [(60.0, 52.0), (190.0, 80.0), (420.0, 10.0), (290.0, 99.0)] {
        view.pointer_move(Point::new(x, y), t0);
    }
    assert_eq!(view.display_position(10), Some(Point::new(580.0, 198.0)));
    // The model is untouched until release
    assert_eq!(view.object(10).unwrap().position(), Point::new(100.0, 100.0));

    assert!(view.pointer_up(Point::new(300.0, 100.0)));
    assert_eq!(view.object(10).unwrap().position(), Point::new(600.0, 200.0));
    assert_eq!(view.object(11).unwrap().position(), Point::new(700.0, 200.0));
    assert_eq!(view.object(10).unwrap().room_id, Some(2));
    assert_eq!(view.object(11).unwrap().room_id, Some(2));

    let store = store.borrow();
    assert_eq!(
        store.positions.last().unwrap(),
        &vec![(10, Point::new(600.0, 200.0)), (11, Point::new(700.0, 200.0))]
    );
    let expected: HashMap<u64, Option<u64>> = [(10, Some(2)), (11, Some(2))].into_iter().collect();
    assert_eq!(store.assignments.last().unwrap(), &expected);
}

#[test]
fn test_escape_cancels_drag() {
    let (mut view, store) = two_room_plan().open(Instant::now());
    let t0 = Instant::now();
    let saves_before = store.borrow().positions.len();

    view.pointer_down(Point::new(50.0, 50.0), PointerButton::Primary, Modifiers::NONE);
    view.pointer_move(Point::new(250.0, 150.0), t0);
    assert!(view.cancel_interaction());
    assert!(view.input_state().is_idle());
    assert_eq!(view.display_position(10), Some(Point::new(100.0, 100.0)));

    // Release after cancel commits nothing
    assert!(!view.pointer_up(Point::new(250.0, 150.0)));
    assert_eq!(store.borrow().positions.len(), saves_before);

    // Second escape clears the selection
    assert!(view.cancel_interaction());
    assert!(view.selection().is_empty());
}

#[test]
fn test_room_edits_reassign_objects() {
    let (mut view, store) = two_room_plan().open(Instant::now());

    // A new room drawn over object 12
    view.add_room(Room::rect(3, "South", Rect::new(400.0, 500.0, 200.0, 200.0)));
    assert_eq!(view.object(12).unwrap().room_id, Some(3));
    assert_eq!(store.borrow().saved_rooms.last().map(|r| r.id), Some(3));

    // Drawn on top of West: the overlap belongs to the new room
    view.add_room(Room::polygon(
        4,
        "Nook",
        vec![Point::new(150.0, 50.0), Point::new(300.0, 50.0), Point::new(300.0, 200.0), Point::new(150.0, 200.0)],
    ));
    assert_eq!(view.object(10).unwrap().room_id, Some(1));
    assert_eq!(view.object(11).unwrap().room_id, Some(4));

    // Shrinking West leaves object 10 outside every room
    view.update_room(Room::rect(1, "West", Rect::new(0.0, 0.0, 50.0, 50.0)));
    assert_eq!(view.object(10).unwrap().room_id, None);

    assert!(view.delete_room(4));
    assert_eq!(view.object(11).unwrap().room_id, None);
    assert!(!view.delete_room(4));
    assert_eq!(store.borrow().deleted_rooms, vec![4]);
}

#[test]
fn test_click_selects_room_and_drags_it() {
    let (mut view, store) = two_room_plan().open(Instant::now());
    let t0 = Instant::now();

    // Click empty space inside East (world 800, 300)
    view.pointer_down(Point::new(400.0, 150.0), PointerButton::Primary, Modifiers::NONE);
    view.pointer_up(Point::new(400.0, 150.0));
    assert_eq!(view.selection().selected_room_id(), Some(2));

    // Drag the selected room 100 world units down
    view.pointer_down(Point::new(400.0, 150.0), PointerButton::Primary, Modifiers::NONE);
    assert!(matches!(view.input_state(), InputState::DraggingRoom { room_id: 2, .. }));
    view.pointer_move(Point::new(400.0, 200.0), t0);
    view.pointer_up(Point::new(400.0, 200.0));

    assert_eq!(
        view.room(2).unwrap().shape.bounds(),
        Some(Rect::new(600.0, 100.0, 400.0, 400.0))
    );
    assert_eq!(store.borrow().saved_rooms.last().map(|r| r.id), Some(2));

    // Clicking outside all rooms clears the selection
    view.pointer_down(Point::new(5.0, 395.0), PointerButton::Primary, Modifiers::NONE);
    view.pointer_up(Point::new(5.0, 395.0));
    assert!(view.selection().is_empty());
}

#[test]
fn test_box_select_and_shift_toggle() {
    let (mut view, _) = two_room_plan().open(Instant::now());
    let t0 = Instant::now();

    // Box from world (40, 40) to (240, 140) covers objects 10 and 11
    view.pointer_down(Point::new(20.0, 20.0), PointerButton::Primary, Modifiers::NONE);
    view.pointer_move(Point::new(120.0, 70.0), t0);
    assert!(view.input_state().selection_box().is_some());
    view.pointer_up(Point::new(120.0, 70.0));
    let mut selected: Vec<_> = view.selection().selected_ids().iter().copied().collect();
    selected.sort();
    assert_eq!(selected, vec![10, 11]);

    // Shift box around 11 and 12 flips both
    view.pointer_down(Point::new(85.0, 35.0), PointerButton::Primary, Modifiers::SHIFT);
    view.pointer_move(Point::new(260.0, 310.0), t0);
    view.pointer_up(Point::new(260.0, 310.0));
    let mut selected: Vec<_> = view.selection().selected_ids().iter().copied().collect();
    selected.sort();
    assert_eq!(selected, vec![10, 12]);
    assert_eq!(
        view.selection_bounds(),
        Some(Rect::new(100.0, 100.0, 400.0, 500.0))
    );
}

#[test]
fn test_viewport_commits_after_settle_and_on_leave() {
    let t0 = Instant::now();
    let saved = Viewport::new(1.0, Point::new(-250.0, -200.0));
    let (mut view, store) = two_room_plan().with_last_viewport(saved).open(t0);

    // Loading is not a change to persist
    let out = view.frame(t0 + ms(600));
    assert_eq!(out.committed, None);

    assert!(view.wheel(
        Point::new(250.0, 200.0),
        WheelDelta::Pixels(Point::new(-30.0, 0.0)),
        Modifiers::NONE,
        t0 + ms(700),
    ));
    assert_eq!(view.frame(t0 + ms(800)).committed, None);
    let out = view.frame(t0 + ms(1200));
    assert_eq!(out.committed, Some(Viewport::new(1.0, Point::new(-280.0, -200.0))));
    assert_eq!(store.borrow().viewports.len(), 1);

    // A change still settling is flushed when leaving
    view.wheel(
        Point::new(250.0, 200.0),
        WheelDelta::Lines(Point::new(0.0, -1.0)),
        Modifiers::NONE,
        t0 + ms(1300),
    );
    view.leave();
    let store = store.borrow();
    assert_eq!(store.viewports.len(), 2);
    assert_eq!(store.viewports[1], Viewport::new(1.0, Point::new(-280.0, -220.0)));
}

#[test]
fn test_store_failures_do_not_abort_edits() {
    let (mut view, store) = two_room_plan().open(Instant::now());
    store.borrow_mut().fail = true;

    view.move_objects(&[(12, Point::new(700.0, 100.0))]);
    assert_eq!(view.object(12).unwrap().position(), Point::new(700.0, 100.0));
    assert_eq!(view.object(12).unwrap().room_id, Some(2));

    view.add_room(Room::rect(5, "Annex", Rect::new(0.0, 600.0, 100.0, 100.0)));
    assert!(view.room(5).is_some());
    view.leave();
}

#[test]
fn test_focus_object_animates_to_readable_zoom() {
    let t0 = Instant::now();
    let (mut view, _) = two_room_plan().open(t0);

    assert!(view.focus_object(11, t0));
    assert!(view.viewport().is_animating());
    let out = view.frame(t0 + ms(150));
    assert!(out.redraw);
    view.frame(t0 + ms(400));
    assert!(!view.viewport().is_animating());
    assert!(approx(view.viewport().zoom(), 1.0));

    assert!(!view.focus_object(99, t0));
}
