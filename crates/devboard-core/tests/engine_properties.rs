//! End-to-end behavior of the engine: history, cascades, linking and dragging.

use devboard_core::model::{ConnectorPatch, ConnectorStyle, ItemPatch};
use devboard_core::{
    ConnectOutcome, Engine, EngineConfig, Gesture, ItemId, ItemKind, PointerEvent, Viewport,
};
use kurbo::Point;

fn engine() -> Engine {
    let mut engine = Engine::new(EngineConfig::default().with_seed(2024));
    engine.set_viewport(Viewport::new(1280.0, 720.0));
    engine
}

fn connect(engine: &mut Engine, from: ItemId, to: ItemId) -> ConnectOutcome {
    engine.start_connector(from);
    engine.finish_connector(to)
}

#[test]
fn undo_every_checkpoint_restores_initial_state() {
    let mut engine = engine();
    let initial = engine.document().clone();

    let a = engine.add_note("first");
    let b = engine.add_item(ItemKind::Task);
    let c = engine.add_item(ItemKind::Decision);
    connect(&mut engine, a, b);
    engine.move_item(c, Point::new(4.0, -2.0));
    engine.add_task_entry(b, "ship");
    engine.update_item(a, &ItemPatch::new().field("text", "edited"));
    engine.bring_to_front(a);
    engine.duplicate_item(c);
    engine.remove_item(b);

    let checkpoints = engine.history().undo_depth();
    assert_eq!(checkpoints, 10);
    for _ in 0..checkpoints {
        assert!(engine.undo());
    }
    assert!(!engine.undo());
    assert_eq!(engine.document().items, initial.items);
    assert_eq!(engine.document().connectors, initial.connectors);
}

#[test]
fn redo_restores_state_before_undo() {
    let mut engine = engine();
    let a = engine.add_note("a");
    let b = engine.add_note("b");
    connect(&mut engine, a, b);
    engine.move_item(a, Point::new(1.0, 1.0));
    let before_undo = engine.document().clone();

    assert!(engine.undo());
    assert_ne!(engine.document(), &before_undo);
    assert!(engine.redo());
    assert_eq!(engine.document(), &before_undo);
}

#[test]
fn new_mutation_discards_redo_state() {
    let mut engine = engine();
    engine.add_note("a");
    engine.add_note("b");
    engine.undo();
    assert!(engine.can_redo());

    engine.add_item(ItemKind::Link);
    assert!(!engine.can_redo());
    assert!(!engine.redo());
}

#[test]
fn history_is_capped_at_forty() {
    let mut engine = engine();
    for i in 0..45 {
        engine.add_note(format!("note {i}"));
    }
    assert_eq!(engine.history().undo_depth(), 40);
    let mut undone = 0;
    while engine.undo() {
        undone += 1;
    }
    assert_eq!(undone, 40);
    assert_eq!(engine.board_items().count(), 5);
}

#[test]
fn remove_item_cascades_connectors() {
    let mut engine = engine();
    let hub = engine.add_note("hub");
    let spokes: Vec<ItemId> = (0..3).map(|i| engine.add_note(format!("spoke {i}"))).collect();
    for spoke in &spokes {
        assert!(matches!(connect(&mut engine, hub, *spoke), ConnectOutcome::Created(_)));
    }
    connect(&mut engine, spokes[0], spokes[1]);
    assert_eq!(engine.document().connectors.len(), 4);

    engine.remove_item(hub);
    assert!(
        engine
            .document()
            .connectors
            .iter()
            .all(|c| c.from_id != hub && c.to_id != hub)
    );
    assert_eq!(engine.document().connectors.len(), 1);
}

#[test]
fn connectors_are_unique_and_never_loops() {
    let mut engine = engine();
    let a = engine.add_note("a");
    let b = engine.add_note("b");

    assert!(matches!(connect(&mut engine, a, b), ConnectOutcome::Created(_)));
    assert_eq!(connect(&mut engine, a, b), ConnectOutcome::Duplicate);
    assert_eq!(connect(&mut engine, b, a), ConnectOutcome::Duplicate);
    assert_eq!(connect(&mut engine, a, a), ConnectOutcome::SelfLoop);
    assert_eq!(engine.finish_connector(b), ConnectOutcome::NotArmed);

    let connectors = &engine.document().connectors;
    assert_eq!(connectors.len(), 1);
    assert!(connectors.iter().all(|c| c.from_id != c.to_id));
    assert!(!engine.connector_mode());
}

#[test]
fn self_connect_leaves_no_trace() {
    let mut engine = engine();
    let a = engine.add_note("a");
    let depth = engine.history().undo_depth();

    engine.start_connector(a);
    assert_eq!(engine.connector_source_id(), Some(a));
    assert_eq!(engine.finish_connector(a), ConnectOutcome::SelfLoop);

    assert!(!engine.connector_mode());
    assert!(engine.document().connectors.is_empty());
    assert_eq!(engine.history().undo_depth(), depth);
}

#[test]
fn repeated_link_gesture_yields_one_connector() {
    let mut engine = engine();
    let a = engine.add_note("a");
    let b = engine.add_note("b");
    connect(&mut engine, a, b);
    connect(&mut engine, a, b);
    let between = engine
        .document()
        .connectors
        .iter()
        .filter(|c| c.joins(a, b))
        .count();
    assert_eq!(between, 1);
}

#[test]
fn drag_far_outside_clamps_and_undoes_in_one_step() {
    let mut engine = engine();
    engine.add_board("B");
    let note = engine.add_note("N");
    let start = engine.item(note).unwrap().position;
    let viewport = engine.viewport();

    let grab = engine
        .camera()
        .world_to_screen(Point::new(start[0], start[1]), viewport);
    engine.handle_pointer(PointerEvent::down(Some(note), grab));
    assert!(matches!(engine.gesture(), Gesture::Dragging { .. }));

    let far = engine
        .camera()
        .world_to_screen(Point::new(100.0, 100.0), viewport);
    engine.handle_pointer(PointerEvent::Move {
        position: Point::new((grab.x + far.x) / 2.0, (grab.y + far.y) / 2.0),
    });
    engine.handle_pointer(PointerEvent::Move { position: far });
    engine.handle_pointer(PointerEvent::Up { position: far });

    let dragged = engine.item(note).unwrap().position;
    assert_eq!(dragged[0], 14.0);
    assert_eq!(dragged[1], 8.0);
    assert!(engine.gesture().is_idle());

    assert!(engine.undo());
    assert_eq!(engine.item(note).unwrap().position, start);
}

#[test]
fn bring_to_front_strictly_raises() {
    let mut engine = engine();
    let ids: Vec<ItemId> = (0..4).map(|i| engine.add_note(format!("{i}"))).collect();
    for &id in ids.iter().chain(ids.iter().rev()) {
        engine.bring_to_front(id);
        let z = engine.item(id).unwrap().stacking();
        assert!(
            engine
                .board_items()
                .filter(|item| item.id != id)
                .all(|item| item.stacking() < z)
        );
    }
    // raising the current top item still increases its value
    let top = ids[0];
    let z = engine.item(top).unwrap().stacking();
    engine.bring_to_front(top);
    assert!(engine.item(top).unwrap().stacking() > z);
}

#[test]
fn delete_board_cascades_and_keeps_a_board() {
    let mut engine = engine();
    let board = engine.active_board_id();
    let x = engine.add_note("X");
    let y = engine.add_note("Y");
    connect(&mut engine, x, y);

    assert!(engine.delete_board(board));
    assert!(engine.item(x).is_none());
    assert!(engine.item(y).is_none());
    assert!(engine.document().connectors.is_empty());
    assert_eq!(engine.document().boards.len(), 1);
    assert_ne!(engine.active_board_id(), board);
    assert!(engine.active_board().is_some());
}

#[test]
fn selection_and_hover_never_checkpoint() {
    let mut engine = engine();
    let a = engine.add_note("a");
    let depth = engine.history().undo_depth();
    engine.select(a);
    engine.hover(Some(a));
    engine.deselect();
    engine.hover(None);
    assert_eq!(engine.history().undo_depth(), depth);
}

#[test]
fn connector_edits_are_undoable() {
    let mut engine = engine();
    let a = engine.add_note("a");
    let b = engine.add_note("b");
    let id = connect(&mut engine, a, b).created().unwrap();

    let patch = ConnectorPatch {
        label: Some("depends on".to_string()),
        style: Some(ConnectorStyle::Dotted),
        color: None,
    };
    assert!(engine.update_connector(id, &patch));
    assert!(!engine.update_connector(id, &patch));
    assert_eq!(engine.document().connector(id).unwrap().label, "depends on");

    assert!(engine.remove_connector(id));
    engine.undo();
    engine.undo();
    let restored = engine.document().connector(id).unwrap();
    assert_eq!(restored.style, ConnectorStyle::Solid);
}

#[test]
fn undo_after_deleting_an_empty_board_revives_it() {
    let mut engine = engine();
    let first = engine.active_board_id();
    let note = engine.add_note("left behind");
    engine.remove_item(note);
    engine.add_board("Second");
    assert!(engine.delete_board(first));
    assert!(engine.document().board(first).is_none());

    assert!(engine.undo());
    let document = engine.document();
    assert_eq!(document.item(note).unwrap().board_id, first);
    assert!(
        document
            .items
            .iter()
            .all(|item| document.board(item.board_id).is_some())
    );
}
