mod common;

use common::{AVATAR, avatar_at, drain, engine, enter_room, occupant};
use world_core::{ListChange, ObjectBase, ObjectFlags, ObjectId, OnlinePlayer, RoomInfo};
use world_sync::{
    AnomalyKind, ControllerFields, ProjectileLaunch, ServerMessage, Topic, WorldEvent,
};

#[test]
fn room_transition_publishes_after_the_whole_message() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "town.roo",
        vec![avatar_at(0.0, 0.0), occupant(2, ObjectFlags::NPC, 3.0, 0.0)],
    );
    let mut room = sync.subscribe(Topic::Room);
    let mut controller = sync.subscribe(Topic::Controller);

    sync.handle_message(ServerMessage::Player(RoomInfo::new(AVATAR, "forest.roo")));

    let room_events = drain(&mut room);
    assert!(room_events
        .iter()
        .any(|event| matches!(event, WorldEvent::RoomObjects(ListChange::Cleared))));
    assert!(room_events
        .iter()
        .any(|event| matches!(event, WorldEvent::RoomInfo(_))));

    let controller_events = drain(&mut controller);
    assert!(controller_events.iter().any(|event| matches!(
        event,
        WorldEvent::Controller(fields) if fields.contains(ControllerFields::AVATAR)
    )));
    // receivers only ever see the finished state
    assert!(sync.state().room_objects.is_empty());
    assert_eq!(sync.state().avatar, None);
}

#[test]
fn singleton_events_precede_collection_events() {
    let mut sync = engine();
    let mut room = sync.subscribe(Topic::Room);

    sync.handle_message(ServerMessage::Player(RoomInfo::new(AVATAR, "town.roo")));

    let events = drain(&mut room);
    let info = events
        .iter()
        .position(|event| matches!(event, WorldEvent::RoomInfo(_)));
    let cleared = events
        .iter()
        .position(|event| matches!(event, WorldEvent::RoomObjects(ListChange::Cleared)));
    assert!(info.unwrap() < cleared.unwrap());
}

#[test]
fn topics_only_carry_their_own_events() {
    let mut sync = engine();
    let mut social = sync.subscribe(Topic::Social);
    let mut inventory = sync.subscribe(Topic::Inventory);

    sync.handle_message(ServerMessage::PlayerAdd(OnlinePlayer::new(5, "Alia")));

    let events = drain(&mut social);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        WorldEvent::OnlinePlayers(ListChange::Added { item, .. }) if item.name == "Alia"
    ));
    assert!(drain(&mut inventory).is_empty());
}

#[test]
fn removals_carry_the_removed_entity() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "town.roo",
        vec![avatar_at(0.0, 0.0), occupant(2, ObjectFlags::NPC, 3.0, 0.0)],
    );
    let mut room = sync.subscribe(Topic::Room);

    sync.handle_message(ServerMessage::Remove(ObjectId(2)));

    let events = drain(&mut room);
    assert!(events.iter().any(|event| matches!(
        event,
        WorldEvent::RoomObjects(ListChange::Removed { item, .. }) if item.id() == ObjectId(2)
    )));
}

#[test]
fn unchanged_values_raise_no_notifications() {
    let mut sync = engine();
    let mut controller = sync.subscribe(Topic::Controller);

    sync.set_resting(true);
    sync.set_resting(true);
    sync.set_safety(true);

    let events = drain(&mut controller);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        events[0],
        WorldEvent::Controller(fields) if fields == ControllerFields::RESTING
    ));
}

#[test]
fn anomalies_surface_on_diagnostics() {
    let mut sync = engine();
    enter_room(&mut sync, "town.roo", vec![avatar_at(0.0, 0.0)]);
    let mut diagnostics = sync.subscribe(Topic::Diagnostics);

    sync.handle_message(ServerMessage::Remove(ObjectId(99)));
    sync.handle_message(ServerMessage::Shoot(ProjectileLaunch {
        base: ObjectBase::new(500, "arrow"),
        source: ObjectId(AVATAR),
        target: ObjectId(98),
        speed: 1,
    }));
    sync.handle_message(ServerMessage::Other(211));

    let kinds: Vec<_> = drain(&mut diagnostics)
        .into_iter()
        .filter_map(|event| match event {
            WorldEvent::Anomaly { kind, .. } => Some(kind),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![AnomalyKind::StaleReference, AnomalyKind::UnresolvedReference]
    );
}

#[test]
fn player_view_tracks_player_flags() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "town.roo",
        vec![
            avatar_at(0.0, 0.0),
            occupant(2, ObjectFlags::NPC, 3.0, 0.0),
            occupant(3, ObjectFlags::PLAYER, 4.0, 0.0),
        ],
    );
    let players = &sync.state().room_players;
    assert_eq!(players.len(), 2);
    assert!(players.contains(ObjectId(3)));

    let mut promoted = ObjectBase::new(2, "object 2");
    promoted.flags = ObjectFlags::PLAYER;
    sync.handle_message(ServerMessage::Change(promoted));
    assert!(sync.state().room_players.contains(ObjectId(2)));

    sync.handle_message(ServerMessage::Remove(ObjectId(3)));
    assert!(!sync.state().room_players.contains(ObjectId(3)));
}
