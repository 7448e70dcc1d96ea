mod common;

use common::{
    AVATAR, PAIN_SOUND, avatar_at, drain, engine, engine_with_geometry, enter_room, occupant,
};
use world_core::{
    ActionButton, ActionButtonKind, ActionButtons, ChatMessage, EffectFields, EffectKind,
    HealthStatus, InventoryObject, ObjectBase, ObjectFlags, ObjectId, OnlinePlayer, PlayerOverlay,
    RoomInfo, SpellObject, Stat, StatGroup, V2,
};
use world_sync::{
    BuffKind, ControllerFields, ProjectileLaunch, ServerMessage, Topic, UserCommand, WorldEvent,
    WorldSync,
};

fn ids(ids: impl Iterator<Item = ObjectId>) -> Vec<u32> {
    ids.map(|id| id.0).collect()
}

#[test]
fn room_contents_flag_the_avatar() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "town.roo",
        vec![
            avatar_at(0.0, 0.0),
            occupant(2, ObjectFlags::NPC, 10.0, 0.0),
        ],
    );

    let state = sync.state();
    assert_eq!(state.avatar_id, Some(ObjectId(AVATAR)));
    assert_eq!(state.avatar, Some(ObjectId(AVATAR)));
    assert!(state.avatar_object().is_some_and(|avatar| avatar.is_avatar));
    assert!(!state.room_objects.get(ObjectId(2)).unwrap().is_avatar);
    assert_eq!(state.room_objects.len(), 2);
}

#[test]
fn room_transition_clears_room_scope() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "town.roo",
        vec![
            avatar_at(0.0, 0.0),
            occupant(2, ObjectFlags::ATTACKABLE, 10.0, 0.0),
        ],
    );
    sync.handle_message(ServerMessage::Shoot(ProjectileLaunch {
        base: ObjectBase::new(500, "fireball"),
        source: ObjectId(AVATAR),
        target: ObjectId(2),
        speed: 4,
    }));
    sync.handle_message(ServerMessage::AddEnchantment {
        kind: BuffKind::Room,
        buff: ObjectBase::new(600, "darkness"),
    });
    sync.set_target(Some(ObjectId(2)));

    assert_eq!(sync.state().projectiles.len(), 1);
    assert_eq!(sync.state().room_buffs.len(), 1);

    sync.handle_message(ServerMessage::Player(RoomInfo::new(AVATAR, "forest.roo")));

    let state = sync.state();
    assert!(state.room_objects.is_empty());
    assert!(state.projectiles.is_empty());
    assert!(state.room_buffs.is_empty());
    assert_eq!(state.avatar, None);
    assert_eq!(state.target, None);
    assert_eq!(state.room.room_file, "forest.roo");
    assert!(state.trade.is_empty());
}

#[test]
fn create_replaces_existing_identity() {
    let mut sync = engine();
    enter_room(&mut sync, "town.roo", vec![avatar_at(0.0, 0.0)]);

    sync.handle_message(ServerMessage::Create(occupant(3, ObjectFlags::NPC, 1.0, 1.0)));
    sync.handle_message(ServerMessage::Create(occupant(3, ObjectFlags::NPC, 5.0, 5.0)));

    let objects = &sync.state().room_objects;
    assert_eq!(objects.len(), 2);
    assert_eq!(objects.get(ObjectId(3)).unwrap().position.x, 5.0);

    sync.handle_message(ServerMessage::Remove(ObjectId(3)));
    sync.handle_message(ServerMessage::Remove(ObjectId(3)));
    assert!(sync.state().room_objects.get(ObjectId(3)).is_none());
    assert_eq!(sync.state().room_objects.len(), 1);
}

#[test]
fn change_patches_occupants_then_inventory() {
    let mut sync = engine();
    enter_room(&mut sync, "town.roo", vec![avatar_at(0.0, 0.0)]);
    sync.handle_message(ServerMessage::Inventory(vec![InventoryObject::new(
        ObjectBase::new(30, "sword"),
    )]));

    let mut renamed = ObjectBase::new(30, "rusty sword");
    renamed.count = 2;
    sync.handle_message(ServerMessage::Change(renamed));

    let item = sync.state().inventory.get(ObjectId(30)).unwrap();
    assert_eq!(item.base.name, "rusty sword");
    assert_eq!(item.base.count, 2);

    // unknown identities never create shadow entities
    sync.handle_message(ServerMessage::Change(ObjectBase::new(99, "ghost")));
    assert!(sync.state().room_objects.get(ObjectId(99)).is_none());
    assert!(sync.state().inventory.get(ObjectId(99)).is_none());
}

#[test]
fn projectiles_need_both_ends() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "town.roo",
        vec![avatar_at(0.0, 0.0), occupant(2, ObjectFlags::ATTACKABLE, 10.0, 0.0)],
    );

    sync.handle_message(ServerMessage::Shoot(ProjectileLaunch {
        base: ObjectBase::new(500, "arrow"),
        source: ObjectId(AVATAR),
        target: ObjectId(77),
        speed: 4,
    }));
    assert!(sync.state().projectiles.is_empty());

    sync.handle_message(ServerMessage::Shoot(ProjectileLaunch {
        base: ObjectBase::new(500, "arrow"),
        source: ObjectId(AVATAR),
        target: ObjectId(2),
        speed: 4,
    }));
    let projectile = sync.state().projectiles.iter().next().unwrap();
    assert_eq!(projectile.source, ObjectId(AVATAR));
    assert_eq!(projectile.target, ObjectId(2));
    assert_eq!(projectile.position.ground(), V2::ZERO);
}

#[test]
fn removing_an_end_drops_its_projectiles_at_once() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "arena.roo",
        vec![
            avatar_at(0.0, 0.0),
            occupant(2, ObjectFlags::ATTACKABLE, 10.0, 0.0),
            occupant(3, ObjectFlags::ATTACKABLE, 20.0, 0.0),
        ],
    );
    for target in [2, 3] {
        sync.handle_message(ServerMessage::Shoot(ProjectileLaunch {
            base: ObjectBase::new(500, "arrow"),
            source: ObjectId(AVATAR),
            target: ObjectId(target),
            speed: 4,
        }));
    }
    assert_eq!(sync.state().projectiles.len(), 2);

    sync.handle_message(ServerMessage::Remove(ObjectId(2)));
    let targets: Vec<_> = sync
        .state()
        .projectiles
        .iter()
        .map(|projectile| projectile.target)
        .collect();
    assert_eq!(targets, vec![ObjectId(3)]);

    sync.handle_message(ServerMessage::RoomContents(vec![
        avatar_at(0.0, 0.0),
        occupant(2, ObjectFlags::ATTACKABLE, 10.0, 0.0),
    ]));
    assert!(sync.state().projectiles.is_empty());
}

#[test]
fn pain_sound_reveals_health() {
    let (mut sync, _geometry) = engine_with_geometry();
    enter_room(
        &mut sync,
        "town.roo",
        vec![avatar_at(0.0, 0.0), occupant(2, ObjectFlags::PLAYER, 10.0, 0.0)],
    );

    sync.handle_message(ServerMessage::PlayWave {
        source: ObjectId(2),
        sound: "door.wav".into(),
    });
    let health = |sync: &WorldSync| sync.state().room_objects.get(ObjectId(2)).unwrap().health;
    assert_eq!(health(&sync), HealthStatus::Unknown);

    sync.handle_message(ServerMessage::PlayWave {
        source: ObjectId(2),
        sound: PAIN_SOUND.into(),
    });
    assert_eq!(health(&sync), HealthStatus::Red);
}

#[test]
fn player_overlay_keeps_one_entry_per_identity() {
    let mut sync = engine();
    let overlay = |hotspot| PlayerOverlay::new(ObjectBase::new(40, "shield"), hotspot);

    sync.handle_message(ServerMessage::PlayerOverlay(overlay(2)));
    sync.handle_message(ServerMessage::PlayerOverlay(overlay(2)));
    assert_eq!(sync.state().player_overlays.len(), 1);

    // a different hotspot replaces the existing overlay
    sync.handle_message(ServerMessage::PlayerOverlay(overlay(5)));
    let overlays = &sync.state().player_overlays;
    assert_eq!(overlays.len(), 1);
    assert_eq!(overlays.get(ObjectId(40)).unwrap().hotspot, 5);

    // the hide hotspot removes it
    sync.handle_message(ServerMessage::PlayerOverlay(overlay(0)));
    assert!(sync.state().player_overlays.is_empty());
}

#[test]
fn inventory_snapshot_rebinds_action_buttons() {
    let mut sync = engine();
    let mut buttons = ActionButtons::new();
    buttons
        .push(ActionButton::new(ActionButtonKind::Item, "Healing Potion"))
        .unwrap();
    buttons
        .push(ActionButton::new(ActionButtonKind::Spell, "blink"))
        .unwrap();
    sync.set_action_buttons(buttons);

    sync.handle_message(ServerMessage::Inventory(vec![
        InventoryObject::new(ObjectBase::new(30, "sword")),
        InventoryObject::new(ObjectBase::new(31, "healing potion")),
    ]));
    sync.handle_message(ServerMessage::SpellAdd(SpellObject::new(ObjectBase::new(
        80, "Blink",
    ))));

    let buttons = &sync.state().action_buttons;
    assert_eq!(buttons.get(0).unwrap().bound, Some(ObjectId(31)));
    assert_eq!(buttons.get(1).unwrap().bound, Some(ObjectId(80)));
}

#[test]
fn rebinding_an_already_bound_button_is_silent() {
    let mut sync = engine();
    let mut buttons = ActionButtons::new();
    buttons
        .push(ActionButton::new(ActionButtonKind::Item, "potion"))
        .unwrap();
    sync.set_action_buttons(buttons);
    let mut controller = sync.subscribe(Topic::Controller);

    let potion = || InventoryObject::new(ObjectBase::new(31, "potion"));
    sync.handle_message(ServerMessage::InventoryAdd(potion()));
    sync.handle_message(ServerMessage::InventoryAdd(potion()));

    let rebinds = drain(&mut controller)
        .into_iter()
        .filter(|event| {
            matches!(
                event,
                WorldEvent::Controller(fields) if fields.contains(ControllerFields::ACTION_BUTTONS)
            )
        })
        .count();
    assert_eq!(rebinds, 1);
}

#[test]
fn use_flags_follow_inventory_messages() {
    let mut sync = engine();
    sync.handle_message(ServerMessage::Inventory(vec![
        InventoryObject::new(ObjectBase::new(30, "sword")),
        InventoryObject::new(ObjectBase::new(31, "shield")),
    ]));

    sync.handle_message(ServerMessage::UseList(vec![ObjectId(30), ObjectId(31)]));
    sync.handle_message(ServerMessage::Unuse(ObjectId(31)));
    sync.handle_message(ServerMessage::Use(ObjectId(99)));

    let inventory = &sync.state().inventory;
    assert!(inventory.get(ObjectId(30)).unwrap().in_use);
    assert!(!inventory.get(ObjectId(31)).unwrap().in_use);
    assert_eq!(inventory.len(), 2);
}

#[test]
fn stat_updates_respect_group_kind() {
    let mut sync = engine();
    sync.handle_message(ServerMessage::StatGroup {
        group: StatGroup::Condition,
        stats: vec![
            Stat::numeric(1, "Health", 40, 50),
            Stat::numeric(2, "Mana", 10, 30),
            Stat::list(9, "misplaced", 3),
        ],
    });
    assert_eq!(sync.state().condition.len(), 2);
    assert_eq!(sync.hit_points(), 40);
    assert_eq!(sync.mana(), 10);
    assert_eq!(sync.vigor(), 0);

    sync.handle_message(ServerMessage::Stat {
        group: StatGroup::Condition,
        stat: Stat::numeric(1, "Health", 25, 50),
    });
    assert_eq!(sync.hit_points(), 25);

    // list values never land in a numeric group
    sync.handle_message(ServerMessage::Stat {
        group: StatGroup::Condition,
        stat: Stat::list(1, "Health", 3),
    });
    assert_eq!(sync.hit_points(), 25);
}

#[test]
fn enchantments_route_by_kind() {
    let mut sync = engine();
    sync.handle_message(ServerMessage::AddEnchantment {
        kind: BuffKind::Avatar,
        buff: ObjectBase::new(70, "haste"),
    });
    sync.handle_message(ServerMessage::AddEnchantment {
        kind: BuffKind::Room,
        buff: ObjectBase::new(71, "fog"),
    });
    assert_eq!(ids(sync.state().avatar_buffs.keys()), vec![70]);
    assert_eq!(ids(sync.state().room_buffs.keys()), vec![71]);

    sync.handle_message(ServerMessage::RemoveEnchantment {
        kind: BuffKind::Avatar,
        id: ObjectId(70),
    });
    assert!(sync.state().avatar_buffs.is_empty());
    assert_eq!(sync.state().room_buffs.len(), 1);
}

#[test]
fn online_players_sort_by_name() {
    let mut sync = engine();
    sync.handle_message(ServerMessage::Players(vec![
        OnlinePlayer::new(1, "zed"),
        OnlinePlayer::new(2, "Alia"),
    ]));
    sync.handle_message(ServerMessage::PlayerAdd(OnlinePlayer::new(3, "bran")));

    let names: Vec<_> = sync
        .state()
        .online_players
        .iter()
        .map(|player| player.name.as_str())
        .collect();
    assert_eq!(names, vec!["Alia", "bran", "zed"]);

    sync.handle_message(ServerMessage::PlayerRemove(ObjectId(1)));
    assert_eq!(sync.state().online_players.len(), 2);
}

#[test]
fn ignored_senders_are_filtered_from_chat() {
    let mut sync = engine();
    sync.handle_message(ServerMessage::Players(vec![OnlinePlayer::new(5, "Troll")]));
    sync.ignore("troll");

    sync.handle_message(ServerMessage::Said(ChatMessage::said(5, "Troll", "spam")));
    sync.handle_message(ServerMessage::Said(ChatMessage::said(6, "Friend", "hi")));

    let lines: Vec<_> = sync.chat_log().map(ChatMessage::full_text).collect();
    assert_eq!(lines, vec!["Friend: hi".to_string()]);

    sync.unignore("TROLL");
    sync.handle_message(ServerMessage::Said(ChatMessage::said(5, "Troll", "back")));
    assert_eq!(sync.chat_log().count(), 2);
}

#[test]
fn trade_partner_leaving_resets_the_session() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "town.roo",
        vec![avatar_at(0.0, 0.0), occupant(42, ObjectFlags::PLAYER, 3.0, 0.0)],
    );

    sync.handle_message(ServerMessage::Offer {
        partner: ObjectId(42),
        items: vec![ObjectBase::new(300, "gem")],
    });
    let trade = &sync.state().trade;
    assert_eq!(trade.partner, Some(ObjectId(42)));
    assert!(trade.pending);
    assert!(trade.background_offer);
    assert!(trade.items_partner_set);
    assert!(!trade.visible);

    sync.handle_message(ServerMessage::Remove(ObjectId(42)));
    assert!(sync.state().trade.is_empty());
}

#[test]
fn buy_list_needs_a_present_vendor() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "town.roo",
        vec![avatar_at(0.0, 0.0), occupant(50, ObjectFlags::NPC, 3.0, 0.0)],
    );

    sync.handle_message(ServerMessage::BuyList {
        partner: ObjectId(51),
        items: vec![ObjectBase::new(301, "bread")],
    });
    assert_eq!(sync.state().buy.partner, None);
    assert!(sync.state().buy.visible);

    sync.handle_message(ServerMessage::BuyList {
        partner: ObjectId(50),
        items: vec![ObjectBase::new(301, "bread")],
    });
    assert_eq!(sync.state().buy.partner, Some(ObjectId(50)));

    sync.handle_message(ServerMessage::RoomContents(vec![avatar_at(0.0, 0.0)]));
    assert!(sync.state().buy.is_empty());
}

#[test]
fn offered_items_open_the_trade_window() {
    let mut sync = engine();
    sync.handle_message(ServerMessage::Offered(vec![ObjectBase::new(300, "gem")]));
    sync.handle_message(ServerMessage::CounterOffer(vec![ObjectBase::new(301, "coin")]));

    let trade = &sync.state().trade;
    assert!(trade.visible && trade.pending);
    assert!(trade.items_you_set && trade.items_partner_set);
    assert_eq!(trade.items_you.len(), 1);
    assert_eq!(trade.items_partner.len(), 1);

    sync.handle_message(ServerMessage::OfferCanceled);
    assert!(sync.state().trade.is_empty());
}

#[test]
fn panels_open_on_their_messages() {
    let mut sync = engine();
    sync.handle_message(ServerMessage::Look(world_core::ObjectInfo {
        object: ObjectBase::new(9, "statue"),
        description: "Old.".into(),
        inscription: String::new(),
    }));
    sync.handle_message(ServerMessage::UserCommand(UserCommand::GuildShieldList(vec![
        "shield_a".into(),
    ])));
    sync.handle_message(ServerMessage::LookNewsGroup(world_core::NewsGroup {
        id: 1,
        name: "town crier".into(),
        ..Default::default()
    }));
    sync.handle_message(ServerMessage::Articles(vec![world_core::Article {
        number: 1,
        title: "Welcome".into(),
        ..Default::default()
    }]));
    sync.handle_message(ServerMessage::Article("Hello there".into()));

    let state = sync.state();
    assert!(state.look_object.is_visible());
    assert_eq!(state.look_object.data().description, "Old.");
    assert_eq!(state.guild_shield.data().shields, vec!["shield_a".to_string()]);
    assert!(state.news_group.is_visible());
    assert_eq!(state.news_group.data().articles.len(), 1);
    assert_eq!(state.news_group.data().text, "Hello there");
}

#[test]
fn char_info_installs_a_preview() {
    let mut sync = engine();
    sync.handle_message(ServerMessage::CharInfo(Default::default()));
    assert!(sync.state().char_creation.data().preview.is_some());
    assert!(sync.state().char_creation.data().data_ok);

    sync.handle_message(ServerMessage::CharInfoNotOk);
    assert!(!sync.state().char_creation.data().data_ok);
}

#[test]
fn session_flags_and_lights() {
    let mut sync = engine();
    sync.handle_message(ServerMessage::Wait);
    assert!(sync.state().waiting);
    sync.handle_message(ServerMessage::Unwait);
    assert!(!sync.state().waiting);

    sync.handle_message(ServerMessage::LightAmbient(40));
    sync.handle_message(ServerMessage::LightPlayer(90));
    sync.handle_message(ServerMessage::Background("sky.bgf".into()));
    let room = &sync.state().room;
    assert_eq!((room.ambient_light, room.avatar_light), (40, 90));
    assert_eq!(room.background, "sky.bgf");

    sync.handle_message(ServerMessage::Effect(EffectKind::Shake { duration: 500 }));
    assert!(sync.state().effects.is_active(EffectFields::SHAKE));
}

#[test]
fn invalidate_data_clears_server_state() {
    let mut sync = engine();
    enter_room(&mut sync, "town.roo", vec![avatar_at(0.0, 0.0)]);
    sync.handle_message(ServerMessage::Inventory(vec![InventoryObject::new(
        ObjectBase::new(30, "sword"),
    )]));
    sync.handle_message(ServerMessage::SysMessage(ChatMessage::system("saving")));

    sync.handle_message(ServerMessage::InvalidateData);

    let state = sync.state();
    assert!(state.room_objects.is_empty());
    assert!(state.inventory.is_empty());
    assert_eq!(state.avatar, None);
    assert_eq!(state.avatar_id, None);
    // the chat log survives invalidation, only a reset clears it
    assert_eq!(sync.chat_log().count(), 1);

    sync.reset();
    assert_eq!(sync.chat_log().count(), 0);
}

#[test]
fn move_with_zero_speed_places_immediately() {
    let mut sync = engine();
    enter_room(
        &mut sync,
        "town.roo",
        vec![avatar_at(0.0, 0.0), occupant(2, ObjectFlags::NPC, 0.0, 0.0)],
    );
    sync.handle_message(ServerMessage::Move {
        id: ObjectId(2),
        destination: V2::new(8.0, 0.0),
        speed: 0,
    });
    sync.handle_message(ServerMessage::Turn {
        id: ObjectId(2),
        angle: 1024,
    });

    let object = sync.state().room_objects.get(ObjectId(2)).unwrap();
    assert_eq!(object.position.ground(), V2::new(8.0, 0.0));
    assert!(object.movement.is_none());
    assert_eq!(object.angle, 1024);
}
