use palaver::{
    BuiltinStrings, ChatChannel, ChatConfig, ChatDatum, ChatEnvelope, ChatSystem, ConnectionId,
    EntityId,
    listeners::EmoteListener,
    testing::RecordingTransmitter,
};

mod common;
use common::{ALICE, BOB, CRAB, FARAWAY, URIST, station};

#[test]
fn test_emote_reaches_players_in_range() {
    let world = station();
    let strings = BuiltinStrings;
    let world = world.as_world(&strings);
    let config = ChatConfig::default();
    let mut pipeline = ChatSystem::standard_listeners(&config).build().unwrap();
    let mut out = RecordingTransmitter::new();

    let mut chat = ChatEnvelope::new(EntityId(URIST), "waves")
        .with_channel(ChatChannel::EMOTES)
        .with_claim(EmoteListener::ID);
    let report = pipeline.dispatch(&mut chat, &world, &mut out);

    assert!(report.handled);
    assert_eq!(report.handled_by, Some(EmoteListener::ID));
    assert_eq!(chat.claimed_by(), Some(EmoteListener::ID));
    assert_eq!(chat.channel(), ChatChannel::EMOTES);
    assert_eq!(chat.message(), "waves");

    // Discovery: everyone within 10, with distances, connection or not.
    let recipients: Vec<(EntityId, Option<f32>)> = chat
        .recipients()
        .map(|(e, data)| (e, data.distance()))
        .collect();
    assert_eq!(
        recipients,
        vec![
            (EntityId(URIST), Some(0.0)),
            (EntityId(BOB), Some(1.0)),
            (EntityId(ALICE), Some(4.0)),
            (EntityId(CRAB), Some(2.0)),
        ]
    );
    assert!(chat.recipient(EntityId(FARAWAY)).is_none());

    // Delivery: only recipients with a connection.
    assert_eq!(
        out.clients(),
        vec![ConnectionId(URIST), ConnectionId(BOB), ConnectionId(ALICE)]
    );
    for (_, sent) in out.sent() {
        assert_eq!(sent.wrapped_message, "Urist waves");
        assert_eq!(sent.message, "waves");
        assert_eq!(sent.channel, ChatChannel::EMOTES);
        assert_eq!(sent.source, EntityId(URIST));
        assert!(!sent.hide_chat);
    }
}

#[test]
fn test_emote_names_source_when_relayed() {
    let world = station();
    let strings = BuiltinStrings;
    let world = world.as_world(&strings);
    let mut system = ChatSystem::new(ChatConfig::default()).unwrap();
    let mut out = RecordingTransmitter::new();

    assert!(system.try_send_emote(
        EntityId(URIST),
        "nods",
        Some(EntityId(ALICE)),
        &world,
        &mut out
    ));

    assert_eq!(out.wrapped_for(ConnectionId(BOB)), vec!["Urist nods".to_string()]);
}

#[test]
fn test_relayed_speaker_kept_as_chat_data() {
    let world = station();
    let strings = BuiltinStrings;
    let world = world.as_world(&strings);
    let mut pipeline = ChatSystem::standard_listeners(&ChatConfig::default())
        .build()
        .unwrap();
    let mut out = RecordingTransmitter::new();

    let mut chat = ChatEnvelope::new(EntityId(URIST), "nods")
        .with_channel(ChatChannel::EMOTES)
        .with_claim(EmoteListener::ID)
        .with_data(ChatDatum::RelayedSpeaker(EntityId(ALICE)));
    pipeline.dispatch(&mut chat, &world, &mut out);

    assert_eq!(chat.data().relayed_speaker(), Some(EntityId(ALICE)));
    assert_eq!(out.wrapped_for(ConnectionId(ALICE)), vec!["Urist nods".to_string()]);
}

#[test]
fn test_emote_escapes_markup() {
    let world = station();
    let strings = BuiltinStrings;
    let world = world.as_world(&strings);
    let mut system = ChatSystem::new(ChatConfig::default()).unwrap();
    let mut out = RecordingTransmitter::new();

    system.try_send_emote(EntityId(URIST), "[color=red]glows", None, &world, &mut out);

    assert_eq!(
        out.wrapped_for(ConnectionId(BOB)),
        vec!["Urist \\[color=red]glows".to_string()]
    );
}

#[test]
fn test_emote_range_is_configurable() {
    let world = station();
    let strings = BuiltinStrings;
    let world = world.as_world(&strings);
    let config = ChatConfig::from_toml_str("emote_range = 1.5").unwrap();
    let mut system = ChatSystem::new(config).unwrap();
    let mut out = RecordingTransmitter::new();

    system.try_send_emote(EntityId(URIST), "waves", None, &world, &mut out);

    assert_eq!(out.clients(), vec![ConnectionId(URIST), ConnectionId(BOB)]);
}

#[test]
fn test_unnamed_source_falls_back() {
    let world = palaver::testing::MockWorld::new()
        .with_unnamed_player(1, (0.0, 0.0))
        .with_player(2, "Bob", (1.0, 0.0));
    let strings = BuiltinStrings;
    let world = world.as_world(&strings);
    let mut system = ChatSystem::new(ChatConfig::default()).unwrap();
    let mut out = RecordingTransmitter::new();

    system.try_send_emote(EntityId(1), "shuffles", None, &world, &mut out);

    assert_eq!(
        out.wrapped_for(ConnectionId(2)),
        vec!["Someone shuffles".to_string()]
    );
}
