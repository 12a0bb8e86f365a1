#![allow(dead_code)]

use palaver::{
    ChatConfig, ChatSystem, PipelineBuilder,
    listeners::{EmoteListener, LoggingListener, SayListener, WhisperListener},
    testing::MockWorld,
};

// ============================================================================
// Fixtures
// ============================================================================

pub const URIST: u64 = 1;
pub const BOB: u64 = 2;
pub const ALICE: u64 = 3;
pub const CRAB: u64 = 4;
pub const FARAWAY: u64 = 5;

/// Urist at the origin, listeners spread along the x axis.
///
/// | entity  | distance | connection |
/// |---------|----------|------------|
/// | Urist   | 0        | yes        |
/// | Bob     | 1        | yes        |
/// | Crab    | 2        | no         |
/// | Alice   | 4        | yes        |
/// | Faraway | 50       | yes        |
pub fn station() -> MockWorld {
    MockWorld::new()
        .with_player(URIST, "Urist", (0.0, 0.0))
        .with_player(BOB, "Bob", (1.0, 0.0))
        .with_player(ALICE, "Alice", (4.0, 0.0))
        .with_npc(CRAB, "Crab", (2.0, 0.0))
        .with_player(FARAWAY, "Faraway", (50.0, 0.0))
}

/// The standard listener set with a seeded whisper listener.
pub fn seeded_system(obfuscation_chance: f64) -> ChatSystem {
    let config = ChatConfig {
        whisper_obfuscation_chance: obfuscation_chance,
        ..ChatConfig::default()
    };
    let pipeline = PipelineBuilder::new()
        .register(LoggingListener::new())
        .register(SayListener::new(config.voice_range))
        .register(WhisperListener::seeded(
            config.whisper_clear_range,
            config.whisper_muffled_range,
            config.whisper_obfuscation_chance,
            42,
        ))
        .register(EmoteListener::new(config.emote_range))
        .build()
        .unwrap();
    ChatSystem::with_pipeline(pipeline, config)
}
