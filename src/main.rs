use bevy::prelude::*;
use chat_bubbles::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;

const PHRASES: &[&str] = &[
    "hi",
    "anyone up for the dungeon?",
    "lol",
    "selling 20 iron ore, pm me",
    "brb",
    "need a healer for the boss run, we have tank and two dps already",
    "gg",
    "where is the blacksmith?",
];

const CHANNELS: &[ChatChannel] = &[
    ChatChannel::Local,
    ChatChannel::Global,
    ChatChannel::Whisper,
    ChatChannel::Party,
    ChatChannel::Guild,
    ChatChannel::System,
];

/// デモ用のキャラクター
#[derive(Component)]
struct DemoCharacter {
    name: &'static str,
}

/// ランダムな発言を流すタイマー
#[derive(Resource)]
struct ChatFeed {
    timer: Timer,
}

fn main() {
    App::new()
        .insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.1)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Chat Bubbles".into(),
                        resolution: (1280, 720).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(bevy::log::LogPlugin {
                    level: bevy::log::Level::INFO,
                    filter: "wgpu=error,chat_bubbles=debug".to_string(),
                    ..default()
                }),
        )
        .insert_resource(ChatFeed {
            timer: Timer::from_seconds(0.8, TimerMode::Repeating),
        })
        .add_plugins(ChatBubblePlugin)
        .add_systems(Startup, setup_demo)
        .add_systems(
            Update,
            (chat_feed_system, channel_toggle_system, flood_system),
        )
        .run();
}

fn setup_demo(mut commands: Commands) {
    commands.spawn(Camera2d);
    commands.insert_resource(BubbleTemplate::default());

    let characters = [
        ("Aldric", Color::srgb(0.8, 0.3, 0.3), -300.0),
        ("Brynn", Color::srgb(0.3, 0.8, 0.4), 0.0),
        ("Caius", Color::srgb(0.3, 0.5, 0.9), 300.0),
    ];

    for (name, color, x) in characters {
        let character = commands
            .spawn((
                DemoCharacter { name },
                Name::new(name),
                Sprite::from_color(color, Vec2::splat(32.0)),
                Transform::from_xyz(x, -80.0, 1.0),
            ))
            .id();

        // 発言中インジケータ。吹き出しがある間だけ表示される
        let indicator = commands
            .spawn((
                BubbleDecoration,
                TintedByBubble,
                Sprite::from_color(Color::WHITE, Vec2::splat(8.0)),
                Transform::from_xyz(22.0, 22.0, 2.0).with_scale(Vec3::ZERO),
                ChildOf(character),
            ))
            .id();

        let mut controller = ChatBubbleController::new();
        controller.add_decoration(indicator);
        commands.entity(character).insert(controller);
    }

    info!("DEMO: keys 1-5 toggle Local/Global/Whisper/Party/Guild, Space floods the first character");
}

fn chat_feed_system(
    mut commands: Commands,
    time: Res<Time>,
    mut feed: ResMut<ChatFeed>,
    q_characters: Query<(Entity, &DemoCharacter)>,
) {
    if !feed.timer.tick(time.delta()).just_finished() {
        return;
    }

    let characters: Vec<(Entity, &DemoCharacter)> = q_characters.iter().collect();
    let mut rng = rand::thread_rng();
    let Some(&(speaker, character)) = characters.choose(&mut rng) else {
        return;
    };
    let channel = CHANNELS[rng.gen_range(0..CHANNELS.len())];
    let text = PHRASES.choose(&mut rng).copied().unwrap_or("...");

    debug!("DEMO: [{:?}] {}: {}", channel, character.name, text);
    commands.trigger(ChatMessageReceived {
        entity: speaker,
        channel,
        text: text.to_string(),
    });
}

fn channel_toggle_system(keys: Res<ButtonInput<KeyCode>>, mut policy: ResMut<ChannelPolicy>) {
    let bindings = [
        (KeyCode::Digit1, ChatChannel::Local),
        (KeyCode::Digit2, ChatChannel::Global),
        (KeyCode::Digit3, ChatChannel::Whisper),
        (KeyCode::Digit4, ChatChannel::Party),
        (KeyCode::Digit5, ChatChannel::Guild),
    ];

    for (key, channel) in bindings {
        if !keys.just_pressed(key) {
            continue;
        }
        let visible = policy.rule(channel).is_some_and(|rule| !rule.visible);
        policy.set_visible(channel, visible);
        info!("DEMO: {:?} bubbles {}", channel, if visible { "on" } else { "off" });
    }
}

fn flood_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    q_characters: Query<(Entity, &DemoCharacter)>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }

    let Some((speaker, character)) = q_characters.iter().min_by_key(|(_, c)| c.name) else {
        return;
    };
    info!("DEMO: flooding {}", character.name);
    for (i, phrase) in PHRASES.iter().take(5).enumerate() {
        commands.trigger(ChatMessageReceived {
            entity: speaker,
            channel: CHANNELS[i % 5],
            text: phrase.to_string(),
        });
    }
}
