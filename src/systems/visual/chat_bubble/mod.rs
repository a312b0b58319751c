pub mod channel;
pub mod components;
pub mod config;
pub mod controller;
pub mod entry;
pub mod observers;
pub mod spawn;
pub mod update;
pub mod visuals;

pub use channel::{ChannelPolicy, ChannelRule, ChatChannel};
pub use components::{BubbleDecoration, BubbleTint, ChatBubbleVisual, TintedByBubble};
pub use config::ChatBubbleConfig;
pub use controller::ChatBubbleController;
pub use entry::{BubbleEntry, BubbleId, BubblePhase};
pub use visuals::{BubbleTemplate, BubbleTextStyle, BubbleVisualParams, BubbleVisuals};

use crate::events::{ChatBubbleRemoved, ChatMessageReceived};
use crate::systems::BubbleSystemSet;
use bevy::prelude::*;
use observers::*;
use update::*;

/// チャット吹き出しプラグイン
///
/// `BubbleTemplate` はアプリ側で用意する。無い間は吹き出しを出さずに警告する。
pub struct ChatBubblePlugin;

impl Plugin for ChatBubblePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ChatBubbleConfig>();
        app.init_resource::<ChannelPolicy>();
        app.add_message::<ChatMessageReceived>();
        app.add_message::<ChatBubbleRemoved>();

        app.configure_sets(
            Update,
            (BubbleSystemSet::Lifecycle, BubbleSystemSet::Visual).chain(),
        );
        app.add_systems(Startup, log_chat_bubble_config);
        app.add_systems(
            Update,
            (forward_chat_messages, tick_chat_bubbles)
                .chain()
                .in_set(BubbleSystemSet::Lifecycle),
        );
        app.add_systems(
            Update,
            (update_bubble_stacking, apply_bubble_tints).in_set(BubbleSystemSet::Visual),
        );

        // Observers の登録
        app.add_observer(on_chat_message_received);
    }
}
