//! キャラクター頭上のチャット吹き出し
//!
//! チャットメッセージを受け取ったキャラクターの上に吹き出しを出し、
//! チャンネルごとの色で表示してから、文字数に応じた時間で消す。
//! 1キャラクターにつき複数の吹き出しを重ねて表示でき、上限を超えると最も古いものから追い出す。

pub mod constants;
pub mod error;
pub mod events;
pub mod systems;

pub use error::ChatBubbleError;
pub use events::{ChatBubbleRemoved, ChatMessageReceived};
pub use systems::visual::chat_bubble::{
    BubbleDecoration, BubbleId, BubblePhase, BubbleTemplate, BubbleTextStyle, ChannelPolicy,
    ChannelRule, ChatBubbleConfig, ChatBubbleController, ChatBubblePlugin, ChatBubbleVisual,
    ChatChannel,
};

pub mod prelude {
    pub use crate::error::ChatBubbleError;
    pub use crate::events::{ChatBubbleRemoved, ChatMessageReceived};
    pub use crate::systems::BubbleSystemSet;
    pub use crate::systems::visual::chat_bubble::{
        BubbleDecoration, BubbleTemplate, BubbleTextStyle, ChannelPolicy, ChannelRule,
        ChatBubbleConfig, ChatBubbleController, ChatBubblePlugin, ChatChannel, TintedByBubble,
    };
}
