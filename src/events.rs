use crate::systems::visual::chat_bubble::{BubbleId, ChatChannel};
use bevy::prelude::*;

/// キャラクターがチャットメッセージを発言した
///
/// チャット側は発言者のエンティティを対象に trigger する。
/// 発言者が `ChatBubbleController` を持っていれば吹き出しが出る。
#[derive(Message, EntityEvent, Debug, Clone)]
pub struct ChatMessageReceived {
    pub entity: Entity, // 発言者（吹き出しを出すキャラクター）
    pub channel: ChatChannel,
    pub text: String,
}

/// 吹き出しが退場アニメーションを終えて破棄された
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatBubbleRemoved {
    pub owner: Entity,
    pub id: BubbleId,
    /// 上限超過で追い出された場合 true
    pub evicted: bool,
}
