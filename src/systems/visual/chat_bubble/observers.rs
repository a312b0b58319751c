use super::channel::ChannelPolicy;
use super::config::ChatBubbleConfig;
use super::controller::ChatBubbleController;
use super::visuals::BubbleVisualParams;
use crate::events::ChatMessageReceived;
use bevy::prelude::*;

/// チャット受信時のオブザーバー
/// 発言者自身のコントローラーにだけ吹き出しを出す
pub fn on_chat_message_received(
    on: On<ChatMessageReceived>,
    policy: Res<ChannelPolicy>,
    config: Res<ChatBubbleConfig>,
    mut q_controllers: Query<&mut ChatBubbleController>,
    mut visuals: BubbleVisualParams,
) {
    let speaker = on.entity;
    let event = on.event();

    let Ok(mut controller) = q_controllers.get_mut(speaker) else {
        return;
    };
    if !controller.enabled {
        return;
    }

    match controller.show(
        speaker,
        &event.text,
        event.channel,
        &policy,
        &config,
        &mut visuals,
    ) {
        Ok(true) => {}
        Ok(false) => debug!(
            "BUBBLE: {:?} message on {:?} filtered by channel policy",
            speaker, event.channel
        ),
        Err(err) => warn!("BUBBLE: cannot show chat bubble for {:?}: {}", speaker, err),
    }
}

/// Message として届いたチャットをオブザーバーへ流す
pub fn forward_chat_messages(
    mut commands: Commands,
    mut reader: MessageReader<ChatMessageReceived>,
) {
    for message in reader.read() {
        commands.trigger(message.clone());
    }
}
