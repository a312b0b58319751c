use super::components::*;
use super::config::ChatBubbleConfig;
use super::controller::ChatBubbleController;
use super::visuals::BubbleVisualParams;
use crate::constants::*;
use crate::events::ChatBubbleRemoved;
use bevy::prelude::*;

/// 吹き出しの表示時間・トランジションを進め、退場し終えたものを破棄する
pub fn tick_chat_bubbles(
    time: Res<Time>,
    config: Res<ChatBubbleConfig>,
    mut q_controllers: Query<(Entity, &mut ChatBubbleController)>,
    mut visuals: BubbleVisualParams,
    mut removed_writer: MessageWriter<ChatBubbleRemoved>,
) {
    let dt = time.delta_secs();

    for (owner, mut controller) in q_controllers.iter_mut() {
        for entry in controller.tick(dt, &config, &mut visuals) {
            removed_writer.write(ChatBubbleRemoved {
                owner,
                id: entry.id(),
                evicted: entry.is_evicted(),
            });
        }
    }
}

/// 吹き出しの重なりを調整するシステム
/// 最新のものを頭のすぐ上に置き、古いものほど上へ押し上げる
/// 退場中のものは表示中の吹き出しより上に置き、縮む間に重ならないようにする
pub fn update_bubble_stacking(
    q_controllers: Query<&ChatBubbleController>,
    mut q_bubbles: Query<&mut Transform, With<ChatBubbleVisual>>,
) {
    for controller in q_controllers.iter() {
        for (stack_idx, entry) in controller
            .entries()
            .chain(controller.exiting())
            .enumerate()
        {
            let Ok(mut transform) = q_bubbles.get_mut(entry.element()) else {
                continue;
            };
            transform.translation.x = CHAT_BUBBLE_OFFSET.x;
            transform.translation.y =
                CHAT_BUBBLE_OFFSET.y + stack_idx as f32 * CHAT_BUBBLE_STACK_GAP;
        }
    }
}

/// `BubbleTint` を本体と子のスプライトへ反映する（透明度は維持）
pub fn apply_bubble_tints(
    q_tinted: Query<(Entity, &BubbleTint, Option<&Children>), Changed<BubbleTint>>,
    mut q_sprites: Query<&mut Sprite, With<TintedByBubble>>,
) {
    for (entity, tint, children) in q_tinted.iter() {
        if let Ok(mut sprite) = q_sprites.get_mut(entity) {
            let alpha = sprite.color.alpha();
            sprite.color = tint.0.with_alpha(alpha);
        }

        if let Some(children) = children {
            for &child in children {
                if let Ok(mut sprite) = q_sprites.get_mut(child) {
                    let alpha = sprite.color.alpha();
                    sprite.color = tint.0.with_alpha(alpha);
                }
            }
        }
    }
}

/// 起動時に設定を検証してログに出す
pub fn log_chat_bubble_config(config: Res<ChatBubbleConfig>) {
    match config.validate() {
        Ok(()) => info!(
            "BUBBLE: chat bubbles ready (max {}, {:.1}s-{:.1}s, in order: {})",
            config.max_bubbles,
            config.min_duration,
            config.max_duration,
            config.bubbles_must_expire_in_order
        ),
        Err(err) => warn!("BUBBLE: {}", err),
    }
}
