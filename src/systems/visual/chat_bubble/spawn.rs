use super::components::*;
use super::visuals::{BubbleTemplate, BubbleTextStyle};
use crate::constants::*;
use bevy::prelude::*;

/// キャラクターの子として吹き出しをスポーンする
/// 出現アニメーションのためスケール0から始める
pub fn spawn_bubble_visual(
    commands: &mut Commands,
    template: &BubbleTemplate,
    style: &BubbleTextStyle,
    parent: Entity,
    text: &str,
) -> Entity {
    // テキスト長に応じたサイズ計算 (概算)
    let text_width =
        (text.chars().count() as f32 * CHAT_BUBBLE_CHAR_WIDTH).max(CHAT_BUBBLE_MIN_WIDTH);
    let bubble_width = text_width + CHAT_BUBBLE_PADDING;

    commands
        .spawn((
            ChatBubbleVisual,
            Name::new("ChatBubble"),
            Text2d::new(text),
            TextFont {
                font: style.font.clone(),
                font_size: style.font_size,
                ..default()
            },
            TextColor(style.color),
            TextLayout::new_with_justify(Justify::Center),
            Transform::from_xyz(CHAT_BUBBLE_OFFSET.x, CHAT_BUBBLE_OFFSET.y, CHAT_BUBBLE_Z)
                .with_scale(Vec3::ZERO),
            ChildOf(parent),
        ))
        .with_child((
            TintedByBubble,
            Sprite {
                image: template.background.clone(),
                color: Color::WHITE.with_alpha(template.background_alpha),
                custom_size: Some(Vec2::new(bubble_width, CHAT_BUBBLE_HEIGHT)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, CHAT_BUBBLE_BG_Z),
        ))
        .id()
}
