//! 吹き出しの見た目との接点
//!
//! コントローラーはこのトレイト越しにだけエンティティを生成・変形・着色する。

use super::components::*;
use super::spawn::spawn_bubble_visual;
use crate::constants::*;
use crate::error::ChatBubbleError;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

pub trait BubbleVisuals {
    /// テンプレートが揃っているか。揃っていなければ何も生成しない
    fn check_ready(&self) -> Result<(), ChatBubbleError>;

    /// 吹き出しの既定スケール（トランジションの到達点）
    fn natural_scale(&self) -> Vec3;

    fn spawn_bubble(&mut self, parent: Entity, text: &str) -> Result<Entity, ChatBubbleError>;

    /// 対象が存在しなければ false
    fn set_scale(&mut self, element: Entity, scale: Vec3) -> bool;

    fn set_tint(&mut self, element: Entity, tint: Color);

    fn despawn_bubble(&mut self, element: Entity);
}

/// 吹き出しのテキスト設定
#[derive(Debug, Clone)]
pub struct BubbleTextStyle {
    pub font: Handle<Font>,
    pub font_size: f32,
    pub color: Color,
}

impl Default for BubbleTextStyle {
    fn default() -> Self {
        Self {
            font: default(),
            font_size: CHAT_BUBBLE_FONT_SIZE,
            color: CHAT_TEXT_COLOR,
        }
    }
}

/// 吹き出しのひな形
/// このリソースが無い間は吹き出しを出さない
#[derive(Resource, Debug, Clone)]
pub struct BubbleTemplate {
    /// None ならテキストを表示できないので設定不備扱い
    pub text: Option<BubbleTextStyle>,
    pub background: Handle<Image>,
    pub background_alpha: f32,
    pub natural_scale: Vec3,
}

impl Default for BubbleTemplate {
    fn default() -> Self {
        Self {
            text: Some(BubbleTextStyle::default()),
            background: default(),
            background_alpha: CHAT_BUBBLE_BG_ALPHA,
            natural_scale: Vec3::ONE,
        }
    }
}

impl BubbleTemplate {
    fn text_style(&self) -> Result<&BubbleTextStyle, ChatBubbleError> {
        self.text.as_ref().ok_or(ChatBubbleError::MissingTextSurface)
    }
}

/// ECS 上の `BubbleVisuals` 実装
#[derive(SystemParam)]
pub struct BubbleVisualParams<'w, 's> {
    commands: Commands<'w, 's>,
    template: Option<Res<'w, BubbleTemplate>>,
    q_transforms: Query<
        'w,
        's,
        &'static mut Transform,
        Or<(With<ChatBubbleVisual>, With<BubbleDecoration>)>,
    >,
}

impl BubbleVisuals for BubbleVisualParams<'_, '_> {
    fn check_ready(&self) -> Result<(), ChatBubbleError> {
        let template = self
            .template
            .as_deref()
            .ok_or(ChatBubbleError::MissingTemplate)?;
        template.text_style().map(|_| ())
    }

    fn natural_scale(&self) -> Vec3 {
        self.template
            .as_deref()
            .map(|template| template.natural_scale)
            .unwrap_or(Vec3::ONE)
    }

    fn spawn_bubble(&mut self, parent: Entity, text: &str) -> Result<Entity, ChatBubbleError> {
        let template = self
            .template
            .as_deref()
            .ok_or(ChatBubbleError::MissingTemplate)?;
        let style = template.text_style()?;
        Ok(spawn_bubble_visual(
            &mut self.commands,
            template,
            style,
            parent,
            text,
        ))
    }

    fn set_scale(&mut self, element: Entity, scale: Vec3) -> bool {
        match self.q_transforms.get_mut(element) {
            Ok(mut transform) => {
                transform.scale = scale;
                true
            }
            Err(_) => false,
        }
    }

    fn set_tint(&mut self, element: Entity, tint: Color) {
        // 生成直後でまだ Query に現れないエンティティにも効くよう、コマンド経由で入れる
        self.commands.entity(element).try_insert(BubbleTint(tint));
    }

    fn despawn_bubble(&mut self, element: Entity) {
        self.commands.entity(element).try_despawn();
    }
}
