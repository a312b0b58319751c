use crate::constants::*;
use crate::error::ChatBubbleError;
use bevy::prelude::*;

/// 吹き出しの表示時間・上限などの設定
/// 既定値は `constants` から。アプリ側で先に insert しておけばそちらが使われる
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ChatBubbleConfig {
    /// 最低表示時間（秒）
    pub min_duration: f32,
    /// 最大表示時間（秒）
    pub max_duration: f32,
    /// 1文字あたりの追加表示時間（秒）
    pub extra_duration_per_character: f32,
    /// 出現・退場アニメーションの長さ（秒）
    pub transition_duration: f32,
    /// 同時に表示できる吹き出しの数
    pub max_bubbles: usize,
    /// true なら作られた順にしか消えない
    pub bubbles_must_expire_in_order: bool,
}

impl Default for ChatBubbleConfig {
    fn default() -> Self {
        Self {
            min_duration: CHAT_BUBBLE_MIN_DURATION,
            max_duration: CHAT_BUBBLE_MAX_DURATION,
            extra_duration_per_character: CHAT_BUBBLE_EXTRA_PER_CHAR,
            transition_duration: CHAT_BUBBLE_TRANSITION_DURATION,
            max_bubbles: CHAT_BUBBLE_MAX_COUNT,
            bubbles_must_expire_in_order: CHAT_BUBBLE_EXPIRE_IN_ORDER,
        }
    }
}

impl ChatBubbleConfig {
    pub fn validate(&self) -> Result<(), ChatBubbleError> {
        if self.max_bubbles == 0 {
            return Err(ChatBubbleError::InvalidConfig(
                "max_bubbles must be at least 1".to_string(),
            ));
        }
        let durations = [
            ("min_duration", self.min_duration),
            ("max_duration", self.max_duration),
            ("extra_duration_per_character", self.extra_duration_per_character),
            ("transition_duration", self.transition_duration),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ChatBubbleError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.max_duration < self.min_duration {
            return Err(ChatBubbleError::InvalidConfig(format!(
                "max_duration ({}) is shorter than min_duration ({})",
                self.max_duration, self.min_duration
            )));
        }
        Ok(())
    }

    /// 文字数に応じた表示時間
    /// min + extra * 文字数 を [min, max] に収める
    pub fn display_duration(&self, text: &str) -> f32 {
        let length = text.chars().count() as f32;
        let duration = self.min_duration + self.extra_duration_per_character * length;
        // validate 前の設定でも panic しないよう clamp は使わない
        duration.min(self.max_duration).max(self.min_duration)
    }
}
