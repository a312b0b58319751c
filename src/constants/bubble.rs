//! チャット吹き出しシステム (Chat Bubble)

use bevy::prelude::*;

// ----- 表示時間 -----
/// メッセージ長に関係なく最低限表示する時間（秒）
pub const CHAT_BUBBLE_MIN_DURATION: f32 = 3.0;
/// 表示時間の上限（秒）
pub const CHAT_BUBBLE_MAX_DURATION: f32 = 10.0;
/// 1文字あたりの追加表示時間（秒）
pub const CHAT_BUBBLE_EXTRA_PER_CHAR: f32 = 0.1;
/// 拡大・縮小トランジションの長さ（秒）
pub const CHAT_BUBBLE_TRANSITION_DURATION: f32 = 1.0;

// ----- キュー -----
/// キャラクター1体あたりの同時表示数
pub const CHAT_BUBBLE_MAX_COUNT: usize = 3;
pub const CHAT_BUBBLE_EXPIRE_IN_ORDER: bool = true;

// ----- レイアウト -----
/// 頭上からのオフセット（最も新しい吹き出しの位置）
pub const CHAT_BUBBLE_OFFSET: Vec2 = Vec2::new(0.0, 36.0);
/// 古い吹き出しを押し上げる間隔
pub const CHAT_BUBBLE_STACK_GAP: f32 = 30.0;
pub const CHAT_BUBBLE_Z: f32 = 10.0;
/// 背景は本体より少し奥 (相対Z)
pub const CHAT_BUBBLE_BG_Z: f32 = -0.1;
pub const CHAT_BUBBLE_FONT_SIZE: f32 = 14.0;
/// 背景サイズの概算 (1文字平均 7px + 左右余白)
pub const CHAT_BUBBLE_CHAR_WIDTH: f32 = 7.0;
pub const CHAT_BUBBLE_MIN_WIDTH: f32 = 32.0;
pub const CHAT_BUBBLE_PADDING: f32 = 16.0;
pub const CHAT_BUBBLE_HEIGHT: f32 = 24.0;
pub const CHAT_BUBBLE_BG_ALPHA: f32 = 0.85;

// ----- チャンネル別カラー -----
pub const CHAT_TINT_LOCAL: Color = Color::WHITE;
pub const CHAT_TINT_GLOBAL: Color = Color::WHITE;
pub const CHAT_TINT_WHISPER: Color = Color::srgb(0.0, 1.0, 0.0);
pub const CHAT_TINT_PARTY: Color = Color::srgb(0.0, 1.0, 1.0);
pub const CHAT_TINT_GUILD: Color = Color::srgb(0.0, 0.0, 1.0);
pub const CHAT_TEXT_COLOR: Color = Color::BLACK;
