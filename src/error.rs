//! 吹き出しシステムのエラー定義

use thiserror::Error;

/// 吹き出しを表示できなかった理由
///
/// チャンネルで弾かれたケースはエラーではないので含まない
/// (`ChatBubbleController::show` が `Ok(false)` を返す)。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatBubbleError {
    #[error("chat bubble template is not configured")]
    MissingTemplate,
    #[error("chat bubble template has no text surface")]
    MissingTextSurface,
    #[error("invalid chat bubble config: {0}")]
    InvalidConfig(String),
}
