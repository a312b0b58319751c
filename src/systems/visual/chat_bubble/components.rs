use bevy::prelude::*;

/// 吹き出し本体（テキスト）のマーカー
#[derive(Component, Debug)]
pub struct ChatBubbleVisual;

/// チャンネル色で塗られるスプライトのマーカー
/// 自身か、`BubbleTint` を持つ親の色を受け取る
#[derive(Component, Debug)]
pub struct TintedByBubble;

/// 適用待ちの色
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BubbleTint(pub Color);

/// 吹き出しが1つ以上あるときだけ表示される装飾（発言中アイコンなど）
#[derive(Component, Debug, Default)]
pub struct BubbleDecoration;
