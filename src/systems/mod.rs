pub mod utils;
pub mod visual;

use bevy::prelude::*;

/// 吹き出しシステムの実行順序を制御するセット
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BubbleSystemSet {
    /// 表示時間・トランジションの進行と破棄
    Lifecycle,
    /// 重なり調整・色の反映 (ライフサイクル確定後の描画追従)
    Visual,
}
