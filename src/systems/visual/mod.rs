//! ビジュアルシステム
//!
//! キャラクター頭上の視覚的フィードバックを管理するモジュール群

pub mod chat_bubble;
