//! 汎用ユーティリティ

pub mod animations;
