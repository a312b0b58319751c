//! 定数のドメイン別分割
//!
//! `use crate::constants::*` で全定数を参照できるよう再 export している。

mod bubble;

pub use bubble::*;
