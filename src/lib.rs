//! A2Chargen - Apple II Character Generator ROM Tool
//!
//! Apple II+ 互換ボード用の文字ROMを解析・変換する:
//! - 配線マトリクス（Apple / Unicom / SPACE-81）による正規化と逆変換
//! - MD5による既知キャラクタセットの判定
//! - Flash Enable・5x7外側ドットの使用状況の検出
//! - 2716 / 2732 / 2764 EPROM用イメージの生成

pub mod error;
pub mod wiring;
pub mod charset;
pub mod analyzer;
pub mod render;
pub mod eprom;
pub mod convert;
pub mod config;

pub use error::{ChargenError, Result};
