//! 出力EPROMイメージ
//!
//! キャラクタセット列をEPROMの容量まで繰り返して並べる。

use crate::charset::CharsetBlock;
use crate::error::ChargenError;
use std::fmt;
use std::str::FromStr;

/// 出力先EPROM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpromType {
    /// 2KB
    E2716,
    /// 4KB（2716と同じ内容が2回）
    E2732,
    /// 8KB
    E2764,
}

impl EpromType {
    /// 容量（バイト）
    pub fn capacity(self) -> usize {
        match self {
            EpromType::E2716 => 2048,
            EpromType::E2732 => 2048 * 2,
            EpromType::E2764 => 2048 * 4,
        }
    }
}

impl fmt::Display for EpromType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpromType::E2716 => write!(f, "2716"),
            EpromType::E2732 => write!(f, "2732"),
            EpromType::E2764 => write!(f, "2764"),
        }
    }
}

impl FromStr for EpromType {
    type Err = ChargenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2716" => Ok(EpromType::E2716),
            "2732" => Ok(EpromType::E2732),
            "2764" => Ok(EpromType::E2764),
            _ => Err(ChargenError::InvalidCapacity(s.to_string())),
        }
    }
}

/// キャラクタセット列を容量いっぱいまで繰り返し、容量ちょうどに切り詰める
///
/// 空の列からは空のイメージ。
pub fn build_image(charsets: &[CharsetBlock], capacity: usize) -> Vec<u8> {
    let sequence_len: usize = charsets.iter().map(|c| c.as_bytes().len()).sum();
    if sequence_len == 0 {
        return Vec::new();
    }

    let passes = capacity.div_ceil(sequence_len);
    log::debug!(
        "Replicating {} bytes x {} passes into {} bytes",
        sequence_len,
        passes,
        capacity
    );

    let mut image = Vec::with_capacity(passes * sequence_len);
    for _ in 0..passes {
        for charset in charsets {
            image.extend_from_slice(charset.as_bytes());
        }
    }
    image.truncate(capacity);
    image
}
