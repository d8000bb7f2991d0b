//! ボード配線マトリクス
//!
//! 文字ROMのデータ線はボードごとに配線が異なる。
//! マトリクスの要素 `p` は正規化ビット `p` に接続されている物理データ線のマスク。
//!
//! 正規化後のビット配置（Appleオリジナルと同じ）:
//! ```text
//! 0b10000000 Q7     Flash Enable
//! 0b01000000 Q6 (H) 通常は空（5x7の左外側）
//! 0b00100000 Q5 (G) 5x7の左端ドット
//! 0b00010000 Q4 (F)
//! 0b00001000 Q3 (E)
//! 0b00000100 Q2 (D)
//! 0b00000010 Q1 (C) 5x7の右端ドット
//! 0b00000001 Q0 (B) 通常は空（5x7の右外側）
//! ```

use crate::charset::CharsetBlock;
use crate::error::ChargenError;
use std::fmt;
use std::str::FromStr;

/// 配線マトリクス（8要素、各要素は単一ビットマスクまたは0）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WiringMatrix(pub [u8; 8]);

/// Apple純正（ストレート配線）
pub const MATRIX_OEM: WiringMatrix =
    WiringMatrix([0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80]);

/// Unicomボード
/// Q7 (Flash Enable) はこのボードでは配線されていない
pub const MATRIX_UNICOM: WiringMatrix = WiringMatrix([
    0b0000_0100, // B
    0b1000_0000, // C
    0b0100_0000, // D
    0b0010_0000, // E
    0b0001_0000, // F
    0b0000_1000, // G
    0b0000_0010, // H
    0b0000_0000, // Flash Enable（未使用）
]);

/// SPACE-81ボード
pub const MATRIX_SPACE81: WiringMatrix = WiringMatrix([
    0b0010_0000, // B
    0b0000_0001, // C
    0b0000_0010, // D
    0b0000_0100, // E
    0b0000_1000, // F
    0b0001_0000, // G
    0b1000_0000, // H
    0b0100_0000, // Flash Enable
]);

impl WiringMatrix {
    /// 1バイトを正規化する
    ///
    /// 出力ビット `p` は、`self[p]` の全ビットが入力に立っているときだけ立つ。
    /// 要素が0の位置は常に0。
    #[inline]
    pub fn normalize_byte(&self, x: u8) -> u8 {
        let mut out = 0u8;
        for (bit_pos, &mask) in self.0.iter().enumerate() {
            if mask != 0 && (x & mask) == mask {
                out |= 1 << bit_pos;
            }
        }
        out
    }

    /// キャラクタセット1つ分を正規化（新しいブロックを返す）
    pub fn normalize_charset(&self, charset: &CharsetBlock) -> CharsetBlock {
        charset.map_bytes(|b| self.normalize_byte(b))
    }

    /// キャラクタセット列を正規化
    pub fn normalize_charsets(&self, charsets: &[CharsetBlock]) -> Vec<CharsetBlock> {
        charsets.iter().map(|c| self.normalize_charset(c)).collect()
    }

    /// 逆マトリクスを作る（正規化済みデータをボードの配線に戻す用）
    ///
    /// 要素が0の線は逆変換できないので、対応するビットは出力で落ちる。
    pub fn invert(&self) -> WiringMatrix {
        let mut inverted = [0u8; 8];
        for (line, &mask) in self.0.iter().enumerate() {
            for bit_pos in 0..8 {
                if mask & (1 << bit_pos) != 0 {
                    inverted[bit_pos] = 1 << line;
                }
            }
        }
        WiringMatrix(inverted)
    }

    /// 配線されている物理データ線（全要素のOR）
    pub fn wired_lines(&self) -> u8 {
        self.0.iter().fold(0, |acc, &m| acc | m)
    }

    /// 配線元を持つ正規化ビット
    pub fn mapped_bits(&self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m != 0)
            .fold(0, |acc, (i, _)| acc | (1 << i))
    }
}

/// 対応ボード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Board {
    /// Apple純正
    Oem,
    /// Unicomクローン
    Unicom,
    /// SPACE-81クローン
    Space81,
}

impl Board {
    pub const ALL: [Board; 3] = [Board::Oem, Board::Unicom, Board::Space81];

    pub fn matrix(self) -> WiringMatrix {
        match self {
            Board::Oem => MATRIX_OEM,
            Board::Unicom => MATRIX_UNICOM,
            Board::Space81 => MATRIX_SPACE81,
        }
    }

    /// コマンドラインでの名前
    pub fn selector(self) -> &'static str {
        match self {
            Board::Oem => "oem",
            Board::Unicom => "unicom",
            Board::Space81 => "space",
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Board::Oem => write!(f, "Apple"),
            Board::Unicom => write!(f, "Unicom"),
            Board::Space81 => write!(f, "Space-81"),
        }
    }
}

impl FromStr for Board {
    type Err = ChargenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oem" => Ok(Board::Oem),
            "unicom" => Ok(Board::Unicom),
            "space" => Ok(Board::Space81),
            _ => Err(ChargenError::InvalidBoardSelector(s.to_string())),
        }
    }
}
