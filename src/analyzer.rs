//! キャラクタセット解析
//!
//! 7x7可視ビットのMD5で既知のキャラクタセットを判定し、
//! Flash Enableと5x7外側ドットの使用状況を調べる。

use crate::charset::{CharsetBlock, FLASH_BIT};
use crate::render::GlyphWidth;

/// 既知のキャラクタセット（7x7可視ビットのMD5 -> 名前）
pub const KNOWN_CHARSETS: &[(&str, &str)] = &[
    ("0c98631668c74b15f24f010136f9448c", "regular II+ (7341-0036)"),
    ("4bc0aa3b9d3cfcbfecca6d94c4db4da0", "3rd party mixed case"),
    ("0ee3d5d4a08763577a3a5b2dc29fe921", "3rd party uppercase"),
    ("5262be710df23d19c7f33b632ec9a5d8", "japanese j-plus inverted"),
    ("31519078d343d10782c16824a0ff6b26", "3rd party uppercase"),
    ("2b2e231edcb4750e450864f8085c18fd", "3rd party mixed case without numbers"),
    ("d213ad042f6e9df89c6864c5b71811ee", "pigfont #0 uppercase"),
    ("9384a2ec5d4e3f03d25198d8e564a9a5", "pigfont #1 uppercase"),
    ("d5b637ec188daf53856387ed32cff620", "pigfont #2 mixed case without numbers"),
    ("6a62e905fab1d24335c92362d4fb8050", "3rd party german lower case inverted"),
    ("6b77b61a454a168a672c08ce03f5988b", "3rd party german mixed case without numbers"),
    ("c8f3ebcfb4aeb937057fee2bbad4901d", "3rd party german upper case"),
    ("4a1bcde4f9d86929828235ec5c7d5727", "3rd party german upper case"),
];

/// 指紋から既知のキャラクタセット名を引く
pub fn lookup_charset(fingerprint: &str) -> Option<&'static str> {
    KNOWN_CHARSETS
        .iter()
        .find(|(hash, _)| *hash == fingerprint)
        .map(|&(_, name)| name)
}

/// 7x7可視ビットの指紋（MD5の16進文字列）
pub fn fingerprint(charset: &CharsetBlock) -> String {
    md5_hex(charset.visible(true).as_bytes())
}

fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}

bitflags::bitflags! {
    /// キャラクタセットが使っているビット
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CharsetUsage: u8 {
        /// どこかでFlash Enableが立っている
        const FLASH          = 0b0001;
        /// 全バイトでFlash Enableが立っている
        const FLASH_ALL      = 0b0010;
        /// 5x7の左外側（Q6）を使う
        const LEFT_OF_CELL   = 0b0100;
        /// 5x7の右外側（Q0）を使う
        const RIGHT_OF_CELL  = 0b1000;
    }
}

/// Flash Enableの使われ方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashUsage {
    Unused,
    EveryCharacter,
    Partial,
}

/// 1キャラクタセットの解析結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetAnalysis {
    /// 7x7可視ビットのMD5
    pub fingerprint: String,
    /// 生データのMD5
    pub raw_fingerprint: String,
    /// 5x7可視ビットのMD5
    pub cell_fingerprint: String,
    /// 既知セットの名前
    pub name: Option<&'static str>,
    pub usage: CharsetUsage,
}

impl CharsetAnalysis {
    pub fn flash_usage(&self) -> FlashUsage {
        if !self.usage.contains(CharsetUsage::FLASH) {
            FlashUsage::Unused
        } else if self.usage.contains(CharsetUsage::FLASH_ALL) {
            FlashUsage::EveryCharacter
        } else {
            FlashUsage::Partial
        }
    }

    pub fn uses_left_of_cell(&self) -> bool {
        self.usage.contains(CharsetUsage::LEFT_OF_CELL)
    }

    pub fn uses_right_of_cell(&self) -> bool {
        self.usage.contains(CharsetUsage::RIGHT_OF_CELL)
    }

    /// 5x7外側のドットを使っていれば7ドット幅で表示する
    pub fn glyph_width(&self) -> GlyphWidth {
        if self.uses_left_of_cell() || self.uses_right_of_cell() {
            GlyphWidth::Extended
        } else {
            GlyphWidth::Visible
        }
    }

    /// 診断メッセージ（表示順）
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(5);
        lines.push(format!(
            "The maximum 7x7 visible pixels have a MD5 Sum of: {}",
            self.fingerprint
        ));
        match self.name {
            Some(name) => lines.push(format!("This is a {} charset.", name)),
            None => lines.push("This is a unnamed charset.".to_string()),
        }
        lines.push(
            match self.flash_usage() {
                FlashUsage::EveryCharacter => "Every Character has the Flash enable Bit set.",
                FlashUsage::Partial => "The Flash Enable Bit is used in the Charset.",
                FlashUsage::Unused => "The Flash Enable Bit is not used in the Charset.",
            }
            .to_string(),
        );
        if self.uses_left_of_cell() {
            lines.push("It uses pixels to the left of the regular 5x7 Matrix".to_string());
        }
        if self.uses_right_of_cell() {
            lines.push("It uses pixels to the right of the regular 5x7 Matrix".to_string());
        }
        lines
    }
}

/// 正規化済みキャラクタセットを解析する
pub fn analyze(charset: &CharsetBlock) -> CharsetAnalysis {
    let mut usage = CharsetUsage::FLASH_ALL;
    for &byte in charset.as_bytes() {
        if byte & FLASH_BIT != 0 {
            usage |= CharsetUsage::FLASH;
        } else {
            usage.remove(CharsetUsage::FLASH_ALL);
        }
        if byte & 0x40 != 0 {
            usage |= CharsetUsage::LEFT_OF_CELL;
        }
        if byte & 0x01 != 0 {
            usage |= CharsetUsage::RIGHT_OF_CELL;
        }
    }

    let fingerprint = fingerprint(charset);
    let raw_fingerprint = md5_hex(charset.as_bytes());
    let cell_fingerprint = md5_hex(charset.visible(false).as_bytes());
    log::debug!("Raw MD5: {}, 5x7 MD5: {}", raw_fingerprint, cell_fingerprint);

    CharsetAnalysis {
        name: lookup_charset(&fingerprint),
        fingerprint,
        raw_fingerprint,
        cell_fingerprint,
        usage,
    }
}
