//! キャラクタセットブロック
//!
//! 文字ROMは512バイト単位のキャラクタセットの並び。
//! 1セット = 64文字 x 8行。文字 `n` の行 `row` は
//! `(n / 8) * 64 + (n % 8) * 8 + row` に置かれる（文字はブロック内でインターリーブされる）。

/// キャラクタセット1つ分のバイト数
pub const CHARSET_SIZE: usize = 512;

/// 1セットの文字数
pub const CHARS_PER_SET: usize = 64;

/// 1文字の行数
pub const CHAR_ROWS: usize = 8;

/// Flash Enable（Q7）
pub const FLASH_BIT: u8 = 0x80;

/// 5x7の可視ビット（Q1-Q5）
pub const VISIBLE_MASK_5X7: u8 = 0x02 | 0x04 | 0x08 | 0x10 | 0x20;

/// 7x7の可視ビット（Q0-Q6）
pub const VISIBLE_MASK_7X7: u8 = 0x01 | 0x02 | 0x04 | 0x08 | 0x10 | 0x20 | 0x40;

/// キャラクタセット（512バイト）
#[derive(Clone, PartialEq, Eq)]
pub struct CharsetBlock {
    data: [u8; CHARSET_SIZE],
}

impl std::fmt::Debug for CharsetBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CharsetBlock({:02X?}...)", &self.data[..8])
    }
}

impl CharsetBlock {
    pub fn new(data: [u8; CHARSET_SIZE]) -> Self {
        CharsetBlock { data }
    }

    /// 512バイトのスライスからコピーして作る
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let data: [u8; CHARSET_SIZE] = bytes.try_into().ok()?;
        Some(CharsetBlock { data })
    }

    pub fn filled(value: u8) -> Self {
        CharsetBlock { data: [value; CHARSET_SIZE] }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 全バイトに関数を適用した新しいブロック
    pub fn map_bytes<F: Fn(u8) -> u8>(&self, f: F) -> CharsetBlock {
        let mut data = [0u8; CHARSET_SIZE];
        for (dst, &src) in data.iter_mut().zip(self.data.iter()) {
            *dst = f(src);
        }
        CharsetBlock { data }
    }

    /// 文字 `index` (0-63) の行 `row` (0-7)
    #[inline]
    pub fn glyph_row(&self, index: usize, row: usize) -> u8 {
        let grid_row = index / 8;
        let grid_col = index % 8;
        self.data[grid_row * CHARS_PER_SET + row + grid_col * CHAR_ROWS]
    }

    /// 可視ビットだけを残したブロック（指紋計算用、出力ROMには使わない）
    pub fn visible(&self, extended: bool) -> CharsetBlock {
        self.map_bytes(|b| visible_byte(b, extended))
    }

    /// Flash Enableビットを全バイトで一律にセット/クリア
    pub fn with_flash(&self, flash: bool) -> CharsetBlock {
        if flash {
            self.map_bytes(|b| b | FLASH_BIT)
        } else {
            self.map_bytes(|b| b & !FLASH_BIT)
        }
    }
}

/// 可視ビットを取り出す
///
/// extended=false なら5x7（Q1-Q5）、true なら7x7（Q0-Q6）。Flash Enableは常に除く。
#[inline]
pub fn visible_byte(x: u8, extended: bool) -> u8 {
    if extended {
        x & VISIBLE_MASK_7X7
    } else {
        x & VISIBLE_MASK_5X7
    }
}

/// ROMイメージをキャラクタセットに分割
///
/// 512バイトに満たない末尾は捨てる。
pub fn split_rom(rom: &[u8]) -> Vec<CharsetBlock> {
    let remainder = rom.len() % CHARSET_SIZE;
    if remainder != 0 {
        log::warn!("Ignoring {} trailing bytes (not a whole charset)", remainder);
    }
    rom.chunks_exact(CHARSET_SIZE)
        .filter_map(CharsetBlock::from_slice)
        .collect()
}

/// 1セットおきにFlash Enableを立てる
///
/// 偶数番目（0始まり）のセットはクリア、奇数番目はセット。
/// DL6をO7に透過させるためのハードウェア対策。
pub fn apply_alternating_flash(charsets: &[CharsetBlock]) -> Vec<CharsetBlock> {
    charsets
        .iter()
        .enumerate()
        .map(|(i, c)| c.with_flash(i % 2 == 1))
        .collect()
}
