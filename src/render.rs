//! キャラクタセットのASCIIアート表示
//!
//! 64文字を8x8のグリッドで、1ドット = 'X' / ' ' で描く。
//! 出力はコンソールと（指定されていれば）テキストファイルの両方に流す。

use crate::charset::{CharsetBlock, CHARS_PER_SET, CHAR_ROWS};
use crate::error::{ChargenError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 1行あたりのグリッド列数
const GRID_COLUMNS: usize = 8;

/// 表示幅
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphWidth {
    /// 5x7の可視範囲のみ（Q5-Q1）
    Visible,
    /// 7x7（Q6-Q0）
    Extended,
}

impl GlyphWidth {
    /// 左端のドットから順に並べたビットマスク
    fn dot_masks(self) -> &'static [u8] {
        match self {
            GlyphWidth::Visible => &[0x20, 0x10, 0x08, 0x04, 0x02],
            GlyphWidth::Extended => &[0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01],
        }
    }

    pub fn dots(self) -> usize {
        self.dot_masks().len()
    }

    /// 区切り線（グリッド幅に合わせる）
    pub fn border(self) -> String {
        "-".repeat((self.dots() + 1) * GRID_COLUMNS)
    }
}

/// 1バイト（1ドット行）を文字列にする
pub fn byte_to_string(x: u8, width: GlyphWidth) -> String {
    width
        .dot_masks()
        .iter()
        .map(|&mask| if x & mask != 0 { 'X' } else { ' ' })
        .collect()
}

/// キャラクタセット全体をASCIIアートの行にする
pub fn render_charset(charset: &CharsetBlock, width: GlyphWidth) -> Vec<String> {
    let grid_rows = CHARS_PER_SET / GRID_COLUMNS;
    let mut lines = Vec::with_capacity(1 + grid_rows * (CHAR_ROWS + 1));
    lines.push(width.border());
    for grid_row in 0..grid_rows {
        for row in 0..CHAR_ROWS {
            let mut line = String::with_capacity((width.dots() + 1) * GRID_COLUMNS);
            for col in 0..GRID_COLUMNS {
                let index = grid_row * GRID_COLUMNS + col;
                line.push_str(&byte_to_string(charset.glyph_row(index, row), width));
                line.push('|');
            }
            lines.push(line);
        }
        lines.push(width.border());
    }
    lines
}

/// テキスト出力先（コンソール + 任意のテキストファイル）
pub struct TextSink {
    /// trueならコンソールには出さない
    silent: bool,
    file: Option<(PathBuf, BufWriter<File>)>,
}

impl TextSink {
    /// コンソールのみ
    pub fn console(silent: bool) -> Self {
        TextSink { silent, file: None }
    }

    /// コンソール + テキストファイル
    pub fn with_file<P: AsRef<Path>>(silent: bool, path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| ChargenError::OutputWrite {
            path: path.clone(),
            source,
        })?;
        log::info!("Writing ASCII art to {:?}", path);
        Ok(TextSink {
            silent,
            file: Some((path, BufWriter::new(file))),
        })
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    /// 1行出力
    pub fn line(&mut self, text: &str) -> Result<()> {
        if !self.silent {
            println!("{}", text);
        }
        if let Some((path, writer)) = self.file.as_mut() {
            writeln!(writer, "{}", text).map_err(|source| ChargenError::OutputWrite {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn lines<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line.as_ref())?;
        }
        Ok(())
    }

    /// ファイルをフラッシュして閉じる
    pub fn finish(self) -> Result<()> {
        if let Some((path, mut writer)) = self.file {
            writer
                .flush()
                .map_err(|source| ChargenError::OutputWrite { path, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::CHARSET_SIZE;

    #[test]
    fn test_byte_to_string() {
        assert_eq!(byte_to_string(0x00, GlyphWidth::Visible), "     ");
        assert_eq!(byte_to_string(0x3E, GlyphWidth::Visible), "XXXXX");
        // Q6/Q0は5ドット幅では見えない
        assert_eq!(byte_to_string(0x41, GlyphWidth::Visible), "     ");
        assert_eq!(byte_to_string(0x41, GlyphWidth::Extended), "X     X");
        assert_eq!(byte_to_string(0x22, GlyphWidth::Visible), "X   X");
        // Flash Enableは描かない
        assert_eq!(byte_to_string(0x80, GlyphWidth::Extended), "       ");
    }

    #[test]
    fn test_border_width() {
        assert_eq!(GlyphWidth::Visible.border().len(), 48);
        assert_eq!(GlyphWidth::Extended.border().len(), 64);
    }

    #[test]
    fn test_render_layout() {
        let lines = render_charset(&CharsetBlock::filled(0), GlyphWidth::Visible);
        // 上枠 + 8段 x (8行 + 区切り)
        assert_eq!(lines.len(), 1 + 8 * 9);
        assert_eq!(lines[0], GlyphWidth::Visible.border());
        assert_eq!(lines[1], "     |".repeat(8));
        assert_eq!(lines[9], GlyphWidth::Visible.border());
        for line in &lines {
            assert_eq!(line.len(), 48);
        }
    }

    #[test]
    fn test_render_interleave() {
        // 文字9（2段目の2列目）の行2だけを塗る
        let mut data = [0u8; CHARSET_SIZE];
        data[64 + 2 + 8] = 0x7F;
        let lines = render_charset(&CharsetBlock::new(data), GlyphWidth::Extended);
        // 2段目の先頭行はインデックス 1 + 9 = 10、その行2は12
        let expected = format!("{}|{}|{}", " ".repeat(7), "X".repeat(7), "       |".repeat(6));
        assert_eq!(lines[12], expected);
        for (i, line) in lines.iter().enumerate() {
            if i != 12 && !line.starts_with('-') {
                assert!(!line.contains('X'), "unexpected dot in line {}", i);
            }
        }
    }

    #[test]
    fn test_sink_writes_file() {
        let path = std::env::temp_dir().join(format!("a2chargen_sink_{}.txt", std::process::id()));
        let mut sink = TextSink::with_file(true, &path).unwrap();
        assert!(sink.has_file());
        sink.line("first").unwrap();
        sink.lines(["second", "third"]).unwrap();
        sink.finish().unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "first\nsecond\nthird\n");
        let _ = std::fs::remove_file(&path);
    }
}
