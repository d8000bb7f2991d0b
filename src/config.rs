//! 設定ファイル管理モジュール
//!
//! 変換ジョブの設定をJSON形式で保存・読み込み

use crate::convert::Options;
use crate::eprom::EpromType;
use crate::error::{ChargenError, Result};
use crate::wiring::Board;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 設定ファイルのデフォルトファイル名
pub const CONFIG_FILENAME: &str = "chargen_config.json";

/// 変換ジョブの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 入力ROMファイル
    pub infile: String,
    /// 出力ROMファイル
    pub outfile: String,
    /// 出力EPROMタイプ (2716, 2732, 2764)
    pub eprom: String,
    /// 入力ROMのボード (oem, unicom, space)
    pub inmatrix: String,
    /// 出力ROMのボード
    pub outmatrix: String,
    /// ROMの情報を表示
    pub printinfo: bool,
    /// ASCIIアートを追加
    pub printascii: bool,
    /// ROMファイルを書き出さない
    pub nooutfile: bool,
    /// 1セットおきにFlash Enableを立てる（DL6をO7に透過）
    pub dl6: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            infile: "chargen_rom.bin".to_string(),
            outfile: "new_chargen_rom.bin".to_string(),
            eprom: "2716".to_string(),
            inmatrix: "oem".to_string(),
            outmatrix: "oem".to_string(),
            printinfo: false,
            printascii: false,
            nooutfile: false,
            dl6: false,
        }
    }
}

impl Config {
    /// 指定したパスから設定を読み込む
    ///
    /// ファイルがなければデフォルト、壊れていれば警告を出してデフォルト。
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded config {:?}", path.as_ref());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse config {:?}: {}, using defaults", path.as_ref(), e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    /// 設定ファイルを探して読み込む
    /// config_path が指定されていればそれ、なければカレントディレクトリの chargen_config.json
    pub fn load_with_options(config_path: Option<&str>) -> (Self, PathBuf) {
        let path = match config_path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(CONFIG_FILENAME),
        };
        (Self::load_from(&path), path)
    }

    /// 指定したパスに設定を保存する
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ChargenError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, json).map_err(|source| ChargenError::OutputWrite {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// 文字列の選択肢を型付きのオプションに変換
    pub fn to_options(&self) -> Result<Options> {
        Ok(Options {
            infile: PathBuf::from(&self.infile),
            outfile: PathBuf::from(&self.outfile),
            eprom: self.eprom.parse::<EpromType>()?,
            in_board: self.inmatrix.parse::<Board>()?,
            out_board: self.outmatrix.parse::<Board>()?,
            print_info: self.printinfo,
            print_ascii: self.printascii,
            write_rom: !self.nooutfile,
            alternate_flash: self.dl6,
        })
    }
}
