//! エラー型
//!
//! ライブラリとして使う場合の失敗の種類

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 変換処理のエラー
#[derive(Error, Debug)]
pub enum ChargenError {
    /// 入力ROMファイルが存在しない、または読めない
    #[error("Failed to read input file {path:?}: {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 出力ファイル（ROMイメージまたはASCIIアート）に書き込めない
    #[error("Failed to write output file {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 未知のEPROMタイプ
    #[error("Invalid EPROM type: {0} (expected 2716, 2732 or 2764)")]
    InvalidCapacity(String),

    /// 未知のボード種別
    #[error("Invalid board type: {0} (expected oem, unicom or space)")]
    InvalidBoardSelector(String),

    /// 設定ファイルのシリアライズ失敗
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChargenError>;
