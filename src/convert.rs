//! 文字ROM変換パイプライン
//!
//! 読み込み -> 分割 -> 正規化 -> (Flash Enable処理) -> 解析/表示 -> 逆変換 -> EPROMイメージ -> 書き込み

use crate::analyzer::{analyze, CharsetAnalysis};
use crate::charset::{apply_alternating_flash, split_rom, CharsetBlock};
use crate::eprom::{build_image, EpromType};
use crate::error::{ChargenError, Result};
use crate::render::{render_charset, TextSink};
use crate::wiring::Board;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// ASCIIアートファイルの拡張子（入力ファイル名の後ろに付ける）
pub const ASCII_ART_SUFFIX: &str = ".txt";

/// 変換オプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub infile: PathBuf,
    pub outfile: PathBuf,
    pub eprom: EpromType,
    /// 入力ROMのボード
    pub in_board: Board,
    /// 出力ROMのボード
    pub out_board: Board,
    /// 診断メッセージを表示
    pub print_info: bool,
    /// ASCIIアートを表示・保存
    pub print_ascii: bool,
    /// ROMファイルを書き出す
    pub write_rom: bool,
    /// 1セットおきにFlash Enableを立てる
    pub alternate_flash: bool,
}

/// 実行結果
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// 入力ファイルのバイト数
    pub input_len: usize,
    /// 正規化済みキャラクタセット
    pub charsets: Vec<CharsetBlock>,
    /// 解析結果（表示を要求したときのみ）
    pub analyses: Vec<CharsetAnalysis>,
    /// 書き出したバイト数
    pub bytes_written: Option<usize>,
}

/// ASCIIアートの出力先（入力ファイル名 + ".txt"）
pub fn ascii_art_path(infile: &Path) -> PathBuf {
    let mut name = infile.as_os_str().to_owned();
    name.push(ASCII_ART_SUFFIX);
    PathBuf::from(name)
}

/// ROMイメージを分割して正規化（必要ならFlash Enable処理も）
pub fn normalize_rom(rom: &[u8], in_board: Board, alternate_flash: bool) -> Vec<CharsetBlock> {
    let charsets = split_rom(rom);
    let normalized = in_board.matrix().normalize_charsets(&charsets);
    if alternate_flash {
        apply_alternating_flash(&normalized)
    } else {
        normalized
    }
}

/// 正規化済みキャラクタセットを出力ボードの配線に戻してEPROMイメージにする
pub fn encode_image(normalized: &[CharsetBlock], out_board: Board, eprom: EpromType) -> Vec<u8> {
    let encoded = out_board.matrix().invert().normalize_charsets(normalized);
    build_image(&encoded, eprom.capacity())
}

/// バイト列どうしの変換
pub fn convert_rom(
    rom: &[u8],
    in_board: Board,
    out_board: Board,
    eprom: EpromType,
    alternate_flash: bool,
) -> Vec<u8> {
    let normalized = normalize_rom(rom, in_board, alternate_flash);
    encode_image(&normalized, out_board, eprom)
}

/// キャラクタセットごとの診断メッセージとASCIIアートを出力
///
/// ASCIIアートの幅は解析結果で決まるので、アートだけ要求されても解析は行う。
pub fn report_charsets(
    charsets: &[CharsetBlock],
    print_info: bool,
    print_ascii: bool,
    sink: &mut TextSink,
) -> Result<Vec<CharsetAnalysis>> {
    let mut analyses = Vec::new();
    if !print_info && !print_ascii {
        return Ok(analyses);
    }

    if print_info {
        println!();
    }
    for (index, charset) in charsets.iter().enumerate() {
        if print_info {
            println!("Charset {} Info:", index);
        }
        let analysis = analyze(charset);
        sink.lines(analysis.lines())?;
        if print_ascii {
            sink.lines(render_charset(charset, analysis.glyph_width()))?;
        }
        if print_info {
            println!();
        }
        analyses.push(analysis);
    }
    Ok(analyses)
}

/// ファイルを読み込んで変換し、書き出す
pub fn run(options: &Options) -> Result<RunSummary> {
    let rom = fs::read(&options.infile).map_err(|source| ChargenError::InputRead {
        path: options.infile.clone(),
        source,
    })?;
    println!("Read file: {}", options.infile.display());
    println!("Filesize: {} bytes", rom.len());

    let charsets = normalize_rom(&rom, options.in_board, options.alternate_flash);
    println!("The file contains {} charsets", charsets.len());
    log::info!(
        "Normalized {} charsets from {} board wiring",
        charsets.len(),
        options.in_board
    );

    let mut sink = if options.print_ascii {
        TextSink::with_file(!options.print_info, ascii_art_path(&options.infile))?
    } else {
        TextSink::console(!options.print_info)
    };
    let analyses = report_charsets(&charsets, options.print_info, options.print_ascii, &mut sink)?;
    sink.finish()?;

    let bytes_written = if options.write_rom {
        let image = encode_image(&charsets, options.out_board, options.eprom);
        println!("Write file:{}", options.outfile.display());
        write_image(&options.outfile, &image)?;
        println!("{}bytes filesize.", image.len());
        log::info!(
            "Wrote {} bytes for {} board ({} EPROM)",
            image.len(),
            options.out_board,
            options.eprom
        );
        Some(image.len())
    } else {
        None
    };

    Ok(RunSummary {
        input_len: rom.len(),
        charsets,
        analyses,
        bytes_written,
    })
}

fn write_image(path: &Path, image: &[u8]) -> Result<()> {
    let to_error = |source: std::io::Error| ChargenError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(to_error)?;
    file.write_all(image).map_err(to_error)?;
    file.flush().map_err(to_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::{CHARSET_SIZE, FLASH_BIT};
    use crate::wiring::{MATRIX_OEM, MATRIX_UNICOM};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_rom(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut rom = vec![0u8; len];
        rng.fill(&mut rom[..]);
        rom
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("a2chargen_{}_{}.bin", name, std::process::id()))
    }

    fn options(infile: PathBuf, outfile: PathBuf) -> Options {
        Options {
            infile,
            outfile,
            eprom: EpromType::E2716,
            in_board: Board::Oem,
            out_board: Board::Oem,
            print_info: false,
            print_ascii: false,
            write_rom: true,
            alternate_flash: false,
        }
    }

    #[test]
    fn test_all_zero_oem_to_oem() {
        let out = convert_rom(&[0u8; 2048], Board::Oem, Board::Oem, EpromType::E2716, false);
        assert_eq!(out.len(), 2048);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_oem_to_unicom() {
        let rom = random_rom(2048, 1);
        let out = convert_rom(&rom, Board::Oem, Board::Unicom, EpromType::E2716, false);
        assert_eq!(out.len(), 2048);
        let inv = MATRIX_UNICOM.invert();
        for (&x, &y) in rom.iter().zip(out.iter()) {
            assert_eq!(y, inv.normalize_byte(MATRIX_OEM.normalize_byte(x)));
        }
    }

    #[test]
    fn test_oem_to_unicom_2732() {
        let rom = random_rom(2048, 2);
        let single = convert_rom(&rom, Board::Oem, Board::Unicom, EpromType::E2716, false);
        let out = convert_rom(&rom, Board::Oem, Board::Unicom, EpromType::E2732, false);
        assert_eq!(out.len(), 4096);
        assert_eq!(out[..2048], single[..]);
        assert_eq!(out[2048..], single[..]);
    }

    #[test]
    fn test_alternating_flash_three_sets() {
        let rom = random_rom(CHARSET_SIZE * 3, 3);
        let plain = normalize_rom(&rom, Board::Oem, false);
        let flashed = normalize_rom(&rom, Board::Oem, true);
        assert_eq!(flashed.len(), 3);
        for (i, (p, f)) in plain.iter().zip(flashed.iter()).enumerate() {
            for (&pb, &fb) in p.as_bytes().iter().zip(f.as_bytes()) {
                assert_eq!(fb & !FLASH_BIT, pb & !FLASH_BIT);
                assert_eq!(fb & FLASH_BIT != 0, i == 1);
            }
        }

        let image = convert_rom(&rom, Board::Oem, Board::Oem, EpromType::E2716, true);
        assert!(image[..CHARSET_SIZE].iter().all(|&b| b & FLASH_BIT == 0));
        assert!(image[CHARSET_SIZE..CHARSET_SIZE * 2].iter().all(|&b| b & FLASH_BIT != 0));
        assert!(image[CHARSET_SIZE * 2..CHARSET_SIZE * 3].iter().all(|&b| b & FLASH_BIT == 0));
    }

    #[test]
    fn test_unicom_round_trip_drops_line_zero() {
        // Unicomの物理Q0はどの正規化ビットにも対応しない
        let rom = random_rom(2048, 4);
        let out = convert_rom(&rom, Board::Unicom, Board::Unicom, EpromType::E2716, false);
        for (&x, &y) in rom.iter().zip(out.iter()) {
            assert_eq!(y, x & 0xFE);
        }
    }

    #[test]
    fn test_space81_round_trip() {
        let rom = random_rom(2048, 5);
        let to_oem = convert_rom(&rom, Board::Space81, Board::Oem, EpromType::E2716, false);
        let back = convert_rom(&to_oem, Board::Oem, Board::Space81, EpromType::E2716, false);
        assert_eq!(back, rom);
    }

    #[test]
    fn test_ascii_art_path() {
        assert_eq!(
            ascii_art_path(Path::new("roms/chargen.bin")),
            PathBuf::from("roms/chargen.bin.txt")
        );
    }

    #[test]
    fn test_run_writes_rom() {
        let infile = temp_path("run_in");
        let outfile = temp_path("run_out");
        let rom = random_rom(CHARSET_SIZE * 4 + 10, 6);
        fs::write(&infile, &rom).unwrap();

        let mut opts = options(infile.clone(), outfile.clone());
        opts.out_board = Board::Space81;
        opts.eprom = EpromType::E2764;
        let summary = run(&opts).unwrap();
        assert_eq!(summary.input_len, rom.len());
        assert_eq!(summary.charsets.len(), 4);
        assert!(summary.analyses.is_empty());
        assert_eq!(summary.bytes_written, Some(8192));

        let written = fs::read(&outfile).unwrap();
        assert_eq!(
            written,
            convert_rom(&rom, Board::Oem, Board::Space81, EpromType::E2764, false)
        );
        let _ = fs::remove_file(&infile);
        let _ = fs::remove_file(&outfile);
    }

    #[test]
    fn test_run_ascii_art_without_rom() {
        let infile = temp_path("art_in");
        let outfile = temp_path("art_out");
        let mut rom = vec![0u8; CHARSET_SIZE * 2];
        // 2つ目のセットは5x7の右外側を使う
        rom[CHARSET_SIZE + 5] = 0x01;
        fs::write(&infile, &rom).unwrap();

        let mut opts = options(infile.clone(), outfile.clone());
        opts.print_ascii = true;
        opts.write_rom = false;
        let summary = run(&opts).unwrap();
        assert_eq!(summary.bytes_written, None);
        assert!(!outfile.exists());
        assert_eq!(summary.analyses.len(), 2);

        let art_path = ascii_art_path(&infile);
        let text = fs::read_to_string(&art_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // 解析3行 + 枠付きアート73行、2つ目は右外側の1行が増える
        assert_eq!(lines.len(), (3 + 73) + (4 + 73));
        assert_eq!(lines[2], "The Flash Enable Bit is not used in the Charset.");
        assert_eq!(lines[3].len(), 48);
        assert_eq!(lines[76 + 3], "It uses pixels to the right of the regular 5x7 Matrix");
        assert_eq!(lines[76 + 4].len(), 64);

        let _ = fs::remove_file(&infile);
        let _ = fs::remove_file(&art_path);
    }

    #[test]
    fn test_run_missing_input() {
        let opts = options(temp_path("does_not_exist"), temp_path("never_written"));
        assert!(matches!(run(&opts), Err(ChargenError::InputRead { .. })));
        assert!(!opts.outfile.exists());
    }

    #[test]
    fn test_run_unwritable_output() {
        let infile = temp_path("unwritable_in");
        fs::write(&infile, [0u8; CHARSET_SIZE]).unwrap();
        let outfile = std::env::temp_dir()
            .join(format!("a2chargen_no_such_dir_{}", std::process::id()))
            .join("out.bin");
        let opts = options(infile.clone(), outfile);
        assert!(matches!(run(&opts), Err(ChargenError::OutputWrite { .. })));
        let _ = fs::remove_file(&infile);
    }
}
