//! A2Chargen - Apple II Character Generator ROM Tool
//!
//! Version 0.1
//!
//! Apple II+ 互換ボード用の文字ROMを解析し、別のボード・EPROM用に変換する。
//!
//! # 使用方法
//! ```text
//! a2chargen -i "APPLE II+ - 7341-0036 - CHARACTER GENERATOR REV7+ - 2716.bin" -p True -n True -a True
//! a2chargen -e 2732 -i chargen.bin -o chargen_unicom.bin -m oem -g unicom
//! ```

use a2chargen::config::Config;
use a2chargen::convert::{self, Options};
use a2chargen::Result;
use clap::Parser;

/// Apple II character generator ROM conversion tool
#[derive(Parser, Debug)]
#[command(name = "a2chargen")]
#[command(author = "A2RS Project")]
#[command(version = "0.1.0")]
#[command(about = "Apple II character generator ROM conversion tool", long_about = None)]
struct Args {
    /// 入力ROMファイル
    #[arg(short, long)]
    infile: Option<String>,

    /// 出力ROMファイル
    #[arg(short, long)]
    outfile: Option<String>,

    /// 出力EPROMタイプ（2732は2716と同じ内容が2回）
    #[arg(short, long, value_parser = ["2716", "2732", "2764"])]
    eprom: Option<String>,

    /// 入力ROMのボード（oem = Apple）
    #[arg(short = 'm', long, value_parser = ["oem", "unicom", "space"])]
    inmatrix: Option<String>,

    /// 出力ROMのボード
    #[arg(short = 'g', long, value_parser = ["oem", "unicom", "space"])]
    outmatrix: Option<String>,

    /// ROMの情報を表示
    #[arg(short, long, value_parser = ["True", "False"])]
    printinfo: Option<String>,

    /// 情報表示にASCIIアートを追加
    #[arg(short = 'a', long, value_parser = ["True", "False"])]
    printascii: Option<String>,

    /// ROMファイルを書き出さない
    #[arg(short, long, value_parser = ["True", "False"])]
    nooutfile: Option<String>,

    /// 1セットおきにFlash Enableを立てる（DL6をO7に透過させる）
    #[arg(short, long, value_parser = ["True", "False"])]
    dl6: Option<String>,

    /// 設定ファイル（JSON）
    #[arg(long)]
    config: Option<String>,

    /// 有効な設定をJSONに保存
    #[arg(long)]
    save_config: Option<String>,
}

fn parse_flag(value: &str) -> bool {
    value == "True"
}

/// コマンドライン引数で設定を上書き
fn apply_args(config: &mut Config, args: &Args) {
    if let Some(v) = &args.infile {
        config.infile = v.clone();
    }
    if let Some(v) = &args.outfile {
        config.outfile = v.clone();
    }
    if let Some(v) = &args.eprom {
        config.eprom = v.clone();
    }
    if let Some(v) = &args.inmatrix {
        config.inmatrix = v.clone();
    }
    if let Some(v) = &args.outmatrix {
        config.outmatrix = v.clone();
    }
    if let Some(v) = &args.printinfo {
        config.printinfo = parse_flag(v);
    }
    if let Some(v) = &args.printascii {
        config.printascii = parse_flag(v);
    }
    if let Some(v) = &args.nooutfile {
        config.nooutfile = parse_flag(v);
    }
    if let Some(v) = &args.dl6 {
        config.dl6 = parse_flag(v);
    }
}

/// 実行内容を表示
fn print_banner(options: &Options) {
    println!("Input File is: {}", options.infile.display());

    if options.alternate_flash {
        println!("Setting the Flashenable for every second charset, so that DL6 is transparent to O7.");
    } else {
        println!("Flashenable remains untouched.");
    }

    if options.write_rom {
        println!("Writing a ROM file to disk.");
        println!("Output File is: {}", options.outfile.display());
    } else {
        println!("Not writing a ROM file to disk.");
    }

    if options.print_ascii {
        println!("ASCII art for the charsets will be added.");
    } else {
        println!("No ASCII art for the charsets will be added.");
    }

    println!("Input ROM image type is {}.", options.in_board);
    if options.write_rom {
        println!("Output ROM image type will be for {}.", options.out_board);
        println!("Output image fits {} eprom.", options.eprom);
        if options.alternate_flash {
            println!("DL6 will be adapted to O7.");
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let (mut config, config_path) = Config::load_with_options(args.config.as_deref());
    log::debug!("Config file: {:?}", config_path);
    apply_args(&mut config, args);

    let options = config.to_options()?;

    if let Some(path) = &args.save_config {
        config.save_to(path)?;
        log::info!("Saved config to {}", path);
    }

    print_banner(&options);
    convert::run(&options)?;
    Ok(())
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
