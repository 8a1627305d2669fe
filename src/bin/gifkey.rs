use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "gifkey",
    version,
    about = "Make the background of an animated GIF transparent by keying out a colour."
)]
struct Cli {
    /// Input GIF path.
    input: PathBuf,

    /// Output GIF path.
    output: PathBuf,

    /// Background colour to remove as R,G,B.
    #[arg(long, value_name = "R,G,B", default_value = "255,255,255", value_parser = parse_bg_color)]
    bg_color: [i32; 3],

    /// Per-channel tolerance for colour matching (0 = exact match). Higher values remove near colours.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    tolerance: i32,

    /// Key frames in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = gifkey::logging::LogFormat::Default)]
    log_format: gifkey::logging::LogFormat,
}

fn parse_bg_color(s: &str) -> Result<[i32; 3], gifkey::GifkeyError> {
    gifkey::parse_rgb(s)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = gifkey::logging::init(
        gifkey::logging::level_for_verbosity(cli.verbose),
        cli.log_format,
    ) {
        eprintln!("warning: {e}");
    }

    let opts = gifkey::KeyOpts {
        input: cli.input,
        output: cli.output,
        key: gifkey::ColorKey::new(cli.bg_color, cli.tolerance),
        threading: gifkey::KeyThreading {
            parallel: cli.parallel,
            threads: cli.threads,
        },
    };

    match gifkey::remove_background(&opts) {
        Ok(report) => {
            println!("Saved transparent GIF to: {}", report.output.display());
            ExitCode::SUCCESS
        }
        Err(e @ (gifkey::GifkeyError::InputNotFound(_) | gifkey::GifkeyError::EmptySequence)) => {
            println!("{e}");
            exit_code(&e)
        }
        Err(e) => {
            eprintln!("error: {:#}", anyhow::Error::new(e));
            ExitCode::FAILURE
        }
    }
}

fn exit_code(e: &gifkey::GifkeyError) -> ExitCode {
    ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
}
