use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgGroup, Parser, ValueEnum};

use ai_watermark_stamp::{
    batch, Opacity, SizePreset, SizeSpec, StampOptions, StampResult, WatermarkEngine,
    DEFAULT_ASSET_PATH,
};

#[derive(Parser)]
#[command(
    name = "ai-watermark",
    about = "Stamp the Doubao AI watermark onto photos",
    version,
    group(ArgGroup::new("input").required(true).args(["file", "dir"])),
    after_help = "Outputs are written as <name>_watermarked.<ext> (quality-90 JPEG),\n\
                  beside each source unless --output is given. Originals are never modified."
)]
struct Cli {
    /// Single image file to stamp
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Directory of images to stamp (non-recursive)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Output file (with --file) or output directory (with --dir)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Watermark opacity, 30-100
    #[arg(short = 'p', long, default_value_t = 70)]
    opacity: u8,

    /// Watermark size policy
    #[arg(short, long, value_enum, default_value_t = SizeArg::Auto)]
    size: SizeArg,

    /// Path to the watermark asset image
    #[arg(short, long, default_value = DEFAULT_ASSET_PATH)]
    watermark: PathBuf,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    Auto,
    Small,
    Medium,
    Large,
}

impl From<SizeArg> for SizeSpec {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Auto => SizeSpec::Auto,
            SizeArg::Small => SizeSpec::Named(SizePreset::Small),
            SizeArg::Medium => SizeSpec::Named(SizePreset::Medium),
            SizeArg::Large => SizeSpec::Named(SizePreset::Large),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let opacity = match Opacity::new(cli.opacity) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    let opts = StampOptions::new(cli.size.into(), opacity);

    let engine = match WatermarkEngine::from_path(&cli.watermark) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Fatal: {e}");
            process::exit(1);
        }
    };

    if let Some(file) = &cli.file {
        if !file.exists() {
            eprintln!("Error: input file not found: {}", file.display());
            process::exit(1);
        }
        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| batch::watermarked_output_path(file, None));

        if !cli.quiet {
            eprintln!(
                "Stamping {} (opacity {}%, size {:?})",
                file.display(),
                opacity.get(),
                cli.size
            );
        }
        match engine.stamp_file(file, &output, &opts) {
            Ok(path) => {
                if !cli.quiet {
                    eprintln!("[OK] {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("[FAIL] {e}");
                process::exit(1);
            }
        }
        return;
    }

    // --dir path: batch run. Per-file failures are reported but do not fail
    // the process; only setup errors do.
    let dir = cli.dir.as_deref().unwrap_or(Path::new("."));
    let outcome = match batch::run_directory(&engine, dir, cli.output.as_deref(), &opts) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if outcome.results.is_empty() && !cli.quiet {
        eprintln!("No supported images found in {}", dir.display());
    }
    for result in &outcome.results {
        print_result(result, cli.quiet);
    }
    if !cli.quiet && !outcome.results.is_empty() {
        eprintln!(
            "[Summary] Stamped: {}, Failed: {} (Total: {})",
            outcome.succeeded(),
            outcome.failed(),
            outcome.results.len()
        );
    }
}

fn print_result(result: &StampResult, quiet: bool) {
    let filename = result.input.file_name().map_or_else(
        || result.input.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        if !quiet {
            let out = result
                .output
                .as_ref()
                .map_or_else(String::new, |p| format!(" -> {}", p.display()));
            eprintln!("[OK] {filename}{out}");
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }
}
