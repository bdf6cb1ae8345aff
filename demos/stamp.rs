//! Stamp the watermark onto a single image.
//!
//! Usage:
//! ```sh
//! cargo run --example stamp -- input.jpg output.jpg
//! ```

use std::env;
use std::path::Path;
use std::process;

use ai_watermark_stamp::{StampOptions, WatermarkEngine, DEFAULT_ASSET_PATH};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output>", args[0]);
        process::exit(1);
    }

    let engine = match WatermarkEngine::from_path(Path::new(DEFAULT_ASSET_PATH)) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Fatal: {e}");
            process::exit(1);
        }
    };

    match engine.stamp_file(args[1].as_ref(), args[2].as_ref(), &StampOptions::default()) {
        Ok(path) => println!("Done: {}", path.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
