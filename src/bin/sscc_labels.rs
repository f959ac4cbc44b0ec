//! Generate SSCC labels from a delimited input file.
//!
//! Reads one `code[,pallet[,item]]` record per line and writes one PDF page
//! per valid record. Invalid lines are reported on stderr and skipped.
//!
//! Usage:
//!   sscc_labels <input.csv>
//!
//! Set `SSCC_LABELS_CONFIG` to a JSON file to override page size, output
//! path, line ceiling, symbology and so on. `RUST_LOG` controls verbosity.

use sscc_labels::{generate_labels, LabelConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        let program = args.first().map(String::as_str).unwrap_or("sscc_labels");
        eprintln!("Usage: {} <input.csv>", program);
        std::process::exit(1);
    }

    let config = match LabelConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    };

    match generate_labels(&config, &args[1]) {
        Ok(summary) => {
            for (kind, count) in summary.batch.rejections_by_kind() {
                log::info!("  {}: {}", kind, count);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        },
    }
}
