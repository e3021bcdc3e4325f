//! Generate an evaluator configuration file
//!
//! Writes the default parameters, or the strict silhouette preset, as JSON

use sketch_judge::EvaluatorConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json> [--strict]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} config/judge.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);
    let strict = args.iter().skip(2).any(|arg| arg == "--strict");

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = if strict {
        EvaluatorConfig::strict_silhouette()
    } else {
        EvaluatorConfig::default()
    };

    match config.to_json_file(output_path) {
        Ok(_) => {
            let n = &config.normalization;
            let s = &config.scoring;
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!(
                "  Normalization: {}px canonical, {:?}, margin {:.0}% (min {}px)",
                n.canonical_size,
                n.edge_mode,
                n.margin_ratio * 100.0,
                n.min_margin_px
            );
            eprintln!(
                "  Gate: brush length >= {:.0}, dilation radius {}px",
                s.minimum_brush_length, s.dilation_radius
            );
            eprintln!(
                "  Weights: structure {:.2}, detail {:.2} (coverage {:.2}, chamfer {:.2})",
                s.structure_weight, s.detail_weight, s.coverage_weight, s.chamfer_weight
            );
            eprintln!(
                "  Structure: {:?}, decay {:.2}; corner penalty {}",
                s.structure_metric,
                s.structure_decay_constant,
                if s.enable_corner_penalty { "on" } else { "off" }
            );
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
