//! Command-line interface for sketch_judge
//!
//! Scores a drawing image against a template image and prints the
//! breakdown as JSON. Set `RUST_LOG=sketch_judge=debug` for pipeline logs.

use sketch_judge::{evaluate_image_pair, EvaluatorConfig, ScoreBreakdown};
use std::{env, path::Path, process};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut strict = false;
    let mut paths = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    process::exit(1);
                }
                config_path = Some(args[i + 1].clone());
                i += 1;
            }
            "--strict" => strict = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => paths.push(arg.to_string()),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    if paths.len() != 2 {
        print_help(&args[0]);
        process::exit(1);
    }

    let config = match config_path {
        Some(path) => match EvaluatorConfig::from_json_file(Path::new(&path)) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Failed to load config: {}", error);
                process::exit(1);
            }
        },
        None if strict => EvaluatorConfig::strict_silhouette(),
        None => EvaluatorConfig::default(),
    };

    match evaluate_image_pair(Path::new(&paths[0]), Path::new(&paths[1]), &config) {
        Ok(result) => print_result(&result),
        Err(error) => {
            eprintln!("Evaluation failed: {}", error);
            eprintln!("Suggestion: {}", error.user_message());
            process::exit(1);
        }
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <template_image> <drawing_image>", program_name);
    eprintln!();
    eprintln!("Score how closely a drawing reproduces a template shape.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE    Load evaluator parameters from a JSON file");
    eprintln!("  --strict         Use the filled-silhouette Hu-distance preset");
    eprintln!("  --help, -h       Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} star.png attempt.png", program_name);
    eprintln!("  {} --config judge.json star.png attempt.png", program_name);
}

fn print_result(result: &ScoreBreakdown) {
    match serde_json::to_string_pretty(result) {
        Ok(json) => println!("{}", json),
        Err(error) => {
            eprintln!("Failed to serialize result: {}", error);
            process::exit(1);
        }
    }
    eprintln!();
    eprintln!("Score: {}%", result.score_percent());
    eprintln!(
        "Corners: drawing {} / template {}",
        result.user_corners, result.template_corners
    );
}
