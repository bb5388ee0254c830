//! smartball CLI - headless runner for the smart-ball demo.
//!
//! Runs a fixed number of episodes without a renderer and prints the
//! per-episode reports plus a final tally.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use smartball::prelude::*;

struct Args {
    config_path: Option<String>,
    episodes: usize,
    seed: Option<u64>,
    learn_after: Option<usize>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config_path: None,
        episodes: 50,
        seed: None,
        learn_after: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--episodes" | "-n" => {
                let value = iter.next().ok_or("--episodes requires a value")?;
                args.episodes = value
                    .parse()
                    .map_err(|_| format!("invalid episode count: {value}"))?;
            }
            "--seed" | "-s" => {
                let value = iter.next().ok_or("--seed requires a value")?;
                args.seed = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid seed: {value}"))?,
                );
            }
            "--learn-after" => {
                let value = iter.next().ok_or("--learn-after requires a value")?;
                args.learn_after = Some(
                    value
                        .parse()
                        .map_err(|_| format!("invalid episode count: {value}"))?,
                );
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            path if !path.starts_with('-') => args.config_path = Some(path.to_string()),
            other => return Err(format!("unknown option: {other}")),
        }
    }
    Ok(args)
}

fn print_usage() {
    println!("smartball v{}", env!("CARGO_PKG_VERSION"));
    println!("Adaptive jump-parameter learning demo");
    println!();
    println!("Usage: smartball [config.yaml] [options]");
    println!();
    println!("Options:");
    println!("  -n, --episodes <N>     Episodes to run (default 50)");
    println!("  -s, --seed <SEED>      Override the configured seed");
    println!("      --learn-after <N>  Engage learning mode after N episodes");
    println!("  -h, --help             Show this help");
}

fn run(args: &Args) -> BallResult<()> {
    let mut config = match &args.config_path {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut demo = SmartBallDemo::new(config)?;

    let exploration = args
        .learn_after
        .unwrap_or(args.episodes)
        .min(args.episodes);

    for report in demo.run_episodes(exploration)? {
        println!("{report}");
    }
    if exploration < args.episodes {
        demo.on_toggle_learning();
        for report in demo.run_episodes(args.episodes - exploration)? {
            println!("{report}");
        }
    }

    println!();
    println!(
        "fails: {}  successes: {}",
        demo.fail_count(),
        demo.success_count()
    );
    if let Some(error) = demo.last_error() {
        println!("last training error: {error:.6}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
