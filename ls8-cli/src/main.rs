//! LS-8 CLI: load, inspect and run LS-8 programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, input or load error
//! - 2: Runtime error
//!
//! Log output goes to stderr and is controlled by `LS8_LOG`
//! (e.g. `LS8_LOG=ls8_vm=trace`), defaulting to `warn`.

mod commands;

use std::process;

use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "check" => commands::check(&args[2..]),
        "dump" => commands::dump(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("LS8_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    eprintln!("Usage: ls8 <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <prog.ls8> [--trace] [--max-steps N]  Load and execute a program");
    eprintln!("  check <prog.ls8>                          Load a program without running it");
    eprintln!("  dump <prog.ls8>                           Print the loaded bytes with mnemonics");
}
