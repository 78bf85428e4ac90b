//! Canno - a small spreadsheet you drive from the command line

use std::env;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use canno::config::load_config;
use canno::repl::{self, Outcome, Session};

fn print_usage() {
    eprintln!("Usage: canno [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <EXPR>      Evaluate one formula and print the result");
    eprintln!("  -e, --exec <CMD>          Run a sheet command (can be repeated)");
    eprintln!("  --config <FILE>           Load settings from a TOML file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Without -c or -e an interactive prompt is started; type 'help' there.");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut command: Option<String> = None;
    let mut exec: Vec<String> = Vec::new();
    let mut config_file: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires an expression");
                    std::process::exit(1);
                }
                command = Some(args[i].to_string());
            }
            "-e" | "--exec" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --exec requires a command");
                    std::process::exit(1);
                }
                exec.push(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            arg => {
                eprintln!("Error: Unexpected argument: {}", arg);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let (config, warnings) = load_config(config_file.as_deref());
    canno::init_logging(&config.log);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Some(expr) = command {
        match repl::evaluate_expression(&expr) {
            Ok(value) => {
                println!("{}", value);
                if repl::is_failure(&value) {
                    std::process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut session = Session::new(config.echo_formulas);
    let result = if exec.is_empty() {
        let stdin = io::stdin();
        repl::run(&mut session, stdin.lock(), &mut io::stdout(), &config.prompt)
            .context("interactive session failed")
    } else {
        run_exec(&mut session, &exec)
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_exec(session: &mut Session, commands: &[String]) -> anyhow::Result<()> {
    let mut out = io::stdout();
    for line in commands {
        let outcome = session
            .run_line(line, &mut out)
            .with_context(|| format!("failed to run '{}'", line))?;
        if outcome == Outcome::Quit {
            break;
        }
    }
    Ok(())
}
