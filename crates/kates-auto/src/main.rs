mod config;
mod error;
mod executor;
mod host;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kates_core::{parse, Script};

use crate::config::KatesConfig;
use crate::error::AutoError;
use crate::executor::{Outcome, ScriptExecutor};

#[derive(Parser)]
#[command(name = "kates", about = "Runs kates scripts", version)]
struct Cli {
    /// Path to a config file (defaults to ~/.kates/config.json)
    #[arg(long, global = true, env = "KATES_CONFIG")]
    config: Option<PathBuf>,

    /// Write logs to <DIR>/kates.log instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a .kts script
    Run {
        /// Path to the script file (reads stdin if omitted)
        script: Option<PathBuf>,
        /// Bind a variable before the script starts
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_binding)]
        vars: Vec<(String, String)>,
        /// Exit on the first pause instead of resuming
        #[arg(long)]
        no_resume: bool,
    },
    /// Parse a script without running it
    Check {
        /// Path to the script file (reads stdin if omitted)
        script: Option<PathBuf>,
        /// Print the parsed commands as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the functions scripts can call
    Functions,
}

fn parse_binding(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {:?}", s)),
    }
}

fn init_tracing(filter: &str, log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, "kates.log");
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(file_appender)
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = KatesConfig::resolve(cli.config.as_deref()).and_then(|config| {
        init_tracing(config.log_filter(), cli.log_dir.as_deref());
        match cli.command {
            Command::Run {
                script,
                vars,
                no_resume,
            } => run_script(script.as_deref(), vars, !no_resume && config.resume, &config),
            Command::Check { script, json } => check_script(script.as_deref(), json),
            Command::Functions => {
                list_functions();
                Ok(())
            }
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn read_source(path: Option<&Path>) -> Result<String, AutoError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn load_script(path: Option<&Path>) -> Result<Script, AutoError> {
    let source = read_source(path)?;
    Ok(parse(&source)?)
}

fn run_script(
    path: Option<&Path>,
    vars: Vec<(String, String)>,
    resume: bool,
    config: &KatesConfig,
) -> Result<(), AutoError> {
    let script = load_script(path)?;

    let mut executor = ScriptExecutor::new(host::registry(), script, resume);
    executor.bind(config.variables.clone());
    executor.bind(vars);

    match executor.execute()? {
        Outcome::Finished { pauses } => {
            tracing::info!(
                pauses,
                variables = executor.runner().variables().len(),
                "script finished"
            );
        }
        Outcome::Paused { token, next } => {
            tracing::warn!(token = %token, "script paused with resume disabled");
            println!("paused: {} (next command {})", token, next + 1);
        }
    }
    Ok(())
}

fn check_script(path: Option<&Path>, json: bool) -> Result<(), AutoError> {
    let script = load_script(path)?;
    if json {
        let rendered = serde_json::to_string_pretty(&script)?;
        println!("{}", rendered);
    } else {
        println!("ok: {} commands", script.len());
    }
    Ok(())
}

fn list_functions() {
    for name in host::registry().names() {
        println!("{}", name);
    }
}
