//! HerCode CLI

use clap::{Parser, Subcommand};
use hercode::interp::{Config, Execution, Interpreter};
use std::path::{Path, PathBuf};
use std::sync::Once;

/// Source files must carry this extension
const SOURCE_EXTENSION: &str = "hc";

#[derive(Parser)]
#[command(name = "hercode", version, about = "HerCode - a tiny line-oriented scripting language")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a HerCode program
    Run {
        /// Source file to run
        file: PathBuf,
        /// Dump the registered functions before running
        #[arg(long)]
        debug: bool,
        /// Maximum nested function calls
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
    },
    /// Parse and dump the program (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
        /// Print the syntax tree as JSON
        #[arg(long)]
        json: bool,
    },
}

static TRACING_INIT: Once = Once::new();

/// Install a subscriber when RUST_LOG is set
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run {
            file,
            debug,
            max_depth,
        } => run_file(&file, debug, max_depth),
        Command::Parse { file, json } => parse_file(&file, json),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Read a `.hc` source file
fn read_source(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
        return Err(format!("{} is not a .{SOURCE_EXTENSION} file", path.display()).into());
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Returns whether the program ran without reporting an error
fn run_file(path: &Path, debug: bool, max_depth: Option<usize>) -> Result<bool, Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    let filename = path.display().to_string();

    let mut config = Config::default();
    if let Some(limit) = max_depth {
        config.max_call_depth = limit;
    }
    let mut interp = Interpreter::new().with_config(config);

    if let Err(e) = interp.parse(&source) {
        hercode::error::report_error(&filename, &source, &e);
        return Ok(false);
    }

    if debug {
        eprintln!("{}", interp.dump_functions());
    }

    let execution = interp.execute()?;
    report_execution(&execution);
    Ok(execution.is_success())
}

fn report_execution(execution: &Execution) {
    for error in execution.errors() {
        eprintln!("error: {error}");
    }
}

fn parse_file(path: &Path, json: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let source = read_source(path)?;
    let filename = path.display().to_string();

    let program = match hercode::parser::parse(&source) {
        Ok(program) => program,
        Err(e) => {
            hercode::error::report_error(&filename, &source, &e);
            return Ok(false);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&program)?);
    } else {
        print!("{program}");
    }
    Ok(true)
}
