use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use clap_stdin::FileOrStdin;
use log::{error, info};

use mjsc::error::Error;
use mjsc::report;
use mjsc::Compilation;

#[derive(Parser)]
#[command(name = "mjsc")]
#[command(about = "Lexer, parser and type checker for a small imperative language", version)]
struct Cli {
    /// Source file, or '-' for stdin
    #[arg(value_name = "FILE", default_value = "-")]
    input: FileOrStdin,

    /// Reports to print on stdout
    #[arg(long, value_enum)]
    emit: Vec<Emit>,

    /// Write every report into this directory
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// More logging, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Token listing
    Tokens,
    /// Indented syntax tree
    Ast,
    /// Syntax tree in Graphviz format
    Dot,
    /// Symbol table dump
    Symbols,
    /// Applied grammar rules
    Parse,
    /// Diagnostics
    Errors,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn render(emit: Emit, compilation: &Compilation) -> String {
    match emit {
        Emit::Tokens => report::render_tokens(&compilation.tokens),
        Emit::Ast => report::render_tree(&compilation.ast),
        Emit::Dot => report::render_dot(&compilation.ast),
        Emit::Symbols => compilation.symbols.to_string(),
        Emit::Parse => report::render_rules(&compilation.rules),
        Emit::Errors => report::render_diagnostics(&compilation.diagnostics),
    }
}

fn run(cli: Cli) -> Result<bool, Error> {
    let source = cli
        .input
        .contents()
        .map_err(|e| Error::Read(e.to_string()))?;

    let compilation = mjsc::compile(&source);

    let emits = if cli.emit.is_empty() {
        vec![Emit::Errors]
    } else {
        cli.emit
    };
    for emit in emits {
        print!("{}", render(emit, &compilation));
    }

    if let Some(dir) = &cli.out_dir {
        report::write_artifacts(dir, &compilation)?;
    }

    info!("{} diagnostics", compilation.diagnostics.len());
    Ok(compilation.has_errors())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}
