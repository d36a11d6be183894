// cminusc: C-minus to three-address code

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use cminus::config::Config;
use cminus::error::CompileError;
use cminus::output::write_artifacts;
use cminus::Compiler;

/// Compile a C-minus program to three-address code.
#[derive(Parser)]
#[command(name = "cminusc", version, about = "C-minus front end emitting three-address code")]
struct Cli {
    /// Path to the C-minus source file
    input: PathBuf,

    /// Directory receiving the report and code files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grammar file replacing the built-in one (overrides the config)
    #[arg(long)]
    grammar: Option<PathBuf>,

    /// Also print the generated code to stdout
    #[arg(long)]
    print: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    if verbose > 0 {
        let level = match verbose {
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        builder.filter_level(level);
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Warn);
    }
    builder.init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cli.grammar.is_some() {
        config.grammar = cli.grammar.clone();
    }

    let source = fs::read_to_string(&cli.input).map_err(|source| CompileError::Io {
        path: cli.input.clone(),
        source,
    })?;

    let compiler = Compiler::new(config)?;
    let compilation = compiler.compile(&source);
    write_artifacts(&cli.output, &compilation)?;

    let syntax_errors = compilation.syntax_errors().len();
    if syntax_errors > 0 {
        eprintln!(
            "{}: {} syntax error(s), see {}",
            cli.input.display(),
            syntax_errors,
            cli.output.join(cminus::output::SYNTAX_ERRORS_FILE).display()
        );
    }
    if cli.print {
        print!("{}", compilation.tac_listing());
    }

    Ok(())
}
