//! `formulate` command-line translator.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use formulate::{
    Dialect, FormulateConfig, LogTracer, PowerStyle, Tracer, output, registry,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Translate a formula between ROOT, TTreeFormula, numexpr and Python.
#[derive(Parser, Debug)]
#[command(name = "formulate", version, about)]
struct Cli {
    /// Dialect of the input: root, numexpr or ttreeformula.
    #[arg(long, short, value_parser = parse_dialect, default_value = "root")]
    from: Dialect,

    /// Dialect of the output: root, numexpr, ttreeformula or python.
    #[arg(long, short, value_parser = parse_dialect, default_value = "numexpr")]
    to: Dialect,

    /// What to print.
    #[arg(long, value_enum, default_value_t = Emit::Expr)]
    emit: Emit,

    /// How ROOT output spells powers (overrides the config file).
    #[arg(long, value_enum)]
    power: Option<PowerStyle>,

    /// Keep source parentheses as explicit groups.
    #[arg(long)]
    keep_groups: bool,

    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// The formula to translate.
    expr: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Emit {
    /// Formula text in the target dialect.
    Expr,
    /// Canonical AST, e.g. `Add(Literal(1), Symbol(x))`.
    Ast,
    /// AST as JSON.
    Json,
    /// Sorted free variable names, one per line.
    FreeVars,
}

fn parse_dialect(name: &str) -> Result<Dialect, String> {
    Dialect::from_name(name).ok_or_else(|| format!("unknown dialect `{name}`"))
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<String> {
    let mut config = match &cli.config {
        Some(path) => FormulateConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FormulateConfig::default(),
    };
    if let Some(power) = cli.power {
        config.render.power = power;
    }
    if cli.keep_groups {
        config.lower.keep_groups = true;
    }

    let Some(reader) = registry::reader_for(cli.from) else {
        bail!("{} cannot be read, only written", cli.from);
    };

    let log_tracer = LogTracer;
    let tracer: Option<&dyn Tracer> = (cli.verbose >= 2).then_some(&log_tracer as &dyn Tracer);

    let expr = reader
        .read_with(&cli.expr, &config.lower, tracer)
        .with_context(|| format!("reading {}", cli.from))?;
    tracing::debug!(ast = %expr, "lowered");

    Ok(match cli.emit {
        Emit::Expr => output::render(&expr, cli.to, &config.render, tracer)
            .with_context(|| format!("writing {}", cli.to))?,
        Emit::Ast => expr.to_string(),
        Emit::Json => serde_json::to_string_pretty(&expr)?,
        Emit::FreeVars => expr
            .free_variables()
            .into_iter()
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
