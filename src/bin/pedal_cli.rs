use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pedal_trainer::config::AppConfig;
use pedal_trainer::error::log_config_error;
use pedal_trainer::fixtures::{ExpectationDiff, FixtureCatalog, ReplayReport, TraceFixture};

#[derive(Parser, Debug)]
#[command(
    name = "pedal_cli",
    about = "Deterministic brake-trace replay harness for Pedal Trainer"
)]
struct Cli {
    /// Override directory containing fixture traces (defaults to ./fixtures)
    #[arg(long)]
    fixtures_dir: Option<PathBuf>,
    /// App config JSON supplying the streak goal (defaults are used if absent)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log engine decisions to stderr
    #[arg(long, short)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Grade every rep in a fixture and optionally compare against expectations
    Grade {
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        expect: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Stream one JSON rep event per line for a fixture
    Stream {
        #[arg(long)]
        fixture: String,
    },
    /// List available fixtures on disk
    DumpFixtures,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    pedal_trainer::init_logging(cli.verbose);

    let app_config = cli
        .config
        .map(AppConfig::load_from_file)
        .unwrap_or_default();
    let catalog = cli
        .fixtures_dir
        .map(FixtureCatalog::new)
        .unwrap_or_else(FixtureCatalog::default);

    match cli.command {
        Commands::Grade {
            fixture,
            expect,
            output,
        } => run_grade(&catalog, &app_config, &fixture, expect, output),
        Commands::Stream { fixture } => run_stream(&catalog, &app_config, &fixture),
        Commands::DumpFixtures => run_dump(&catalog),
    }
}

fn replay(fixture: &TraceFixture, app_config: &AppConfig) -> Result<ReplayReport> {
    fixture.replay(app_config.streak_goal).map_err(|err| {
        log_config_error(&err, "pedal_cli::replay");
        err
    })
    .with_context(|| format!("replaying fixture {}", fixture.metadata.name))
}

fn run_grade(
    catalog: &FixtureCatalog,
    app_config: &AppConfig,
    fixture: &str,
    override_expect: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let data = catalog.load(fixture, override_expect)?;
    let report = replay(&data, app_config)?;

    emit_report(&report, output_path)?;

    if let Some(expectations) = &data.expectations {
        match expectations.verify(&report.events()) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        }
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_stream(catalog: &FixtureCatalog, app_config: &AppConfig, fixture: &str) -> Result<ExitCode> {
    let data = catalog.load(fixture, None)?;
    let report = replay(&data, app_config)?;

    for rep in &report.reps {
        println!("{}", serde_json::to_string(rep)?);
    }

    Ok(ExitCode::from(0))
}

fn run_dump(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let fixtures = catalog.discover()?;
    if fixtures.is_empty() {
        println!("No fixtures found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in fixtures {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_report(report: &ReplayReport, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}
