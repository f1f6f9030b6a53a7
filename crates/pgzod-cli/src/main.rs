mod atomic;
mod logging;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use pgzod_codegen::{
    FsWriter, GenerationReport, Generator, MemoryWriter, NoopHooks, OutputWriter, TracingProgress,
};
use pgzod_core::{Error as CoreError, GeneratorConfig, describe_connection};
use pgzod_introspect::PostgresConnector;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use logging::{LogFormat, init_logging};
use settings::{ConfigOverrides, DEFAULT_CONFIG_FILE, load_config, write_default_config};

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml serialization error: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "pgzod", version, about = "Generate Zod schemas from a Postgres catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Introspect the database and write one module per relation.
    Generate(GenerateArgs),
    /// Print the JSON Schema of the configuration file.
    ConfigSchema,
    /// Write a configuration file holding the defaults.
    Init(InitArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Configuration file; `pgzod.toml` is used when present.
    #[arg(long, short)]
    config: Option<PathBuf>,
    #[command(flatten)]
    overrides: ConfigOverrides,
    /// Render everything but write nothing.
    #[arg(long)]
    dry_run: bool,
    /// Write a JSON report of the run to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Log at debug level.
    #[arg(long, short)]
    verbose: bool,
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
    /// Append logs to this file instead of stderr.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InitArgs {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    path: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

/// Report file contents: the generation report plus run metadata.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    run_id: &'a str,
    connection: String,
    dry_run: bool,
    duration_ms: u64,
    #[serde(flatten)]
    generation: &'a GenerationReport,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::ConfigSchema => print_config_schema(),
        Command::Init(args) => {
            write_default_config(&args.path, args.force)?;
            println!("wrote {}", args.path.display());
            Ok(())
        }
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        config,
        overrides,
        dry_run,
        report,
        verbose,
        log_format,
        log_file,
    } = args;

    let mut config = load_config(config.as_deref())?;
    overrides.apply(&mut config);
    init_logging(log_format, verbose || config.debug, log_file.as_deref())?;

    let run_id = Uuid::new_v4().to_string();
    let connection = describe_connection(&config.connection);
    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        schema = %config.schema,
        connection = %connection,
        dry_run
    );

    let timer = Instant::now();
    let result = if dry_run {
        let mut writer = MemoryWriter::new();
        let result = generate(&config, &mut writer).await;
        for (file, content) in &writer.files {
            tracing::info!(event = "dry_run_file", file = %file, bytes = content.len());
        }
        result
    } else {
        let mut writer = FsWriter::new(&config.output_dir, config.clean_output);
        generate(&config, &mut writer).await
    };
    let duration_ms = timer.elapsed().as_millis() as u64;

    let generation = match result {
        Ok(generation) => generation,
        Err(err) => {
            tracing::error!(event = "run_finished", status = "failed", error = %err, duration_ms);
            return Err(err.into());
        }
    };

    if let Some(path) = report {
        atomic::write_json_atomic(
            &path,
            &RunReport {
                run_id: &run_id,
                connection,
                dry_run,
                duration_ms,
                generation: &generation,
            },
        )?;
        tracing::info!(event = "report_written", path = %path.display());
    }

    tracing::info!(
        event = "run_finished",
        status = "success",
        tables = generation.tables.len(),
        out_dir = %config.output_dir.display(),
        duration_ms
    );

    Ok(())
}

async fn generate(
    config: &GeneratorConfig,
    writer: &mut dyn OutputWriter,
) -> Result<GenerationReport, CoreError> {
    Generator::new(config.clone())
        .run(
            &PostgresConnector::new(),
            &NoopHooks,
            &NoopHooks,
            writer,
            &TracingProgress,
        )
        .await
}

fn print_config_schema() -> Result<(), CliError> {
    let schema = schemars::schema_for!(GeneratorConfig);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
