// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use otio_conform::hosts::mock::{HostOp, MockSession};
use otio_conform::hosts::resolve::{ResolveSessionProvider, ScriptEnv, SCRIPT_API_VAR,
    SCRIPT_LIB_VAR};
use otio_conform::importer::{ImportOptions, Importer, Node};
use otio_conform::otio_document;

/// CLI wrapper for the log level
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => LevelFilter::Error,
            CliLogLevel::Warn => LevelFilter::Warn,
            CliLogLevel::Info => LevelFilter::Info,
            CliLogLevel::Debug => LevelFilter::Debug,
            CliLogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Verify the host scripting environment configuration
    Check,

    /// Parse an OTIO file and print its structure without touching a host
    Inspect {
        /// Path to the OTIO compatible file
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Conform an OTIO file into the host (or plan it with --dry-run)
    Conform {
        /// Path to the OTIO compatible file
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Plan the conform against the recording mock host and print every
        /// creation call instead of driving a live session
        #[arg(short, long)]
        dry_run: bool,

        /// Name for the created host timeline (defaults to the document's
        /// top-level stack name)
        #[arg(short, long)]
        timeline_name: Option<String>,
    },

    /// Generate shell completions for otio-conform
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// otio-conform - conform OTIO timelines into an editing host
#[derive(Parser, Debug)]
#[command(name = "otio-conform")]
#[command(version = "0.1.0")]
#[command(about = "Conform OTIO timelines into an editing host")]
#[command(long_about = "otio-conform reads OpenTimelineIO interchange files and recreates the
timeline inside a host editing application's scripting session.

EXAMPLES:
    otio-conform check                          # Verify RESOLVE_SCRIPT_* configuration
    otio-conform inspect cut.otio               # Print the parsed timeline structure
    otio-conform conform --dry-run cut.otio     # Print the creation plan
    otio-conform conform cut.otio               # Conform into a live host session
    otio-conform completions bash               # Generate bash completions

CONFIGURATION:
    Live sessions need RESOLVE_SCRIPT_LIB and RESOLVE_SCRIPT_API set as per
    the host's developer documentation, and must run where the vendor
    scripting module is loadable (typically the host's own console).")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Set logging level
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: CliLogLevel,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = match record.level() {
                Level::Error => writeln!(stderr, "\x1B[1;31m{} {}\x1B[0m", now, record.args()),
                Level::Warn => writeln!(stderr, "\x1B[1;33m{} {}\x1B[0m", now, record.args()),
                Level::Info => writeln!(stderr, "{} {}", now, record.args()),
                Level::Debug | Level::Trace => {
                    writeln!(stderr, "\x1B[2m{} {}\x1B[0m", now, record.args())
                }
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    let options = CommandLineOptions::parse();

    CustomLogger::init(options.log_level.clone().into())
        .context("Failed to initialize the logger")?;

    match options.command {
        Commands::Check => run_check(),
        Commands::Inspect { input_path } => run_inspect(&input_path),
        Commands::Conform {
            input_path,
            dry_run,
            timeline_name,
        } => run_conform(&input_path, dry_run, timeline_name),
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn run_check() -> Result<()> {
    match ScriptEnv::from_env() {
        Ok(script_env) => {
            info!("{} = {}", SCRIPT_LIB_VAR, script_env.script_lib.display());
            info!("{} = {}", SCRIPT_API_VAR, script_env.script_api.display());
            if let Err(err) = script_env.check_script_lib() {
                error!("{}", err);
                return Err(err.into());
            }
            info!("script environment looks usable");
            Ok(())
        }
        Err(err) => {
            error!("{}", err);
            Err(err.into())
        }
    }
}

fn run_inspect(input_path: &Path) -> Result<()> {
    let timeline = otio_document::read_from_file(input_path)
        .with_context(|| format!("Failed to read '{}'", input_path.display()))?;

    println!("Timeline: {}", timeline.name);
    if let Some(start) = timeline.global_start_time {
        println!("  starts at {}", start);
    }
    for track in timeline.flattened_tracks() {
        println!(
            "  Track '{}' [{}]: {} item(s), {:.2}s",
            track.name,
            track.kind,
            track.children.len(),
            track.playback_duration().to_seconds()
        );
    }
    Ok(())
}

fn run_conform(input_path: &Path, dry_run: bool, timeline_name: Option<String>) -> Result<()> {
    let import_options = ImportOptions { timeline_name };

    if dry_run {
        let timeline = otio_document::read_from_file(input_path)
            .with_context(|| format!("Failed to read '{}'", input_path.display()))?;

        let mut session = MockSession::working();
        let ops = session.ops();
        let mut importer = Importer::with_options(&mut session, import_options);
        let root = importer.convert(Node::Timeline(&timeline), None)?;
        debug!("dry-run root object: {:?}", root);

        for op in ops.lock().expect("op log poisoned").iter() {
            println!("{}", describe_op(op));
        }
        return Ok(());
    }

    // A live conform needs the vendor scripting module, which is only
    // loadable inside the host's own scripting console; the provider
    // reports exactly which part of the setup is missing.
    let provider = ResolveSessionProvider::new();
    let root = otio_conform::import_file_with_options(input_path, &provider, import_options)?;
    info!("conform complete, root object: {:?}", root);
    Ok(())
}

fn describe_op(op: &HostOp) -> String {
    match op {
        HostOp::CreateTimeline { name } => format!("create timeline '{}'", name),
        HostOp::AddTrack { kind, name, .. } => format!("  add {} track '{}'", kind, name),
        HostOp::AppendClip { placement, .. } => format!(
            "    clip '{}' at {} (media: {})",
            placement.name,
            placement.record_range,
            placement.media_url.as_deref().unwrap_or("none")
        ),
        HostOp::AppendGap { record_range, .. } => format!("    gap at {}", record_range),
        HostOp::AddTransition { placement, .. } => format!(
            "    transition '{}' at cut {}",
            placement.name, placement.cut_point
        ),
    }
}
