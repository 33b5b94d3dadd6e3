//! vidcat - concatenate a directory of clips into one timestamped video.
//!
//! Every positional directory becomes one output file named after the
//! directory. Flags override the values stored in the settings file.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context as _, Result};
use clap::{Parser, ValueEnum};
use directories::ProjectDirs;

use vidcat_core::config::{ConfigManager, Settings};
use vidcat_core::logging::{init_tracing, LogCallback, LogLevel};
use vidcat_core::models::OverlayMode;
use vidcat_core::orchestrator::{AlwaysYes, DirectoryResult, Prompter, RunProcessor, RunServices};
use vidcat_core::timeline::TimelineAdjuster;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "vidcat")]
#[command(version)]
#[command(about = "Concatenate directories of clips into timestamped videos", long_about = None)]
struct Args {
    /// Input directories, one output per directory
    #[arg(default_value = ".")]
    dirs: Vec<PathBuf>,

    /// Burn ("hard") or mux ("soft") a per-second wall-clock overlay
    #[arg(long, value_enum)]
    timestamps: Option<TimestampArg>,

    /// Shift wall-clock times: 'dd/mm/yyyy' or '+1 year -1 month'
    #[arg(long, alias = "adjust_timestamp_date", allow_hyphen_values = true)]
    adjust_timestamp_date: Option<String>,

    /// Upload without asking
    #[arg(short, long)]
    upload: bool,

    /// Scale filter value, e.g. 1280:-2
    #[arg(short, long)]
    scale: Option<String>,

    /// Video codec
    #[arg(long)]
    vcodec: Option<String>,

    /// Video codec options, e.g. profile:v=main,rc:v=constqp,qp=22
    #[arg(long, alias = "vcodec_opts")]
    vcodec_opts: Option<String>,

    /// Video codec preset
    #[arg(long, alias = "vcodec_preset")]
    vcodec_preset: Option<String>,

    /// Audio codec
    #[arg(long)]
    acodec: Option<String>,

    /// Audio codec preset
    #[arg(long, alias = "acodec_preset")]
    acodec_preset: Option<String>,

    /// Audio codec options, e.g. b:a=160k
    #[arg(long, alias = "acodec_opts")]
    acodec_opts: Option<String>,

    /// Directory for output files
    #[arg(short, long, alias = "output_dir")]
    output_dir: Option<PathBuf>,

    /// Encode only the first minute
    #[arg(short, long)]
    test: bool,

    /// Keep the scratch directory after each run
    #[arg(long, alias = "keep_tmp")]
    keep_tmp: bool,

    /// Overwrite existing outputs without asking
    #[arg(short, long)]
    yes: bool,

    /// Settings file (created with defaults if missing)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TimestampArg {
    Hard,
    Soft,
}

impl From<TimestampArg> for OverlayMode {
    fn from(arg: TimestampArg) -> Self {
        match arg {
            TimestampArg::Hard => OverlayMode::Hard,
            TimestampArg::Soft => OverlayMode::Soft,
        }
    }
}

/// Fold command-line flags into the loaded settings.
///
/// A relative `--output-dir` is taken from the launch directory, so every
/// input directory writes into the same folder. A relative
/// `output_folder` in the settings file stays per input directory.
fn apply_overrides(args: &Args, settings: &mut Settings) -> Result<()> {
    if let Some(mode) = args.timestamps {
        settings.timestamps.overlay = mode.into();
    }
    if let Some(directive) = &args.adjust_timestamp_date {
        settings.timestamps.adjust_date = Some(directive.clone());
    }
    if args.upload {
        settings.publish.auto_upload = true;
    }
    if args.keep_tmp {
        settings.publish.keep_temp = true;
    }
    if args.test {
        settings.encode.test_mode = true;
    }
    if let Some(dir) = &args.output_dir {
        let dir = std::path::absolute(dir)
            .with_context(|| format!("resolving output directory {}", dir.display()))?;
        settings.paths.output_folder = dir.to_string_lossy().into_owned();
    }
    if let Some(level) = args.log_level {
        settings.logging.level = level;
    }

    let encode = &mut settings.encode;
    if let Some(scale) = &args.scale {
        encode.scale = scale.clone();
    }
    if let Some(codec) = &args.vcodec {
        encode.video_codec = codec.clone();
    }
    if let Some(opts) = &args.vcodec_opts {
        encode.video_options = Some(opts.clone());
    }
    if let Some(preset) = &args.vcodec_preset {
        encode.video_preset = Some(preset.clone());
    }
    if let Some(codec) = &args.acodec {
        encode.audio_codec = codec.clone();
    }
    if let Some(preset) = &args.acodec_preset {
        encode.audio_preset = Some(preset.clone());
    }
    if let Some(opts) = &args.acodec_opts {
        encode.audio_options = Some(opts.clone());
    }
    Ok(())
}

/// Asks on stderr and reads the answer from stdin.
struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, question: &str) -> bool {
        eprint!("{} [y/N] ", question);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

/// `--yes` answers overwrite questions; uploads still ask unless `--upload`.
struct OverwritePrompter;

impl Prompter for OverwritePrompter {
    fn confirm(&self, question: &str) -> bool {
        StdinPrompter.confirm(question)
    }

    fn confirm_overwrite(&self, path: &Path) -> bool {
        AlwaysYes.confirm_overwrite(path)
    }
}

fn is_yes(answer: &str) -> bool {
    answer.contains(['y', 'Y'])
}

/// Run log lines go to the terminal as well as the log file.
fn terminal_sink(_run_name: &str) -> Option<LogCallback> {
    Some(Box::new(|line: &str| eprintln!("{}", line)))
}

fn default_config_path() -> Result<PathBuf> {
    ProjectDirs::from("", "", "vidcat")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .ok_or_else(|| anyhow!("could not determine a config directory; pass --config"))
}

fn print_summary(results: &[DirectoryResult]) {
    for result in results {
        if result.success {
            let output = result
                .output_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("[ok]     {} -> {}", result.dir.display(), output);
        } else {
            println!(
                "[failed] {}: {}",
                result.dir.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    let mut config = ConfigManager::new(&config_path);
    config
        .load_or_create()
        .with_context(|| format!("loading settings from {}", config_path.display()))?;
    let mut settings = config.into_settings();
    apply_overrides(&args, &mut settings)?;

    init_tracing(settings.logging.level);
    tracing::debug!("settings loaded from {}", config_path.display());

    let adjuster = TimelineAdjuster::from_setting(settings.timestamps.adjust_date.as_deref())
        .context("invalid --adjust-timestamp-date")?;

    let prompter: Box<dyn Prompter> = if args.yes {
        Box::new(OverwritePrompter)
    } else {
        Box::new(StdinPrompter)
    };

    let services = RunServices::from_settings(&settings, adjuster, prompter);
    let processor =
        RunProcessor::new(settings, services).with_log_callback_factory(Box::new(terminal_sink));

    let results = processor.process_all(&args.dirs, None);
    print_summary(&results);

    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        tracing::error!("{} of {} directories failed", failed, results.len());
    }
    Ok(failed == 0)
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
