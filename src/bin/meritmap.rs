//! MeritMap CLI - Command-line interface for placement-readiness evaluation
//!
//! Commands:
//! - evaluate: Evaluate one profile (flags, JSON file or stdin)
//! - batch: Evaluate NDJSON profiles, one report per line
//! - fields: Print the input field table
//! - doctor: Check that the model artifacts load and match the schema

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use meritmap::collector::{CandidateProfile, FieldGroup, FieldKind, ProfileInput, FIELD_SPECS};
use meritmap::config::{EvaluatorConfig, ENV_MODEL_PATH, ENV_SCALER_PATH};
use meritmap::pipeline::ReadinessPipeline;
use meritmap::render::render_text;
use meritmap::types::{Branch, ReadinessReport, FEATURE_COUNT, FEATURE_NAMES};
use meritmap::{FeatureScaler, LogisticModel, MeritMapError, MERITMAP_VERSION, PRODUCER_NAME};

/// MeritMap - Placement-readiness evaluation
#[derive(Parser)]
#[command(name = "meritmap")]
#[command(version = MERITMAP_VERSION)]
#[command(about = "Evaluate placement readiness from a candidate profile", long_about = None)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ArtifactArgs {
    /// Model artifact (JSON); defaults to $MERITMAP_MODEL_PATH, then placement_model.json
    #[arg(long)]
    model: Option<PathBuf>,

    /// Scaler artifact (JSON); defaults to $MERITMAP_SCALER_PATH, then placement_scaler.json
    #[arg(long)]
    scaler: Option<PathBuf>,
}

impl ArtifactArgs {
    /// Defaults, then environment, then flags
    fn to_config(&self) -> EvaluatorConfig {
        let mut config = EvaluatorConfig::from_env();
        config.apply_overrides(self.model.clone(), self.scaler.clone());
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single candidate profile
    Evaluate {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Profile JSON file (use - for stdin); fields not given take defaults
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Override a field, e.g. --set cgpa=8.4 (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        overrides: Vec<String>,

        /// Branch (Civil, ECE, EEE, IT, Mechanical)
        #[arg(long)]
        branch: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Colour the category banner by severity
        #[arg(long, default_value = "auto")]
        color: ColorMode,
    },

    /// Evaluate newline-delimited JSON profiles
    Batch {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Print the input field table
    Fields {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose artifact configuration
    Doctor {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Compact JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), MeritMapCliError> {
    match cli.command {
        Commands::Evaluate {
            artifacts,
            input,
            overrides,
            branch,
            format,
            color,
        } => cmd_evaluate(
            &artifacts.to_config(),
            input.as_deref(),
            &overrides,
            branch.as_deref(),
            format,
            color,
        ),

        Commands::Batch {
            artifacts,
            input,
            output,
        } => cmd_batch(&artifacts.to_config(), &input, &output),

        Commands::Fields { json } => cmd_fields(json),

        Commands::Doctor { artifacts, json } => cmd_doctor(&artifacts.to_config(), json),
    }
}

fn cmd_evaluate(
    config: &EvaluatorConfig,
    input: Option<&Path>,
    overrides: &[String],
    branch: Option<&str>,
    format: OutputFormat,
    color: ColorMode,
) -> Result<(), MeritMapCliError> {
    // Build the profile before touching artifacts so input errors surface first
    let mut profile = match input {
        Some(path) => ProfileInput::from_json(&read_input(path)?)?.into_profile(),
        None => CandidateProfile::default(),
    };
    for assignment in overrides {
        profile.apply_override(assignment)?;
    }
    if let Some(name) = branch {
        profile.set_branch(name.parse::<Branch>()?);
    }

    let pipeline = ReadinessPipeline::from_config(config)?;
    let report = pipeline.process_profile(&profile)?;
    info!(
        evaluation_id = %report.evaluation_id,
        category = report.result.category.code.as_str(),
        "evaluation complete"
    );

    let rendered = match format {
        OutputFormat::Text => {
            let use_color = match color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => atty::is(atty::Stream::Stdout),
            };
            render_text(&report, use_color)
        }
        OutputFormat::Json => serde_json::to_string(&report)? + "\n",
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&report)? + "\n",
    };

    let mut stdout = io::stdout();
    write!(stdout, "{rendered}")?;
    stdout.flush()?;
    Ok(())
}

fn cmd_batch(
    config: &EvaluatorConfig,
    input: &Path,
    output: &Path,
) -> Result<(), MeritMapCliError> {
    let input_data = read_input(input)?;
    let pipeline = ReadinessPipeline::from_config(config)?;
    let reports = pipeline.process_ndjson(&input_data)?;

    if reports.is_empty() {
        return Err(MeritMapCliError::NoProfiles);
    }
    debug!(count = reports.len(), "batch evaluated");

    let output_data = format_ndjson(&reports)?;
    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }
    Ok(())
}

fn cmd_fields(json: bool) -> Result<(), MeritMapCliError> {
    if json {
        let listing = serde_json::json!({
            "fields": FIELD_SPECS,
            "branch": {
                "options": Branch::ALL.iter().map(|b| b.as_str()).collect::<Vec<_>>(),
                "default": Branch::default().as_str(),
            },
            "feature_order": FEATURE_NAMES,
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Input Fields");
    println!("============");
    for group in FieldGroup::ALL {
        println!("\n{}", group.title());
        for spec in FIELD_SPECS.iter().filter(|s| s.group == group) {
            let range = match spec.kind {
                FieldKind::Continuous => format!("{:.1}..={:.1}", spec.min, spec.max),
                FieldKind::Integer => format!("{}..={}", spec.min, spec.max),
                FieldKind::Choice(options) => format!(
                    "one of {}",
                    options
                        .iter()
                        .map(|o| o.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            };
            println!(
                "  {:<28} {:<28} {:<16} default {}",
                spec.field.as_str(),
                spec.label,
                range,
                spec.default
            );
        }
    }
    println!(
        "\n  {:<28} {:<28} one of {}",
        "branch",
        "Branch",
        Branch::ALL
            .iter()
            .map(|b| b.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

fn cmd_doctor(config: &EvaluatorConfig, json: bool) -> Result<(), MeritMapCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "meritmap_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("MeritMap version {}", MERITMAP_VERSION),
    });

    checks.push(DoctorCheck {
        name: "feature_schema".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} features, branch one-hot last", FEATURE_COUNT),
    });

    checks.push(match LogisticModel::from_file(&config.model_path) {
        Ok(model) => DoctorCheck {
            name: "model".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "{} v{} loaded from {}",
                model.model_id,
                model.model_version,
                config.model_path.display()
            ),
        },
        Err(e) => DoctorCheck {
            name: "model".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    });

    checks.push(match FeatureScaler::from_file(&config.scaler_path) {
        Ok(scaler) => DoctorCheck {
            name: "scaler".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "{} scaler loaded from {}",
                scaler.kind(),
                config.scaler_path.display()
            ),
        },
        Err(e) => DoctorCheck {
            name: "scaler".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        },
    });

    let stdout_check = if atty::is(atty::Stream::Stdout) {
        DoctorCheck {
            name: "stdout".to_string(),
            status: CheckStatus::Ok,
            message: "stdout is a TTY (coloured text output)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdout".to_string(),
            status: CheckStatus::Warning,
            message: "stdout is not a TTY (colour disabled in auto mode)".to_string(),
        }
    };
    checks.push(stdout_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: MERITMAP_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("MeritMap Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(MeritMapCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_input(path: &Path) -> Result<String, MeritMapCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn format_ndjson(reports: &[ReadinessReport]) -> Result<String, MeritMapCliError> {
    let mut lines: Vec<String> = Vec::with_capacity(reports.len());
    for report in reports {
        lines.push(serde_json::to_string(report)?);
    }
    Ok(lines.join("\n") + "\n")
}

// Error types

#[derive(Debug)]
enum MeritMapCliError {
    Io(io::Error),
    Evaluation(MeritMapError),
    Json(serde_json::Error),
    NoProfiles,
    DoctorFailed,
}

impl From<io::Error> for MeritMapCliError {
    fn from(e: io::Error) -> Self {
        MeritMapCliError::Io(e)
    }
}

impl From<MeritMapError> for MeritMapCliError {
    fn from(e: MeritMapError) -> Self {
        MeritMapCliError::Evaluation(e)
    }
}

impl From<serde_json::Error> for MeritMapCliError {
    fn from(e: serde_json::Error) -> Self {
        MeritMapCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<MeritMapCliError> for CliError {
    fn from(e: MeritMapCliError) -> Self {
        match e {
            MeritMapCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            MeritMapCliError::Evaluation(e) => evaluation_error(e),
            MeritMapCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            MeritMapCliError::NoProfiles => CliError {
                code: "NO_PROFILES".to_string(),
                message: "No profiles found in input".to_string(),
                hint: Some("Provide one JSON profile per line".to_string()),
            },
            MeritMapCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

fn evaluation_error(e: MeritMapError) -> CliError {
    let (code, hint) = match &e {
        MeritMapError::ArtifactLoad { .. } => (
            "ARTIFACT_LOAD_ERROR",
            format!("Pass --model/--scaler or set {ENV_MODEL_PATH}/{ENV_SCALER_PATH}"),
        ),
        MeritMapError::ArtifactParse { .. } | MeritMapError::InvalidArtifact(_) => (
            "ARTIFACT_INVALID",
            "Re-export the model artifacts from the training pipeline".to_string(),
        ),
        MeritMapError::NonFiniteScore(_) => (
            "SCORE_OVERFLOW",
            "Model weights or scaler scales are too extreme for this profile".to_string(),
        ),
        MeritMapError::SchemaMismatch { .. } => (
            "SCHEMA_MISMATCH",
            "Artifacts were fitted on a different feature schema; run 'meritmap fields'"
                .to_string(),
        ),
        MeritMapError::Json(_) => ("PROFILE_JSON_ERROR", "Check profile JSON syntax".to_string()),
        MeritMapError::UnknownField(_) | MeritMapError::InvalidOverride(_) => (
            "INPUT_ERROR",
            "Run 'meritmap fields' for valid field names".to_string(),
        ),
        MeritMapError::UnknownBranch(_) => (
            "INPUT_ERROR",
            "Branch must be one of Civil, ECE, EEE, IT, Mechanical".to_string(),
        ),
    };
    CliError {
        code: code.to_string(),
        message: e.to_string(),
        hint: Some(hint),
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
