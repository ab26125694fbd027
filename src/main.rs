//! CLI entry point for the proficiency rater.
//!
//! Provides subcommands for classifying a single score, inspecting which
//! table applies, listing all tables, and aggregating an evaluation's results.

use anyhow::Result;
use clap::{Parser, Subcommand};
use proficiency_rater::config::{GradeMapConfig, Settings};
use proficiency_rater::output::{append_records, print_json, print_pretty, write_json};
use proficiency_rater::proficiency::{Classifier, GradeMap, all_tables};
use proficiency_rater::results::{aggregate_results, classify_results, load_results};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "proficiency_rater")]
#[command(about = "Classify assessment scores into proficiency levels", long_about = None)]
struct Cli {
    /// JSON file with extra grade label to educational level entries
    #[arg(long, global = true, value_name = "FILE")]
    grade_map: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a single raw score (0-10)
    Classify {
        /// Raw score on the 0-10 scale
        #[arg(short, long, allow_negative_numbers = true)]
        score: f64,

        /// Number of questions in the evaluation (not used by the computation)
        #[arg(short = 'q', long, default_value_t = 0)]
        total_questions: u32,

        /// Grade label, e.g. "5º Ano"
        #[arg(short, long)]
        grade: Option<String>,

        /// Subject name, e.g. "Matemática"
        #[arg(short = 'd', long)]
        subject: Option<String>,

        /// Educational level override, e.g. "Anos Finais"
        #[arg(short, long)]
        course: Option<String>,
    },
    /// Show which proficiency table applies to a grade/subject/course
    TableInfo {
        #[arg(short, long)]
        grade: Option<String>,

        #[arg(short = 'd', long)]
        subject: Option<String>,

        #[arg(short, long)]
        course: Option<String>,
    },
    /// List every proficiency table
    Tables,
    /// Classify and aggregate an evaluation's results from a file or URL
    Aggregate {
        /// CSV/JSON file path or results URL
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Identifier of the evaluation being aggregated
        #[arg(short, long)]
        evaluation_id: String,

        /// JSON file to write the aggregate to
        #[arg(short, long, default_value = "report.json")]
        output: String,

        /// Optional: CSV file to append classified rows to
        #[arg(long)]
        csv: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("proficiency_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let grade_map_path = cli
        .grade_map
        .clone()
        .or_else(|| settings.grade_map_path.clone());
    let classifier = Classifier::new(load_grade_map(grade_map_path.as_deref())?);

    match cli.command {
        Commands::Classify {
            score,
            total_questions,
            grade,
            subject,
            course,
        } => {
            let result = classifier.classify(
                score,
                total_questions,
                grade.as_deref(),
                subject.as_deref(),
                course.as_deref(),
            );
            print_json(&result)?;
        }
        Commands::TableInfo {
            grade,
            subject,
            course,
        } => {
            let info = classifier.table_info(grade.as_deref(), subject.as_deref(), course.as_deref());
            print_json(&info)?;
        }
        Commands::Tables => {
            print_json(&all_tables())?;
        }
        Commands::Aggregate {
            source,
            evaluation_id,
            output,
            csv,
        } => {
            aggregate(
                &classifier,
                &source,
                &evaluation_id,
                &output,
                csv.as_deref(),
                settings.results_api_token.as_deref(),
            )
            .await?;
        }
    }

    Ok(())
}

fn load_grade_map(path: Option<&Path>) -> Result<GradeMap> {
    match path {
        Some(path) => {
            let config = GradeMapConfig::load(path)?;
            info!(path = %path.display(), entries = config.len(), "Grade map overrides loaded");
            Ok(config.into_grade_map())
        }
        None => Ok(GradeMap::default()),
    }
}

/// Loads an evaluation's results, writes the aggregate JSON and optionally
/// appends the classified rows to a CSV file.
#[tracing::instrument(skip(classifier, api_token))]
async fn aggregate(
    classifier: &Classifier,
    source: &str,
    evaluation_id: &str,
    output: &str,
    csv: Option<&str>,
    api_token: Option<&str>,
) -> Result<()> {
    let rows = load_results(source, api_token).await?;

    if let Some(csv_path) = csv {
        let classified = classify_results(classifier, &rows);
        append_records(csv_path, &classified)?;
        info!(csv_path, rows = classified.len(), "Classified rows appended");
    }

    let aggregate = aggregate_results(evaluation_id, classifier, &rows);
    print_pretty(&aggregate.distribuicao_classificacao);
    write_json(output, &aggregate)?;

    info!(
        output,
        total_alunos = aggregate.total_alunos,
        turmas = aggregate.turmas.len(),
        media_proficiencia = aggregate.media_proficiencia,
        "Aggregate written"
    );
    Ok(())
}
