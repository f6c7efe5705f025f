use crate::infra::{parse_decision, parse_delimiter, parse_strategy};
use clap::Args;
use scam_score::config::AppConfig;
use scam_score::error::AppError;
use scam_score::ingest::{export_path, CsvIngest, Delimiter};
use scam_score::scoring::{
    CreditDecision, FraudStrategy, RiskAssessment, RiskEngine, ScoredTable,
};
use scam_score::telemetry::{self, LogSink};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_OUTPUT: &str = "scam_scored_output.csv";
const PREVIEW_INPUT_COLUMNS: usize = 10;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Applicant export to score
    pub(crate) input: PathBuf,
    /// Field separator: ',', ';', tab, or '|' (defaults to SCORING_DELIMITER)
    #[arg(long, value_parser = parse_delimiter)]
    pub(crate) delimiter: Option<Delimiter>,
    /// Fraud score strategy (defaults to SCORING_STRATEGY)
    #[arg(long, value_parser = parse_strategy)]
    pub(crate) strategy: Option<FraudStrategy>,
    /// Destination for the augmented table
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub(crate) output: PathBuf,
    /// Skip writing the augmented table
    #[arg(long)]
    pub(crate) no_export: bool,
    /// Number of scored rows to print
    #[arg(long, default_value_t = 10)]
    pub(crate) preview: usize,
    /// Restrict preview and export to one credit decision
    #[arg(long, value_parser = parse_decision)]
    pub(crate) decision: Option<CreditDecision>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        input,
        delimiter,
        strategy,
        output,
        no_export,
        preview,
        decision,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;

    let delimiter = delimiter.unwrap_or(config.scoring.delimiter);
    let strategy = strategy.unwrap_or(config.scoring.strategy);

    let table = CsvIngest::from_path(&input, delimiter)?;
    let scored = RiskEngine::new(strategy).score(table);

    for line in report_lines(&scored, preview, decision) {
        println!("{line}");
    }

    if !no_export {
        let written = export_path(&scored, &output, delimiter, decision)?;
        info!(path = %output.display(), records = written, "wrote scored export");
        println!("\nExported {written} record(s) to {}", output.display());
    }

    Ok(())
}

pub(crate) fn list_strategies() {
    for strategy in FraudStrategy::ALL {
        let marker = if strategy == FraudStrategy::default() {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", strategy.name(), marker);
    }
}

fn format_assessment(assessment: &RiskAssessment) -> String {
    let dti = match assessment.dti {
        Some(value) => format!("{value:.2}"),
        None => "n/a".to_string(),
    };
    format!(
        "scam {:.3}{} | dti {} ({}) | fraud {:.3} p={:.3} | {}",
        assessment.scam_score,
        if assessment.is_fraud { " FRAUD" } else { "" },
        dti,
        assessment.dti_risk.label(),
        assessment.fraud_score,
        assessment.fraud_probability,
        assessment.credit_decision.label(),
    )
}

/// Summary block plus a preview of the first scored rows, each followed by up to ten
/// of its input columns.
pub(crate) fn report_lines(
    scored: &ScoredTable,
    preview: usize,
    decision: Option<CreditDecision>,
) -> Vec<String> {
    let summary = scored.summary();
    let mut lines = vec![
        "Scam score batch".to_string(),
        format!("Strategy: {}", summary.strategy),
        format!(
            "Records: {} ({} flagged as fraud)",
            summary.records, summary.flagged_fraud
        ),
        format!(
            "Decisions: {} approve, {} review, {} reject",
            summary.decisions.approve, summary.decisions.review, summary.decisions.reject
        ),
        format!(
            "DTI risk: {} low, {} medium, {} high, {} unknown",
            summary.dti_risk.low,
            summary.dti_risk.medium,
            summary.dti_risk.high,
            summary.dti_risk.unknown
        ),
    ];

    let indices = scored.indices(decision);
    if indices.is_empty() || preview == 0 {
        lines.push("\nSample results: none".to_string());
        return lines;
    }

    lines.push(format!(
        "\nSample results (first {} of {})",
        preview.min(indices.len()),
        indices.len()
    ));
    for index in indices.into_iter().take(preview) {
        let Some(row) = scored.scored_row(index) else {
            continue;
        };
        let inputs = row
            .record
            .iter()
            .take(PREVIEW_INPUT_COLUMNS)
            .map(|(name, cell)| format!("{name}={}", cell.render()))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("- {} | {}", format_assessment(&row.assessment), inputs));
    }

    lines
}
