//! Risk scoring engine: normalization, feature resolution, and the scoring stages that
//! turn a batch of applicant records into scam, fraud, DTI, and credit assessments.

pub mod decision;
pub mod dti;
pub mod features;
pub mod fraud;
pub mod normalizer;
pub mod router;
pub mod scam;
pub mod schema;
pub mod table;

pub use decision::{decide, CreditDecision};
pub use dti::{debt_to_income, DtiRisk};
pub use features::{Feature, FeatureFrame};
pub use fraud::{fraud_probability, FraudStrategy, UnknownStrategy};
pub use router::scoring_router;
pub use table::{Cell, Column, NormalizedTable, RecordTable};

use serde::Serialize;
use tracing::info;

/// Names of the derived columns, in export order.
pub const DERIVED_COLUMNS: [&str; 7] = [
    "scam_score",
    "is_fraud",
    "dti",
    "dti_risk",
    "fraud_score",
    "fraud_probability",
    "credit_decision",
];

/// Stateless scorer configured with the single caller-selected fraud strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskEngine {
    strategy: FraudStrategy,
}

impl RiskEngine {
    pub fn new(strategy: FraudStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> FraudStrategy {
        self.strategy
    }

    pub fn score(&self, table: RecordTable) -> ScoredTable {
        let normalized = normalizer::normalize(table);
        let features = FeatureFrame::resolve(&normalized);

        let scam = scam::scam_scores(&features);
        let dti = dti::classify_table(&normalized);
        let fraud = self.strategy.fraud_scores(&features);

        let assessments = scam
            .into_iter()
            .zip(dti)
            .zip(fraud)
            .map(|((scam_score, (dti, dti_risk)), fraud_score)| {
                RiskAssessment::new(scam_score, dti, dti_risk, fraud_score)
            })
            .collect();

        let scored = ScoredTable {
            normalized,
            features,
            strategy: self.strategy,
            assessments,
        };

        let summary = scored.summary();
        info!(
            records = summary.records,
            flagged = summary.flagged_fraud,
            rejected = summary.decisions.reject,
            strategy = %self.strategy,
            "scored applicant batch"
        );

        scored
    }
}

/// Derived fields for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub scam_score: f64,
    pub is_fraud: bool,
    pub dti: Option<f64>,
    pub dti_risk: DtiRisk,
    pub fraud_score: f64,
    pub fraud_probability: f64,
    pub credit_decision: CreditDecision,
}

impl RiskAssessment {
    fn new(scam_score: f64, dti: Option<f64>, dti_risk: DtiRisk, fraud_score: f64) -> Self {
        let probability = fraud_probability(fraud_score);
        Self {
            scam_score,
            is_fraud: scam::is_fraud(scam_score),
            dti,
            dti_risk,
            fraud_score,
            fraud_probability: probability,
            credit_decision: decide(scam_score, probability),
        }
    }

    fn with_fraud_score(self, fraud_score: f64) -> Self {
        Self::new(self.scam_score, self.dti, self.dti_risk, fraud_score)
    }

    /// Export rendering in `DERIVED_COLUMNS` order; the DTI sentinel renders empty.
    pub fn render(&self) -> [String; 7] {
        [
            self.scam_score.to_string(),
            self.is_fraud.to_string(),
            self.dti.map(|value| value.to_string()).unwrap_or_default(),
            self.dti_risk.label().to_string(),
            self.fraud_score.to_string(),
            self.fraud_probability.to_string(),
            self.credit_decision.label().to_string(),
        ]
    }
}

/// Normalized batch plus its per-record assessments.
#[derive(Debug, Clone)]
pub struct ScoredTable {
    normalized: NormalizedTable,
    features: FeatureFrame,
    strategy: FraudStrategy,
    assessments: Vec<RiskAssessment>,
}

impl ScoredTable {
    pub fn normalized(&self) -> &NormalizedTable {
        &self.normalized
    }

    pub fn assessments(&self) -> &[RiskAssessment] {
        &self.assessments
    }

    pub fn strategy(&self) -> FraudStrategy {
        self.strategy
    }

    pub fn len(&self) -> usize {
        self.assessments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assessments.is_empty()
    }

    /// Recomputes fraud score, probability, and decision under another strategy.
    /// Scam score and DTI columns are left as they are.
    pub fn switch_strategy(&mut self, strategy: FraudStrategy) {
        let fraud = strategy.fraud_scores(&self.features);
        for (assessment, fraud_score) in self.assessments.iter_mut().zip(fraud) {
            *assessment = assessment.with_fraud_score(fraud_score);
        }
        self.strategy = strategy;
    }

    /// Indices of records matching `decision`, or every record when `None`.
    pub fn indices(&self, decision: Option<CreditDecision>) -> Vec<usize> {
        self.assessments
            .iter()
            .enumerate()
            .filter(|(_, assessment)| {
                decision
                    .map(|wanted| assessment.credit_decision == wanted)
                    .unwrap_or(true)
            })
            .map(|(index, _)| index)
            .collect()
    }

    pub fn scored_row(&self, index: usize) -> Option<ScoredRow> {
        let assessment = *self.assessments.get(index)?;
        let record = self
            .normalized
            .row(index)
            .into_iter()
            .map(|(name, cell)| (name.to_string(), cell.clone()))
            .collect();
        Some(ScoredRow { record, assessment })
    }

    pub fn rows(&self, decision: Option<CreditDecision>) -> Vec<ScoredRow> {
        self.indices(decision)
            .into_iter()
            .filter_map(|index| self.scored_row(index))
            .collect()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            records: self.assessments.len(),
            strategy: self.strategy,
            ..BatchSummary::default()
        };

        for assessment in &self.assessments {
            if assessment.is_fraud {
                summary.flagged_fraud += 1;
            }
            match assessment.credit_decision {
                CreditDecision::Approve => summary.decisions.approve += 1,
                CreditDecision::Review => summary.decisions.review += 1,
                CreditDecision::Reject => summary.decisions.reject += 1,
            }
            match assessment.dti_risk {
                DtiRisk::Low => summary.dti_risk.low += 1,
                DtiRisk::Medium => summary.dti_risk.medium += 1,
                DtiRisk::High => summary.dti_risk.high += 1,
                DtiRisk::Unknown => summary.dti_risk.unknown += 1,
            }
        }

        summary
    }
}

/// One record as exposed over HTTP: normalized inputs plus derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRow {
    #[serde(serialize_with = "serialize_in_column_order")]
    pub record: Vec<(String, Cell)>,
    pub assessment: RiskAssessment,
}

fn serialize_in_column_order<S>(
    entries: &[(String, Cell)],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_map(entries.iter().map(|(name, cell)| (name, cell)))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionCounts {
    pub approve: usize,
    pub review: usize,
    pub reject: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DtiRiskCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub unknown: usize,
}

/// Batch-level counts surfaced to analysts alongside the scored rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub records: usize,
    pub flagged_fraud: usize,
    pub strategy: FraudStrategy,
    pub decisions: DecisionCounts,
    pub dti_risk: DtiRiskCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_table(columns: &[&str], rows: Vec<Vec<Cell>>) -> RecordTable {
        let mut table = RecordTable::new(columns.iter().map(|name| name.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    #[test]
    fn empty_record_is_approved_with_unknown_dti() {
        let scored = RiskEngine::default().score(record_table(&["ID"], vec![vec![Cell::Missing]]));

        let assessment = scored.assessments()[0];
        assert_eq!(assessment.scam_score, 0.0);
        assert!(!assessment.is_fraud);
        assert_eq!(assessment.dti, None);
        assert_eq!(assessment.dti_risk, DtiRisk::Unknown);
        assert_eq!(assessment.fraud_score, 0.0);
        assert_eq!(assessment.fraud_probability, 0.5);
        assert_eq!(assessment.credit_decision, CreditDecision::Approve);
    }

    #[test]
    fn switching_strategy_leaves_scam_and_dti_untouched() {
        let table = record_table(
            &["NEGATIVESTATUS", "NUM_CONTRACTS_STARTED_6M", "instalmentamount", "AVG_BALANCE_3M"],
            vec![
                vec![
                    Cell::Text("Y".into()),
                    Cell::Number(6.0),
                    Cell::Number(500.0),
                    Cell::Number(1000.0),
                ],
                vec![Cell::Text("N".into()), Cell::Missing, Cell::Missing, Cell::Missing],
            ],
        );

        let mut scored = RiskEngine::new(FraudStrategy::FraudRisk).score(table);
        let before = scored.assessments().to_vec();

        scored.switch_strategy(FraudStrategy::Behavioral);

        assert_eq!(scored.strategy(), FraudStrategy::Behavioral);
        for (old, new) in before.iter().zip(scored.assessments()) {
            assert_eq!(old.scam_score, new.scam_score);
            assert_eq!(old.dti, new.dti);
            assert_eq!(old.dti_risk, new.dti_risk);
        }
        assert_ne!(before[0].fraud_score, scored.assessments()[0].fraud_score);
    }

    #[test]
    fn summary_counts_decisions_and_buckets() {
        let table = record_table(
            &["was_canceled", "NEGATIVESTATUS", "instalmentamount", "AVG_BALANCE_3M"],
            vec![
                vec![
                    Cell::Number(1.0),
                    Cell::Text("Y".into()),
                    Cell::Number(300.0),
                    Cell::Number(1000.0),
                ],
                vec![Cell::Number(0.0), Cell::Text("N".into()), Cell::Missing, Cell::Missing],
            ],
        );

        let scored = RiskEngine::default().score(table);
        let summary = scored.summary();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.flagged_fraud, 1);
        assert_eq!(summary.decisions.reject, 1);
        assert_eq!(summary.decisions.approve, 1);
        assert_eq!(summary.dti_risk.low, 1);
        assert_eq!(summary.dti_risk.unknown, 1);
        assert_eq!(scored.indices(Some(CreditDecision::Reject)), vec![0]);
    }
}
