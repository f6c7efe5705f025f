use super::schema;
use super::table::{Cell, NormalizedTable};
use serde::{Deserialize, Serialize};

pub const DTI_UPPER_BOUND: f64 = 10.0;
const LOW_RISK_CEILING: f64 = 0.4;
const MEDIUM_RISK_CEILING: f64 = 0.6;
const MONTHS: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DtiRisk {
    Low,
    Medium,
    High,
    Unknown,
}

impl DtiRisk {
    pub fn label(&self) -> &'static str {
        match self {
            DtiRisk::Low => "low",
            DtiRisk::Medium => "medium",
            DtiRisk::High => "high",
            DtiRisk::Unknown => "unknown",
        }
    }

    /// Buckets are closed on their upper bound. `None` is the unresolvable sentinel.
    pub fn classify(dti: Option<f64>) -> Self {
        match dti {
            None => DtiRisk::Unknown,
            Some(value) if value <= LOW_RISK_CEILING => DtiRisk::Low,
            Some(value) if value <= MEDIUM_RISK_CEILING => DtiRisk::Medium,
            Some(_) => DtiRisk::High,
        }
    }
}

/// `(instalment × 3) / (balance × 3)`, clipped above at 10.
///
/// Missing operands and a zero balance yield `None` rather than a defaulted ratio.
pub fn debt_to_income(instalment: Option<f64>, balance: Option<f64>) -> Option<f64> {
    let debt = instalment? * MONTHS;
    let income = balance? * MONTHS;
    if income == 0.0 {
        return None;
    }

    let ratio = debt / income;
    ratio.is_finite().then(|| ratio.min(DTI_UPPER_BOUND))
}

fn operands(table: &NormalizedTable, name: &str) -> Vec<Option<f64>> {
    match table.column(name) {
        Some(column) => column.values.iter().map(Cell::as_number).collect(),
        None => vec![None; table.len()],
    }
}

/// Per-record DTI and bucket for the whole batch.
pub fn classify_table(table: &NormalizedTable) -> Vec<(Option<f64>, DtiRisk)> {
    operands(table, schema::INSTALMENT_AMOUNT)
        .into_iter()
        .zip(operands(table, schema::AVG_BALANCE_3M))
        .map(|(instalment, balance)| {
            let dti = debt_to_income(instalment, balance);
            (dti, DtiRisk::classify(dti))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_ratio_and_low_bucket() {
        let dti = debt_to_income(Some(300.0), Some(1000.0));
        assert!((dti.expect("resolved") - 0.3).abs() < 1e-12);
        assert_eq!(DtiRisk::classify(dti), DtiRisk::Low);
    }

    #[test]
    fn bucket_edges_are_inclusive() {
        assert_eq!(DtiRisk::classify(Some(0.4)), DtiRisk::Low);
        assert_eq!(DtiRisk::classify(Some(0.41)), DtiRisk::Medium);
        assert_eq!(DtiRisk::classify(Some(0.6)), DtiRisk::Medium);
        assert_eq!(DtiRisk::classify(Some(0.6000001)), DtiRisk::High);
        assert_eq!(DtiRisk::classify(None), DtiRisk::Unknown);
    }

    #[test]
    fn zero_or_missing_operands_are_unresolvable() {
        assert_eq!(debt_to_income(Some(300.0), Some(0.0)), None);
        assert_eq!(debt_to_income(None, Some(1000.0)), None);
        assert_eq!(debt_to_income(Some(300.0), None), None);
    }

    #[test]
    fn ratio_is_clipped_at_ten_without_lower_clip() {
        assert_eq!(debt_to_income(Some(5000.0), Some(10.0)), Some(DTI_UPPER_BOUND));
        assert_eq!(debt_to_income(Some(-50.0), Some(100.0)), Some(-0.5));
        assert_eq!(DtiRisk::classify(Some(-0.5)), DtiRisk::Low);
    }
}
