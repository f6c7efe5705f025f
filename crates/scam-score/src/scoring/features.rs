use super::schema;
use super::table::{Cell, Column, NormalizedTable};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Derived inputs shared by the scam formula and the fraud strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    CancellationFlag,
    NegativeStatus,
    OverdueInstalmentsLog,
    OverduePeaksPerContract,
    MonthOverdueScaled,
    PaydayContractsLog,
    OtherContractsLog,
    RecentContractStartsLog,
    OverdueToInstalment,
    SubprimeClassification,
    HighDti3m,
    ManyPhoneNumbers,
    ManyAddresses,
}

impl Feature {
    pub const ALL: [Feature; 13] = [
        Feature::CancellationFlag,
        Feature::NegativeStatus,
        Feature::OverdueInstalmentsLog,
        Feature::OverduePeaksPerContract,
        Feature::MonthOverdueScaled,
        Feature::PaydayContractsLog,
        Feature::OtherContractsLog,
        Feature::RecentContractStartsLog,
        Feature::OverdueToInstalment,
        Feature::SubprimeClassification,
        Feature::HighDti3m,
        Feature::ManyPhoneNumbers,
        Feature::ManyAddresses,
    ];
}

const HIGH_DTI_3M_CUTOFF: f64 = 0.6;
const PHONE_NUMBER_CUTOFF: f64 = 3.0;
const ADDRESS_CUTOFF: f64 = 2.0;
const DAYS_PER_MONTH: f64 = 30.0;

/// Every feature resolved once for the whole batch, one value per record.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    len: usize,
    values: HashMap<Feature, Vec<f64>>,
}

impl FeatureFrame {
    pub fn resolve(table: &NormalizedTable) -> Self {
        let resolver = Resolver { table };
        let values = Feature::ALL
            .iter()
            .map(|feature| (*feature, resolver.resolve(*feature)))
            .collect();

        Self {
            len: table.len(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column(&self, feature: Feature) -> &[f64] {
        self.values
            .get(&feature)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Column-wise `Σ weight × feature` over the batch.
    pub fn weighted_sum(&self, terms: &[(f64, Feature)]) -> Vec<f64> {
        let mut totals = vec![0.0; self.len];
        for (weight, feature) in terms {
            for (total, value) in totals.iter_mut().zip(self.column(*feature)) {
                *total += weight * value;
            }
        }
        totals
    }
}

/// Unsigned magnitude of a numeric cell. Missing, unresolvable, and textual cells
/// count as zero; negative values are clamped to zero before any transform.
fn magnitude(cell: &Cell) -> f64 {
    cell.as_number().map(|value| value.max(0.0)).unwrap_or(0.0)
}

fn log1p(value: f64) -> f64 {
    value.max(0.0).ln_1p()
}

fn indicator(condition: bool) -> f64 {
    if condition {
        1.0
    } else {
        0.0
    }
}

struct Resolver<'a> {
    table: &'a NormalizedTable,
}

impl<'a> Resolver<'a> {
    fn lookup(&self, name: &str) -> Option<&'a Column> {
        let column = self.table.column(name);
        if column.is_none() {
            debug!(column = name, "optional column absent, using zero default");
        }
        column
    }

    /// Numeric column with a zero default for absent columns and unresolved cells.
    fn numeric(&self, name: &str) -> Vec<f64> {
        match self.lookup(name) {
            Some(column) => column.values.iter().map(magnitude).collect(),
            None => vec![0.0; self.table.len()],
        }
    }

    fn threshold(&self, name: &str, cutoff: f64) -> Vec<f64> {
        self.numeric(name)
            .into_iter()
            .map(|value| indicator(value > cutoff))
            .collect()
    }

    fn label_in(&self, name: &str, labels: &[&str]) -> Vec<f64> {
        match self.lookup(name) {
            Some(column) => column
                .values
                .iter()
                .map(|cell| {
                    let matched = cell
                        .as_text()
                        .map(|text| labels.iter().any(|label| text.eq_ignore_ascii_case(label)))
                        .unwrap_or(false);
                    indicator(matched)
                })
                .collect(),
            None => vec![0.0; self.table.len()],
        }
    }

    /// Row-wise maximum across every column containing `fragment`; zero when none match.
    fn max_across(&self, fragment: &str) -> Vec<f64> {
        let mut maxima = vec![0.0_f64; self.table.len()];
        for column in self.table.columns_containing(fragment) {
            for (max, cell) in maxima.iter_mut().zip(&column.values) {
                *max = max.max(magnitude(cell));
            }
        }
        maxima
    }

    fn ratio(&self, numerator: &str, denominator: &str) -> Vec<f64> {
        self.numeric(numerator)
            .into_iter()
            .zip(self.numeric(denominator))
            .map(|(top, bottom)| top / (bottom + 1.0))
            .collect()
    }

    fn resolve(&self, feature: Feature) -> Vec<f64> {
        match feature {
            Feature::CancellationFlag => self.numeric(schema::WAS_CANCELED),
            Feature::NegativeStatus => {
                self.label_in(schema::NEGATIVE_STATUS, &[schema::NEGATIVE_STATUS_MARKER])
            }
            Feature::OverdueInstalmentsLog => {
                log_column(self.numeric(schema::OVERDUE_INSTALMENT_COUNT))
            }
            Feature::OverduePeaksPerContract => {
                self.ratio(schema::OVERDUE_PEAKS_LAST_2Y, schema::NUM_CONTRACTS)
            }
            Feature::MonthOverdueScaled => self
                .max_across(schema::MONTH_OVERDUE_FRAGMENT)
                .into_iter()
                .map(|value| value / DAYS_PER_MONTH)
                .collect(),
            Feature::PaydayContractsLog => log_column(self.numeric(schema::NUM_CONTRACT_PDL)),
            Feature::OtherContractsLog => log_column(self.numeric(schema::NUM_CONTRACT_OTHER)),
            Feature::RecentContractStartsLog => {
                log_column(self.numeric(schema::NUM_CONTRACTS_STARTED_6M))
            }
            Feature::OverdueToInstalment => {
                self.ratio(schema::OVERDUE_AMOUNT, schema::INSTALMENT_AMOUNT)
            }
            Feature::SubprimeClassification => {
                self.label_in(schema::CLASSIFICATION, &schema::SUBPRIME_CLASSES)
            }
            Feature::HighDti3m => self.threshold(schema::DTI_3M, HIGH_DTI_3M_CUTOFF),
            Feature::ManyPhoneNumbers => {
                self.threshold(schema::NUM_PHONE_NUMBERS, PHONE_NUMBER_CUTOFF)
            }
            Feature::ManyAddresses => self.threshold(schema::NUM_ADDRESSES, ADDRESS_CUTOFF),
        }
    }
}

fn log_column(values: Vec<f64>) -> Vec<f64> {
    values.into_iter().map(log1p).collect()
}
