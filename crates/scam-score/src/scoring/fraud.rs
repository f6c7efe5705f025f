use super::features::{Feature, FeatureFrame};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alternative fraud-score formulas. Exactly one is active for a scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FraudStrategy {
    #[default]
    #[serde(rename = "Fraud_Risk_Score")]
    FraudRisk,
    #[serde(rename = "Behavioral_Fraud_Score")]
    Behavioral,
    #[serde(rename = "Contract_Activity_Fraud_Score")]
    ContractActivity,
}

const FRAUD_RISK_TERMS: [(f64, Feature); 6] = [
    (1.2, Feature::NegativeStatus),
    (0.8, Feature::RecentContractStartsLog),
    (0.5, Feature::ManyPhoneNumbers),
    (0.5, Feature::ManyAddresses),
    (1.0, Feature::CancellationFlag),
    (0.6, Feature::PaydayContractsLog),
];

const BEHAVIORAL_TERMS: [(f64, Feature); 5] = [
    (0.9, Feature::NegativeStatus),
    (0.7, Feature::ManyPhoneNumbers),
    (0.7, Feature::ManyAddresses),
    (1.1, Feature::CancellationFlag),
    (0.3, Feature::OtherContractsLog),
];

const CONTRACT_ACTIVITY_TERMS: [(f64, Feature); 5] = [
    (0.4, Feature::NegativeStatus),
    (1.0, Feature::RecentContractStartsLog),
    (0.3, Feature::CancellationFlag),
    (0.9, Feature::PaydayContractsLog),
    (0.5, Feature::OtherContractsLog),
];

impl FraudStrategy {
    pub const ALL: [FraudStrategy; 3] = [
        FraudStrategy::FraudRisk,
        FraudStrategy::Behavioral,
        FraudStrategy::ContractActivity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FraudStrategy::FraudRisk => "Fraud_Risk_Score",
            FraudStrategy::Behavioral => "Behavioral_Fraud_Score",
            FraudStrategy::ContractActivity => "Contract_Activity_Fraud_Score",
        }
    }

    pub fn terms(&self) -> &'static [(f64, Feature)] {
        match self {
            FraudStrategy::FraudRisk => &FRAUD_RISK_TERMS,
            FraudStrategy::Behavioral => &BEHAVIORAL_TERMS,
            FraudStrategy::ContractActivity => &CONTRACT_ACTIVITY_TERMS,
        }
    }

    pub fn fraud_scores(&self, frame: &FeatureFrame) -> Vec<f64> {
        frame.weighted_sum(self.terms())
    }
}

impl fmt::Display for FraudStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fraud strategy '{0}', expected one of Fraud_Risk_Score, Behavioral_Fraud_Score, Contract_Activity_Fraud_Score")]
pub struct UnknownStrategy(pub String);

impl FromStr for FraudStrategy {
    type Err = UnknownStrategy;

    /// Accepts the canonical names case-insensitively, with `-` or ` ` in place of `_`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "fraud_risk_score" | "fraud_risk" => Ok(FraudStrategy::FraudRisk),
            "behavioral_fraud_score" | "behavioral" => Ok(FraudStrategy::Behavioral),
            "contract_activity_fraud_score" | "contract_activity" => {
                Ok(FraudStrategy::ContractActivity)
            }
            _ => Err(UnknownStrategy(raw.to_string())),
        }
    }
}

/// Names on the wire go through `FromStr`, so HTTP accepts what the CLI accepts.
impl<'de> Deserialize<'de> for FraudStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Logistic transform, held strictly inside (0, 1) even where `f64` would saturate.
pub fn fraud_probability(fraud_score: f64) -> f64 {
    let probability = 1.0 / (1.0 + (-fraud_score).exp());
    probability.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON)
}
