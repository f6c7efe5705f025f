use serde::{Deserialize, Deserializer, Serialize};

const REJECT_THRESHOLD: f64 = 0.8;
const REVIEW_THRESHOLD: f64 = 0.6;

/// Final credit outcome for a scored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditDecision {
    Approve,
    Review,
    Reject,
}

impl CreditDecision {
    pub const ALL: [CreditDecision; 3] = [
        CreditDecision::Approve,
        CreditDecision::Review,
        CreditDecision::Reject,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CreditDecision::Approve => "approve",
            CreditDecision::Review => "review",
            CreditDecision::Reject => "reject",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approve" => Some(CreditDecision::Approve),
            "review" => Some(CreditDecision::Review),
            "reject" => Some(CreditDecision::Reject),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for CreditDecision {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        CreditDecision::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "'{raw}' is not a credit decision (approve, review, reject)"
            ))
        })
    }
}

/// Threshold cascade over the two risk signals; the first matching rule wins.
pub fn decide(scam_score: f64, fraud_probability: f64) -> CreditDecision {
    if scam_score > REJECT_THRESHOLD || fraud_probability > REJECT_THRESHOLD {
        return CreditDecision::Reject;
    }

    if scam_score > REVIEW_THRESHOLD || fraud_probability > REVIEW_THRESHOLD {
        return CreditDecision::Review;
    }

    CreditDecision::Approve
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_scam_score_rejects_regardless_of_probability() {
        for probability in [0.0001, 0.5, 0.7, 0.99] {
            assert_eq!(decide(0.81, probability), CreditDecision::Reject);
        }
    }

    #[test]
    fn high_probability_rejects() {
        assert_eq!(decide(0.0, 0.9), CreditDecision::Reject);
    }

    #[test]
    fn middle_band_goes_to_review() {
        assert_eq!(decide(0.8, 0.5), CreditDecision::Review);
        assert_eq!(decide(0.61, 0.5), CreditDecision::Review);
        assert_eq!(decide(0.1, 0.65), CreditDecision::Review);
    }

    #[test]
    fn low_signals_approve() {
        assert_eq!(decide(0.0, 0.5), CreditDecision::Approve);
        assert_eq!(decide(0.6, 0.6), CreditDecision::Approve);
    }

    #[test]
    fn labels_parse_back() {
        for decision in CreditDecision::ALL {
            assert_eq!(CreditDecision::parse(decision.label()), Some(decision));
        }
        assert_eq!(CreditDecision::parse("deny"), None);
    }

    #[test]
    fn deserialize_ignores_case() {
        let parsed: CreditDecision = serde_json::from_str("\"Reject\"").expect("deserialize");
        assert_eq!(parsed, CreditDecision::Reject);
        assert!(serde_json::from_str::<CreditDecision>("\"deny\"").is_err());
    }
}
