use metrics_exporter_prometheus::PrometheusHandle;
use scam_score::ingest::Delimiter;
use scam_score::scoring::{CreditDecision, FraudStrategy};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_delimiter(raw: &str) -> Result<Delimiter, String> {
    raw.parse::<Delimiter>().map_err(|err| err.to_string())
}

pub(crate) fn parse_strategy(raw: &str) -> Result<FraudStrategy, String> {
    raw.parse::<FraudStrategy>().map_err(|err| err.to_string())
}

pub(crate) fn parse_decision(raw: &str) -> Result<CreditDecision, String> {
    CreditDecision::parse(raw)
        .ok_or_else(|| format!("'{raw}' is not a credit decision (approve, review, reject)"))
}
