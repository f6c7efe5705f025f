use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::{
    BatchSummary, Cell, CreditDecision, FraudStrategy, RecordTable, RiskEngine, ScoredRow,
};
use crate::ingest::{CsvIngest, Delimiter, IngestError};

/// Service-level defaults applied when a request leaves a choice open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringDefaults {
    pub strategy: FraudStrategy,
    pub delimiter: Delimiter,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScoreBatchRequest {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub records: Option<Vec<BTreeMap<String, Cell>>>,
    #[serde(default)]
    pub strategy: Option<FraudStrategy>,
    #[serde(default)]
    pub include_rows: bool,
    #[serde(default)]
    pub decision: Option<CreditDecision>,
}

#[derive(Debug, Serialize)]
pub struct ScoreBatchResponse {
    pub scored_at: DateTime<Utc>,
    pub summary: BatchSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<ScoredRow>>,
}

#[derive(Debug, thiserror::Error)]
enum BatchInputError {
    #[error("provide exactly one of `csv` or `records`")]
    AmbiguousSource,
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// Router builder exposing the scoring engine over HTTP.
pub fn scoring_router(defaults: ScoringDefaults) -> Router {
    Router::new()
        .route("/api/v1/scoring/batch", post(score_batch_handler))
        .route("/api/v1/scoring/strategies", get(strategies_handler))
        .with_state(Arc::new(defaults))
}

fn load_table(
    request: &mut ScoreBatchRequest,
    defaults: &ScoringDefaults,
) -> Result<RecordTable, BatchInputError> {
    match (request.csv.take(), request.records.take()) {
        (Some(csv), None) => {
            let delimiter = match request.delimiter.as_deref() {
                Some(raw) => raw.parse::<Delimiter>()?,
                None => defaults.delimiter,
            };
            Ok(CsvIngest::from_reader(Cursor::new(csv.into_bytes()), delimiter)?)
        }
        (None, Some(records)) => Ok(RecordTable::from_records(records)),
        _ => Err(BatchInputError::AmbiguousSource),
    }
}

pub(crate) async fn score_batch_handler(
    State(defaults): State<Arc<ScoringDefaults>>,
    Json(mut request): Json<ScoreBatchRequest>,
) -> Response {
    let table = match load_table(&mut request, &defaults) {
        Ok(table) => table,
        Err(error) => {
            warn!(%error, "rejected scoring batch");
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let strategy = request.strategy.unwrap_or(defaults.strategy);
    let scored = RiskEngine::new(strategy).score(table);
    let rows = request
        .include_rows
        .then(|| scored.rows(request.decision));

    let response = ScoreBatchResponse {
        scored_at: Utc::now(),
        summary: scored.summary(),
        rows,
    };
    (StatusCode::OK, Json(response)).into_response()
}

pub(crate) async fn strategies_handler(
    State(defaults): State<Arc<ScoringDefaults>>,
) -> Json<serde_json::Value> {
    let names: Vec<&str> = FraudStrategy::ALL.iter().map(FraudStrategy::name).collect();
    Json(json!({
        "default": defaults.strategy.name(),
        "strategies": names,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn batch_endpoint_scores_csv_payload() {
        let request = ScoreBatchRequest {
            csv: Some("ID;was_canceled;NEGATIVESTATUS\nA-1;1;Y\nA-2;0;N\n".to_string()),
            delimiter: Some(";".to_string()),
            include_rows: true,
            ..ScoreBatchRequest::default()
        };

        let response =
            score_batch_handler(State(Arc::new(ScoringDefaults::default())), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["summary"]["records"], 2);
        assert_eq!(body["summary"]["flagged_fraud"], 1);
        assert_eq!(body["summary"]["strategy"], "Fraud_Risk_Score");
        assert_eq!(body["rows"][0]["record"]["ID"], "A-1");
        assert_eq!(body["rows"][0]["assessment"]["credit_decision"], "reject");
        assert_eq!(body["rows"][1]["assessment"]["dti_risk"], "unknown");
        assert!(body["rows"][1]["assessment"]["dti"].is_null());
    }

    #[tokio::test]
    async fn batch_endpoint_rejects_ambiguous_sources() {
        let request = ScoreBatchRequest::default();

        let response =
            score_batch_handler(State(Arc::new(ScoringDefaults::default())), Json(request)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn router_accepts_json_records_and_strategy_override() {
        let app = scoring_router(ScoringDefaults::default());
        let payload = json!({
            "records": [
                { "NEGATIVESTATUS": "Y", "NUM_PHONENUMBERS": 5 },
                { "NEGATIVESTATUS": null }
            ],
            "strategy": "Behavioral_Fraud_Score",
            "include_rows": true,
            "decision": "reject"
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/scoring/batch")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["summary"]["strategy"], "Behavioral_Fraud_Score");
        assert_eq!(body["summary"]["decisions"]["reject"], 1);
        let rows = body["rows"].as_array().expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["record"]["NEGATIVESTATUS"], "y");
    }

    #[tokio::test]
    async fn request_strategy_accepts_cli_spellings() {
        let request: ScoreBatchRequest = serde_json::from_value(json!({
            "records": [{ "NEGATIVESTATUS": "Y", "was_canceled": true }],
            "strategy": "behavioral",
            "decision": "Reject"
        }))
        .expect("request deserializes");
        assert_eq!(request.strategy, Some(FraudStrategy::Behavioral));
        assert_eq!(request.decision, Some(CreditDecision::Reject));

        let response =
            score_batch_handler(State(Arc::new(ScoringDefaults::default())), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["summary"]["strategy"], "Behavioral_Fraud_Score");
        assert_eq!(body["summary"]["flagged_fraud"], 1);
    }

    #[tokio::test]
    async fn strategies_endpoint_lists_all_names() {
        let app = scoring_router(ScoringDefaults {
            strategy: FraudStrategy::ContractActivity,
            delimiter: Delimiter::Comma,
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/scoring/strategies")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");

        let body = body_json(response).await;
        assert_eq!(body["default"], "Contract_Activity_Fraud_Score");
        assert_eq!(body["strategies"].as_array().expect("list").len(), 3);
    }
}
