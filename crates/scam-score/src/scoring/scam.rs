use super::features::{Feature, FeatureFrame};

/// Fixed weights of the composite scam score. Every weight is positive, so the score is
/// non-negative and non-decreasing in each feature.
pub const SCAM_SCORE_TERMS: [(f64, Feature); 11] = [
    (0.7, Feature::CancellationFlag),
    (0.6, Feature::NegativeStatus),
    (0.5, Feature::OverdueInstalmentsLog),
    (0.4, Feature::OverduePeaksPerContract),
    (0.3, Feature::MonthOverdueScaled),
    (0.25, Feature::PaydayContractsLog),
    (0.2, Feature::OverdueToInstalment),
    (0.2, Feature::SubprimeClassification),
    (0.15, Feature::HighDti3m),
    (0.1, Feature::ManyPhoneNumbers),
    (0.1, Feature::ManyAddresses),
];

pub const FRAUD_FLAG_THRESHOLD: f64 = 0.7;

pub fn scam_scores(frame: &FeatureFrame) -> Vec<f64> {
    frame.weighted_sum(&SCAM_SCORE_TERMS)
}

pub fn is_fraud(scam_score: f64) -> bool {
    scam_score > FRAUD_FLAG_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::normalizer::normalize;
    use crate::scoring::table::{Cell, RecordTable};

    fn frame(columns: &[&str], row: Vec<Cell>) -> FeatureFrame {
        let mut table = RecordTable::new(columns.iter().map(|name| name.to_string()).collect());
        table.push_row(row);
        FeatureFrame::resolve(&normalize(table))
    }

    #[test]
    fn cancellation_and_negative_status_sum_to_one_point_three() {
        let frame = frame(
            &["was_canceled", "NEGATIVESTATUS"],
            vec![Cell::Number(1.0), Cell::Text("Y".into())],
        );

        let scores = scam_scores(&frame);
        assert!((scores[0] - 1.3).abs() < 1e-12);
        assert!(is_fraud(scores[0]));
    }

    #[test]
    fn boolean_cancellation_counts_as_a_flag() {
        let mut table = RecordTable::new(vec!["was_canceled".to_string()]);
        table.push_row(vec![Cell::Text("True".into())]);
        table.push_row(vec![Cell::Text("False".into())]);
        table.push_row(vec![Cell::Bool(true)]);

        let scores = scam_scores(&FeatureFrame::resolve(&normalize(table)));
        assert_eq!(scores, vec![0.7, 0.0, 0.7]);
    }

    #[test]
    fn empty_record_scores_zero() {
        let frame = frame(&["ID"], vec![Cell::Text("42".into())]);
        assert_eq!(scam_scores(&frame), vec![0.0]);
    }

    #[test]
    fn fraud_flag_is_strictly_above_threshold() {
        assert!(!is_fraud(0.7));
        assert!(is_fraud(0.7000001));
        assert!(!is_fraud(0.0));
    }

    #[test]
    fn log_and_ratio_terms_contribute() {
        let frame = frame(
            &[
                "overdueinstalmentcount_po_subektu",
                "SUM_SIG_PEAKS_OVERDUECOUNT_LAST_2Y",
                "NUM_CONTRACTS",
            ],
            vec![Cell::Number(std::f64::consts::E - 1.0), Cell::Number(4.0), Cell::Number(1.0)],
        );

        let expected = 0.5 * 1.0 + 0.4 * 2.0;
        assert!((scam_scores(&frame)[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn every_weight_is_positive() {
        assert!(SCAM_SCORE_TERMS.iter().all(|(weight, _)| *weight > 0.0));
    }
}
