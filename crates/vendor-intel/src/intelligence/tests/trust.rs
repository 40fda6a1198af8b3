use std::sync::Arc;

use super::common::*;
use crate::intelligence::domain::VendorId;
use crate::intelligence::trust::{
    compute_trust_score, derive_penalty_pct, otd_score, penalty_score, price_score,
    quality_score, response_score, TrustScoreError, TrustScoreInputs, TrustScoreService,
};

#[test]
fn worked_example_matches_hand_calculation() {
    let inputs = TrustScoreInputs {
        on_time_pct: Some(90.0),
        quality_ppm: Some(400.0),
        quote_resp_hrs: Some(20.0),
        price_index: Some(102.0),
        penalty_pct: Some(0.0),
    };

    // 0.35*90 + 0.25*60 + 0.15*100 + 0.15*98 + 0.10*100
    assert_eq!(compute_trust_score(&inputs, &scoring_config()), 86.2);
}

#[test]
fn all_missing_inputs_score_ten() {
    let score = compute_trust_score(&TrustScoreInputs::default(), &scoring_config());
    assert_eq!(score, 10.0);
}

#[test]
fn quality_score_anchors() {
    assert_eq!(quality_score(Some(0.0), 1000.0), 100.0);
    assert_eq!(quality_score(Some(400.0), 1000.0), 60.0);
    assert_eq!(quality_score(Some(1000.0), 1000.0), 0.0);
    assert_eq!(quality_score(Some(2000.0), 1000.0), 0.0);
    assert_eq!(quality_score(Some(50_000.0), 1000.0), 0.0);
    assert_eq!(quality_score(None, 1000.0), 0.0);
}

#[test]
fn quality_score_respects_configured_target() {
    assert_eq!(quality_score(Some(250.0), 500.0), 50.0);
}

#[test]
fn response_score_is_non_increasing_in_hours() {
    let probes = [0.0, 12.0, 24.0, 24.5, 48.0, 60.0, 72.0, 96.0, 110.0, 120.0, 121.0, 500.0];
    let scores: Vec<f64> = probes.iter().map(|h| response_score(Some(*h))).collect();
    for pair in scores.windows(2) {
        assert!(pair[1] <= pair[0], "score rose between probes: {scores:?}");
    }
    assert_eq!(response_score(Some(24.0)), 100.0);
    assert_eq!(response_score(Some(121.0)), 10.0);
    assert_eq!(response_score(None), 0.0);
}

#[test]
fn price_baseline_scores_maximum() {
    assert_eq!(price_score(Some(100.0)), 100.0);
    assert_eq!(price_score(Some(102.0)), 98.0);
    assert_eq!(price_score(Some(300.0)), 0.0);
    assert_eq!(price_score(None), 0.0);
}

#[test]
fn sub_scores_stay_in_bounds_for_extreme_inputs() {
    for raw in [-1e9, -5.0, 0.0, 0.1, 99.9, 150.0, 1e9] {
        for score in [
            otd_score(Some(raw)),
            quality_score(Some(raw), 1000.0),
            response_score(Some(raw)),
            price_score(Some(raw)),
            penalty_score(Some(raw)),
        ] {
            assert!((0.0..=100.0).contains(&score), "{raw} produced {score}");
        }
    }
}

#[test]
fn composite_is_always_clamped() {
    let inputs = TrustScoreInputs {
        on_time_pct: Some(1e9),
        quality_ppm: Some(-1e9),
        quote_resp_hrs: Some(-10.0),
        price_index: Some(100.0),
        penalty_pct: Some(-50.0),
    };
    let score = compute_trust_score(&inputs, &scoring_config());
    assert!((0.0..=100.0).contains(&score));
}

#[test]
fn penalty_counts_documents_expiring_within_a_month() {
    let vendor = vendor(1, "V-001", "Acme Metals");
    let soon = today() + chrono::Duration::days(20);
    let docs = vec![document(1, "CR Certificate", Some(soon), true)];

    assert_eq!(derive_penalty_pct(&vendor, &docs, today()), 20.0);
}

#[test]
fn penalty_ignores_documents_beyond_the_lookahead() {
    let vendor = vendor(1, "V-001", "Acme Metals");
    let far = today() + chrono::Duration::days(90);
    let docs = vec![document(1, "CR Certificate", Some(far), true)];

    assert_eq!(derive_penalty_pct(&vendor, &docs, today()), 0.0);
}

#[test]
fn penalty_counts_invalid_documents_regardless_of_expiry() {
    let vendor = vendor(1, "V-001", "Acme Metals");
    let docs = vec![document(1, "TAX Card", None, false)];

    assert_eq!(derive_penalty_pct(&vendor, &docs, today()), 20.0);
}

#[test]
fn penalty_stacks_low_otd_and_high_ppm() {
    let mut flagged = vendor(2, "V-002", "Slowline Freight");
    flagged.on_time_pct = Some(70.0);
    flagged.quality_ppm = Some(4500.0);
    let soon = today() + chrono::Duration::days(5);
    let docs = vec![document(2, "ISO 9001", Some(soon), true)];

    assert_eq!(derive_penalty_pct(&flagged, &docs, today()), 50.0);
}

#[test]
fn penalty_ignores_other_vendors_documents() {
    let vendor = vendor(1, "V-001", "Acme Metals");
    let docs = vec![document(9, "CR", Some(today()), false)];

    assert_eq!(derive_penalty_pct(&vendor, &docs, today()), 0.0);
}

#[test]
fn recompute_vendor_score_persists_the_result() {
    let repository = Arc::new(MemoryRepository::with_vendors(vec![vendor(
        1, "V-001", "Acme Metals",
    )]));
    let service = TrustScoreService::new(repository.clone(), scoring_config());

    let score = service
        .recompute_vendor_score(VendorId(1), today())
        .expect("vendor scores");

    assert!((0.0..=100.0).contains(&score));
    assert_eq!(repository.stored_trust_score(VendorId(1)), Some(score));
}

#[test]
fn recompute_unknown_vendor_fails_with_not_found() {
    let repository = Arc::new(MemoryRepository::default());
    let service = TrustScoreService::new(repository, scoring_config());

    match service.recompute_vendor_score(VendorId(42), today()) {
        Err(TrustScoreError::VendorNotFound(id)) => assert_eq!(id, VendorId(42)),
        other => panic!("expected not-found error, got {other:?}"),
    }
}

#[test]
fn recompute_all_updates_every_vendor() {
    let repository = Arc::new(MemoryRepository::with_vendors(vec![
        vendor(1, "V-001", "Acme Metals"),
        vendor(2, "V-002", "Bolt Supply"),
        vendor(3, "V-003", "Crate Works"),
    ]));
    let service = TrustScoreService::new(repository.clone(), scoring_config());

    let outcome = service.recompute_all(today()).expect("batch runs");

    assert_eq!(outcome.updated, 3);
    assert!(outcome.failures.is_empty());
    for id in [1, 2, 3] {
        assert!(repository.stored_trust_score(VendorId(id)).is_some());
    }
}

#[test]
fn batch_records_failures_without_blocking_siblings() {
    let repository = Arc::new(FailingUpdateRepository {
        inner: MemoryRepository::with_vendors(vec![
            vendor(1, "V-001", "Acme Metals"),
            vendor(2, "V-002", "Bolt Supply"),
        ]),
        failing: VendorId(1),
    });
    let service = TrustScoreService::new(repository.clone(), scoring_config());

    let outcome = service.recompute_all(today()).expect("batch runs");

    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].vendor_id, VendorId(1));
    assert!(outcome.failures[0].reason.contains("unavailable"));
    assert!(repository.inner.stored_trust_score(VendorId(2)).is_some());
    assert!(repository.inner.stored_trust_score(VendorId(1)).is_none());
}
