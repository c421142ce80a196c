//! Transaction validation vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use ilp_core::record::{RawTransaction, TransactionRecord};
use ilp_core::validate::TransactionValidator;
use ilp_core::ValidationError;

use vector_loader::load;

#[test]
fn transaction_vectors() {
    let files = [
        "txn_ok_terminal.json",
        "txn_ok_decimal_text.json",
        "txn_ok_zero.json",
        "txn_missing_agent.json",
        "txn_null_value.json",
        "txn_negative_value.json",
        "txn_value_not_number.json",
        "txn_agent_whitespace.json",
        "txn_agent_empty.json",
        "txn_agent_number.json",
    ];
    let validator = TransactionValidator::new();

    for f in files {
        let v = load(f);
        let raw: RawTransaction = serde_json::from_value(v.record.clone()).unwrap();
        let res = validator.validate(raw);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.client_code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let rec = res.expect("expected valid record");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(rec.agent_id(), ex["agent_id"].as_str().unwrap(), "vector={}", v.description);
        assert_eq!(rec.value_ghs(), ex["value_ghs"].as_f64().unwrap(), "vector={}", v.description);

        let keys: Vec<&str> = rec.metadata().keys().map(String::as_str).collect();
        let expected: Vec<&str> = ex["metadata_keys"]
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, expected, "vector={}", v.description);
    }
}

#[test]
fn missing_both_fields_reports_agent_first() {
    let err = TransactionValidator::new()
        .validate(RawTransaction::default())
        .unwrap_err();
    assert_eq!(err, ValidationError::MissingField("agent_id"));
}

#[test]
fn missing_value_reported_after_agent() {
    let err = TransactionValidator::new()
        .validate(RawTransaction::from_parts(Some("A4739"), None))
        .unwrap_err();
    assert_eq!(err, ValidationError::MissingField("value_ghs"));
}

#[test]
fn non_finite_typed_values_rejected() {
    let v = TransactionValidator::new();
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = v.check(TransactionRecord::new("A4739", bad)).unwrap_err();
        assert_eq!(err.client_code().as_str(), "INVALID_VALUE");
    }
}

#[test]
fn non_finite_decimal_text_rejected() {
    let raw: RawTransaction =
        serde_json::from_str(r#"{"agent_id":"A4739","value_ghs":"NaN"}"#).unwrap();
    let err = TransactionValidator::new().validate(raw).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidValue(_)));
}

#[test]
fn overlong_agent_rejected() {
    let id = "A".repeat(65);
    let err = TransactionValidator::new()
        .check(TransactionRecord::new(id, 1.0))
        .unwrap_err();
    assert!(matches!(err, ValidationError::InvalidAgentId(_)));
}

#[test]
fn success_returns_record_unchanged() {
    let rec = TransactionRecord::new("A4739", 250.75);
    let valid = TransactionValidator::new().check(rec.clone()).unwrap();
    assert_eq!(valid.into_inner(), rec);
}

#[test]
fn non_finite_parts_are_invalid_not_missing() {
    let v = TransactionValidator::new();
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = v
            .validate(RawTransaction::from_parts(Some("A4739"), Some(bad)))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue(_)), "value={bad}");
    }
}
