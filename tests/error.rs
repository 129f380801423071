use std::path::PathBuf;

use serde_json::Value;
use tau::error::{exit_codes, Error, JsonError};

#[test]
fn exit_code_user_error() {
    let err = Error::InvalidDueDate("2902".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert_eq!(
        Error::NotFound("task ID 4".to_string()).exit_code(),
        exit_codes::USER_ERROR
    );
}

#[test]
fn exit_code_operation_failed() {
    let err = Error::CorruptRecord {
        path: PathBuf::from("task/abc"),
        message: "EOF while parsing".to_string(),
    };
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    assert_eq!(
        Error::LockFailed(PathBuf::from("month/0624.lock")).exit_code(),
        exit_codes::OPERATION_FAILED
    );
}

#[test]
fn exit_code_internal_error() {
    let err = Error::IndexInvariantViolation("2 open tasks share ID 0".to_string());
    assert_eq!(err.exit_code(), exit_codes::INTERNAL_ERROR);
}

#[test]
fn messages_are_stable() {
    assert_eq!(
        Error::InvalidDueDate("2902".to_string()).to_string(),
        "due date 2902 is not valid"
    );
    assert_eq!(
        Error::NotFound("task ID 7".to_string()).to_string(),
        "task ID 7 not found"
    );
}

#[test]
fn details_include_record_fields() {
    let err = Error::CorruptRecord {
        path: PathBuf::from("task/abc"),
        message: "expected value".to_string(),
    };
    let details = err.details().expect("details");
    assert_eq!(details["path"], Value::String("task/abc".to_string()));
    assert_eq!(details["message"], Value::String("expected value".to_string()));
}

#[test]
fn json_error_includes_details() {
    let err = Error::InvalidDueDate("3102".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert_eq!(json.kind, "user_error");
    assert_eq!(json.message, "due date 3102 is not valid");
    let details = json.details.expect("details");
    assert_eq!(details["due"], Value::String("3102".to_string()));
}

#[test]
fn kinds_follow_exit_codes() {
    assert_eq!(Error::MalformedDate("12".to_string()).kind(), "user_error");
    assert_eq!(Error::Editor("exit status: 1".to_string()).kind(), "operation_failed");
    assert_eq!(
        Error::IndexInvariantViolation("2 open tasks share ID 0".to_string()).kind(),
        "internal_error"
    );
}
