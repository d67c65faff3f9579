//! Unit tests for error types and the diagnostic reporter.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::errors::reporter::Reporter;
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(10, Rc::new("test.c-".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_line(), 10);
}

#[test]
fn test_error_at_line() {
    let error = Error::at_line(
        ErrorImpl::VariableNotDeclared {
            variable: "y".to_string(),
        },
        7,
    );

    assert_eq!(error.get_position().0, 7);
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_semantic_error_names() {
    let cases = [
        (
            ErrorImpl::FunctionNotDeclared {
                function: "f".to_string(),
            },
            "FunctionNotDeclared",
        ),
        (
            ErrorImpl::FunctionAlreadyDeclared {
                function: "f".to_string(),
            },
            "FunctionAlreadyDeclared",
        ),
        (
            ErrorImpl::VoidOperand {
                function: "f".to_string(),
            },
            "VoidOperand",
        ),
        (
            ErrorImpl::VoidAssignment {
                function: "f".to_string(),
            },
            "VoidAssignment",
        ),
        (
            ErrorImpl::NameUsedForFunction {
                name: "f".to_string(),
            },
            "NameUsedForFunction",
        ),
        (ErrorImpl::MainNotDeclared, "MainNotDeclared"),
    ];

    for (error_impl, name) in cases {
        assert_eq!(Error::at_line(error_impl, 1).get_error_name(), name);
    }
}

#[test]
fn test_error_display() {
    let error = Error::at_line(
        ErrorImpl::VariableNotDeclared {
            variable: "y".to_string(),
        },
        2,
    );

    assert_eq!(
        error.to_string(),
        "[VariableNotDeclared]: variable \"y\" not declared. Line: 2"
    );
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(0, Rc::new("test.c-".to_string())),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        Position(0, Rc::new("test.c-".to_string())),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("`}`")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_reporter_writes_and_flags() {
    let mut reporter = Reporter::new(Vec::new());
    assert!(!reporter.failed());

    reporter.report(Error::at_line(
        ErrorImpl::FunctionNotDeclared {
            function: "g".to_string(),
        },
        4,
    ));
    reporter.report(Error::at_line(ErrorImpl::MainNotDeclared, 0));

    assert!(reporter.failed());
    assert_eq!(reporter.diagnostics().len(), 2);

    let listing = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Semantic error [FunctionNotDeclared]: function \"g\" not declared. Line: 4",
            "Semantic error [MainNotDeclared]: function \"main\" not declared. Line: 0",
        ]
    );
}

#[test]
fn test_reporter_clear() {
    let mut reporter = Reporter::silent();
    reporter.report(Error::at_line(ErrorImpl::MainNotDeclared, 0));
    assert!(reporter.failed());

    reporter.clear();
    assert!(!reporter.failed());
    assert!(reporter.diagnostics().is_empty());
}
