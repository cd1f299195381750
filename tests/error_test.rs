use std::io;

use nodebaker::catalog::Category;
use nodebaker::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::JsonError(_)));
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::UnknownVariant { category: Category::Db, variant: "oracle".to_string() };
    assert_eq!(err.to_string(), "Unknown variant 'oracle' for category 'db'.");

    let err = Error::NoVariantSelected { category: Category::Server };
    assert_eq!(err.to_string(), "No variant selected for mandatory category 'server'.");

    let err = Error::MissingParameter {
        parameter: "port".to_string(),
        descriptor: "server/express".to_string(),
    };
    assert_eq!(err.to_string(), "Missing parameter 'port' required by 'server/express'.");
}

#[test]
fn test_conflict_display_names_both_origins() {
    let err = Error::DependencyConflict {
        name: "drizzle-orm".to_string(),
        first: "^1.0".to_string(),
        first_origin: "db/a".to_string(),
        second: "^2.0".to_string(),
        second_origin: "server/b".to_string(),
    };
    let message = err.to_string();
    assert!(message.contains("drizzle-orm"));
    assert!(message.contains("'^1.0' (from db/a)"));
    assert!(message.contains("'^2.0' (from server/b)"));
}
