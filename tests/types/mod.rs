use rule_rail::prelude::*;
use rule_rail::{FailureFormatConfig, FailureFormatter, MessageArguments};

fn sample() -> ValidationResult {
    [
        ValidationFailure::new("surname", "Surname cannot be null.").with_error_code("not_null"),
        ValidationFailure::new("postcode", "Postcode is too short.")
            .with_error_code("min_length")
            .with_severity(Severity::Warning),
        ValidationFailure::new("", "Rejected.").with_severity(Severity::Info),
    ]
    .into_iter()
    .collect()
}

#[test]
fn result_queries() {
    let result = sample();
    assert!(!result.is_valid());
    assert_eq!(result.len(), 3);
    assert_eq!(result.failures_for("postcode").count(), 1);
    assert_eq!(result.failures_for("missing").count(), 0);
    assert_eq!(result.failures_with_severity(Severity::Error).count(), 1);
    assert_eq!(result.failures_with_severity(Severity::Warning).count(), 2);
    assert_eq!(result.failures_with_severity(Severity::Info).count(), 3);
    assert!(ValidationResult::new().is_valid());
}

#[test]
fn warnings_still_make_a_result_invalid() {
    let result: ValidationResult =
        std::iter::once(ValidationFailure::new("x", "soft").with_severity(Severity::Info)).collect();
    assert!(!result.is_valid());
    assert!(result.into_result().is_err());
}

#[test]
fn merge_appends_in_order() {
    let mut first = sample();
    let second: ValidationResult = std::iter::once(ValidationFailure::new("email", "Bad email.")).collect();
    first.merge(second);

    let paths: Vec<_> = first.iter().map(ValidationFailure::property_path).collect();
    assert_eq!(paths, ["surname", "postcode", "", "email"]);
    assert_eq!(first.into_failures().len(), 4);
}

#[test]
fn result_display_lists_messages() {
    assert_eq!(sample().to_string(), "Surname cannot be null.\nPostcode is too short.\nRejected.");
    assert_eq!(ValidationResult::new().to_string(), "");
}

#[test]
fn failure_defaults_and_display() {
    let failure = ValidationFailure::new("orders[0].total", "Too low.");
    assert_eq!(failure.error_code(), "custom");
    assert_eq!(failure.severity(), Severity::Error);
    assert_eq!(failure.attempted_value(), None);
    assert!(failure.formatted_arguments().is_empty());
    assert_eq!(failure.to_string(), "orders[0].total: Too low.");
    assert_eq!(ValidationFailure::new("", "Rejected.").to_string(), "Rejected.");
}

#[test]
fn message_arguments_keep_insertion_order() {
    let mut arguments = MessageArguments::new();
    arguments.append("PropertyName", "Total");
    arguments.append("ComparisonValue", 0.5);
    arguments.append("PropertyName", "Order Total");

    assert_eq!(arguments.get("PropertyName"), Some("Order Total"));
    assert!(arguments.contains("ComparisonValue"));
    assert_eq!(arguments.len(), 2);
    let names: Vec<_> = arguments.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["PropertyName", "ComparisonValue"]);
}

#[test]
fn default_formatter_matches_the_error_display() {
    let result = sample();
    let expected = "Validation failed:\n -- surname: Surname cannot be null.\n -- postcode: Postcode is too short.\n -- Rejected.";
    assert_eq!(result.to_string_with(&FailureFormatConfig::default()), expected);
    assert_eq!(ValidationError::Failed(result).to_string(), expected);
}

#[test]
fn formatter_presets() {
    let result = sample();

    assert_eq!(
        result.to_string_with(&FailureFormatConfig::compact()),
        "surname: Surname cannot be null. | postcode: Postcode is too short. | Rejected."
    );
    assert_eq!(
        result.to_string_with(&FailureFormatConfig::messages_only()),
        "Surname cannot be null.\nPostcode is too short.\nRejected."
    );
    assert_eq!(
        result.to_string_with(&FailureFormatConfig::compact().with_codes()),
        "surname: Surname cannot be null. [not_null] | postcode: Postcode is too short. [min_length] | Rejected. [custom]"
    );
    assert_eq!(
        result.to_string_with(&FailureFormatConfig::pretty()),
        "Validation failed:\n├─ surname: Surname cannot be null. Severity: Error\n├─ postcode: Postcode is too short. Severity: Warning\n└─ Rejected. Severity: Info"
    );
}

#[test]
fn custom_formatters_only_need_one_method() {
    struct Upper;

    impl FailureFormatter for Upper {
        fn format_failure(&self, failure: &ValidationFailure) -> String {
            failure.message().to_uppercase()
        }

        fn separator(&self) -> &str {
            "; "
        }
    }

    assert_eq!(sample().to_string_with(&Upper), "SURNAME CANNOT BE NULL.; POSTCODE IS TOO SHORT.; REJECTED.");
}

#[test]
fn error_accessors() {
    let failed = ValidationError::Failed(sample());
    assert_eq!(failed.result().map(ValidationResult::len), Some(3));
    assert!(!failed.is_engine_fault());

    let custom = ValidationError::custom("Custom validation exception: nope", sample());
    assert_eq!(custom.to_string(), "Custom validation exception: nope");
    assert!(custom.result().is_some());

    let engine = ValidationError::Engine { property: "total".into(), check: "must".into(), source: "boom".into() };
    assert!(engine.is_engine_fault());
    assert!(engine.result().is_none());
    assert_eq!(engine.to_string(), "check `must` on `total` failed to evaluate: boom");
    assert!(std::error::Error::source(&engine).is_some());

    let construction = ValidationError::from(UsageError::OtherwiseWithoutWhen);
    assert!(construction.is_engine_fault());
    assert_eq!(construction.to_string(), "lazy sub-validator construction failed: `otherwise` has no preceding `when` block");
}

#[cfg(feature = "serde")]
#[test]
fn results_serialize_with_serde() {
    let result = sample();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"property_path\":\"surname\""));
    assert!(json.contains("\"severity\":\"Warning\""));

    let back: ValidationResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
