use std::sync::Arc;
use std::thread;

use rule_rail::prelude::*;
use rule_rail::{ALL_RULE_SETS, DEFAULT_RULE_SET};

#[derive(Debug, Default, Clone)]
struct Customer {
    surname: Option<String>,
    forename: String,
    customer_discount: f64,
    is_preferred_customer: bool,
    email: String,
}

fn tagged_validator() -> Validator<Customer> {
    Validator::<Customer>::builder()
        .rule_for("email", |c| &c.email, |rule| rule.not_empty())
        .rule_set("A", |b| b.rule_for("surname", |c| &c.surname, |rule| rule.not_null()))
        .rule_set("B", |b| {
            b.rule_for("forename", |c| &c.forename, |rule| rule.not_empty())
                .rule_set("C", |b| b.rule_for("customer_discount", |c| &c.customer_discount, |rule| rule.greater_than(0.0)))
        })
        .build()
        .unwrap()
}

fn paths(result: &ValidationResult) -> Vec<String> {
    result.iter().map(|f| f.property_path().to_string()).collect()
}

fn validate_with_sets(validator: &Validator<Customer>, options: ValidationOptions) -> ValidationResult {
    validator.validate_with(ValidationContext::new(&Customer::default()).with_options(options)).unwrap()
}

#[test]
fn required_surname_gives_exactly_one_failure() {
    let validator = Validator::<Customer>::builder()
        .rule_for("surname", |c| &c.surname, |rule| rule.not_null().with_message("Surname cannot be null."))
        .rule_for("forename", |c| &c.forename, |rule| rule.not_empty())
        .build()
        .unwrap();

    let customer = Customer { surname: None, forename: "John".into(), ..Customer::default() };
    let result = validator.validate(&customer).unwrap();
    assert!(!result.is_valid());
    assert_eq!(result.len(), 1);
    assert_eq!(result.failures()[0].property_path(), "surname");
    assert_eq!(result.failures()[0].message(), "Surname cannot be null.");

    let customer = Customer { surname: Some("Doe".into()), ..customer };
    assert!(validator.validate(&customer).unwrap().is_valid());
}

#[test]
fn preferred_customer_discount_rule() {
    let validator = Validator::<Customer>::builder()
        .rule_for("customer_discount", |c| &c.customer_discount, |rule| {
            rule.greater_than(0.0).when(|c| c.is_preferred_customer)
        })
        .build()
        .unwrap();

    let customer = Customer { customer_discount: 0.0, is_preferred_customer: true, ..Customer::default() };
    let result = validator.validate(&customer).unwrap();
    assert_eq!(paths(&result), ["customer_discount"]);

    let customer = Customer { is_preferred_customer: false, ..customer };
    assert!(validator.validate(&customer).unwrap().is_valid());
}

#[test]
fn default_options_run_only_untagged_rules() {
    let result = validate_with_sets(&tagged_validator(), ValidationOptions::new());
    assert_eq!(paths(&result), ["email"]);
    assert_eq!(result.rule_sets_executed(), [DEFAULT_RULE_SET.to_string()]);
}

#[test]
fn requested_rule_sets_partition_exactly() {
    let validator = tagged_validator();

    let result = validate_with_sets(&validator, ValidationOptions::new().include_rule_set("A"));
    assert_eq!(paths(&result), ["surname"]);

    let result = validate_with_sets(&validator, ValidationOptions::new().include_rule_sets(["B", "C"]));
    assert_eq!(paths(&result), ["forename", "customer_discount"]);

    let result = validate_with_sets(&validator, ValidationOptions::new().include_rule_set("A").include_rules_not_in_rule_set());
    assert_eq!(paths(&result), ["email", "surname"]);

    let result = validate_with_sets(&validator, ValidationOptions::new().include_all_rule_sets());
    assert_eq!(paths(&result), ["email", "surname", "forename", "customer_discount"]);

    let result = validate_with_sets(&validator, ValidationOptions::new().include_rule_set(ALL_RULE_SETS));
    assert_eq!(result.len(), 4);

    let result = validate_with_sets(&validator, ValidationOptions::new().include_rule_set("Unknown"));
    assert!(result.is_valid());
}

#[test]
fn excluded_rules_do_not_evaluate_their_conditions() {
    let validator = Validator::<Customer>::builder()
        .rule_set("Never", |b| {
            b.rule_for("email", |c| &c.email, |rule| {
                rule.not_empty().when(|_| panic!("condition of an excluded rule was evaluated"))
            })
        })
        .build()
        .unwrap();
    assert!(validator.validate(&Customer::default()).unwrap().is_valid());
}

#[test]
fn rule_sets_propagate_to_child_validators() {
    #[derive(Debug, Default)]
    struct Account {
        owner: Customer,
    }

    let owner_validator = Validator::<Customer>::builder()
        .rule_for("email", |c| &c.email, |rule| rule.not_empty())
        .rule_set("Strict", |b| b.rule_for("surname", |c| &c.surname, |rule| rule.not_null()))
        .build()
        .unwrap();

    let validator = Validator::<Account>::builder()
        .rule_set("Strict", |b| b.rule_for("owner", |a| &a.owner, |rule| rule.set_validator(owner_validator)))
        .build()
        .unwrap();

    let account = Account::default();
    assert!(validator.validate(&account).unwrap().is_valid());

    let options = ValidationOptions::new().include_rule_set("Strict");
    let result = validator.validate_with(ValidationContext::new(&account).with_options(options)).unwrap();
    assert_eq!(paths(&result), ["owner.surname"]);
}

#[test]
fn when_unless_and_otherwise_scope_blocks_of_rules() {
    let validator = Validator::<Customer>::builder()
        .when(|c| c.is_preferred_customer, |b| {
            b.rule_for("customer_discount", |c| &c.customer_discount, |rule| rule.greater_than(0.0))
                .unless(|c| c.email.ends_with("@staff.example"), |b| {
                    b.rule_for("surname", |c| &c.surname, |rule| rule.not_null())
                })
        })
        .otherwise(|b| b.rule_for("customer_discount", |c| &c.customer_discount, |rule| rule.equal(0.0)))
        .build()
        .unwrap();

    let preferred = Customer { is_preferred_customer: true, ..Customer::default() };
    assert_eq!(paths(&validator.validate(&preferred).unwrap()), ["customer_discount", "surname"]);

    let staff = Customer { email: "ann@staff.example".into(), ..preferred };
    assert_eq!(paths(&validator.validate(&staff).unwrap()), ["customer_discount"]);

    let regular = Customer { customer_discount: 3.0, ..Customer::default() };
    assert_eq!(paths(&validator.validate(&regular).unwrap()), ["customer_discount"]);
    assert!(validator.validate(&Customer::default()).unwrap().is_valid());
}

#[test]
fn otherwise_without_when_is_a_usage_error() {
    let err = Validator::<Customer>::builder()
        .otherwise(|b| b.rule_for("email", |c| &c.email, |rule| rule.not_empty()))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::OtherwiseWithoutWhen));

    let err = Validator::<Customer>::builder()
        .when(|c| c.is_preferred_customer, |b| b)
        .rule_for("email", |c| &c.email, |rule| rule.not_empty())
        .otherwise(|b| b)
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::OtherwiseWithoutWhen));
}

#[test]
fn class_level_stop_halts_after_the_first_failing_rule() {
    let validator = Validator::<Customer>::builder()
        .class_level_cascade(CascadeMode::Stop)
        .rule_for("email", |c| &c.email, |rule| rule.not_empty().when(|c| c.is_preferred_customer))
        .rule_for("forename", |c| &c.forename, |rule| rule.not_empty())
        .rule_for("surname", |c| &c.surname, |rule| rule.not_null())
        .build()
        .unwrap();

    // A skipped rule does not count as a failure.
    assert_eq!(paths(&validator.validate(&Customer::default()).unwrap()), ["forename"]);
}

#[test]
fn pre_validate_can_reject_with_its_own_failures() {
    let validator = Validator::<Customer>::builder()
        .pre_validate(|customer, result| match customer {
            Some(customer) if customer.email == "blocked@example.com" => {
                result.add_failure(ValidationFailure::new("email", "Blocked address."));
                false
            }
            _ => true,
        })
        .rule_for("forename", |c| &c.forename, |rule| rule.not_empty())
        .build()
        .unwrap();

    let blocked = Customer { email: "blocked@example.com".into(), ..Customer::default() };
    let result = validator.validate(&blocked).unwrap();
    assert_eq!(paths(&result), ["email"]);

    let result = validator.validate(&Customer::default()).unwrap();
    assert_eq!(paths(&result), ["forename"]);
}

#[test]
fn pre_validate_rejection_without_failures_adds_a_generic_one() {
    let validator = Validator::<Customer>::builder().pre_validate(|_, _| false).build().unwrap();
    let result = validator.validate(&Customer::default()).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.failures()[0].error_code(), rule_rail::validator::PRE_VALIDATE_CODE);
    assert_eq!(result.failures()[0].message(), "The instance was rejected before validation.");
}

#[test]
fn absent_instance_reports_a_single_failure() {
    let validator = Validator::<Customer>::builder()
        .rule_for("forename", |c| &c.forename, |rule| rule.not_empty())
        .build()
        .unwrap();
    let result = validator.validate_with(ValidationContext::absent()).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.failures()[0].property_path(), "");
    assert_eq!(result.failures()[0].error_code(), rule_rail::validator::NULL_INSTANCE_CODE);
}

#[test]
fn ensure_valid_returns_an_aggregate_error() {
    let validator = Validator::<Customer>::builder()
        .rule_for("surname", |c| &c.surname, |rule| rule.not_null())
        .rule_for("forename", |c| &c.forename, |rule| rule.not_empty())
        .build()
        .unwrap();

    let err = validator.ensure_valid(&Customer::default()).unwrap_err();
    assert!(!err.is_engine_fault());
    assert_eq!(
        err.to_string(),
        "Validation failed:\n -- surname: 'Surname' must not be null.\n -- forename: 'Forename' must not be empty."
    );
    let ValidationError::Failed(result) = err else { panic!("expected an aggregate error") };
    assert_eq!(result.len(), 2);

    let customer = Customer { surname: Some("Doe".into()), forename: "John".into(), ..Customer::default() };
    assert!(validator.ensure_valid(&customer).is_ok());
}

#[test]
fn throw_on_failures_turns_invalid_results_into_errors() {
    let validator = Validator::<Customer>::builder()
        .rule_for("surname", |c| &c.surname, |rule| rule.not_null())
        .build()
        .unwrap();

    let customer = Customer::default();
    let options = ValidationOptions::new().throw_on_failures();
    let err = validator.validate_with(ValidationContext::new(&customer).with_options(options.clone())).unwrap_err();
    assert_eq!(err.result().map(ValidationResult::len), Some(1));

    let customer = Customer { surname: Some("Doe".into()), ..Customer::default() };
    assert!(validator.validate_with(ValidationContext::new(&customer).with_options(options)).is_ok());
}

#[test]
fn validation_is_idempotent() {
    let validator = tagged_validator();
    let customer = Customer { customer_discount: -1.0, ..Customer::default() };
    let options = ValidationOptions::new().include_all_rule_sets();

    let first = validator.validate_with(ValidationContext::new(&customer).with_options(options.clone())).unwrap();
    let second = validator.validate_with(ValidationContext::new(&customer).with_options(options)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn validators_are_shared_across_threads() {
    let validator = Arc::new(tagged_validator());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let customer = Customer { email: if i % 2 == 0 { String::new() } else { "x@y.z".into() }, ..Customer::default() };
                validator.validate(&customer).unwrap().len()
            })
        })
        .collect();

    let counts: Vec<_> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
    assert_eq!(counts, [1, 0, 1, 0]);
}

#[test]
fn usage_errors_surface_from_build() {
    let err = Validator::<Customer>::builder()
        .rule_for("email", |c| &c.email, |rule| rule.matches("(unclosed"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::InvalidPattern { .. }));
    assert!(err.to_string().starts_with("invalid pattern `(unclosed` for `email`"));

    let err = Validator::<Customer>::builder()
        .rule_for("email", |c| &c.email, |rule| rule.with_message("orphan"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::NoCurrentCheck { method: "with_message", .. }));

    let err = Validator::<Customer>::builder()
        .rule_for("email", |c| &c.email, |rule| rule.length(5, 2))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::InvertedRange { .. }));

    let err = Validator::<Customer>::builder()
        .rule_for("email", |c| &c.email, |rule| rule.not_empty().with_message("{Unknown} is wrong"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "Unknown"));

    let err = Validator::<Customer>::builder()
        .rule_for("email", |c| &c.email, |rule| {
            rule.custom(|_, _| Ok::<_, std::convert::Infallible>(())).with_message("ignored")
        })
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::MessageNotApplicable { .. }));
}

#[test]
fn validator_debug_summarizes_its_shape() {
    let text = format!("{:?}", tagged_validator());
    assert!(text.contains("rules: 4"));
    assert!(text.contains(r#"properties: ["email", "surname", "forename", "customer_discount"]"#));
    assert!(text.contains("Customer"));
}
