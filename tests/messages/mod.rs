use std::borrow::Cow;

use rule_rail::messages::{split_display_name, LanguageManager, MessageCatalog, MessageTemplate};
use rule_rail::prelude::*;
use rule_rail::CheckKind;

#[derive(Debug, Default)]
struct Signup {
    user_name: String,
    email_address: Option<String>,
    age: u32,
    tags: Vec<String>,
}

/// User check with no template anywhere.
struct Unlisted;

impl<T> PropertyCheck<T, u32> for Unlisted {
    fn kind(&self) -> CheckKind {
        CheckKind::Named("unlisted")
    }

    fn is_valid(&self, _cx: &mut CheckContext<'_, T>, value: &u32) -> Result<bool, ValidationError> {
        Ok(*value != 0)
    }
}

fn message_of(validator: &Validator<Signup>, signup: &Signup) -> String {
    let result = validator.validate(signup).unwrap();
    assert_eq!(result.len(), 1, "expected one failure, got {result:?}");
    result.failures()[0].message().to_string()
}

#[test]
fn default_messages_use_split_display_names() {
    let validator = Validator::<Signup>::builder()
        .rule_for("email_address", |s| &s.email_address, |rule| rule.not_null())
        .build()
        .unwrap();
    assert_eq!(message_of(&validator, &Signup::default()), "'Email Address' must not be null.");
}

#[test]
fn with_name_replaces_the_display_name_only() {
    let validator = Validator::<Signup>::builder()
        .rule_for("user_name", |s| &s.user_name, |rule| rule.not_empty().with_name("Login"))
        .build()
        .unwrap();

    let result = validator.validate(&Signup::default()).unwrap();
    assert_eq!(result.failures()[0].property_path(), "user_name");
    assert_eq!(result.failures()[0].message(), "'Login' must not be empty.");
}

#[test]
fn built_in_placeholders_render_value_and_path() {
    let validator = Validator::<Signup>::builder()
        .rule_for("age", |s| &s.age, |rule| {
            rule.inclusive_between(18, 130).with_message("{PropertyPath}: {PropertyValue} is outside {From}..={To}")
        })
        .build()
        .unwrap();

    let signup = Signup { age: 12, ..Signup::default() };
    assert_eq!(message_of(&validator, &signup), "age: 12 is outside 18..=130");
}

#[test]
fn default_range_message_lists_bounds_and_value() {
    let validator = Validator::<Signup>::builder()
        .rule_for("age", |s| &s.age, |rule| rule.inclusive_between(18, 130))
        .build()
        .unwrap();

    let signup = Signup { age: 140, ..Signup::default() };
    assert_eq!(message_of(&validator, &signup), "'Age' must be between 18 and 130. You entered 140.");
}

#[test]
fn length_messages_report_the_entered_length() {
    let validator = Validator::<Signup>::builder()
        .rule_for("user_name", |s| &s.user_name, |rule| rule.length(3, 8))
        .build()
        .unwrap();

    let signup = Signup { user_name: "ab".into(), ..Signup::default() };
    assert_eq!(
        message_of(&validator, &signup),
        "'User Name' must be between 3 and 8 characters. You entered 2 characters."
    );
}

#[test]
fn dynamic_messages_are_used_verbatim() {
    let validator = Validator::<Signup>::builder()
        .rule_for("tags", |s| &s.tags, |rule| {
            rule.not_empty().with_message_fn(|s| format!("{{PropertyName}} of {} needs a tag", s.user_name))
        })
        .build()
        .unwrap();

    let signup = Signup { user_name: "ann".into(), ..Signup::default() };
    assert_eq!(message_of(&validator, &signup), "{PropertyName} of ann needs a tag");
}

#[test]
fn malformed_templates_are_rejected_at_build() {
    for template in ["{PropertyName", "{}", "{Property{Name}}"] {
        let err = Validator::<Signup>::builder()
            .rule_for("user_name", |s| &s.user_name, |rule| rule.not_empty().with_message(template))
            .build()
            .unwrap_err();
        assert!(matches!(err, UsageError::MalformedTemplate { .. }), "{template}: {err:?}");
    }
}

#[test]
fn placeholders_of_other_checks_are_unresolved() {
    let err = Validator::<Signup>::builder()
        .rule_for("user_name", |s| &s.user_name, |rule| rule.not_empty().with_message("{MaxLength} at most"))
        .build()
        .unwrap_err();
    assert_eq!(err.to_string(), "unresolved placeholder `{MaxLength}` in message for `user_name`");
}

#[test]
fn comparison_property_is_only_available_for_property_comparands() {
    let err = Validator::<Signup>::builder()
        .rule_for("age", |s| &s.age, |rule| rule.not_equal(0).with_message("{PropertyName} vs {ComparisonProperty}"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "ComparisonProperty"));

    let err = Validator::<Signup>::builder()
        .rule_for("age", |s| &s.age, |rule| rule.greater_than(17).with_message("{ComparisonProperty}"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "ComparisonProperty"));
}

#[test]
fn length_bounds_are_only_available_when_set() {
    let err = Validator::<Signup>::builder()
        .rule_for("user_name", |s| &s.user_name, |rule| rule.min_length(5).with_message("max {MaxLength}"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "MaxLength"));

    let err = Validator::<Signup>::builder()
        .rule_for("user_name", |s| &s.user_name, |rule| rule.max_length(5).with_message("min {MinLength}"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "MinLength"));

    let validator = Validator::<Signup>::builder()
        .rule_for("user_name", |s| &s.user_name, |rule| {
            rule.min_length(5).with_message("{PropertyName} needs {MinLength}, got {TotalLength}")
        })
        .build()
        .unwrap();
    let signup = Signup { user_name: "ann".into(), ..Signup::default() };
    assert_eq!(message_of(&validator, &signup), "User Name needs 5, got 3");
}

#[test]
fn named_check_without_template_needs_a_message() {
    let err = Validator::<Signup>::builder()
        .rule_for("age", |s| &s.age, |rule| rule.set_check(Unlisted))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        UsageError::MissingDefaultMessage { ref check, ref culture, .. } if check == "unlisted" && culture == "en"
    ));

    let validator = Validator::<Signup>::builder()
        .rule_for("age", |s| &s.age, |rule| rule.set_check(Unlisted).with_message("{PropertyName} is unlisted"))
        .build()
        .unwrap();
    let result = validator.validate(&Signup::default()).unwrap();
    assert_eq!(result.failures()[0].message(), "Age is unlisted");
    assert_eq!(result.failures()[0].error_code(), "unlisted");
}

#[test]
fn self_reporting_checks_reject_message_overrides() {
    let child = Validator::<String>::builder().build().unwrap();
    let err = Validator::<Signup>::builder()
        .rule_for("user_name", |s| &s.user_name, |rule| rule.set_validator(child).with_message("never shown"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::MessageNotApplicable { ref check, .. } if check == "child_validator"));
}

#[test]
fn modifiers_without_a_check_are_usage_errors() {
    let err = Validator::<Signup>::builder()
        .rule_for("user_name", |s| &s.user_name, |rule| rule.with_error_code("E1"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UsageError::NoCurrentCheck { method: "with_error_code", .. }));
    assert_eq!(err.to_string(), "`with_error_code` on `user_name` has no preceding check to apply to");
}

#[test]
fn language_manager_falls_back_through_cultures() {
    let mut catalog = LanguageManager::new();
    catalog.add_translation("de", "not_empty", "'{PropertyName}' darf nicht leer sein.");
    catalog.add_translation("de-AT", "not_empty", "'{PropertyName}' darf ned leer sein.");

    assert_eq!(catalog.get_string(Some("de-AT"), "not_empty"), Some("'{PropertyName}' darf ned leer sein."));
    assert_eq!(catalog.get_string(Some("de-CH"), "not_empty"), Some("'{PropertyName}' darf nicht leer sein."));
    assert_eq!(catalog.get_string(Some("fr"), "not_empty"), Some("'{PropertyName}' must not be empty."));
    assert_eq!(catalog.get_string(Some("de"), "matches"), Some("'{PropertyName}' is not in the correct format."));
    assert_eq!(catalog.template(None, "no_such_key"), None);
}

#[test]
fn templates_render_unknown_names_verbatim() {
    let template = MessageTemplate::parse("{PropertyName} and {Other}").unwrap();
    let text = template.render(|name| (name == "PropertyName").then_some(Cow::Borrowed("Tags")));
    assert_eq!(text, "Tags and {Other}");
    assert_eq!(template.as_str(), "{PropertyName} and {Other}");
}

#[test]
fn display_names_come_from_the_last_path_segment() {
    assert_eq!(split_display_name("orders[2].unit_cost"), "Unit Cost");
    assert_eq!(split_display_name("isPreferredCustomer"), "Is Preferred Customer");
    assert_eq!(split_display_name("address-line"), "Address Line");
}
