//! Integration tests for verdict-validation

use serde_json::{json, Value};
use verdict_core::HttpRequest;
use verdict_validation::*;

fn messages(pairs: &[(&str, &str)]) -> Messages {
    pairs
        .iter()
        .map(|(rule, message)| (rule.to_string(), message.to_string()))
        .collect()
}

fn signup_rules() -> FieldRules {
    let mut rules = FieldRules::new();
    rules.insert(
        "username".to_string(),
        RuleChain::new().not_empty().alnum().length(Some(3), Some(20)).into(),
    );
    rules.insert(
        "email".to_string(),
        RuleSpec::from(RuleChain::new().not_empty().email())
            .with_rule_message("email", "{{input}} is not an email address"),
    );
    rules.insert(
        "age".to_string(),
        RuleChain::new().optional(RuleChain::new().int_type().min(18.0)).into(),
    );
    rules
}

#[test]
fn test_valid_signup() {
    let input = json!({"username": "alice42", "email": "alice@example.com", "age": 30});
    let mut validator = Validator::default();
    validator
        .validate(Input::Object(input), &signup_rules(), None, None)
        .unwrap();

    assert!(validator.is_valid());
    assert_eq!(validator.count(), 0);
    assert_eq!(validator.value("age"), Some(&json!(30)));
}

#[test]
fn test_invalid_signup_collects_every_field() {
    let input = json!({"username": "a!", "email": "nope", "age": 12});
    let mut validator = Validator::default();
    validator
        .validate(Input::Object(input), &signup_rules(), None, None)
        .unwrap();

    assert_eq!(validator.count(), 3);
    assert_eq!(
        validator.error_messages("username"),
        [
            "username must contain only letters (a-z) and digits (0-9)",
            "username must have a length between 3 and 20"
        ]
    );
    assert_eq!(validator.first_error("email"), "\"nope\" is not an email address");
    assert_eq!(validator.first_error("age"), "age must be greater than or equal to 18");
}

#[test]
fn test_optional_field_may_be_absent() {
    let input = json!({"username": "alice42", "email": "alice@example.com"});
    let mut validator = Validator::default();
    validator
        .validate(Input::Object(input), &signup_rules(), None, None)
        .unwrap();

    assert!(validator.is_valid());
    assert_eq!(validator.value("age"), Some(&Value::Null));
}

#[test]
fn test_precedence_across_sources() {
    let mut validator = Validator::new(true, messages(&[("notEmpty", "D1"), ("stringType", "D2")]));
    let mut rules = FieldRules::new();
    rules.insert(
        "title".to_string(),
        RuleSpec::from(RuleChain::new().not_empty().string_type())
            .with_rule_message("notEmpty", "S1"),
    );

    validator
        .validate_mapping(
            &serde_json::Map::new(),
            &rules,
            None,
            Some(&messages(&[("stringType", "C1")])),
        )
        .unwrap();

    assert_eq!(
        serde_json::to_value(validator.errors()).unwrap(),
        json!({"title": {"notEmpty": "S1", "stringType": "C1"}})
    );
}

#[test]
fn test_overrides_only_apply_to_failed_rules() {
    let mut validator = Validator::new(false, messages(&[("email", "Bad email")]));
    let spec = RuleSpec::from(RuleChain::new().not_empty().email());

    validator
        .validate_field(json!("someone@example.com"), &spec, "email", None, None)
        .unwrap();
    validator
        .validate_field(Value::Null, &spec, "backup", None, None)
        .unwrap();

    assert!(validator.get_errors("email").is_empty());
    assert_eq!(
        validator.error_messages("backup"),
        ["backup must not be empty", "Bad email"]
    );
}

#[test]
fn test_nested_rules_report_leaf_names() {
    let mut validator = Validator::new(true, Messages::new());
    let spec = RuleSpec::from(
        RuleChain::new().each(RuleChain::new().string_type()),
    )
    .with_rule_message("stringType", "{{name}} entries must be text");

    validator
        .validate_field(json!(["a", 1]), &spec, "tags", None, None)
        .unwrap();

    let entries = validator.get_errors("tags");
    assert_eq!(entries[0].rule.as_deref(), Some("each"));
    assert!(entries
        .iter()
        .any(|entry| entry == &ErrorEntry::keyed("stringType", "tags entries must be text")));
}

#[test]
fn test_request_validation() {
    let request = HttpRequest::new("POST", "/signup")
        .with_query("age", "21")
        .with_json(&json!({"username": "bob", "email": "bob@example.com"}))
        .unwrap();

    let mut rules = FieldRules::new();
    rules.insert("username".to_string(), RuleChain::new().not_empty().into());
    rules.insert("age".to_string(), RuleChain::new().digit().into());
    rules.insert("token".to_string(), RuleChain::new().not_empty().into());

    let mut validator = Validator::default();
    validator
        .validate(Input::Request(&request), &rules, Some("signup"), None)
        .unwrap();

    assert_eq!(validator.value(("signup", "age")), Some(&json!("21")));
    assert_eq!(validator.error(("signup", "token"), 0), "token must not be empty");
    assert_eq!(validator.count(), 1);

    let response = ValidationPipe::error_response(&validator);
    assert_eq!(response.status, 400);
    assert_eq!(
        response.body_string().map(|b| serde_json::from_str::<Value>(&b).unwrap()),
        Some(json!({"errors": {"signup": {"token": ["token must not be empty"]}}}))
    );
}

#[test]
fn test_structured_options_from_json() {
    let spec = RuleSpec::from_options(
        "name",
        Some(RuleChain::new().not_empty()),
        &json!({"message": "Name is required"}),
    )
    .unwrap();

    let mut validator = Validator::default();
    validator
        .validate_field(Value::Null, &spec, "name", None, None)
        .unwrap();

    assert_eq!(validator.error_messages("name"), ["Name is required"]);
}

#[test]
fn test_configuration_errors_are_invalid_arguments() {
    let mut validator = Validator::default();
    let mut rules = FieldRules::new();
    rules.insert("name".to_string(), Overrides::default().into());

    let err = validator
        .validate(Input::Object(json!({"name": "x"})), &rules, None, None)
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let err = validator
        .validate(Input::Object(json!("text")), &FieldRules::new(), None, None)
        .unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_custom_rule_name() {
    let postal_code = normalize_rule_name("shipping::PostalCode");
    assert_eq!(postal_code, "postalCode");

    let spec: RuleSpec = RuleChain::new()
        .callback(
            "postalCode",
            |value| value.as_str().is_some_and(|s| s.len() == 5),
            "{{name}} must be a postal code",
        )
        .into();
    let mut validator = Validator::new(false, messages(&[("postalCode", "Invalid ZIP")]));
    validator
        .validate_field(json!("123"), &spec, "zip", None, None)
        .unwrap();

    assert_eq!(validator.first_error("zip"), "Invalid ZIP");
}

#[test]
fn test_groups_and_removal() {
    let mut validator = Validator::default();
    validator
        .set_errors(("billing", "city"), ["required"])
        .set_errors(("shipping", "city"), ["required"])
        .add_error("terms", "must be accepted");

    assert_eq!(validator.count(), 3);

    validator.remove_group_errors("billing");
    assert_eq!(validator.count(), 2);
    assert!(validator.group_errors("billing").iter().all(|(_, e)| e.is_empty()));

    validator.remove_errors("terms").remove_errors(("shipping", "city"));
    assert!(validator.is_valid());
}
