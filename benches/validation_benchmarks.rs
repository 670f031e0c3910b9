use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;
use verdict::verdict_validation::*;

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

fn default_messages() -> Messages {
    [
        ("notEmpty", "{{name}} is required"),
        ("length", "{{name}} has the wrong length"),
    ]
    .into_iter()
    .map(|(rule, message)| (rule.to_string(), message.to_string()))
    .collect()
}

fn bench_rule_chains(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_chains");

    let chain = RuleChain::new().not_empty().string_type().email();
    let valid = json!("user@example.com");
    let invalid = json!(42);

    group.bench_function("is_valid", |b| {
        b.iter(|| chain.is_valid(black_box(&valid)))
    });

    group.bench_function("assert_failing", |b| {
        b.iter(|| chain.assert(black_box(&invalid)).is_err())
    });

    group.finish();
}

fn bench_message_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_resolution");

    let spec = RuleSpec::from(RuleChain::new().not_empty().string_type().length(Some(3), None))
        .with_rule_message("stringType", "{{name}} must be text");
    let call_messages: Messages = [("notEmpty".to_string(), "Fill in {{name}}".to_string())]
        .into_iter()
        .collect();

    group.bench_function("default_messages_only", |b| {
        b.iter(|| {
            let mut validator = Validator::default();
            validator
                .validate_field(black_box(Value::Null), &spec, "title", None, None)
                .map(|v| v.count())
        })
    });

    group.bench_function("all_sources", |b| {
        b.iter(|| {
            let mut validator = Validator::new(true, default_messages());
            validator
                .validate_field(
                    black_box(Value::Null),
                    &spec,
                    "title",
                    None,
                    Some(&call_messages),
                )
                .map(|v| v.count())
        })
    });

    group.finish();
}

fn bench_bulk_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_validation");

    let rules = signup_rules();
    let valid = json!({"username": "alice42", "email": "alice@example.com", "age": 30});
    let invalid = json!({"username": "a!", "email": "nope", "age": 12});

    group.bench_function("valid_object", |b| {
        b.iter(|| {
            let mut validator = Validator::default();
            validator
                .validate(Input::Object(black_box(valid.clone())), &rules, None, None)
                .map(|v| v.is_valid())
        })
    });

    group.bench_function("invalid_object", |b| {
        b.iter(|| {
            let mut validator = Validator::default();
            validator
                .validate(Input::Object(black_box(invalid.clone())), &rules, Some("signup"), None)
                .map(|v| v.count())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_rule_chains,
    bench_message_resolution,
    bench_bulk_validation
);
criterion_main!(benches);
