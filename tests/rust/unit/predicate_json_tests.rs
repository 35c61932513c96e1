use cypherweave::parameters::ParameterTable;
use cypherweave::predicate::{split_by_operator, PredicateError, StatementMode, Where, WhereParams};
use cypherweave::value::Value;
use serde_json::json;

fn params(json: serde_json::Value) -> WhereParams {
    serde_json::from_value(json).expect("filters should deserialize")
}

#[test]
fn test_json_filters_compile_in_insertion_order() {
    let mut table = ParameterTable::new();
    let predicate = Where::new(
        params(json!({
            "node": {
                "age": {"gte": 18, "lt": 65},
                "deleted": null,
                "tags": {"_in": "admin"},
                "email": {"ne": null}
            }
        })),
        &mut table,
    )
    .unwrap();

    assert_eq!(
        predicate.statement(StatementMode::Text).unwrap(),
        "node.age >= $age AND node.age < $age__aaaa AND node.deleted IS NULL \
         AND $tags IN node.tags AND node.email IS NOT NULL"
    );
    assert_eq!(
        serde_json::to_value(&table).unwrap(),
        json!({"age": 18, "age__aaaa": 65, "tags": "admin"})
    );
}

#[test]
fn test_json_literal_operands() {
    let mut table = ParameterTable::new();
    let predicate = Where::new(
        params(json!({"o": {"total": {"gt": {"literal": "u.limit"}}, "owner": {"literal": "u.id"}}})),
        &mut table,
    )
    .unwrap();
    assert_eq!(predicate.text(), "o.total > u.limit AND o.owner = u.id");
    assert!(table.is_empty());
}

#[test]
fn test_unknown_operator_is_rejected() {
    let result: Result<WhereParams, _> = serde_json::from_value(json!({"n": {"a": {"like": "x"}}}));
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Unknown operator 'like'"), "{message}");
}

#[test]
fn test_object_mode_spec_examples() {
    let mut table = ParameterTable::new();
    let predicate = Where::new(params(json!({"node": {"a": 1}})), &mut table).unwrap();
    assert_eq!(predicate.statement(StatementMode::Object).unwrap(), "{ a: $a }");

    let mut table = ParameterTable::new();
    let predicate = Where::new(params(json!({"node": {"a": {"gt": 1}}})), &mut table).unwrap();
    assert!(matches!(
        predicate.statement(StatementMode::Object),
        Err(PredicateError::UnsupportedMode(_))
    ));
}

#[test]
fn test_split_feeds_both_modes() {
    let filters = params(json!({"n": {"id": 7, "age": {"gte": 21}}}));
    let split = split_by_operator(filters.get("n").unwrap());

    let mut table = ParameterTable::new();
    let bracket = Where::new(WhereParams::for_identifier("n", split.equality), &mut table).unwrap();
    let predicate = Where::new(WhereParams::for_identifier("n", split.predicate), &mut table).unwrap();
    assert_eq!(bracket.object().unwrap(), "{ id: $id }");
    assert_eq!(predicate.text(), "n.age >= $age");
    assert_eq!(table.get("id"), Some(&Value::Integer(7)));
}
