use cypherweave::parameters::ParameterTable;
use cypherweave::query_builder::{Clause, QueryBuilder, QueryBuilderError};
use cypherweave::value::Value;
use serde_json::json;

fn clauses(json: serde_json::Value) -> Vec<Clause> {
    let serde_json::Value::Array(items) = json else {
        panic!("clause list must be an array");
    };
    items
        .into_iter()
        .map(Clause::from_json)
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn test_upsert_statement_from_descriptors() {
    let statement = QueryBuilder::from_clauses(
        clauses(json!([
            {"merge": {"node": {"identifier": "u", "label": "User", "properties": {"email": "a@b.c"}}}},
            {"onCreateSet": {"identifier": "u", "properties": {"created": {"literal": "timestamp()"}}}},
            {"onMatchSet": {"identifier": "u", "properties": {"visits": 1}}},
            {"return": [{"expression": "u.email", "alias": "email"}]}
        ])),
        ParameterTable::new(),
    )
    .unwrap()
    .build();

    assert_eq!(
        statement.text,
        "MERGE (u:`User` { email: $email }) ON CREATE SET u.created = timestamp() \
         ON MATCH SET u.visits = $visits RETURN u.email AS email"
    );
    assert_eq!(statement.parameters.get("visits"), Some(&Value::Integer(1)));
}

#[test]
fn test_caller_table_is_extended_not_replaced() {
    let seeded = ParameterTable::from_entries([("tenant", "acme"), ("name", "taken")]).unwrap();
    let statement = QueryBuilder::from_clauses(
        clauses(json!([
            {"match": {"pattern": {"node": {"identifier": "n", "label": "Team", "where": {"name": "core"}}}}},
            {"where": {"n": {"tenant": {"literal": "$tenant"}}}},
            {"return": ["n"]}
        ])),
        seeded,
    )
    .unwrap()
    .build();

    assert_eq!(
        statement.text,
        "MATCH (n:`Team` { name: $name__aaaa }) WHERE n.tenant = $tenant RETURN n"
    );
    assert_eq!(statement.parameters.get("name"), Some(&Value::from("taken")));
    assert_eq!(statement.parameters.get("name__aaaa"), Some(&Value::from("core")));
    assert_eq!(statement.parameters.len(), 3);
}

#[test]
fn test_unknown_clause_descriptor() {
    let err = Clause::from_json(json!({"upsert": {}})).unwrap_err();
    assert!(matches!(
        err,
        QueryBuilderError::InvalidClause { clause: "descriptor", .. }
    ));
}
