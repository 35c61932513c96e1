use super::*;
use crate::parameters::ParameterError;
use crate::utils::InvalidIdentifierError;

fn compile(params: WhereParams) -> (Where, ParameterTable) {
    let mut table = ParameterTable::new();
    let predicate = Where::new(params, &mut table).expect("predicate should compile");
    (predicate, table)
}

#[test]
fn test_gte_text() {
    let (predicate, table) = compile(WhereParams::new().with("node", "age", Condition::Gte(18.into())));
    assert_eq!(predicate.text(), "node.age >= $age");
    assert_eq!(table.get("age"), Some(&Value::Integer(18)));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_null_is_paramless() {
    let (predicate, table) = compile(WhereParams::new().with("node", "deleted", Value::Null));
    assert_eq!(predicate.statement(StatementMode::Text).unwrap(), "node.deleted IS NULL");
    assert!(table.is_empty());
}

#[test]
fn test_eq_and_ne_null_normalize() {
    let (predicate, table) = compile(
        WhereParams::new()
            .with("n", "a", Condition::Eq(Value::Null.into()))
            .with("n", "b", Condition::Ne(Value::Null.into()))
            .with("n", "c", WhereValue::conditions([Condition::Is, Condition::IsNot])),
    );
    assert_eq!(
        predicate.text(),
        "n.a IS NULL AND n.b IS NOT NULL AND n.c IS NULL AND n.c IS NOT NULL"
    );
    assert!(table.is_empty());
    assert!(predicate
        .entries()
        .iter()
        .all(|e| e.operand == EntryOperand::None));
}

#[test]
fn test_object_mode() {
    let (predicate, _) = compile(WhereParams::new().with("node", "a", 1));
    assert_eq!(predicate.statement(StatementMode::Object).unwrap(), "{ a: $a }");
}

#[test]
fn test_object_mode_rejects_comparison() {
    let (predicate, _) = compile(
        WhereParams::new()
            .with("node", "a", 1)
            .with("node", "b", Condition::Gt(2.into())),
    );
    assert_eq!(
        predicate.statement(StatementMode::Object),
        Err(PredicateError::UnsupportedMode(Operator::Gt))
    );
}

#[test]
fn test_object_mode_rejects_null() {
    let (predicate, _) = compile(WhereParams::new().with("n", "a", Value::Null));
    assert_eq!(
        predicate.object(),
        Err(PredicateError::UnsupportedMode(Operator::Is))
    );
}

#[test]
fn test_empty_object() {
    let (predicate, _) = compile(WhereParams::new());
    assert!(predicate.is_empty());
    assert_eq!(predicate.object().unwrap(), "{}");
    assert_eq!(predicate.text(), "");
}

#[test]
fn test_operator_keywords() {
    let (predicate, table) = compile(WhereParams::new().with(
        "n",
        "v",
        WhereValue::conditions([
            Condition::Eq(1.into()),
            Condition::Ne(2.into()),
            Condition::In(vec![3, 4].into()),
            Condition::Contains("x".into()),
            Condition::Gt(5.into()),
            Condition::Gte(6.into()),
            Condition::Lt(7.into()),
            Condition::Lte(8.into()),
        ]),
    ));
    assert_eq!(
        predicate.text(),
        "n.v = $v AND n.v <> $v__aaaa AND n.v IN $v__aaab AND n.v CONTAINS $v__aaac \
         AND n.v > $v__aaad AND n.v >= $v__aaae AND n.v < $v__aaaf AND n.v <= $v__aaag"
    );
    assert_eq!(table.len(), 8);
    assert_eq!(table.get("v__aaab"), Some(&Value::from(vec![3, 4])));
}

#[test]
fn test_reverse_in() {
    let (predicate, table) =
        compile(WhereParams::new().with("n", "tags", Condition::ReverseIn("rust".into())));
    assert_eq!(predicate.text(), "$tags IN n.tags");
    assert_eq!(table.get("tags"), Some(&Value::from("rust")));
}

#[test]
fn test_literal_operands_are_not_bound() {
    let (predicate, table) = compile(
        WhereParams::new()
            .with("n", "price", Condition::Gt(Operand::literal("m.price")))
            .with("n", "owner", WhereValue::literal("m.owner")),
    );
    assert_eq!(predicate.text(), "n.price > m.price AND n.owner = m.owner");
    assert!(table.is_empty());
}

#[test]
fn test_unsafe_property_is_escaped() {
    let (predicate, table) = compile(WhereParams::new().with("n", "first name", "Ann"));
    assert_eq!(predicate.text(), "n.`first name` = $first_name");
    assert_eq!(predicate.object().unwrap(), "{ `first name`: $first_name }");
    assert!(table.contains("first_name"));
}

#[test]
fn test_invalid_identifier_rejected() {
    let mut table = ParameterTable::new();
    let result = Where::new(WhereParams::new().with("n) DELETE (m", "a", 1), &mut table);
    assert_eq!(
        result,
        Err(PredicateError::InvalidIdentifier(InvalidIdentifierError(
            "n) DELETE (m".to_string()
        )))
    );
    assert!(table.is_empty());
}

#[test]
fn test_empty_identifier_renders_bare_property() {
    let (predicate, _) = compile(WhereParams::new().with("", "a", 1));
    assert_eq!(predicate.text(), "a = $a");
}

#[test]
fn test_map_value_is_not_bindable() {
    let mut table = ParameterTable::new();
    let result = Where::new(
        WhereParams::new().with("n", "meta", Value::Map(Default::default())),
        &mut table,
    );
    assert!(matches!(
        result,
        Err(PredicateError::UnsupportedValue { value_type: "map", .. })
    ));
}

#[test]
fn test_failed_compile_leaves_table_untouched() {
    let mut table = ParameterTable::from_entries([("seed", 0)]).unwrap();
    let result = Where::new(
        WhereParams::new()
            .with("n", "a", 1)
            .with("n", "meta", Value::Map(Default::default())),
        &mut table,
    );
    assert!(result.is_err());
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["seed"]);
}

#[test]
fn test_failed_add_params_can_be_retried() {
    let mut table = ParameterTable::new();
    let mut predicate = Where::new(WhereParams::new().with("n", "a", 1), &mut table).unwrap();

    let bad = WhereParams::new().with("n", "m", Value::Map(Default::default()));
    assert!(matches!(
        predicate.add_params(bad, &mut table),
        Err(PredicateError::UnsupportedValue { value_type: "map", .. })
    ));
    assert_eq!(predicate.text(), "n.a = $a");
    assert_eq!(predicate.owned_parameters(), ["a".to_string()]);
    assert_eq!(table.names().collect::<Vec<_>>(), vec!["a"]);

    predicate
        .add_params(WhereParams::new().with("n", "b", 2), &mut table)
        .unwrap();
    assert_eq!(predicate.text(), "n.a = $a AND n.b = $b");
    assert_eq!(table.len(), 2);
}

#[test]
fn test_add_params_is_idempotent() {
    let params = WhereParams::new()
        .with("n", "age", Condition::Gte(18.into()))
        .with("n", "name", "Ann");

    let mut table = ParameterTable::new();
    let mut predicate = Where::new(params.clone(), &mut table).unwrap();
    let once = predicate.text();
    let table_once = table.clone();

    predicate.add_params(params, &mut table).unwrap();
    assert_eq!(predicate.text(), once);
    assert_eq!(table, table_once);
    assert_eq!(predicate.entries().len(), 2);
}

#[test]
fn test_add_params_last_write_wins() {
    let mut table = ParameterTable::new();
    let mut predicate =
        Where::new(WhereParams::new().with("n", "age", 18).with("n", "x", 1), &mut table).unwrap();
    predicate
        .add_params(WhereParams::new().with("n", "age", Condition::Lt(65.into())), &mut table)
        .unwrap();

    assert_eq!(predicate.text(), "n.age < $age AND n.x = $x");
    assert_eq!(table.get("age"), Some(&Value::Integer(65)));
    assert_eq!(table.len(), 2);
}

#[test]
fn test_shares_table_with_other_bindings() {
    let mut table = ParameterTable::from_entries([("age", 1)]).unwrap();
    let mut predicate = Where::new(WhereParams::new().with("n", "age", 30), &mut table).unwrap();
    assert_eq!(predicate.text(), "n.age = $age__aaaa");

    // refining must not touch bindings owned by someone else
    predicate
        .add_params(WhereParams::new().with("n", "age", 31), &mut table)
        .unwrap();
    assert_eq!(table.get("age"), Some(&Value::Integer(1)));
    assert_eq!(table.get("age__aaaa"), Some(&Value::Integer(31)));
    assert_eq!(predicate.owned_parameters(), ["age__aaaa".to_string()]);
}

#[test]
fn test_generation_exhausted_surfaces() {
    use crate::parameters::NamingConfig;

    let mut table = ParameterTable::with_naming(NamingConfig {
        max_attempts: 1,
        suffix_width: 4,
    });
    table.add([("a", 0), ("a__aaaa", 0)]).unwrap();
    let result = Where::new(WhereParams::new().with("n", "a", 1), &mut table);
    assert_eq!(
        result,
        Err(PredicateError::Parameter(ParameterError::GenerationExhausted {
            suffix: "a".to_string(),
            attempts: 1
        }))
    );
}
