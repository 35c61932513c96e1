use cypherweave::pattern::{NodePattern, RelationshipPattern};
use cypherweave::predicate::{PredicateError, PropertyFilters, WhereParams};
use cypherweave::query_builder::{QueryBuilder, QueryBuilderError, SetSpec};
use cypherweave::utils::InvalidIdentifierError;

#[test]
fn test_hostile_names_are_escaped_not_interpolated() {
    let mut builder = QueryBuilder::new();
    builder
        .match_(
            NodePattern::named("n")
                .label("User`) DETACH DELETE (x")
                .filter(PropertyFilters::new().with("na`me", "'; DROP")),
        )
        .unwrap()
        .set(SetSpec::new("n").property("x} RETURN 1 //", 1))
        .unwrap();
    let statement = builder.build();

    assert_eq!(
        statement.text,
        "MATCH (n:`User``) DETACH DELETE (x` { `na``me`: $na_me }) \
         SET n.`x} RETURN 1 //` = $x__RETURN_1___"
    );
    assert_eq!(statement.parameters.len(), 2);
}

#[test]
fn test_hostile_where_identifier_is_rejected() {
    let mut builder = QueryBuilder::new();
    let err = builder
        .where_(WhereParams::new().with("n OR 1=1", "a", 1))
        .unwrap_err();
    assert_eq!(
        err,
        QueryBuilderError::Predicate(PredicateError::InvalidIdentifier(InvalidIdentifierError(
            "n OR 1=1".to_string()
        )))
    );
    assert!(builder.parameters().is_empty());
}

#[test]
fn test_relationship_type_is_always_quoted() {
    let mut builder = QueryBuilder::new();
    builder
        .create(cypherweave::pattern::Pattern::related([
            cypherweave::pattern::PatternElement::from(NodePattern::named("a")),
            RelationshipPattern::new().rel_type("LIKES").into(),
            NodePattern::named("b").into(),
        ]))
        .unwrap();
    assert_eq!(builder.text(), "CREATE (a)-[:`LIKES`]->(b)");
}
