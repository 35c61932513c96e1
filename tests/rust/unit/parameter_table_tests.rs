use cypherweave::parameters::{NamingConfig, ParameterError, ParameterTable};

#[test]
fn test_names_stay_unique_across_mixed_operations() {
    let mut table = ParameterTable::new();
    for i in 0..30 {
        table.unique_name_and_add("p", i).unwrap();
        if i % 7 == 0 {
            table.remove(["p__aaab"]);
        }
    }
    let mut names: Vec<&str> = table.names().collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total);
}

#[test]
fn test_generation_bound_is_configurable() {
    let mut table = ParameterTable::with_naming(NamingConfig {
        max_attempts: 2,
        suffix_width: 1,
    });
    table.add([("x", 0), ("x__a", 0), ("x__b", 0)]).unwrap();
    assert_eq!(
        table.unique_name("x"),
        Err(ParameterError::GenerationExhausted {
            suffix: "x".to_string(),
            attempts: 2
        })
    );
}

#[test]
fn test_serialized_table_is_driver_ready() {
    let mut table = ParameterTable::from_entries([("tags", vec!["a", "b"])]).unwrap();
    table.unique_name_and_add("tags", "c").unwrap();
    assert_eq!(
        serde_json::to_string(&table).unwrap(),
        r#"{"tags":["a","b"],"tags__aaaa":"c"}"#
    );
}
