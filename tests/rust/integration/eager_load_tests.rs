use async_trait::async_trait;
use cypherweave::eager_load::{synthesize, EagerLoadError, EagerLoadRequest};
use cypherweave::parameters::ParameterTable;
use cypherweave::runner::{QueryRunner, Row, RunOptions, RunnerError};
use cypherweave::value::Value;
use cypherweave::Statement;
use mockall::mock;
use serde_json::json;

mock! {
    pub Runner {}

    #[async_trait]
    impl QueryRunner for Runner {
        async fn run(&self, statement: &Statement, options: &RunOptions) -> Result<Vec<Row>, RunnerError>;
    }
}

fn orders_request() -> EagerLoadRequest {
    serde_json::from_value(json!({
        "label": "User",
        "where": {"id": "U1"},
        "relationships": [{
            "alias": "Orders",
            "relationshipName": "PLACED",
            "targetLabel": "Order",
            "children": [{
                "alias": "Products",
                "relationshipName": "CONTAINS",
                "targetLabel": "Product",
                "where": {"target": {"price": {"gt": 100}}}
            }]
        }]
    }))
    .expect("request should deserialize")
}

/// Rows as the database returns them once `price > 100` dropped product P1
fn filtered_rows() -> Vec<Row> {
    serde_json::from_value(json!([{
        "n": {"id": "U1", "name": "Ada"},
        "Orders": [{
            "node": {"id": "O1"},
            "relationship": {"placedAt": "2024-01-01"},
            "Products": [{
                "node": {"id": "P2", "price": 150},
                "relationship": {"quantity": 1}
            }]
        }]
    }]))
    .expect("rows should deserialize")
}

#[tokio::test]
async fn test_eager_load_round_trip() {
    let result = synthesize(&orders_request(), ParameterTable::new()).unwrap();

    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .withf(|statement: &Statement, options: &RunOptions| {
            statement.text.contains("WHERE Products__n2.price > $price")
                && statement.parameters.get("price") == Some(&Value::Integer(100))
                && statement.parameters.get("id") == Some(&Value::from("U1"))
                && options.database.as_deref() == Some("shop")
        })
        .times(1)
        .returning(|_, _| Ok(filtered_rows()));

    let users = result
        .execute(&runner, &RunOptions::default().database("shop"))
        .await
        .unwrap();

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].property("id"), Some(&Value::from("U1")));
    let orders = users[0].related("Orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].node.property("id"), Some(&Value::from("O1")));

    let products = orders[0].node.related("Products");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].node.property("id"), Some(&Value::from("P2")));
    assert_eq!(products[0].node.property("price"), Some(&Value::Integer(150)));
    assert_eq!(
        products[0].relationship_properties.get("quantity"),
        Some(&Value::Integer(1))
    );
}

#[tokio::test]
async fn test_user_without_orders_hydrates_empty_list() {
    let result = synthesize(&orders_request(), ParameterTable::new()).unwrap();

    let mut runner = MockRunner::new();
    runner.expect_run().returning(|_, _| {
        Ok(serde_json::from_value(json!([{"n": {"id": "U1"}, "Orders": []}])).unwrap())
    });

    let users = result.execute(&runner, &RunOptions::default()).await.unwrap();
    assert!(users[0].related("Orders").is_empty());
    assert_eq!(
        serde_json::to_value(&users[0]).unwrap(),
        json!({"labels": [], "properties": {"id": "U1"}, "relationships": {"Orders": []}})
    );
}

#[tokio::test]
async fn test_runner_failure_is_propagated() {
    let result = synthesize(&orders_request(), ParameterTable::new()).unwrap();

    let mut runner = MockRunner::new();
    runner
        .expect_run()
        .returning(|_, _| Err(RunnerError::Unavailable("connection refused".to_string())));

    let err = result
        .execute(&runner, &RunOptions::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EagerLoadError::Runner(RunnerError::Unavailable("connection refused".to_string()))
    );
}

#[test]
fn test_request_with_unknown_field_is_rejected() {
    let result: Result<EagerLoadRequest, _> = serde_json::from_value(json!({
        "label": "User",
        "relationships": [{"alias": "Orders", "relationshipName": "PLACED", "depth": 2}]
    }));
    assert!(result.is_err());
}
