//! Tool dispatch through the shipped tool catalog

mod common;

use common::dispatcher;
use serde_json::{json, Map, Value};

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_shipped_catalog_resolves_every_tool() {
    let dispatcher = dispatcher().await;
    assert_eq!(
        dispatcher.registry().tool_names(),
        vec![
            "example_tool".to_string(),
            "steam_search_by_desc_tool".to_string(),
            "steam_search_tool".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_example_tool_rendering() {
    let dispatcher = dispatcher().await;
    let request = json!({
        "function": "example_tool",
        "arguments": {
            "string_param": "abc",
            "number_param": 1.23,
            "integer_param": 7,
            "boolean_param": true,
            "simple_array": ["a", "b"],
            "object_array": [{"id": 1, "data": "foo"}, {"id": 2, "data": "bar"}],
            "nested_object": {"level1": {"level2": "deep"}},
            "mixed_array": ["str", 5, {"bar": "baz"}]
        }
    });

    let result = dispatcher.parse_and_call(&request).await;

    let expected = "Function parameters:\n\
- string_param: abc\n\
- number_param: 1.23\n\
- integer_param: 7\n\
- boolean_param: true\n\
- simple_array: [\"a\",\"b\"]\n\
- object_array: [{\"id\":1,\"data\":\"foo\"},{\"id\":2,\"data\":\"bar\"}]\n\
- nested_object: {\"level1\":{\"level2\":\"deep\"}}\n\
- mixed_array: [\"str\",5,{\"bar\":\"baz\"}]\n\
- optional_param: default_value";
    assert_eq!(Value::Object(result), json!({ "result": expected }));
}

#[tokio::test]
async fn test_unknown_tool_returns_empty() {
    let dispatcher = dispatcher().await;
    assert!(dispatcher.call("launch_missiles", &Map::new()).await.is_empty());
}

#[tokio::test]
async fn test_bad_arguments_return_empty() {
    let dispatcher = dispatcher().await;
    let cases = [
        args(json!({"number_param": 1})),
        args(json!({"string_param": 1, "number_param": 1})),
        args(json!({"string_param": "a", "number_param": 1, "unexpected": 0})),
    ];
    for case in cases {
        assert!(dispatcher.call("example_tool", &case).await.is_empty());
    }
}

#[tokio::test]
async fn test_description_search_through_dispatcher() {
    let dispatcher = dispatcher().await;
    let result = dispatcher
        .call(
            "steam_search_by_desc_tool",
            &args(json!({"desc": "Roguelike dungeon crawler Greek mythology underworld"})),
        )
        .await;

    let hits = result["result"].as_array().unwrap();
    assert_eq!(hits.len(), 5);
    assert_eq!(hits[0]["name"], json!("Hades"));
}

#[tokio::test]
async fn test_store_search_failure_returns_empty() {
    let dispatcher = dispatcher().await;
    let result = dispatcher
        .call("steam_search_tool", &args(json!({"game_name": "Portal"})))
        .await;
    assert!(result.is_empty());
}
