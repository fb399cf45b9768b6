//! Response transformation example
//!
//! This example demonstrates:
//! - Building a QueryEngine with a template context
//! - Reshaping an API response with pipelines
//! - Conditions, casts and template references

use anyhow::Result;
use flowq_sdk::{QueryEngine, TemplateContext, Value};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("flowq_runtime=info".parse()?))
        .init();

    println!("=== Response Transformation Example ===\n");

    let templates = TemplateContext::new()
        .with_parameter("min_total", 20)
        .with_environment("region", "eu-west")
        .with_response("profile", json!({"user": {"tier": "gold"}}))
        .with_function("now", |_: &[Value]| Value::from("2024-05-01T00:00:00Z"));

    let engine = QueryEngine::builder()
        .with_template_context(templates)
        .build()?;

    let response = json!({
        "status": "ok",
        "orders": [
            {"id": "o-1", "total": 42.5, "items": [{"sku": "a"}, {"sku": "b"}], "paid": true},
            {"id": "o-2", "total": "12", "items": [{"sku": "c"}], "paid": false},
            {"id": "o-3", "total": 99, "items": [], "paid": true}
        ]
    });

    let queries = [
        "$.orders.id",
        "$.orders | where($.paid == true) | map($.id)",
        "$.orders | where($.total >= {{param:min_total}}) | count()",
        "$.orders | map({id: $.id, total: float($.total), items: length($.items)}) | sort({by: $.total, desc: true})",
        "$.orders | sum(total)",
        "$.orders | avg(total) | round(2)",
        "$.orders | map($.items) | flatten() | map($.sku) | join(',')",
        "$.status == 'ok' && length($.orders) > 2",
        "{{res:profile.user.tier}} == 'gold'",
        "\"{{env:region}}\"",
        "{{fn:now}}",
        "$.orders[0].total | int()",
        "$.orders | explode() | count()",
    ];

    for query in queries {
        let result = engine.evaluate_json(query, &response);
        println!("{}\n  => {}\n", query, result);
    }

    println!("Cached paths: {}", engine.cached_paths());

    Ok(())
}
