//! flowq SDK
//!
//! High-level API for evaluating flowq expressions and pipelines against
//! JSON-like data.
//!
//! ```rust,ignore
//! use flowq_sdk::{QueryEngine, Value};
//! use serde_json::json;
//!
//! let engine = QueryEngine::new();
//! let data = Value::from(json!({"data": [{"id": "t1", "active": true}]}));
//! let ids = engine.evaluate("$.data | where($.active == true) | map($.id)", &data);
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;

// Re-export main types
pub use builder::QueryEngineBuilder;
pub use config::EngineConfig;
pub use engine::QueryEngine;
pub use error::{Result, SdkError};

// Re-export commonly used types from dependencies
pub use flowq_core::{Map, TemplateContext, Value};
pub use flowq_runtime::{ContextResolver, TemplateResolution, TemplateResolver};
