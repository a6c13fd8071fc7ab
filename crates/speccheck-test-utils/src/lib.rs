//! Testing utilities for the SpecCheck workspace
//!
//! Shared fixtures: specification inputs, morphisms, registries with
//! deliberately impure transforms, and misbehaving analyzers.

#![allow(missing_docs)]

pub mod specs {
    use speccheck_model::{SpecData, SpecItem};

    /// One requirement → design → task thread traced to the Ethical principle
    ///
    /// Under the seven default principles only one of seven searches
    /// succeeds, so the graph needs review without any structural defect.
    pub fn single_thread_spec() -> SpecData {
        SpecData {
            requirements: vec![SpecItem::new("r1", "Privacy consent ledger")],
            design_elements: vec![SpecItem::new("d1", "Consent ledger store")],
            implementation_tasks: vec![SpecItem::new("t1", "Ledger store schema")],
            ..SpecData::default()
        }
    }

    /// Trips the exclusive-terms, resource and negation detectors
    pub fn conflicting_spec() -> SpecData {
        SpecData {
            requirements: vec![
                SpecItem::new("r1", "Stateless privacy workers")
                    .with_description("Workers keep session data in memory"),
                SpecItem::new("r2", "Stateful privacy sessions")
                    .with_description("Sessions persist to disk between visits"),
                SpecItem::new("r3", "Consent records must be encrypted")
                    .with_description("Encryption keys travel over the network"),
                SpecItem::new("r4", "Consent records must not be cached"),
            ],
            design_elements: vec![SpecItem::new("d1", "Session consent records")],
            implementation_tasks: vec![SpecItem::new("t1", "Consent records table")],
            ..SpecData::default()
        }
    }
}

pub mod morphisms {
    use serde_json::{json, Value};
    use speccheck_laws::TransformRegistry;
    use speccheck_model::{Morphism, TestInput, ValueType};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    pub fn string_morphism(name: &str) -> Morphism {
        Morphism::transform(name, name, ValueType::String, ValueType::String).with_id(name)
    }

    pub fn uppercase() -> Morphism {
        string_morphism("uppercase")
    }

    pub fn reverse() -> Morphism {
        string_morphism("reverse")
    }

    pub fn trim() -> Morphism {
        string_morphism("trim")
    }

    /// Appends `#<call count>`; backed by [`stateful_registry`]
    pub fn tick() -> Morphism {
        string_morphism("tick")
    }

    /// `{"value": "hello", "type": "string"}`
    pub fn hello_input() -> TestInput {
        TestInput::typed(json!("hello"), ValueType::String)
    }

    /// Builtins plus `tick`, whose output depends on how often it ran
    pub fn stateful_registry() -> TransformRegistry {
        let calls = Arc::new(AtomicU64::new(0));
        TransformRegistry::with_builtins().with("tick", move |v: &Value| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(match v {
                Value::String(s) => json!(format!("{s}#{n}")),
                other => json!(format!("{other}#{n}")),
            })
        })
    }

    /// Builtins plus `explode`, which always fails
    pub fn failing_registry() -> TransformRegistry {
        TransformRegistry::with_builtins()
            .with("explode", |v: &Value| Err(format!("cannot process {v}")))
    }
}

pub mod analyzers {
    use async_trait::async_trait;
    use speccheck_ports::{AnalysisError, TextAnalyzer};
    use std::time::Duration;

    /// Never answers within any sane timeout
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SlowAnalyzer;

    #[async_trait]
    impl TextAnalyzer for SlowAnalyzer {
        async fn analyze(&self, _prompt: &str) -> Result<String, AnalysisError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("eventually".to_string())
        }
    }

    /// Panics on every call
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PanickingAnalyzer;

    #[async_trait]
    impl TextAnalyzer for PanickingAnalyzer {
        async fn analyze(&self, _prompt: &str) -> Result<String, AnalysisError> {
            panic!("analyzer backend bug")
        }
    }
}
