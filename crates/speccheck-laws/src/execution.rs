//! Running morphisms against values

use crate::error::ExecutionError;
use crate::registry::TransformRegistry;
use serde_json::Value;
use speccheck_model::{Morphism, OperationSpec};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Executes morphisms by resolving transform names in a registry
#[derive(Debug, Clone, Copy)]
pub struct Executor<'r> {
    registry: &'r TransformRegistry,
    max_depth: usize,
}

impl<'r> Executor<'r> {
    /// Executor over a registry with a composition depth budget
    #[must_use]
    pub fn new(registry: &'r TransformRegistry, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    /// Transform names in application order
    ///
    /// `Composition { first, second }` applies `second` before `first`.
    ///
    /// # Errors
    /// `ExecutionError::DepthExceeded` if the tree nests deeper than the budget.
    pub fn plan<'m>(&self, morphism: &'m Morphism) -> Result<Vec<&'m str>, ExecutionError> {
        let depth = morphism.implementation.composition_depth();
        if depth > self.max_depth {
            return Err(ExecutionError::DepthExceeded {
                depth,
                limit: self.max_depth,
            });
        }

        let mut sequence = Vec::new();
        let mut stack: Vec<&OperationSpec> = vec![&morphism.implementation];
        while let Some(op) = stack.pop() {
            match op {
                OperationSpec::Identity => {}
                OperationSpec::Transform { function } => sequence.push(function.as_str()),
                OperationSpec::Composition { first, second } => {
                    stack.push(&first.implementation);
                    stack.push(&second.implementation);
                }
            }
        }
        Ok(sequence)
    }

    /// Run a morphism on one value
    ///
    /// # Errors
    /// Unknown transform names, depth overruns, and transform failures or
    /// panics.
    pub fn run(&self, morphism: &Morphism, input: &Value) -> Result<Value, ExecutionError> {
        let mut value = input.clone();
        for name in self.plan(morphism)? {
            let transform = self
                .registry
                .get(name)
                .ok_or_else(|| ExecutionError::UnknownTransform(name.to_string()))?;

            value = match catch_unwind(AssertUnwindSafe(|| transform.apply(&value))) {
                Ok(Ok(next)) => next,
                Ok(Err(message)) => return Err(ExecutionError::failed(name, message)),
                Err(payload) => {
                    let message = payload
                        .downcast_ref::<&str>()
                        .map(|s| (*s).to_string())
                        .or_else(|| payload.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "non-string panic payload".to_string());
                    return Err(ExecutionError::Panicked {
                        transform: name.to_string(),
                        message,
                    });
                }
            };
        }
        Ok(value)
    }

    /// Run a morphism structurally inside a container
    ///
    /// Elementwise over lists, on the `"value"` field of objects that have
    /// one, directly on anything else.
    ///
    /// # Errors
    /// As [`Executor::run`].
    pub fn run_lifted(&self, morphism: &Morphism, input: &Value) -> Result<Value, ExecutionError> {
        match input {
            Value::Array(items) => items
                .iter()
                .map(|item| self.run(morphism, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) if map.contains_key("value") => {
                let mut lifted = map.clone();
                if let Some(inner) = map.get("value") {
                    lifted.insert("value".to_string(), self.run(morphism, inner)?);
                }
                Ok(Value::Object(lifted))
            }
            other => self.run(morphism, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use speccheck_model::ValueType;

    fn t(name: &str) -> Morphism {
        Morphism::transform(name, name, ValueType::Any, ValueType::Any)
    }

    #[test]
    fn composition_applies_second_first() {
        let registry = TransformRegistry::with_builtins();
        let exec = Executor::new(&registry, 16);

        // increment ∘ double: double first
        let m = Morphism::compose(&t("increment"), &t("double"));
        assert_eq!(exec.plan(&m).unwrap(), vec!["double", "increment"]);
        assert_eq!(exec.run(&m, &json!(5)).unwrap(), json!(11));
    }

    #[test]
    fn nested_plan_order() {
        let registry = TransformRegistry::with_builtins();
        let exec = Executor::new(&registry, 16);
        let left = Morphism::compose(&Morphism::compose(&t("a"), &t("b")), &t("c"));
        let right = Morphism::compose(&t("a"), &Morphism::compose(&t("b"), &t("c")));
        assert_eq!(exec.plan(&left).unwrap(), vec!["c", "b", "a"]);
        assert_eq!(exec.plan(&right).unwrap(), vec!["c", "b", "a"]);
    }

    #[test]
    fn depth_budget_enforced() {
        let registry = TransformRegistry::with_builtins();
        let exec = Executor::new(&registry, 2);
        let mut m = t("identity");
        for _ in 0..3 {
            m = Morphism::compose(&m, &t("identity"));
        }
        assert!(matches!(
            exec.run(&m, &json!(1)),
            Err(ExecutionError::DepthExceeded { limit: 2, .. })
        ));
    }

    #[test]
    fn unknown_and_panicking_transforms() {
        let registry = TransformRegistry::new().with("boom", |_: &Value| -> Result<Value, String> {
            panic!("kaboom")
        });
        let exec = Executor::new(&registry, 8);

        assert_eq!(
            exec.run(&t("missing"), &json!(1)),
            Err(ExecutionError::UnknownTransform("missing".to_string()))
        );
        assert_eq!(
            exec.run(&t("boom"), &json!(1)),
            Err(ExecutionError::Panicked {
                transform: "boom".to_string(),
                message: "kaboom".to_string()
            })
        );
    }

    #[test]
    fn lift_is_structural() {
        let registry = TransformRegistry::with_builtins();
        let exec = Executor::new(&registry, 8);
        let up = t("uppercase");
        assert_eq!(exec.run_lifted(&up, &json!(["a", "b"])).unwrap(), json!(["A", "B"]));
        assert_eq!(
            exec.run_lifted(&up, &json!({"value": "x", "tag": "t"})).unwrap(),
            json!({"value": "X", "tag": "t"})
        );
        assert_eq!(exec.run_lifted(&up, &json!("z")).unwrap(), json!("Z"));
    }
}
