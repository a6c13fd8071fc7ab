//! Named transforms backing `OperationSpec::Transform`
//!
//! Provides [`TransformRegistry`] for resolving transform names to
//! implementations. Closures of the right shape register directly.

use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// A concrete operation on JSON values
pub trait Transform: Send + Sync {
    /// Apply to one value
    ///
    /// # Errors
    /// A human-readable reason when the input cannot be handled.
    fn apply(&self, input: &Value) -> Result<Value, String>;
}

impl<F> Transform for F
where
    F: Fn(&Value) -> Result<Value, String> + Send + Sync,
{
    fn apply(&self, input: &Value) -> Result<Value, String> {
        self(input)
    }
}

/// Registry of transforms by name
#[derive(Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with the built-in transforms
    ///
    /// String transforms pass non-strings through; numeric transforms pass
    /// non-numbers through.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_fn("identity", |v: &Value| Ok(v.clone()));
        registry.register_fn("uppercase", |v: &Value| Ok(map_str(v, str::to_uppercase)));
        registry.register_fn("lowercase", |v: &Value| Ok(map_str(v, str::to_lowercase)));
        registry.register_fn("reverse", |v: &Value| {
            Ok(match v {
                Value::String(s) => Value::String(s.chars().rev().collect()),
                Value::Array(items) => Value::Array(items.iter().rev().cloned().collect()),
                other => other.clone(),
            })
        });
        registry.register_fn("trim", |v: &Value| Ok(map_str(v, |s| s.trim().to_string())));
        registry.register_fn("increment", |v: &Value| {
            numeric(v, "increment", |i| i.checked_add(1), |f| f + 1.0)
        });
        registry.register_fn("double", |v: &Value| {
            numeric(v, "double", |i| i.checked_mul(2), |f| f * 2.0)
        });
        registry.register_fn("negate", |v: &Value| {
            numeric(v, "negate", i64::checked_neg, |f| -f)
        });
        registry.register_fn("length", |v: &Value| {
            Ok(match v {
                Value::String(s) => Value::from(s.chars().count()),
                Value::Array(items) => Value::from(items.len()),
                Value::Object(map) => Value::from(map.len()),
                other => other.clone(),
            })
        });
        registry.register_fn("stringify", |v: &Value| {
            Ok(match v {
                Value::String(_) => v.clone(),
                other => Value::String(other.to_string()),
            })
        });
        registry.register_fn("wrap_list", |v: &Value| Ok(Value::Array(vec![v.clone()])));
        registry.register_fn("sort", |v: &Value| {
            Ok(match v {
                Value::Array(items) => {
                    let mut sorted = items.clone();
                    sorted.sort_by(compare_values);
                    Value::Array(sorted)
                }
                other => other.clone(),
            })
        });
        registry.register_fn("dedupe", |v: &Value| {
            Ok(match v {
                Value::Array(items) => {
                    let mut unique: Vec<Value> = Vec::with_capacity(items.len());
                    for item in items {
                        if !unique.contains(item) {
                            unique.push(item.clone());
                        }
                    }
                    Value::Array(unique)
                }
                other => other.clone(),
            })
        });
        registry
    }

    /// Register (or replace) a transform
    pub fn register(&mut self, name: impl Into<String>, transform: impl Transform + 'static) {
        self.transforms.insert(name.into(), Arc::new(transform));
    }

    /// Register a closure
    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.register(name, f);
    }

    /// Builder-style [`TransformRegistry::register_fn`]
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.register(name, f);
        self
    }

    /// Look up a transform
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Transform>> {
        self.transforms.get(name).cloned()
    }

    /// Check if a transform exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered transforms
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("transforms", &self.names())
            .finish()
    }
}

fn map_str(v: &Value, op: impl Fn(&str) -> String) -> Value {
    match v {
        Value::String(s) => Value::String(op(s)),
        other => other.clone(),
    }
}

fn numeric(
    v: &Value,
    name: &str,
    int_op: impl Fn(i64) -> Option<i64>,
    float_op: impl Fn(f64) -> f64,
) -> Result<Value, String> {
    let Value::Number(n) = v else {
        return Ok(v.clone());
    };
    if let Some(i) = n.as_i64() {
        return int_op(i)
            .map(Value::from)
            .ok_or_else(|| format!("{name} overflows on {i}"));
    }
    match n.as_f64().map(float_op) {
        Some(f) => Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| format!("{name} produced a non-finite number")),
        None => Err(format!("{name} cannot handle {n}")),
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: by type, then by content
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a)
            .cmp(&type_rank(b))
            .then_with(|| a.to_string().cmp(&b.to_string())),
    }
}
