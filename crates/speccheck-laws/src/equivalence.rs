//! Output comparison

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How two morphism outputs are compared
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EquivalencePolicy {
    /// Structural equality
    #[default]
    Strict,
    /// Numbers equal within `epsilon`, everything else structural
    NumericTolerance {
        /// Largest accepted absolute difference
        epsilon: f64,
    },
}

impl EquivalencePolicy {
    /// Whether `a` and `b` count as the same output
    #[must_use]
    pub fn equivalent(&self, a: &Value, b: &Value) -> bool {
        match self {
            Self::Strict => a == b,
            Self::NumericTolerance { epsilon } => within(*epsilon, a, b),
        }
    }
}

fn within(epsilon: f64, a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() <= epsilon,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| within(epsilon, x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| within(epsilon, x, y)))
        }
        _ => a == b,
    }
}
