//! Deterministic test-input generation

use crate::config::CheckerConfig;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Value};
use speccheck_model::{TestInput, ValueType};

/// Produces the inputs a law check runs over
///
/// Order: configured seed inputs, basic values, edge cases, then seeded
/// random samples. Same seed, same inputs.
#[derive(Debug, Clone)]
pub struct TestInputGenerator {
    seed: u64,
    random_samples: usize,
    seed_inputs: Vec<Value>,
}

impl TestInputGenerator {
    /// Generator with a seed and sample count
    #[must_use]
    pub fn new(seed: u64, random_samples: usize) -> Self {
        Self {
            seed,
            random_samples,
            seed_inputs: Vec::new(),
        }
    }

    /// Generator configured from checker settings
    #[must_use]
    pub fn from_config(config: &CheckerConfig) -> Self {
        Self::new(config.seed, config.random_samples).with_seed_inputs(config.seed_inputs.clone())
    }

    /// With inputs tried first
    #[inline]
    #[must_use]
    pub fn with_seed_inputs(mut self, inputs: Vec<Value>) -> Self {
        self.seed_inputs = inputs;
        self
    }

    /// Inputs accepted by `source_type`, without duplicates
    #[must_use]
    pub fn generate(&self, source_type: ValueType) -> Vec<TestInput> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let random: Vec<Value> = (0..self.random_samples)
            .map(|_| random_value(&mut rng))
            .collect();

        let mut out: Vec<TestInput> = Vec::new();
        let candidates = self
            .seed_inputs
            .iter()
            .cloned()
            .chain(basic_values())
            .chain(edge_cases())
            .chain(random);

        for value in candidates {
            if source_type.accepts(&value) && !out.iter().any(|t| t.value == value) {
                out.push(TestInput::new(value));
            }
        }
        out
    }
}

impl Default for TestInputGenerator {
    fn default() -> Self {
        Self::from_config(&CheckerConfig::default())
    }
}

fn basic_values() -> Vec<Value> {
    vec![
        json!("hello"),
        json!("Hello World"),
        json!(42),
        json!(-7),
        json!(3.5),
        json!(true),
        json!(false),
        json!([3, 1, 2]),
        json!(["b", "a"]),
        json!({"value": "hello"}),
        json!({"value": 7, "tag": "wrapped"}),
    ]
}

fn edge_cases() -> Vec<Value> {
    vec![
        Value::Null,
        json!(0),
        json!(0.0),
        json!(""),
        json!([]),
        json!({}),
        json!("  padded  "),
    ]
}

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ ";

fn random_string(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0..12);
    (0..len)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

fn random_value(rng: &mut StdRng) -> Value {
    match rng.gen_range(0..5) {
        0 => Value::String(random_string(rng)),
        1 => json!(rng.gen_range(-1_000i64..1_000)),
        2 => json!((rng.gen_range(-1_000.0f64..1_000.0) * 100.0).round() / 100.0),
        3 => json!(rng.gen_bool(0.5)),
        _ => {
            let len = rng.gen_range(0..5);
            Value::Array((0..len).map(|_| json!(rng.gen_range(0i64..100))).collect())
        }
    }
}
