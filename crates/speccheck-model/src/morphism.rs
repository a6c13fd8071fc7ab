//! Composable morphisms
//!
//! A [`Morphism`] is a typed unit of behavior standing in for an agent
//! operation. Its [`OperationSpec`] is plain data: executing it is the law
//! checker's job, not the model's.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Declared value type of a morphism endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Accepts every value
    #[default]
    Any,
    /// JSON `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Whole numbers
    Integer,
    /// Any JSON number (integers included)
    Number,
    /// Strings
    String,
    /// Arrays
    List,
    /// Objects
    Object,
}

impl ValueType {
    /// Most specific type of a concrete value
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::List,
            Value::Object(_) => Self::Object,
        }
    }

    /// Check whether a value inhabits this type
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Number => value.is_number(),
            other => Self::of(value) == other,
        }
    }

    /// Check whether values of `produced` may flow into an endpoint of this type
    #[must_use]
    pub fn admits(self, produced: ValueType) -> bool {
        match (self, produced) {
            (Self::Any, _) | (_, Self::Any) => true,
            (Self::Number, Self::Integer) => true,
            (a, b) => a == b,
        }
    }

    /// Stable lowercase name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a morphism does when executed
///
/// `Composition { first, second }` means `first ∘ second`: the input goes
/// through `second`, and `first` receives that result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationSpec {
    /// Returns its input unchanged
    Identity,

    /// Named function resolved through a transform registry
    Transform {
        /// Registry name of the function
        function: String,
    },

    /// Sequential application, `second` first
    Composition {
        /// Outer morphism (applied last)
        first: Box<Morphism>,
        /// Inner morphism (applied first)
        second: Box<Morphism>,
    },
}

impl OperationSpec {
    /// Short label for the variant
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Transform { .. } => "transform",
            Self::Composition { .. } => "composition",
        }
    }

    /// Nesting depth of compositions (0 for leaves)
    #[must_use]
    pub fn composition_depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];

        while let Some((op, depth)) = stack.pop() {
            match op {
                Self::Composition { first, second } => {
                    stack.push((&first.implementation, depth + 1));
                    stack.push((&second.implementation, depth + 1));
                }
                Self::Identity | Self::Transform { .. } => deepest = deepest.max(depth),
            }
        }

        deepest
    }
}

/// A typed, composable operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Morphism {
    /// Stable identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Declared input type
    #[serde(default)]
    pub source_type: ValueType,
    /// Declared output type
    #[serde(default)]
    pub target_type: ValueType,
    /// Behavior
    pub implementation: OperationSpec,
}

impl Morphism {
    /// Morphism backed by a named transform
    #[must_use]
    pub fn transform(
        name: impl Into<String>,
        function: impl Into<String>,
        source_type: ValueType,
        target_type: ValueType,
    ) -> Self {
        let name = name.into();
        Self {
            id: format!("morphism:{name}"),
            name,
            description: String::new(),
            source_type,
            target_type,
            implementation: OperationSpec::Transform {
                function: function.into(),
            },
        }
    }

    /// Identity morphism on a type
    #[must_use]
    pub fn identity(value_type: ValueType) -> Self {
        Self {
            id: format!("identity:{value_type}"),
            name: "id".to_string(),
            description: format!("identity on {value_type}"),
            source_type: value_type,
            target_type: value_type,
            implementation: OperationSpec::Identity,
        }
    }

    /// Build `first ∘ second`
    #[must_use]
    pub fn compose(first: &Morphism, second: &Morphism) -> Self {
        Self {
            id: format!("({}∘{})", first.id, second.id),
            name: format!("{} ∘ {}", first.name, second.name),
            description: String::new(),
            source_type: second.source_type,
            target_type: first.target_type,
            implementation: OperationSpec::Composition {
                first: Box::new(first.clone()),
                second: Box::new(second.clone()),
            },
        }
    }

    /// Override the identifier
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether `self ∘ inner` is well-typed
    #[inline]
    #[must_use]
    pub fn accepts_output_of(&self, inner: &Morphism) -> bool {
        self.source_type.admits(inner.target_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upper() -> Morphism {
        Morphism::transform("upper", "uppercase", ValueType::String, ValueType::String)
    }

    fn len() -> Morphism {
        Morphism::transform("len", "length", ValueType::String, ValueType::Integer)
    }

    #[test]
    fn value_type_of_and_accepts() {
        assert_eq!(ValueType::of(&json!(3)), ValueType::Integer);
        assert_eq!(ValueType::of(&json!(3.5)), ValueType::Number);
        assert!(ValueType::Number.accepts(&json!(3)));
        assert!(!ValueType::Integer.accepts(&json!(3.5)));
        assert!(ValueType::Any.accepts(&Value::Null));
        assert!(!ValueType::String.accepts(&json!([])));
    }

    #[test]
    fn admits_widens_integer_into_number() {
        assert!(ValueType::Number.admits(ValueType::Integer));
        assert!(!ValueType::Integer.admits(ValueType::Number));
        assert!(ValueType::String.admits(ValueType::Any));
    }

    #[test]
    fn compose_takes_endpoint_types() {
        let c = Morphism::compose(&len(), &upper());
        assert_eq!(c.source_type, ValueType::String);
        assert_eq!(c.target_type, ValueType::Integer);
        assert_eq!(c.implementation.kind_label(), "composition");
        assert!(len().accepts_output_of(&upper()));
        assert!(!upper().accepts_output_of(&len()));
    }

    #[test]
    fn composition_depth_counts_nesting() {
        assert_eq!(upper().implementation.composition_depth(), 0);
        let two = Morphism::compose(&upper(), &upper());
        let three = Morphism::compose(&two, &upper());
        assert_eq!(two.implementation.composition_depth(), 1);
        assert_eq!(three.implementation.composition_depth(), 2);
    }

    #[test]
    fn operation_spec_serializes_tagged() {
        let doc = serde_json::to_value(&upper().implementation).unwrap();
        assert_eq!(doc, json!({"op": "transform", "function": "uppercase"}));

        let id: OperationSpec = serde_json::from_value(json!({"op": "identity"})).unwrap();
        assert_eq!(id, OperationSpec::Identity);
    }
}
