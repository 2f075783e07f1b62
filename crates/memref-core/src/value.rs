use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::introspect::TypeRef;

/// Dynamic value carried through reads, writes and calls.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Unit,
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    BoolArray(Vec<bool>),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    StringArray(Vec<String>),
    Object(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Runtime type of the value; `None` for opaque objects.
    pub fn type_ref(&self) -> Option<TypeRef> {
        match self {
            Self::Unit => Some(TypeRef::Void),
            Self::Bool(_) => Some(TypeRef::Bool),
            Self::Int(_) => Some(TypeRef::Int),
            Self::Float(_) => Some(TypeRef::Float),
            Self::String(_) => Some(TypeRef::String),
            Self::BoolArray(_) => Some(TypeRef::BoolArray),
            Self::IntArray(_) => Some(TypeRef::IntArray),
            Self::FloatArray(_) => Some(TypeRef::FloatArray),
            Self::StringArray(_) => Some(TypeRef::StringArray),
            Self::Object(_) => None,
        }
    }

    pub fn type_name(&self) -> String {
        self.type_ref()
            .map_or_else(|| "object".to_string(), |ty| ty.pretty_name().to_string())
    }

    pub const fn is_unit(&self) -> bool {
        matches!(self, Self::Unit)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "Unit"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::BoolArray(v) => f.debug_tuple("BoolArray").field(v).finish(),
            Self::IntArray(v) => f.debug_tuple("IntArray").field(v).finish(),
            Self::FloatArray(v) => f.debug_tuple("FloatArray").field(v).finish(),
            Self::StringArray(v) => f.debug_tuple("StringArray").field(v).finish(),
            Self::Object(_) => write!(f, "Object(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::BoolArray(a), Self::BoolArray(b)) => a == b,
            (Self::IntArray(a), Self::IntArray(b)) => a == b,
            (Self::FloatArray(a), Self::FloatArray(b)) => a == b,
            (Self::StringArray(a), Self::StringArray(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Rust types with a fixed `TypeRef`.
pub trait ValueType {
    fn type_ref() -> TypeRef;
}

pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

macro_rules! value_type {
    ($ty:ty, $variant:ident, $type_ref:expr) => {
        impl ValueType for $ty {
            fn type_ref() -> TypeRef {
                $type_ref
            }
        }

        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(Error::TypeMismatch {
                        expected: $type_ref,
                        found: other.type_name(),
                    }),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value)
            }
        }
    };
}

value_type!(bool, Bool, TypeRef::Bool);
value_type!(i32, Int, TypeRef::Int);
value_type!(f32, Float, TypeRef::Float);
value_type!(String, String, TypeRef::String);
value_type!(Vec<bool>, BoolArray, TypeRef::BoolArray);
value_type!(Vec<i32>, IntArray, TypeRef::IntArray);
value_type!(Vec<f32>, FloatArray, TypeRef::FloatArray);
value_type!(Vec<String>, StringArray, TypeRef::StringArray);

impl ValueType for () {
    fn type_ref() -> TypeRef {
        TypeRef::Void
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Unit
    }
}

impl FromValue for () {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Unit => Ok(()),
            other => Err(Error::TypeMismatch {
                expected: TypeRef::Void,
                found: other.type_name(),
            }),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_conversion() {
        assert_eq!(i32::from_value(Value::Int(7)).unwrap(), 7);
        assert_eq!(String::from_value("hi".into()).unwrap(), "hi");
        assert_eq!(true.into_value(), Value::Bool(true));
    }

    #[test]
    fn mismatch_reports_both_types() {
        let err = i32::from_value(Value::Bool(true)).unwrap_err();
        assert_eq!(err.to_string(), "Type mismatch: expected int, found bool");
    }

    #[test]
    fn object_identity() {
        let a = Value::object(vec![1u8, 2]);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, Value::object(vec![1u8, 2]));
        assert_eq!(a.downcast_ref::<Vec<u8>>(), Some(&vec![1u8, 2]));
        assert_eq!(a.type_name(), "object");
    }

    #[test]
    fn unit_round_trip() {
        assert!(().into_value().is_unit());
        assert!(<()>::from_value(Value::Int(1)).is_err());
    }
}
