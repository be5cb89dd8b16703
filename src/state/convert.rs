//! Typed views of state values.
//!
//! [`StateValue`] is implemented by every type a [`StateVar`](super::StateVar)
//! can be bound to. Reading is lenient in the same ways a scripting host is:
//! strings that parse as numbers scan into numeric types, integral floats
//! scan into integers, and host callables scan into native function types
//! through [`adapt`](crate::host::adapt).

use std::any::Any;
use std::sync::Arc;

use crate::error::{ConvertError, HostError, HostErrorKind};
use crate::host::HostFrame;
use crate::state::value::{StateMap, Value};
use crate::styled::Text;

/// A type that can be stored in and read back from the state tree.
pub trait StateValue: Sized + Clone + Send + Sync + 'static {
    /// Interpret a stored value.
    fn from_value(value: &Value, frame: &HostFrame) -> Result<Self, ConvertError>;

    /// Encode into a stored value.
    fn into_value(self) -> Value;

    /// Assemble from the outputs of a host callable. Most types take exactly
    /// one output; `()` takes none and tuples take one per element.
    fn from_outputs(outputs: Vec<Value>, frame: &HostFrame) -> Result<Self, HostError> {
        match <[Value; 1]>::try_from(outputs) {
            Ok([value]) => Self::from_value(&value, frame)
                .map_err(|source| HostErrorKind::Output { index: 0, source }.into()),
            Err(outputs) => Err(HostErrorKind::Arity {
                expected: 1,
                got: outputs.len(),
            }
            .into()),
        }
    }
}

fn mismatch(expected: &'static str, value: &Value) -> ConvertError {
    ConvertError::Mismatch {
        expected,
        found: value.kind(),
    }
}

/// Downcast a native value to a concrete type.
pub(crate) fn native<T: Any + Clone>(value: &Value, expected: &'static str) -> Result<T, ConvertError> {
    value
        .downcast_native::<T>()
        .cloned()
        .ok_or_else(|| mismatch(expected, value))
}

// =============================================================================
// Scalars
// =============================================================================

impl StateValue for Value {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        Ok(value.clone())
    }

    fn into_value(self) -> Value {
        self
    }
}

impl StateValue for bool {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl StateValue for i64 {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::Float(x) if x.fract() == 0.0 && x.is_finite() => Ok(*x as i64),
            Value::Str(s) => s.trim().parse().map_err(|_| ConvertError::Parse {
                input: s.to_string(),
                expected: "int",
            }),
            other => Err(mismatch("int", other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

macro_rules! impl_state_value_for_int {
    ($($ty:ty),*) => {$(
        impl StateValue for $ty {
            fn from_value(value: &Value, frame: &HostFrame) -> Result<Self, ConvertError> {
                let wide = i64::from_value(value, frame)?;
                <$ty>::try_from(wide).map_err(|_| ConvertError::OutOfRange {
                    value: wide,
                    expected: stringify!($ty),
                })
            }

            fn into_value(self) -> Value {
                Value::Int(self as i64)
            }
        }
    )*};
}

impl_state_value_for_int!(i32, u16, u32, usize);

impl StateValue for f64 {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(i) => Ok(*i as f64),
            Value::Str(s) => s.trim().parse().map_err(|_| ConvertError::Parse {
                input: s.to_string(),
                expected: "float",
            }),
            other => Err(mismatch("float", other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl StateValue for String {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Str(s) => Ok(s.to_string()),
            other => Err(mismatch("string", other)),
        }
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl StateValue for Arc<str> {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Str(self)
    }
}

impl StateValue for () {
    fn from_value(_: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        Ok(())
    }

    fn into_value(self) -> Value {
        Value::Nil
    }

    fn from_outputs(outputs: Vec<Value>, _: &HostFrame) -> Result<Self, HostError> {
        if outputs.is_empty() {
            Ok(())
        } else {
            Err(HostErrorKind::Arity {
                expected: 0,
                got: outputs.len(),
            }
            .into())
        }
    }
}

// =============================================================================
// Containers
// =============================================================================

impl StateValue for StateMap {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Map(map) => Ok(map.clone()),
            other => Err(mismatch("map", other)),
        }
    }

    fn into_value(self) -> Value {
        Value::Map(self)
    }
}

impl<T: StateValue> StateValue for Option<T> {
    fn from_value(value: &Value, frame: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other, frame).map(Some),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Nil,
        }
    }
}

impl<T: StateValue> StateValue for Vec<T> {
    fn from_value(value: &Value, frame: &HostFrame) -> Result<Self, ConvertError> {
        let Value::List(items) = value else {
            return Err(mismatch("list", value));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::from_value(item, frame).map_err(|source| ConvertError::Element {
                    index,
                    source: Box::new(source),
                })
            })
            .collect()
    }

    fn into_value(self) -> Value {
        Value::List(Arc::new(self.into_iter().map(StateValue::into_value).collect()))
    }
}

macro_rules! impl_state_value_for_tuple {
    ($len:expr; $($name:ident $idx:tt),+) => {
        impl<$($name: StateValue),+> StateValue for ($($name,)+) {
            fn from_value(value: &Value, frame: &HostFrame) -> Result<Self, ConvertError> {
                let Value::List(items) = value else {
                    return Err(mismatch("list", value));
                };
                if items.len() != $len {
                    return Err(ConvertError::Length { expected: $len, got: items.len() });
                }
                Ok(($(
                    $name::from_value(&items[$idx], frame).map_err(|source| ConvertError::Element {
                        index: $idx,
                        source: Box::new(source),
                    })?,
                )+))
            }

            fn into_value(self) -> Value {
                Value::List(Arc::new(vec![$(self.$idx.into_value()),+]))
            }

            fn from_outputs(outputs: Vec<Value>, frame: &HostFrame) -> Result<Self, HostError> {
                if outputs.len() != $len {
                    return Err(HostErrorKind::Arity { expected: $len, got: outputs.len() }.into());
                }
                Ok(($(
                    $name::from_value(&outputs[$idx], frame)
                        .map_err(|source| HostError::from(HostErrorKind::Output { index: $idx, source }))?,
                )+))
            }
        }
    };
}

impl_state_value_for_tuple!(2; A 0, B 1);
impl_state_value_for_tuple!(3; A 0, B 1, C 2);

// =============================================================================
// Styled text
// =============================================================================

impl StateValue for Text {
    fn from_value(value: &Value, _: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Str(s) => Ok(Text::plain(s.as_ref())),
            other => native(other, "styled text"),
        }
    }

    fn into_value(self) -> Value {
        if self.is_plain() {
            Value::from(self.to_plain())
        } else {
            Value::native(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> HostFrame {
        HostFrame::default()
    }

    #[test]
    fn test_int_scanning() {
        let f = frame();
        assert_eq!(i64::from_value(&Value::Int(5), &f), Ok(5));
        assert_eq!(i64::from_value(&Value::Float(5.0), &f), Ok(5));
        assert_eq!(i64::from_value(&Value::from(" 12 "), &f), Ok(12));
        assert!(i64::from_value(&Value::Float(5.5), &f).is_err());
        assert!(i64::from_value(&Value::from("x"), &f).is_err());
        assert_eq!(
            i64::from_value(&Value::Bool(true), &f),
            Err(ConvertError::Mismatch {
                expected: "int",
                found: "bool"
            })
        );
    }

    #[test]
    fn test_narrow_ints() {
        let f = frame();
        assert_eq!(usize::from_value(&Value::Int(3), &f), Ok(3));
        assert_eq!(
            usize::from_value(&Value::Int(-1), &f),
            Err(ConvertError::OutOfRange {
                value: -1,
                expected: "usize"
            })
        );
        assert_eq!(i32::from_value(&Value::from("7"), &f), Ok(7));
    }

    #[test]
    fn test_float_and_string() {
        let f = frame();
        assert_eq!(f64::from_value(&Value::Int(2), &f), Ok(2.0));
        assert_eq!(f64::from_value(&Value::from("2.5"), &f), Ok(2.5));
        assert_eq!(String::from_value(&Value::from("s"), &f), Ok("s".to_string()));
        assert!(String::from_value(&Value::Int(1), &f).is_err());
    }

    #[test]
    fn test_option_and_vec() {
        let f = frame();
        assert_eq!(Option::<i64>::from_value(&Value::Nil, &f), Ok(None));
        assert_eq!(Option::<i64>::from_value(&Value::Int(1), &f), Ok(Some(1)));
        assert_eq!(None::<i64>.into_value(), Value::Nil);

        let list = vec![1i64, 2, 3].into_value();
        assert_eq!(Vec::<i64>::from_value(&list, &f), Ok(vec![1, 2, 3]));
        let bad = Value::from(vec![Value::Int(1), Value::from("x")]);
        assert!(matches!(
            Vec::<i64>::from_value(&bad, &f),
            Err(ConvertError::Element { index: 1, .. })
        ));
    }

    #[test]
    fn test_tuple_round_trip_and_length() {
        let f = frame();
        let v = (1i64, "a".to_string()).into_value();
        assert_eq!(<(i64, String)>::from_value(&v, &f), Ok((1, "a".to_string())));
        let short = Value::from(vec![Value::Int(1)]);
        assert_eq!(
            <(i64, i64)>::from_value(&short, &f),
            Err(ConvertError::Length { expected: 2, got: 1 })
        );
    }

    #[test]
    fn test_from_outputs_arity() {
        let f = frame();
        assert_eq!(i64::from_outputs(vec![Value::Int(1)], &f), Ok(1));
        let err = i64::from_outputs(vec![], &f).unwrap_err();
        assert_eq!(err.kind, HostErrorKind::Arity { expected: 1, got: 0 });
        assert_eq!(<()>::from_outputs(vec![], &f), Ok(()));
        assert!(<()>::from_outputs(vec![Value::Nil], &f).is_err());
        assert_eq!(
            <(i64, bool)>::from_outputs(vec![Value::Int(1), Value::Bool(true)], &f),
            Ok((1, true))
        );
    }

    #[test]
    fn test_text_storage() {
        let f = frame();
        let plain = Text::plain("hi").into_value();
        assert_eq!(plain, Value::from("hi"));
        let styled = Text::colored("hi", crate::types::Rgba::RED);
        let stored = styled.clone().into_value();
        assert_eq!(Text::from_value(&stored, &f), Ok(styled));
    }
}
