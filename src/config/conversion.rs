// Author: Dustin Pilgrim
// License: MIT

use crate::{ConfigError, Value};

fn mismatch(expected: &str, value: &Value) -> ConfigError {
    ConfigError::TypeError {
        path: String::new(),
        message: format!("Expected {}, got {} '{}'", expected, value.type_name(), value),
    }
}

impl TryFrom<Value> for String {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(s),
            _ => Err(mismatch("string", &value)),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Boolean(b) => Ok(b),
            _ => Err(mismatch("boolean", &value)),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Real(r) => Ok(r),
            Value::Integer(i) => Ok(i as f64),
            _ => Err(mismatch("number", &value)),
        }
    }
}

impl TryFrom<Value> for f32 {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        f64::try_from(value).map(|n| n as f32)
    }
}

impl TryFrom<Value> for i64 {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integer(i) => Ok(i),
            _ => Err(mismatch("integer", &value)),
        }
    }
}

/// Narrower integer types go through `i64` and reject anything out of range.
macro_rules! narrow_integer {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = ConfigError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    let i = i64::try_from(value)?;
                    <$ty>::try_from(i).map_err(|_| ConfigError::TypeError {
                        path: String::new(),
                        message: format!("Integer {} is out of range for {}", i, stringify!($ty)),
                    })
                }
            }
        )*
    };
}

narrow_integer!(i32, u8, u16, u32, u64, usize);
