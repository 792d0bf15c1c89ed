// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use num_complex::Complex64;

/// A value read from or written to a device node.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterValue {
    Int(i64),
    Double(f64),
    Complex(Complex64),
    String(String),
    Bytes(Vec<u8>),
}

impl RegisterValue {
    /// Integer interpretation of the value.
    ///
    /// Doubles are accepted when they carry an integral value within the `i64` range.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RegisterValue::Int(v) => Some(*v),
            RegisterValue::Double(v) => {
                if v.is_finite() && v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64
                {
                    Some(*v as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            RegisterValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            RegisterValue::Int(_) => "integer",
            RegisterValue::Double(_) => "double",
            RegisterValue::Complex(_) => "complex",
            RegisterValue::String(_) => "string",
            RegisterValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegisterValue::Int(v) => write!(f, "{v}"),
            RegisterValue::Double(v) => write!(f, "{v}"),
            RegisterValue::Complex(v) => write!(f, "{} + {}j", v.re, v.im),
            RegisterValue::String(v) => write!(f, "'{v}'"),
            RegisterValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

impl From<i64> for RegisterValue {
    fn from(value: i64) -> Self {
        RegisterValue::Int(value)
    }
}

impl From<i32> for RegisterValue {
    fn from(value: i32) -> Self {
        RegisterValue::Int(value.into())
    }
}

impl From<bool> for RegisterValue {
    fn from(value: bool) -> Self {
        RegisterValue::Int(value.into())
    }
}

impl From<f64> for RegisterValue {
    fn from(value: f64) -> Self {
        RegisterValue::Double(value)
    }
}

impl From<Complex64> for RegisterValue {
    fn from(value: Complex64) -> Self {
        RegisterValue::Complex(value)
    }
}

impl From<String> for RegisterValue {
    fn from(value: String) -> Self {
        RegisterValue::String(value)
    }
}

impl From<&str> for RegisterValue {
    fn from(value: &str) -> Self {
        RegisterValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for RegisterValue {
    fn from(value: Vec<u8>) -> Self {
        RegisterValue::Bytes(value)
    }
}
