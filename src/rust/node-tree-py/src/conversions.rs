// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use num_complex::Complex64;
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyBytes, PyComplex, PyFloat, PyInt, PyString};

use node_tree::RegisterValue;

/// Convert a Python value into a register value.
///
/// `bool` is written as an integer, as the device has no boolean nodes.
pub(crate) fn register_value_from_py(ob: &Bound<'_, PyAny>) -> PyResult<RegisterValue> {
    if let Ok(value) = ob.downcast::<PyBool>() {
        return Ok(RegisterValue::Int(value.is_true().into()));
    }
    if ob.is_instance_of::<PyInt>() {
        return Ok(RegisterValue::Int(ob.extract::<i64>()?));
    }
    if ob.is_instance_of::<PyFloat>() {
        return Ok(RegisterValue::Double(ob.extract::<f64>()?));
    }
    if ob.is_instance_of::<PyComplex>() {
        return Ok(RegisterValue::Complex(ob.extract::<Complex64>()?));
    }
    if ob.is_instance_of::<PyString>() {
        return Ok(RegisterValue::String(ob.extract::<String>()?));
    }
    if let Ok(value) = ob.downcast::<PyBytes>() {
        return Ok(RegisterValue::Bytes(value.as_bytes().to_vec()));
    }
    Err(PyTypeError::new_err(format!(
        "Unsupported node value of type '{}'",
        ob.get_type().name()?
    )))
}

pub(crate) fn register_value_to_py<'py>(
    py: Python<'py>,
    value: &RegisterValue,
) -> PyResult<Bound<'py, PyAny>> {
    let ob = match value {
        RegisterValue::Int(v) => v.into_pyobject(py)?.into_any(),
        RegisterValue::Double(v) => PyFloat::new(py, *v).into_any(),
        RegisterValue::Complex(v) => PyComplex::from_doubles(py, v.re, v.im).into_any(),
        RegisterValue::String(v) => PyString::new(py, v).into_any(),
        RegisterValue::Bytes(v) => PyBytes::new(py, v).into_any(),
    };
    Ok(ob)
}
