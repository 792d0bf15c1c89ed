// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

mod access;
mod conversions;
mod error;
mod logging;
mod settings;
mod tree;

use crate::error::{
    CommunicationError, ConfigurationError, DuplicateParameterError, NotGettableError,
    NotSettableError, ValidationError,
};

/// Register the node tree classes, functions and exceptions into `m`.
pub fn register_py_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add_class::<tree::NodeTreePy>()?;
    m.add_function(wrap_pyfunction!(logging::init_logging_py, m)?)?;
    // Exceptions
    m.add("ConfigurationError", py.get_type::<ConfigurationError>())?;
    m.add(
        "DuplicateParameterError",
        py.get_type::<DuplicateParameterError>(),
    )?;
    m.add("ValidationError", py.get_type::<ValidationError>())?;
    m.add("NotGettableError", py.get_type::<NotGettableError>())?;
    m.add("NotSettableError", py.get_type::<NotSettableError>())?;
    m.add("CommunicationError", py.get_type::<CommunicationError>())?;
    Ok(())
}

#[pymodule]
fn _node_tree(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Fails if another extension already installed its logger, which then
    // receives our records as well.
    if pyo3_log::try_init().is_err() {
        node_tree_log::debug!("Logger already initialized");
    }
    register_py_module(m)
}
