// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Error handling for the Python bindings.
//!
//! Node tree errors are translated into the exception hierarchy of the
//! `_node_tree` module. When the root cause of an error is a Python exception
//! raised by the session, it is set as the `__cause__` of the translated
//! exception, to keep the full traceback in Python.

use std::error::Error as StdError;

use node_tree::{ConfigurationError as ConfigError, Error as NodeTreeError};
use pyo3::create_exception;
use pyo3::exceptions::{
    PyAttributeError, PyException, PyKeyError, PyRuntimeError, PyValueError,
};
use pyo3::prelude::*;

create_exception!(
    _node_tree,
    ConfigurationError,
    PyException,
    "The node tree or the settings are invalid."
);
create_exception!(
    _node_tree,
    DuplicateParameterError,
    ConfigurationError,
    "Two nodes map to the same parameter name."
);
create_exception!(
    _node_tree,
    ValidationError,
    PyValueError,
    "The value is not one of the options of the parameter."
);
create_exception!(_node_tree, NotGettableError, PyAttributeError);
create_exception!(_node_tree, NotSettableError, PyAttributeError);
create_exception!(
    _node_tree,
    CommunicationError,
    PyRuntimeError,
    "The device session failed to read or write a node."
);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
    #[error(transparent)]
    NodeTree(#[from] NodeTreeError),
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Error::NodeTree(error.into())
    }
}

impl From<PyErr> for Error {
    fn from(error: PyErr) -> Self {
        Error::Anyhow(error.into())
    }
}

impl From<Error> for PyErr {
    fn from(error: Error) -> Self {
        // Exceptions raised by Python code without added context are re-raised as they are
        let error = match error {
            Error::Anyhow(e) if e.chain().nth(1).is_none() => match e.downcast::<PyErr>() {
                Ok(py_err) => return py_err,
                Err(e) => Error::Anyhow(e),
            },
            error => error,
        };
        let message = create_python_error_message(&error);
        let py_error = match &error {
            Error::NodeTree(e) => match e {
                NodeTreeError::Configuration(ConfigError::DuplicateParameter { .. }) => {
                    DuplicateParameterError::new_err(message)
                }
                NodeTreeError::Configuration(_) => ConfigurationError::new_err(message),
                NodeTreeError::Validation(_) => ValidationError::new_err(message),
                NodeTreeError::NotGettable { .. } => NotGettableError::new_err(message),
                NodeTreeError::NotSettable { .. } => NotSettableError::new_err(message),
                NodeTreeError::UnknownParameter { .. } => PyKeyError::new_err(message),
                NodeTreeError::Communication(_) => CommunicationError::new_err(message),
                NodeTreeError::Anyhow(_) => PyRuntimeError::new_err(message),
            },
            Error::Anyhow(_) => PyRuntimeError::new_err(message),
        };
        if let Some(cause) = find_python_root_cause(&error) {
            Python::with_gil(|py| py_error.set_cause(py, Some(cause.clone_ref(py))));
        }
        py_error
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Format the error and its sources into the message of the Python exception.
fn create_python_error_message(error: &Error) -> String {
    let mut causes = vec![];
    let mut source = error.source();
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    if causes.is_empty() {
        return error.to_string();
    }
    format!("{error}\nCaused by:\n  {}", causes.join("\n  "))
}

fn find_python_root_cause(error: &Error) -> Option<&PyErr> {
    // `anyhow::Error` is transparent, its source chain starts below the wrapped error
    if let Error::Anyhow(e) | Error::NodeTree(NodeTreeError::Anyhow(e)) = error {
        return e.root_cause().downcast_ref::<PyErr>();
    }
    let mut root: &(dyn StdError + 'static) = error;
    while let Some(source) = root.source() {
        root = source;
    }
    root.downcast_ref::<PyErr>()
}
