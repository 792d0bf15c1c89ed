// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use pyo3::prelude::*;

use node_tree::{CommunicationError, RegisterAccess, RegisterValue};

use crate::conversions::{register_value_from_py, register_value_to_py};

/// Device session implemented in Python.
///
/// The session object must provide `get(path)` and `set(path, value)`.
/// Exceptions raised by the session are kept as the source of the
/// resulting [`CommunicationError`].
pub(crate) struct PySession {
    session: Py<PyAny>,
}

impl PySession {
    pub(crate) fn new(session: Py<PyAny>) -> Self {
        PySession { session }
    }
}

impl RegisterAccess for PySession {
    fn read(&self, path: &str) -> Result<RegisterValue, CommunicationError> {
        Python::with_gil(|py| {
            let value = self.session.bind(py).call_method1("get", (path,))?;
            register_value_from_py(&value)
        })
        .map_err(|err| CommunicationError::new(path, err))
    }

    fn write(&self, path: &str, value: RegisterValue) -> Result<(), CommunicationError> {
        Python::with_gil(|py| {
            let value = register_value_to_py(py, &value)?;
            self.session.bind(py).call_method1("set", (path, value))?;
            Ok(())
        })
        .map_err(|err: PyErr| CommunicationError::new(path, err))
    }
}

#[cfg(test)]
mod tests {
    use pyo3::exceptions::PyKeyError;
    use pyo3::ffi::c_str;

    use super::*;

    #[test]
    fn test_session_read_write() {
        Python::with_gil(|py| {
            let module = PyModule::from_code(
                py,
                c_str!(
                    r#"
class Session:
    def __init__(self):
        self.values = {}

    def get(self, path):
        return self.values[path]

    def set(self, path, value):
        self.values[path] = value
"#
                ),
                c_str!("session.py"),
                c_str!("session"),
            )
            .unwrap();
            let session = module.getattr("Session").unwrap().call0().unwrap();
            let access = PySession::new(session.clone().unbind());

            access
                .write("/DEV8049/SIGOUTS/0/ON", RegisterValue::Int(1))
                .unwrap();
            let stored = session
                .getattr("values")
                .unwrap()
                .get_item("/DEV8049/SIGOUTS/0/ON")
                .unwrap();
            assert_eq!(stored.extract::<i64>().unwrap(), 1);
            assert_eq!(
                access.read("/DEV8049/SIGOUTS/0/ON").unwrap(),
                RegisterValue::Int(1)
            );

            let err = access.read("/DEV8049/SYSTEM/OWNER").unwrap_err();
            assert_eq!(err.path(), "/DEV8049/SYSTEM/OWNER");
            assert!(err.downcast_source::<PyErr>().unwrap().is_instance_of::<PyKeyError>(py));
        });
    }
}
