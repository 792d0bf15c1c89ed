// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString};

use node_tree::{Error as NodeTreeError, NodeTree, NodeTreeCompiler, NodeTreeSettings, ParameterTable};

use crate::access::PySession;
use crate::conversions::{register_value_from_py, register_value_to_py};
use crate::error::Result;
use crate::settings::settings_from_dict;

/// Parameters of a device, compiled from its node tree.
///
/// `node_tree` is the JSON document returned by the device, either as a string
/// or already decoded into a dict. `session` must implement `get(path)` and
/// `set(path, value)`.
#[pyclass(name = "NodeTree", frozen)]
pub struct NodeTreePy {
    table: ParameterTable<PySession>,
}

fn node_tree_from_py(ob: &Bound<'_, PyAny>) -> Result<NodeTree> {
    if let Ok(document) = ob.downcast::<PyString>() {
        return Ok(NodeTree::from_json(&document.to_cow()?)?);
    }
    let document = ob
        .py()
        .import("json")?
        .call_method1("dumps", (ob,))?
        .extract::<String>()?;
    Ok(NodeTree::from_json(&document)?)
}

#[pymethods]
impl NodeTreePy {
    #[new]
    #[pyo3(signature = (node_tree, session, settings = None))]
    fn new(
        node_tree: &Bound<'_, PyAny>,
        session: Py<PyAny>,
        settings: Option<&Bound<'_, PyDict>>,
    ) -> Result<Self> {
        let tree = node_tree_from_py(node_tree)?;
        let settings = match settings {
            Some(settings) => settings_from_dict(settings)?,
            None => NodeTreeSettings::default(),
        };
        let table = NodeTreeCompiler::new(settings)?.compile(tree, PySession::new(session))?;
        Ok(NodeTreePy { table })
    }

    fn names(&self) -> Vec<String> {
        self.table.names().map(str::to_string).collect()
    }

    fn get<'py>(&self, py: Python<'py>, name: &str) -> Result<Bound<'py, PyAny>> {
        let value = self.table.get(name)?;
        Ok(register_value_to_py(py, &value)?)
    }

    fn set(&self, name: &str, value: &Bound<'_, PyAny>) -> Result<()> {
        let value = register_value_from_py(value)?;
        self.table.set(name, value)?;
        Ok(())
    }

    /// Description of the parameter `name` as a dict.
    fn info<'py>(&self, py: Python<'py>, name: &str) -> Result<Bound<'py, PyDict>> {
        let parameter = self
            .table
            .parameter(name)
            .ok_or_else(|| NodeTreeError::UnknownParameter {
                name: name.to_string(),
            })?;
        let info = parameter.info();
        let dict = PyDict::new(py);
        dict.set_item("name", info.name)?;
        dict.set_item("path", info.path)?;
        dict.set_item("description", info.description)?;
        dict.set_item("unit", info.unit)?;
        dict.set_item("type", info.node_type)?;
        dict.set_item("properties", info.properties)?;
        dict.set_item("gettable", info.gettable)?;
        dict.set_item("settable", info.settable)?;
        dict.set_item("options", info.options)?;
        Ok(dict)
    }

    /// Nodes without a parameter, as `(path, reason)` pairs.
    fn skipped(&self) -> Vec<(String, String)> {
        self.table
            .skipped()
            .iter()
            .map(|node| (node.path.clone(), node.reason.to_string()))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.table.len()
    }

    fn __contains__(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    fn __repr__(&self) -> String {
        format!("NodeTree(<{} parameters>)", self.table.len())
    }
}

#[cfg(test)]
mod tests {
    use pyo3::exceptions::{PyAttributeError, PyTypeError, PyValueError};
    use pyo3::ffi::c_str;
    use pyo3::types::PyList;

    use super::*;
    use crate::error::{
        CommunicationError, ConfigurationError, DuplicateParameterError, NotSettableError,
        ValidationError,
    };

    const NODES: &str = r#"{
        "/DEV8049/SYSTEM/AWG/CHANNELGROUPING": {
            "Node": "/DEV8049/SYSTEM/AWG/CHANNELGROUPING",
            "Description": "Sets the channel grouping mode of the device.",
            "Properties": "Read, Write, Setting",
            "Type": "Integer (enumerated)",
            "Unit": "None",
            "Options": {"0": "groups of 2", "1": "groups of 4", "2": "groups of 8"}
        },
        "/DEV8049/SIGOUTS/0/ON": {
            "Node": "/DEV8049/SIGOUTS/0/ON",
            "Description": "Enabling/Disabling the Signal Output.",
            "Properties": "Read, Write, Setting",
            "Type": "Integer (64 bit)",
            "Unit": "None"
        },
        "/DEV8049/SYSTEM/OWNER": {
            "Node": "/DEV8049/SYSTEM/OWNER",
            "Description": "Returns the current owner of the device (IP).",
            "Properties": "Read",
            "Type": "String",
            "Unit": "None"
        },
        "/DEV8049/CLOCKBASE": {
            "Node": "/DEV8049/CLOCKBASE",
            "Description": "Returns the internal clock frequency of the device.",
            "Properties": "Read",
            "Type": "Double",
            "Unit": "Hz"
        }
    }"#;

    fn sessions(py: Python<'_>) -> Bound<'_, PyModule> {
        PyModule::from_code(
            py,
            c_str!(
                r#"
class Session:
    def __init__(self):
        self.values = {"/DEV8049/SYSTEM/OWNER": "10.0.0.4"}

    def get(self, path):
        return self.values[path]

    def set(self, path, value):
        self.values[path] = value


class BrokenSession:
    def get(self, path):
        raise TypeError("session closed")

    def set(self, path, value):
        raise TypeError("session closed")
"#
            ),
            c_str!("sessions.py"),
            c_str!("sessions"),
        )
        .unwrap()
    }

    fn session<'py>(py: Python<'py>, class: &str) -> Bound<'py, PyAny> {
        sessions(py).getattr(class).unwrap().call0().unwrap()
    }

    fn node_tree(
        document: &Bound<'_, PyAny>,
        session: &Bound<'_, PyAny>,
        settings: Option<&Bound<'_, PyDict>>,
    ) -> Result<NodeTreePy> {
        NodeTreePy::new(document, session.clone().unbind(), settings)
    }

    #[test]
    fn test_from_json_string() {
        Python::with_gil(|py| {
            let session = session(py, "Session");
            let document = PyString::new(py, NODES);
            let tree = node_tree(document.as_any(), &session, None).unwrap();
            assert_eq!(
                tree.names(),
                vec!["system_awg_channelgrouping", "sigouts_0_on", "system_owner"]
            );
            assert_eq!(tree.__len__(), 3);
            assert!(tree.__contains__("sigouts_0_on"));
            assert!(!tree.__contains__("clockbase"));
            assert_eq!(
                tree.skipped(),
                vec![(
                    "/DEV8049/CLOCKBASE".to_string(),
                    "Path has 1 segment(s) after the device identifier, at least 2 required"
                        .to_string()
                )]
            );

            tree.set("sigouts_0_on", &true.into_pyobject(py).unwrap().to_owned().into_any())
                .unwrap();
            let stored = session
                .getattr("values")
                .unwrap()
                .get_item("/DEV8049/SIGOUTS/0/ON")
                .unwrap();
            assert_eq!(stored.extract::<i64>().unwrap(), 1);
            let owner = tree.get(py, "system_owner").unwrap();
            assert_eq!(owner.extract::<String>().unwrap(), "10.0.0.4");
        });
    }

    #[test]
    fn test_from_dict_with_settings() {
        Python::with_gil(|py| {
            let session = session(py, "Session");
            let document = py
                .import("json")
                .unwrap()
                .call_method1("loads", (NODES,))
                .unwrap();
            let settings = PyDict::new(py);
            settings.set_item("DEVICE_ID", "DEV8049").unwrap();
            settings.set_item("MIN_NAME_SEGMENTS", 1).unwrap();
            let tree = node_tree(&document, &session, Some(&settings)).unwrap();
            assert_eq!(tree.__len__(), 4);
            assert!(tree.skipped().is_empty());

            let info = tree.info(py, "clockbase").unwrap();
            let item = |key: &str| info.get_item(key).unwrap().unwrap();
            assert_eq!(item("path").extract::<String>().unwrap(), "/DEV8049/CLOCKBASE");
            assert_eq!(item("unit").extract::<String>().unwrap(), "Hz");
            assert!(item("gettable").extract::<bool>().unwrap());
            assert!(!item("settable").extract::<bool>().unwrap());

            let info = tree.info(py, "system_awg_channelgrouping").unwrap();
            let options = info.get_item("options").unwrap().unwrap();
            assert_eq!(
                options.get_item(1).unwrap().extract::<String>().unwrap(),
                "groups of 4"
            );
        });
    }

    #[test]
    fn test_parameter_errors() {
        Python::with_gil(|py| {
            let session = session(py, "Session");
            let tree = node_tree(PyString::new(py, NODES).as_any(), &session, None).unwrap();

            let value = 4i64.into_pyobject(py).unwrap().into_any();
            let err: PyErr = tree
                .set("system_awg_channelgrouping", &value)
                .unwrap_err()
                .into();
            assert!(err.is_instance_of::<ValidationError>(py));
            assert!(err.is_instance_of::<PyValueError>(py));

            let value = PyString::new(py, "x").into_any();
            let err: PyErr = tree.set("system_owner", &value).unwrap_err().into();
            assert!(err.is_instance_of::<NotSettableError>(py));
            assert!(err.is_instance_of::<PyAttributeError>(py));

            let value = PyList::new(py, [1]).unwrap().into_any();
            let err: PyErr = tree.set("sigouts_0_on", &value).unwrap_err().into();
            assert!(err.is_instance_of::<PyTypeError>(py));
        });
    }

    #[test]
    fn test_invalid_node_trees() {
        Python::with_gil(|py| {
            let session = session(py, "Session");
            let document = PyString::new(
                py,
                r#"{
                "/DEV1/SIGOUTS/0/ON": {"Node": "", "Description": "", "Properties": "Read",
                                       "Type": "Integer", "Unit": ""},
                "/DEV2/SIGOUTS/0/ON": {"Node": "", "Description": "", "Properties": "Read",
                                       "Type": "Integer", "Unit": ""}
            }"#,
            );
            let err: PyErr = node_tree(document.as_any(), &session, None)
                .err()
                .unwrap()
                .into();
            assert!(err.is_instance_of::<DuplicateParameterError>(py));
            assert!(err.is_instance_of::<ConfigurationError>(py));

            let document = PyString::new(py, "{}");
            let err: PyErr = node_tree(document.as_any(), &session, None)
                .err()
                .unwrap()
                .into();
            assert!(err.is_instance_of::<ConfigurationError>(py));
        });
    }

    #[test]
    fn test_session_error_is_cause() {
        Python::with_gil(|py| {
            let session = session(py, "BrokenSession");
            let tree = node_tree(PyString::new(py, NODES).as_any(), &session, None).unwrap();
            let err: PyErr = tree.get(py, "sigouts_0_on").unwrap_err().into();
            assert!(err.is_instance_of::<CommunicationError>(py));
            let cause = err.cause(py).unwrap();
            assert!(cause.is_instance_of::<PyTypeError>(py));
            assert_eq!(cause.value(py).to_string(), "session closed");
        });
    }
}
