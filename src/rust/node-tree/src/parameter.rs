// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use node_tree_log::debug;
use serde::Serialize;

use crate::access::RegisterAccess;
use crate::descriptor::{NodeDescriptor, NodeProperties, NodeType};
use crate::error::{Error, Result};
use crate::path::PathError;
use crate::validator::Validator;
use crate::value::RegisterValue;

/// A named handle on a single device node.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    path: String,
    description: String,
    unit: Option<String>,
    node_type: NodeType,
    properties: NodeProperties,
    validator: Validator,
    options: BTreeMap<i64, String>,
}

impl Parameter {
    pub(crate) fn new(name: String, node_type: NodeType, descriptor: NodeDescriptor) -> Self {
        let validator = Validator::for_node(node_type, descriptor.options.as_ref());
        Parameter {
            name,
            path: descriptor.path,
            description: descriptor.description,
            unit: descriptor.unit,
            node_type,
            properties: descriptor.properties,
            validator,
            options: descriptor.options.unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full node path, as used on the wire.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn properties(&self) -> NodeProperties {
        self.properties
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn options(&self) -> &BTreeMap<i64, String> {
        &self.options
    }

    pub fn gettable(&self) -> bool {
        self.properties.read
    }

    pub fn settable(&self) -> bool {
        self.properties.write
    }

    fn get<A: RegisterAccess + ?Sized>(&self, access: &A) -> Result<RegisterValue> {
        if !self.gettable() {
            return Err(Error::NotGettable {
                name: self.name.clone(),
            });
        }
        Ok(access.read(&self.path)?)
    }

    fn set<A: RegisterAccess + ?Sized>(&self, access: &A, value: RegisterValue) -> Result<()> {
        if !self.settable() {
            return Err(Error::NotSettable {
                name: self.name.clone(),
            });
        }
        let value = self.validator.validate(&self.name, value)?;
        debug!("Setting '{}' to {}", self.path, value);
        access.write(&self.path, value)?;
        Ok(())
    }

    pub fn info(&self) -> ParameterInfo {
        ParameterInfo {
            name: self.name.clone(),
            path: self.path.clone(),
            description: self.description.clone(),
            unit: self.unit.clone(),
            node_type: self.node_type.to_string(),
            properties: self.properties.to_string(),
            gettable: self.gettable(),
            settable: self.settable(),
            options: self.options.clone(),
        }
    }
}

/// Serializable summary of a [`Parameter`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    pub path: String,
    pub description: String,
    pub unit: Option<String>,
    pub node_type: String,
    pub properties: String,
    pub gettable: bool,
    pub settable: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<i64, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MalformedPath(PathError),
    UnrecognizedType(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MalformedPath(err) => write!(f, "{err}"),
            SkipReason::UnrecognizedType(tag) => write!(f, "Unrecognized node type '{tag}'"),
        }
    }
}

/// A node of the tree for which no parameter was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNode {
    pub path: String,
    pub reason: SkipReason,
}

/// Parameters compiled from a node tree, bound to the device session.
///
/// The table is built once by [`crate::NodeTreeCompiler`] and is not modified afterwards.
pub struct ParameterTable<A> {
    parameters: IndexMap<String, Parameter>,
    skipped: Vec<SkippedNode>,
    access: A,
}

impl<A: RegisterAccess> ParameterTable<A> {
    pub(crate) fn new(
        parameters: IndexMap<String, Parameter>,
        skipped: Vec<SkippedNode>,
        access: A,
    ) -> Self {
        ParameterTable {
            parameters,
            skipped,
            access,
        }
    }

    /// Read the value of the parameter `name` from the device.
    pub fn get(&self, name: &str) -> Result<RegisterValue> {
        self.lookup(name)?.get(&self.access)
    }

    /// Validate `value` and write it to the parameter `name`.
    pub fn set(&self, name: &str, value: impl Into<RegisterValue>) -> Result<()> {
        self.lookup(name)?.set(&self.access, value.into())
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn handle(&self, name: &str) -> Option<ParameterHandle<'_, A>> {
        self.parameters.get(name).map(|parameter| ParameterHandle {
            parameter,
            access: &self.access,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Nodes of the source tree that were not turned into parameters.
    pub fn skipped(&self) -> &[SkippedNode] {
        &self.skipped
    }

    pub fn access(&self) -> &A {
        &self.access
    }

    fn lookup(&self, name: &str) -> Result<&Parameter> {
        self.parameters
            .get(name)
            .ok_or_else(|| Error::UnknownParameter {
                name: name.to_string(),
            })
    }
}

impl<A> fmt::Debug for ParameterTable<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterTable")
            .field("parameters", &self.parameters.keys().collect::<Vec<_>>())
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

/// A parameter bound to the session of its table.
pub struct ParameterHandle<'a, A> {
    parameter: &'a Parameter,
    access: &'a A,
}

impl<A: RegisterAccess> ParameterHandle<'_, A> {
    pub fn parameter(&self) -> &Parameter {
        self.parameter
    }

    pub fn get(&self) -> Result<RegisterValue> {
        self.parameter.get(self.access)
    }

    pub fn set(&self, value: impl Into<RegisterValue>) -> Result<()> {
        self.parameter.set(self.access, value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingAccess;

    fn parameter(path: &str, node_type: NodeType, properties: &str) -> Parameter {
        let name = crate::path::derive_name(path, None, 1).unwrap();
        Parameter::new(
            name,
            node_type,
            NodeDescriptor::new(path, node_type.tag(), properties),
        )
    }

    #[test]
    fn test_not_settable_does_not_touch_device() {
        let access = RecordingAccess::default();
        let owner = parameter("/DEV8049/SYSTEM/OWNER", NodeType::String, "Read");
        let err = owner.set(&access, "x".into()).unwrap_err();
        assert!(matches!(err, Error::NotSettable { name } if name == "system_owner"));
        assert!(access.writes().is_empty());
    }

    #[test]
    fn test_not_gettable_does_not_touch_device() {
        let access = RecordingAccess::default();
        let trigger = parameter("/DEV8049/SYSTEM/FWLOGENABLE", NodeType::Integer, "Write");
        let err = trigger.get(&access).unwrap_err();
        assert!(matches!(err, Error::NotGettable { name } if name == "system_fwlogenable"));
        assert!(access.reads().is_empty());
    }

    #[test]
    fn test_communication_error_is_propagated() {
        let access = RecordingAccess::default().failing();
        let on = parameter("/DEV8049/SIGOUTS/0/ON", NodeType::Integer64, "Read, Write");
        let err = on.set(&access, RegisterValue::Int(1)).unwrap_err();
        match err {
            Error::Communication(e) => assert_eq!(e.path(), "/DEV8049/SIGOUTS/0/ON"),
            e => panic!("unexpected error: {e}"),
        }
        assert!(matches!(on.get(&access), Err(Error::Communication(_))));
    }

    #[test]
    fn test_info() {
        let descriptor = NodeDescriptor::new(
            "/DEV8049/SYSTEM/AWG/CHANNELGROUPING",
            "Integer (enumerated)",
            "Read, Write, Setting",
        )
        .with_description("Sets the channel grouping mode of the device.")
        .with_unit("None")
        .with_options([(0, "groups of 2"), (1, "groups of 4")]);
        let parameter = Parameter::new(
            "system_awg_channelgrouping".to_string(),
            NodeType::IntegerEnumerated,
            descriptor,
        );
        let info = parameter.info();
        assert_eq!(info.name, "system_awg_channelgrouping");
        assert_eq!(info.unit, None);
        assert_eq!(info.node_type, "Integer (enumerated)");
        assert_eq!(info.properties, "Read, Write, Setting");
        assert!(info.gettable && info.settable);
        assert_eq!(info.options.len(), 2);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["options"]["1"], "groups of 4");
        assert_eq!(json["unit"], serde_json::Value::Null);
    }
}
