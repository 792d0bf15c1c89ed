// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Node tree documents as returned by the LabOne data server.
//!
//! The document is a JSON object keyed by node path:
//!
//! ```json
//! {
//!   "/DEV8049/SYSTEM/AWG/CHANNELGROUPING": {
//!     "Node": "/DEV8049/SYSTEM/AWG/CHANNELGROUPING",
//!     "Description": "Sets the channel grouping mode of the device.",
//!     "Properties": "Read, Write, Setting",
//!     "Type": "Integer (enumerated)",
//!     "Unit": "None",
//!     "Options": {"0": "...", "1": "...", "2": "..."}
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use node_tree_log::{diagnostic, warn};
use serde::Deserialize;

use crate::error::ConfigurationError;

/// Value type of a node, from the `Type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Integer,
    IntegerEnumerated,
    Integer64,
    Double,
    String,
    ByteArray,
    Complex,
    ComplexDouble,
    VectorData,
    DemodSample,
    ScopeWave,
    PwaWave,
    TriggerSample,
    CntSample,
    AuxInSample,
    DioSample,
    ImpedanceSample,
    AdvisorWave,
}

impl NodeType {
    /// Resolve a `Type` tag. Returns `None` for unrecognized tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let node_type = match tag.trim() {
            "Integer" => NodeType::Integer,
            "Integer (enumerated)" => NodeType::IntegerEnumerated,
            "Integer (64 bit)" => NodeType::Integer64,
            "Double" => NodeType::Double,
            "String" => NodeType::String,
            "ByteArray" => NodeType::ByteArray,
            "Complex" => NodeType::Complex,
            "Complex Double" => NodeType::ComplexDouble,
            "ZIVectorData" => NodeType::VectorData,
            "ZIDemodSample" => NodeType::DemodSample,
            "ZIScopeWave" => NodeType::ScopeWave,
            "ZIPWAWave" => NodeType::PwaWave,
            "ZITriggerSample" => NodeType::TriggerSample,
            "ZICntSample" => NodeType::CntSample,
            "ZIAuxInSample" => NodeType::AuxInSample,
            "ZIDIOSample" => NodeType::DioSample,
            "ZIImpedanceSample" => NodeType::ImpedanceSample,
            "ZIAdvisorWave" => NodeType::AdvisorWave,
            _ => return None,
        };
        Some(node_type)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            NodeType::Integer => "Integer",
            NodeType::IntegerEnumerated => "Integer (enumerated)",
            NodeType::Integer64 => "Integer (64 bit)",
            NodeType::Double => "Double",
            NodeType::String => "String",
            NodeType::ByteArray => "ByteArray",
            NodeType::Complex => "Complex",
            NodeType::ComplexDouble => "Complex Double",
            NodeType::VectorData => "ZIVectorData",
            NodeType::DemodSample => "ZIDemodSample",
            NodeType::ScopeWave => "ZIScopeWave",
            NodeType::PwaWave => "ZIPWAWave",
            NodeType::TriggerSample => "ZITriggerSample",
            NodeType::CntSample => "ZICntSample",
            NodeType::AuxInSample => "ZIAuxInSample",
            NodeType::DioSample => "ZIDIOSample",
            NodeType::ImpedanceSample => "ZIImpedanceSample",
            NodeType::AdvisorWave => "ZIAdvisorWave",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Access properties of a node, from the comma-separated `Properties` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeProperties {
    pub read: bool,
    pub write: bool,
    pub setting: bool,
    pub stream: bool,
    pub pipelined: bool,
    pub silent: bool,
}

impl NodeProperties {
    pub fn parse(properties: &str) -> Self {
        let mut out = NodeProperties::default();
        for token in properties.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token {
                "Read" => out.read = true,
                "Write" => out.write = true,
                "Setting" => out.setting = true,
                "Stream" => out.stream = true,
                "Pipelined" => out.pipelined = true,
                "Silent" => out.silent = true,
                _ => diagnostic!("Ignoring unknown node property '{}'", token),
            }
        }
        out
    }
}

impl fmt::Display for NodeProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.read, "Read"),
            (self.write, "Write"),
            (self.setting, "Setting"),
            (self.stream, "Stream"),
            (self.pipelined, "Pipelined"),
            (self.silent, "Silent"),
        ];
        let tokens = flags
            .iter()
            .filter(|(set, _)| *set)
            .map(|(_, token)| *token)
            .collect::<Vec<_>>();
        write!(f, "{}", tokens.join(", "))
    }
}

/// Description of a single device node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDescriptor {
    pub path: String,
    pub description: String,
    pub properties: NodeProperties,
    /// Raw `Type` tag, resolved with [`NodeType::from_tag`] during compilation.
    pub node_type: String,
    pub unit: Option<String>,
    pub options: Option<BTreeMap<i64, String>>,
}

impl NodeDescriptor {
    pub fn new(path: impl Into<String>, node_type: impl Into<String>, properties: &str) -> Self {
        NodeDescriptor {
            path: path.into(),
            description: String::new(),
            properties: NodeProperties::parse(properties),
            node_type: node_type.into(),
            unit: None,
            options: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = normalize_unit(unit);
        self
    }

    pub fn with_options<S: Into<String>>(mut self, options: impl IntoIterator<Item = (i64, S)>) -> Self {
        self.options = Some(options.into_iter().map(|(k, v)| (k, v.into())).collect());
        self
    }
}

/// `"None"` and the empty string both mean that the node has no unit.
pub fn normalize_unit(unit: &str) -> Option<String> {
    match unit.trim() {
        "" | "None" => None,
        unit => Some(unit.to_string()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawNode {
    node: String,
    description: String,
    properties: String,
    #[serde(rename = "Type")]
    node_type: String,
    unit: String,
    #[serde(default)]
    options: Option<IndexMap<String, String>>,
}

impl RawNode {
    fn into_descriptor(self, path: String) -> Result<NodeDescriptor, ConfigurationError> {
        if !self.node.eq_ignore_ascii_case(&path) {
            warn!(
                "Node field '{}' does not match its key '{}', using the key",
                self.node,
                path
            );
        }
        let options = self
            .options
            .map(|options| parse_options(&path, options))
            .transpose()?;
        Ok(NodeDescriptor {
            description: self.description,
            properties: NodeProperties::parse(&self.properties),
            node_type: self.node_type,
            unit: normalize_unit(&self.unit),
            options,
            path,
        })
    }
}

fn parse_options(
    path: &str,
    options: IndexMap<String, String>,
) -> Result<BTreeMap<i64, String>, ConfigurationError> {
    let mut parsed = BTreeMap::new();
    for (key, description) in options {
        let Ok(value) = key.trim().parse::<i64>() else {
            return Err(ConfigurationError::InvalidOptionKey {
                path: path.to_string(),
                key,
            });
        };
        if parsed.insert(value, description).is_some() {
            return Err(ConfigurationError::DuplicateOptionKey {
                path: path.to_string(),
                key,
                value,
            });
        }
    }
    Ok(parsed)
}

/// A node tree snapshot, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTree {
    nodes: IndexMap<String, NodeDescriptor>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(document: &str) -> Result<Self, ConfigurationError> {
        let raw: IndexMap<String, RawNode> = serde_json::from_str(document)?;
        Self::from_raw(raw)
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, ConfigurationError> {
        let raw: IndexMap<String, RawNode> = serde_json::from_reader(reader)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: IndexMap<String, RawNode>) -> Result<Self, ConfigurationError> {
        let nodes = raw
            .into_iter()
            .map(|(path, node)| Ok((path.clone(), node.into_descriptor(path)?)))
            .collect::<Result<_, ConfigurationError>>()?;
        Ok(NodeTree { nodes })
    }

    /// Insert a descriptor. Returns the previous descriptor with the same path.
    pub fn insert(&mut self, descriptor: NodeDescriptor) -> Option<NodeDescriptor> {
        self.nodes.insert(descriptor.path.clone(), descriptor)
    }

    pub fn get(&self, path: &str) -> Option<&NodeDescriptor> {
        self.nodes.get(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes.values()
    }
}

impl FromIterator<NodeDescriptor> for NodeTree {
    fn from_iter<T: IntoIterator<Item = NodeDescriptor>>(iter: T) -> Self {
        let mut tree = NodeTree::new();
        for descriptor in iter {
            tree.insert(descriptor);
        }
        tree
    }
}

impl IntoIterator for NodeTree {
    type Item = NodeDescriptor;
    type IntoIter = indexmap::map::IntoValues<String, NodeDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_values()
    }
}
