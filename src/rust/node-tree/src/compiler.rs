// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Compilation of a node tree into a parameter table.

use indexmap::IndexMap;
use indexmap::map::Entry;
use node_tree_log::{diagnostic, info, warn};

use crate::access::RegisterAccess;
use crate::descriptor::{NodeTree, NodeType};
use crate::error::{ConfigurationError, Result};
use crate::parameter::{Parameter, ParameterTable, SkipReason, SkippedNode};
use crate::path::derive_name;
use crate::settings::NodeTreeSettings;

#[derive(Debug, Clone)]
pub struct NodeTreeCompiler {
    settings: NodeTreeSettings,
}

impl NodeTreeCompiler {
    pub fn new(mut settings: NodeTreeSettings) -> Result<Self> {
        for change in settings.sanitize()? {
            info!(
                "Setting '{}' changed from '{}' to '{}': {}",
                change.field,
                change.original,
                change.sanitized,
                change.reason
            );
        }
        Ok(NodeTreeCompiler { settings })
    }

    pub fn settings(&self) -> &NodeTreeSettings {
        &self.settings
    }

    /// Create one parameter per node of `tree`, bound to `access`.
    ///
    /// The device is not accessed. Nodes with a malformed path or an
    /// unrecognized type are skipped and reported in
    /// [`ParameterTable::skipped`]. Two nodes mapping to the same parameter
    /// name abort the compilation.
    pub fn compile<A: RegisterAccess>(&self, tree: NodeTree, access: A) -> Result<ParameterTable<A>> {
        if tree.is_empty() {
            return Err(ConfigurationError::EmptyTree.into());
        }
        let node_count = tree.len();
        let mut parameters: IndexMap<String, Parameter> = IndexMap::with_capacity(node_count);
        let mut skipped = vec![];
        for descriptor in tree {
            let name = match derive_name(
                &descriptor.path,
                self.settings.device_id.as_deref(),
                self.settings.min_name_segments,
            ) {
                Ok(name) => name,
                Err(err) => {
                    warn!("Skipping node '{}': {}", descriptor.path, err);
                    skipped.push(SkippedNode {
                        path: descriptor.path,
                        reason: SkipReason::MalformedPath(err),
                    });
                    continue;
                }
            };
            let Some(node_type) = NodeType::from_tag(&descriptor.node_type) else {
                warn!(
                    "Skipping node '{}': unrecognized node type '{}'",
                    descriptor.path,
                    descriptor.node_type
                );
                skipped.push(SkippedNode {
                    reason: SkipReason::UnrecognizedType(descriptor.node_type),
                    path: descriptor.path,
                });
                continue;
            };
            if node_type == NodeType::IntegerEnumerated && descriptor.options.is_none() {
                diagnostic!(
                    "Enumerated node '{}' has no options, values are not validated",
                    descriptor.path
                );
            }
            match parameters.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(ConfigurationError::DuplicateParameter {
                        name: entry.key().clone(),
                        path: descriptor.path,
                        previous_path: entry.get().path().to_string(),
                    }
                    .into());
                }
                Entry::Vacant(entry) => {
                    let parameter = Parameter::new(entry.key().clone(), node_type, descriptor);
                    entry.insert(parameter);
                }
            }
        }
        info!(
            "Created {} parameters from {} nodes, {} skipped",
            parameters.len(),
            node_count,
            skipped.len()
        );
        Ok(ParameterTable::new(parameters, skipped, access))
    }
}

/// Compile `tree` with the default settings.
pub fn compile<A: RegisterAccess>(tree: NodeTree, access: A) -> Result<ParameterTable<A>> {
    NodeTreeCompiler::new(NodeTreeSettings::default())?.compile(tree, access)
}
