// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, BTreeSet};

use crate::descriptor::NodeType;
use crate::error::ValidationError;
use crate::value::RegisterValue;

/// Constraint applied to values before they are written to the device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Validator {
    /// Values are written as given; the device is the judge.
    #[default]
    NoConstraint,
    /// Value must be one of the option keys of an enumerated node.
    OneOf(BTreeSet<i64>),
}

impl Validator {
    /// Select the validator for a node.
    ///
    /// Only enumerated integer nodes with options are constrained.
    pub fn for_node(node_type: NodeType, options: Option<&BTreeMap<i64, String>>) -> Self {
        match (node_type, options) {
            (NodeType::IntegerEnumerated, Some(options)) => {
                Validator::OneOf(options.keys().copied().collect())
            }
            _ => Validator::NoConstraint,
        }
    }

    /// Check `value` for the parameter `name`, returning the value to be written.
    ///
    /// Values accepted by [`Validator::OneOf`] are written as integers, so an
    /// integral double such as `1.0` is written as `1`.
    pub fn validate(&self, name: &str, value: RegisterValue) -> Result<RegisterValue, ValidationError> {
        match self {
            Validator::NoConstraint => Ok(value),
            Validator::OneOf(allowed) => match value.as_integer() {
                Some(v) if allowed.contains(&v) => Ok(RegisterValue::Int(v)),
                _ => Err(ValidationError {
                    name: name.to_string(),
                    value,
                    allowed: allowed.iter().copied().collect(),
                }),
            },
        }
    }

    pub fn allowed_values(&self) -> Option<&BTreeSet<i64>> {
        match self {
            Validator::NoConstraint => None,
            Validator::OneOf(allowed) => Some(allowed),
        }
    }
}
