// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Turns the JSON description of an instrument's node tree into a table of
//! named, validated parameters bound to a device session.

pub mod access;
pub mod compiler;
pub mod descriptor;
pub mod error;
pub mod instrument;
pub mod parameter;
pub mod path;
pub mod settings;
pub mod validator;
pub mod value;

#[cfg(test)]
pub(crate) mod test_utils;

pub use access::RegisterAccess;
pub use compiler::{NodeTreeCompiler, compile};
pub use descriptor::{NodeDescriptor, NodeProperties, NodeTree, NodeType};
pub use error::{CommunicationError, ConfigurationError, Error, Result, ValidationError};
pub use instrument::{ChannelGrouping, Hdawg};
pub use parameter::{
    Parameter, ParameterHandle, ParameterInfo, ParameterTable, SkipReason, SkippedNode,
};
pub use path::{PathError, derive_name};
pub use settings::{NodeTreeSettings, SanitizationChange};
pub use validator::Validator;
pub use value::RegisterValue;
