// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::error::Error as StdError;
use std::fmt::Display;

use crate::value::RegisterValue;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Parameter '{name}' is not gettable")]
    NotGettable { name: String },
    #[error("Parameter '{name}' is not settable")]
    NotSettable { name: String },
    #[error("No parameter named '{name}'")]
    UnknownParameter { name: String },
    #[error(transparent)]
    Communication(#[from] CommunicationError),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    pub fn new<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Anyhow(anyhow::anyhow!(msg.to_string()))
    }
}

/// Errors in the node tree document or in the compiler settings.
///
/// These are fatal: no parameter table is produced.
#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("The node tree is empty")]
    EmptyTree,
    #[error("Nodes '{previous_path}' and '{path}' both map to parameter '{name}'")]
    DuplicateParameter {
        name: String,
        path: String,
        previous_path: String,
    },
    #[error("Option key '{key}' of node '{path}' is not an integer")]
    InvalidOptionKey { path: String, key: String },
    #[error("Option key '{key}' of node '{path}' repeats option {value}")]
    DuplicateOptionKey {
        path: String,
        key: String,
        value: i64,
    },
    #[error("Invalid node tree document")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("Invalid value {value} for parameter '{name}', expected one of {allowed:?}")]
pub struct ValidationError {
    pub name: String,
    pub value: RegisterValue,
    pub allowed: Vec<i64>,
}

/// Failure reported by a [`crate::RegisterAccess`] implementation.
///
/// The underlying error is kept as the source so that bindings can recover
/// the original exception.
#[derive(thiserror::Error, Debug)]
#[error("Communication with node '{path}' failed")]
pub struct CommunicationError {
    path: String,
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl CommunicationError {
    pub fn new(path: impl Into<String>, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        CommunicationError {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn downcast_source<E: StdError + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }
}
