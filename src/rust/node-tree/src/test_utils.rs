// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::collections::HashMap;

use crate::access::RegisterAccess;
use crate::error::CommunicationError;
use crate::value::RegisterValue;

/// In-memory device session that records every access.
#[derive(Debug, Default)]
pub(crate) struct RecordingAccess {
    values: RefCell<HashMap<String, RegisterValue>>,
    reads: RefCell<Vec<String>>,
    writes: RefCell<Vec<(String, RegisterValue)>>,
    failing: bool,
}

impl RecordingAccess {
    /// Every access fails with a communication error.
    pub(crate) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub(crate) fn with_value(self, path: &str, value: impl Into<RegisterValue>) -> Self {
        self.values.borrow_mut().insert(path.to_string(), value.into());
        self
    }

    pub(crate) fn reads(&self) -> Vec<String> {
        self.reads.borrow().clone()
    }

    pub(crate) fn writes(&self) -> Vec<(String, RegisterValue)> {
        self.writes.borrow().clone()
    }
}

impl RegisterAccess for RecordingAccess {
    fn read(&self, path: &str) -> Result<RegisterValue, CommunicationError> {
        self.reads.borrow_mut().push(path.to_string());
        if self.failing {
            return Err(CommunicationError::new(path, "device not reachable"));
        }
        self.values
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| CommunicationError::new(path, "node not found"))
    }

    fn write(&self, path: &str, value: RegisterValue) -> Result<(), CommunicationError> {
        self.writes
            .borrow_mut()
            .push((path.to_string(), value.clone()));
        if self.failing {
            return Err(CommunicationError::new(path, "device not reachable"));
        }
        self.values.borrow_mut().insert(path.to_string(), value);
        Ok(())
    }
}
