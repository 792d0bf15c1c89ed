// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use std::rc::Rc;
use std::sync::Arc;

use crate::error::CommunicationError;
use crate::value::RegisterValue;

/// Read and write access to device nodes, keyed by the full node path.
///
/// Implemented by the device session. Implementations are assumed to be
/// single-writer: the parameter table issues calls sequentially and never
/// retries, and callers sharing a non-reentrant session must serialize the
/// calls themselves.
pub trait RegisterAccess {
    fn read(&self, path: &str) -> Result<RegisterValue, CommunicationError>;
    fn write(&self, path: &str, value: RegisterValue) -> Result<(), CommunicationError>;
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &T {
    fn read(&self, path: &str) -> Result<RegisterValue, CommunicationError> {
        (**self).read(path)
    }

    fn write(&self, path: &str, value: RegisterValue) -> Result<(), CommunicationError> {
        (**self).write(path, value)
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for Box<T> {
    fn read(&self, path: &str) -> Result<RegisterValue, CommunicationError> {
        (**self).read(path)
    }

    fn write(&self, path: &str, value: RegisterValue) -> Result<(), CommunicationError> {
        (**self).write(path, value)
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for Rc<T> {
    fn read(&self, path: &str) -> Result<RegisterValue, CommunicationError> {
        (**self).read(path)
    }

    fn write(&self, path: &str, value: RegisterValue) -> Result<(), CommunicationError> {
        (**self).write(path, value)
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for Arc<T> {
    fn read(&self, path: &str) -> Result<RegisterValue, CommunicationError> {
        (**self).read(path)
    }

    fn write(&self, path: &str, value: RegisterValue) -> Result<(), CommunicationError> {
        (**self).write(path, value)
    }
}
