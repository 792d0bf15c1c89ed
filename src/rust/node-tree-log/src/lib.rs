// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Logging macros shared by the node tree crates.
//!
//! All records are emitted through the `log` facade with a target prefixed by
//! `zhinst.node_tree::`, so that the Python side can route them to the
//! `zhinst.node_tree` logger hierarchy.

use std::sync::atomic::{AtomicBool, Ordering};

#[doc(hidden)]
pub use log as _log;

#[macro_export]
macro_rules! info {
    ($msg:literal, $($arg:tt)+) => {
        $crate::_log::info!(target: concat!("zhinst.node_tree::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        $crate::_log::info!(target: concat!("zhinst.node_tree::", module_path!()), $msg);
    };
}

#[macro_export]
macro_rules! warn {
    ($msg:literal, $($arg:tt)+) => {
        $crate::_log::warn!(target: concat!("zhinst.node_tree::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        $crate::_log::warn!(target: concat!("zhinst.node_tree::", module_path!()), $msg);
    };
}

#[macro_export]
macro_rules! debug {
    ($msg:literal, $($arg:tt)+) => {
        $crate::_log::debug!(target: concat!("zhinst.node_tree::", module_path!()), $msg, $($arg)+);
    };
    ($msg:literal) => {
        $crate::_log::debug!(target: concat!("zhinst.node_tree::", module_path!()), $msg);
    };
}

/// Log a diagnostic message at info level if diagnostics logging is enabled.
///
/// Diagnostics cover per-node decisions of the compiler (ignored property
/// tokens, enumerated nodes without options), which are too noisy for a
/// regular session with several thousand nodes.
#[macro_export]
macro_rules! diagnostic {
    ($msg:literal, $($arg:tt)+) => {
        if $crate::is_diagnostics_enabled() {
            $crate::_log::info!(target: concat!("zhinst.node_tree::", module_path!()), $msg, $($arg)+);
        }
    };
    ($msg:literal) => {
        if $crate::is_diagnostics_enabled() {
            $crate::_log::info!(target: concat!("zhinst.node_tree::", module_path!()), $msg);
        }
    };
}

static DIAGNOSTICS_ENABLED: AtomicBool = AtomicBool::new(false);

#[inline]
pub fn is_diagnostics_enabled() -> bool {
    DIAGNOSTICS_ENABLED.load(Ordering::Acquire)
}

/// Initialize the logging.
///
/// Only the diagnostics switch is owned by this crate. The concrete logger is
/// installed by the embedding application: `pyo3-log` in the Python bindings,
/// `env_logger` in the command line tool.
pub fn init_logging(with_diagnostics: bool) {
    DIAGNOSTICS_ENABLED.store(with_diagnostics, Ordering::Release);
}
