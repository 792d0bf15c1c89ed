// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

use pyo3::prelude::*;

use node_tree_log::init_logging;

#[pyfunction(name = "init_logging")]
pub fn init_logging_py(log_level: i64) {
    // Between Python's INFO and DEBUG, the LabOne Q diagnostics level
    const DIAGNOSTICS_LEVEL: i64 = 15;
    init_logging(log_level <= DIAGNOSTICS_LEVEL);
}
