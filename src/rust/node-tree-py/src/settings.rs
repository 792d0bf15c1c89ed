// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Python bindings for NodeTreeSettings

use pyo3::{prelude::*, types::PyDict};

use node_tree::NodeTreeSettings;

/// Creates node tree settings from a Python dictionary.
///
/// Missing keys keep their default value.
pub(crate) fn settings_from_dict(ob: &Bound<'_, PyDict>) -> PyResult<NodeTreeSettings> {
    let mut settings = NodeTreeSettings::default();
    if let Some(device_id) = ob.get_item("DEVICE_ID")? {
        settings.device_id = device_id.extract::<Option<String>>()?;
    }
    if let Some(min_name_segments) = ob.get_item("MIN_NAME_SEGMENTS")? {
        settings.min_name_segments = min_name_segments.extract::<usize>()?;
    }
    Ok(settings)
}
