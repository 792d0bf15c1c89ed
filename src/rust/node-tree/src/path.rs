// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Translation of device node paths into parameter names.
//!
//! A node path such as `/DEV8049/SYSTEM/AWG/CHANNELGROUPING` is split into the
//! device identifier (`DEV8049`) and the remaining segments, which are
//! lower-cased and joined into the parameter name `system_awg_channelgrouping`.

pub const NAME_SEPARATOR: char = '_';

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path is empty")]
    Empty,
    #[error("Path does not start with a device identifier, found '{0}'")]
    MissingDevice(String),
    #[error("Path belongs to device '{found}', expected '{expected}'")]
    UnexpectedDevice { expected: String, found: String },
    #[error("Path has {found} segment(s) after the device identifier, at least {required} required")]
    TooShort { found: usize, required: usize },
}

/// A node path split into its device identifier and the node segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath<'a> {
    pub device: &'a str,
    pub segments: Vec<&'a str>,
}

impl NodePath<'_> {
    /// Parameter name of the node: lower-cased segments joined by [`NAME_SEPARATOR`].
    pub fn parameter_name(&self) -> String {
        parameter_name(&self.segments)
    }
}

/// Whether the segment is a device identifier of the form `dev<digits>`.
pub fn is_device_segment(segment: &str) -> bool {
    let Some(prefix) = segment.get(..3) else {
        return false;
    };
    let digits = &segment[3..];
    prefix.eq_ignore_ascii_case("dev")
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Split a node path into the device identifier and the remaining segments.
///
/// The leading `/` is optional, empty segments are ignored. When
/// `expected_device` is given, the first segment must match it
/// (case-insensitively) instead of the generic `dev<digits>` form.
pub fn split_path<'a>(
    path: &'a str,
    expected_device: Option<&str>,
) -> Result<NodePath<'a>, PathError> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let device = segments.next().ok_or(PathError::Empty)?;
    match expected_device {
        Some(expected) if !device.eq_ignore_ascii_case(expected) => {
            return Err(PathError::UnexpectedDevice {
                expected: expected.to_string(),
                found: device.to_string(),
            });
        }
        None if !is_device_segment(device) => {
            return Err(PathError::MissingDevice(device.to_string()));
        }
        _ => {}
    }
    Ok(NodePath {
        device,
        segments: segments.collect(),
    })
}

pub fn parameter_name(segments: &[&str]) -> String {
    let mut name = String::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            name.push(NAME_SEPARATOR);
        }
        name.push_str(&segment.to_lowercase());
    }
    name
}

/// Derive the parameter name of a node path.
///
/// Paths with fewer than `min_segments` segments after the device identifier
/// are rejected.
pub fn derive_name(
    path: &str,
    expected_device: Option<&str>,
    min_segments: usize,
) -> Result<String, PathError> {
    let node_path = split_path(path, expected_device)?;
    if node_path.segments.len() < min_segments {
        return Err(PathError::TooShort {
            found: node_path.segments.len(),
            required: min_segments,
        });
    }
    Ok(node_path.parameter_name())
}
