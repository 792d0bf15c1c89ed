// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Settings of the node tree compiler.

use crate::error::ConfigurationError;

#[derive(Debug, Clone, PartialEq)]
pub struct SanitizationChange {
    pub field: &'static str,
    pub original: String,
    pub sanitized: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeTreeSettings {
    /// Accept only nodes of this device. Any `dev<digits>` root is accepted when unset.
    pub device_id: Option<String>,
    /// Minimum number of path segments after the device identifier.
    pub min_name_segments: usize,
}

impl Default for NodeTreeSettings {
    fn default() -> Self {
        NodeTreeSettings {
            device_id: None,
            min_name_segments: 2,
        }
    }
}

impl NodeTreeSettings {
    pub fn new(device_id: Option<String>, min_name_segments: usize) -> Self {
        NodeTreeSettings {
            device_id,
            min_name_segments,
        }
    }

    pub fn sanitize(&mut self) -> Result<Vec<SanitizationChange>, ConfigurationError> {
        if self.min_name_segments == 0 {
            return Err(ConfigurationError::InvalidSettings(
                "`min_name_segments` must be at least 1".to_string(),
            ));
        }
        let mut changes = vec![];
        if let Some(device_id) = self.device_id.take() {
            let sanitized = device_id.trim().trim_matches('/').to_lowercase();
            if sanitized.is_empty() {
                changes.push(SanitizationChange {
                    field: "device_id",
                    original: device_id,
                    sanitized: String::new(),
                    reason: "Empty device id, accepting any device.".to_string(),
                });
                return Ok(changes);
            }
            if sanitized.contains('/') {
                return Err(ConfigurationError::InvalidSettings(format!(
                    "Device id '{device_id}' must be a single path segment"
                )));
            }
            if sanitized != device_id {
                changes.push(SanitizationChange {
                    field: "device_id",
                    original: device_id,
                    sanitized: sanitized.clone(),
                    reason: "Device ids are lower case without slashes.".to_string(),
                });
            }
            self.device_id = Some(sanitized);
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_device_id() {
        let mut settings = NodeTreeSettings::new(Some("/DEV8049".to_string()), 2);
        let changes = settings.sanitize().unwrap();
        assert_eq!(settings.device_id.as_deref(), Some("dev8049"));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "device_id");
        assert_eq!(changes[0].original, "/DEV8049");
        assert_eq!(changes[0].sanitized, "dev8049");

        // Already sanitized settings are left alone
        let changes = settings.sanitize().unwrap();
        assert!(changes.is_empty());
        assert_eq!(settings.device_id.as_deref(), Some("dev8049"));
    }

    #[test]
    fn test_sanitize_empty_device_id() {
        let mut settings = NodeTreeSettings::new(Some(" / ".to_string()), 2);
        let changes = settings.sanitize().unwrap();
        assert_eq!(settings.device_id, None);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_sanitize_rejects_invalid_settings() {
        let mut settings = NodeTreeSettings::new(None, 0);
        assert!(matches!(
            settings.sanitize(),
            Err(ConfigurationError::InvalidSettings(_))
        ));

        let mut settings = NodeTreeSettings::new(Some("dev1/sigouts".to_string()), 2);
        assert!(matches!(
            settings.sanitize(),
            Err(ConfigurationError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_default() {
        let settings = NodeTreeSettings::default();
        assert_eq!(settings.device_id, None);
        assert_eq!(settings.min_name_segments, 2);
    }
}
