// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Typed access to frequently used HDAWG parameters.

use crate::access::RegisterAccess;
use crate::compiler::NodeTreeCompiler;
use crate::descriptor::NodeTree;
use crate::error::{Error, Result};
use crate::parameter::ParameterTable;
use crate::settings::NodeTreeSettings;
use crate::value::RegisterValue;

pub const CHANNEL_GROUPING: &str = "system_awg_channelgrouping";
pub const OWNER: &str = "system_owner";

fn output_enable(channel: usize) -> String {
    format!("sigouts_{channel}_on")
}

/// Number of outputs controlled by one sequencer program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelGrouping {
    Groups2 = 0,
    Groups4 = 1,
    Groups8 = 2,
}

impl ChannelGrouping {
    pub fn channels_per_group(&self) -> usize {
        match self {
            ChannelGrouping::Groups2 => 2,
            ChannelGrouping::Groups4 => 4,
            ChannelGrouping::Groups8 => 8,
        }
    }
}

impl TryFrom<i64> for ChannelGrouping {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(ChannelGrouping::Groups2),
            1 => Ok(ChannelGrouping::Groups4),
            2 => Ok(ChannelGrouping::Groups8),
            _ => Err(Error::new(format!("Unknown channel grouping mode {value}"))),
        }
    }
}

impl From<ChannelGrouping> for RegisterValue {
    fn from(value: ChannelGrouping) -> Self {
        RegisterValue::Int(value as i64)
    }
}

/// HDAWG session on top of a compiled parameter table.
#[derive(Debug)]
pub struct Hdawg<A> {
    table: ParameterTable<A>,
}

impl<A: RegisterAccess> Hdawg<A> {
    pub fn new(table: ParameterTable<A>) -> Self {
        Hdawg { table }
    }

    pub fn from_node_tree(tree: NodeTree, access: A, settings: NodeTreeSettings) -> Result<Self> {
        let table = NodeTreeCompiler::new(settings)?.compile(tree, access)?;
        Ok(Hdawg::new(table))
    }

    pub fn table(&self) -> &ParameterTable<A> {
        &self.table
    }

    pub fn enable_channel(&self, channel: usize) -> Result<()> {
        self.table.set(&output_enable(channel), 1)
    }

    pub fn disable_channel(&self, channel: usize) -> Result<()> {
        self.table.set(&output_enable(channel), 0)
    }

    pub fn is_channel_enabled(&self, channel: usize) -> Result<bool> {
        let value = self.table.get(&output_enable(channel))?;
        value.as_integer().map(|v| v != 0).ok_or_else(|| {
            Error::new(format!(
                "Expected an integer for output {channel}, got {}",
                value.kind()
            ))
        })
    }

    pub fn set_channel_grouping(&self, grouping: ChannelGrouping) -> Result<()> {
        self.table.set(CHANNEL_GROUPING, grouping)
    }

    pub fn channel_grouping(&self) -> Result<ChannelGrouping> {
        let value = self.table.get(CHANNEL_GROUPING)?;
        let mode = value.as_integer().ok_or_else(|| {
            Error::new(format!(
                "Expected an integer channel grouping, got {}",
                value.kind()
            ))
        })?;
        ChannelGrouping::try_from(mode)
    }

    /// Current owner (IP address) of the device.
    pub fn owner(&self) -> Result<String> {
        let value = self.table.get(OWNER)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::new(format!("Expected a string owner, got {}", value.kind())))
    }
}
