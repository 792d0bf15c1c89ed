// Copyright 2025 Zurich Instruments AG
// SPDX-License-Identifier: Apache-2.0

//! Offline inspection of instrument node trees.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use node_tree::{
    CommunicationError, NodeTree, NodeTreeCompiler, NodeTreeSettings, Parameter, ParameterInfo,
    ParameterTable, RegisterAccess, RegisterValue,
};

#[derive(Parser, Debug)]
#[command(
    name = "node-tree",
    version,
    about = "Inspect the parameters compiled from an instrument node tree"
)]
struct Cli {
    /// Only compile nodes of this device, e.g. dev8049
    #[arg(long, global = true)]
    device: Option<String>,

    /// Minimum number of path segments in a parameter name
    #[arg(long, global = true)]
    min_segments: Option<usize>,

    /// Log compiler diagnostics
    #[arg(short, long, action = ArgAction::SetTrue, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the parameters of a node tree
    List {
        /// Node tree JSON file
        file: PathBuf,
        /// Print the parameters as JSON
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Show a single parameter
    Show {
        /// Node tree JSON file
        file: PathBuf,
        /// Parameter name, e.g. system_awg_channelgrouping
        name: String,
    },
    /// Compile a node tree and report skipped nodes
    Check {
        /// Node tree JSON file
        file: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("No device connected")]
struct Detached;

/// Session for offline use, every node access fails.
struct DetachedAccess;

impl RegisterAccess for DetachedAccess {
    fn read(&self, path: &str) -> Result<RegisterValue, CommunicationError> {
        Err(CommunicationError::new(path, Detached))
    }

    fn write(&self, path: &str, _value: RegisterValue) -> Result<(), CommunicationError> {
        Err(CommunicationError::new(path, Detached))
    }
}

impl Cli {
    fn settings(&self) -> NodeTreeSettings {
        let mut settings = NodeTreeSettings {
            device_id: self.device.clone(),
            ..Default::default()
        };
        if let Some(min_segments) = self.min_segments {
            settings.min_name_segments = min_segments;
        }
        settings
    }
}

fn load(file: &Path, settings: NodeTreeSettings) -> Result<ParameterTable<DetachedAccess>> {
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open '{}'", file.display()))?,
    );
    let tree = NodeTree::from_reader(reader)
        .with_context(|| format!("Failed to read node tree '{}'", file.display()))?;
    let table = NodeTreeCompiler::new(settings)?.compile(tree, DetachedAccess)?;
    Ok(table)
}

fn access_flags(parameter: &Parameter) -> &'static str {
    match (parameter.gettable(), parameter.settable()) {
        (true, true) => "rw",
        (true, false) => "r-",
        (false, true) => "-w",
        (false, false) => "--",
    }
}

fn list(table: &ParameterTable<DetachedAccess>, json: bool) -> Result<()> {
    if json {
        let infos: Vec<ParameterInfo> = table.iter().map(Parameter::info).collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }
    let width = table.names().map(str::len).max().unwrap_or(0);
    for parameter in table.iter() {
        println!(
            "{:<width$}  {}  {:<20}  {}",
            parameter.name(),
            access_flags(parameter),
            parameter.node_type().tag(),
            parameter.unit().unwrap_or("")
        );
    }
    Ok(())
}

fn show(table: &ParameterTable<DetachedAccess>, name: &str) -> Result<()> {
    let parameter = table
        .parameter(name)
        .ok_or_else(|| node_tree::Error::UnknownParameter {
            name: name.to_string(),
        })?;
    println!("{}", parameter.name());
    println!("  path:        {}", parameter.path());
    println!("  description: {}", parameter.description());
    println!("  type:        {}", parameter.node_type());
    println!("  properties:  {}", parameter.properties());
    println!("  unit:        {}", parameter.unit().unwrap_or("-"));
    if !parameter.options().is_empty() {
        println!("  options:");
        for (value, description) in parameter.options() {
            println!("    {value}: {description}");
        }
    }
    Ok(())
}

fn check(table: &ParameterTable<DetachedAccess>) {
    println!(
        "{} parameters, {} nodes skipped",
        table.len(),
        table.skipped().len()
    );
    for node in table.skipped() {
        println!("  {}: {}", node.path, node.reason);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
    node_tree_log::init_logging(cli.verbose);

    let settings = cli.settings();
    match &cli.command {
        Commands::List { file, json } => list(&load(file, settings)?, *json),
        Commands::Show { file, name } => show(&load(file, settings)?, name),
        Commands::Check { file } => {
            check(&load(file, settings)?);
            Ok(())
        }
    }
}
