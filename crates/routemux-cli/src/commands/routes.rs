//! Route listing and inspection commands.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use routemux_config::{RouteFile, factory_routes};

use super::common::{format_mask, load_route};

#[derive(Args)]
pub struct RoutesArgs {
    #[command(subcommand)]
    command: RoutesCommand,
}

#[derive(Subcommand)]
enum RoutesCommand {
    /// List factory routes
    List,

    /// Show details of a route
    Show {
        /// Route name or path
        name: String,

        /// Print the route as TOML
        #[arg(long)]
        toml: bool,
    },

    /// Check a route file against the routing model
    Validate {
        /// Path to a route TOML file
        path: PathBuf,
    },

    /// Save a route (e.g. a factory route) to a TOML file for editing
    Export {
        /// Route name or path
        name: String,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,
    },
}

pub fn run(args: RoutesArgs) -> anyhow::Result<()> {
    match args.command {
        RoutesCommand::List => list_routes(),
        RoutesCommand::Show { name, toml } => show_route(&name, toml),
        RoutesCommand::Validate { path } => validate_route(&path),
        RoutesCommand::Export { name, output } => export_route(&name, &output),
    }
}

fn list_routes() -> anyhow::Result<()> {
    println!("Factory Routes:");
    println!("===============");
    for route in factory_routes() {
        let desc = route.description.as_deref().unwrap_or("");
        println!("  {:16} {:6} - {}", route.name, route.role.name(), desc);
    }
    Ok(())
}

fn show_route(name: &str, toml: bool) -> anyhow::Result<()> {
    let route = load_route(name)?;

    if toml {
        print!("{}", route.to_toml()?);
        return Ok(());
    }

    println!("Route: {}", route.name);
    println!("{}", "=".repeat(7 + route.name.len()));
    println!();

    if let Some(desc) = &route.description {
        println!("Description: {desc}");
        println!();
    }

    let config = route.to_config()?;
    println!("Role:     {}", route.role.name());
    println!("Format:   {}", config.frame_format());
    println!("Channels: {}", config.channels());
    println!();

    println!("Streams ({}):", config.num_streams());
    for (stream, entry) in config.streams().iter().zip(&route.streams) {
        let masks: Vec<String> = entry.masks.iter().map(|&m| format_mask(m)).collect();
        println!(
            "  pipeline {:<4} channels {}  masks [{}]",
            stream.pipeline_id,
            stream.channels,
            masks.join(", ")
        );
    }

    Ok(())
}

fn validate_route(path: &Path) -> anyhow::Result<()> {
    let route = RouteFile::load(path)?;
    route.validate()?;
    println!("{}: ok ({} streams)", route.name, route.streams.len());
    Ok(())
}

fn export_route(name: &str, output: &Path) -> anyhow::Result<()> {
    let route = load_route(name)?;
    route.save(output)?;
    println!("Saved {} to {}", route.name, output.display());
    Ok(())
}
