//! Decode a control blob or construction descriptor.

use std::path::PathBuf;

use clap::Args;
use routemux_component::{ComponentDescriptor, ComponentType};
use routemux_config::RouteFile;
use routemux_core::RouteConfig;

use super::common::{RoleArg, role_of};

/// Decode a blob back into a route.
#[derive(Args)]
pub struct DecodeArgs {
    /// Blob or descriptor file
    pub input: PathBuf,

    /// Input is a construction descriptor rather than a bare blob
    #[arg(long)]
    pub descriptor: bool,

    /// Role of a bare blob (descriptors carry their own)
    #[arg(long, value_enum, default_value = "demux")]
    pub role: RoleArg,

    /// Name given to the decoded route
    #[arg(long, default_value = "decoded")]
    pub name: String,

    /// Print JSON instead of TOML
    #[arg(long)]
    pub json: bool,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the decode command.
pub fn run(args: DecodeArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.input)?;

    let route = if args.descriptor {
        let desc = ComponentDescriptor::decode(&bytes)?;
        let kind = ComponentType::from_raw(desc.header.comp_type)?;
        tracing::debug!(
            id = desc.header.id,
            pipeline_id = desc.header.pipeline_id,
            kind = kind.name(),
            "decoded descriptor"
        );
        if desc.payload.is_empty() {
            RouteFile::from_config(&args.name, role_of(kind), &RouteConfig::empty())
        } else {
            RouteFile::from_blob(&args.name, role_of(kind), &desc.payload)?
        }
    } else {
        RouteFile::from_blob(&args.name, args.role.into(), &bytes)?
    };

    let text = if args.json {
        let mut json = serde_json::to_string_pretty(&route)?;
        json.push('\n');
        json
    } else {
        route.to_toml()?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{text}"),
    }

    Ok(())
}
