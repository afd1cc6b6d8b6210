//! Encode a route into the binary control blob.

use std::path::PathBuf;

use clap::Args;
use routemux_component::{ComponentDescriptor, MuxComponent};

use super::common::{component_type, format_bytes, load_route};

/// Encode a route into a control blob.
#[derive(Args)]
pub struct EncodeArgs {
    /// Route name (factory) or path to a route TOML file
    pub route: String,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Wrap the blob in a component construction descriptor
    #[arg(long)]
    pub descriptor: bool,

    /// Component id written into the descriptor
    #[arg(long, default_value = "1")]
    pub id: u32,

    /// Pipeline id written into the descriptor
    #[arg(long, default_value = "0")]
    pub pipeline: u32,
}

/// Run the encode command.
pub fn run(args: EncodeArgs) -> anyhow::Result<()> {
    let route = load_route(&args.route)?;
    let blob = route.to_blob()?;

    let bytes = if args.descriptor {
        let mut desc =
            ComponentDescriptor::new(component_type(route.role), args.id, args.pipeline, blob);
        desc.config.frame_fmt = u32::from(route.frame_format()?.raw());
        let bytes = desc.encode();
        // Same path a host takes when it creates the component.
        MuxComponent::from_ipc(&bytes)?;
        bytes
    } else {
        blob
    };

    std::fs::write(&args.output, &bytes)?;

    let what = if args.descriptor {
        "descriptor"
    } else {
        "blob"
    };
    println!(
        "Wrote {} {} ({}) to {}",
        route.name,
        what,
        format_bytes(bytes.len() as u64),
        args.output.display()
    );

    Ok(())
}
