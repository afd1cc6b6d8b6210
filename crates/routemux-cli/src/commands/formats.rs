//! List frame formats and whether a routing kernel services them.

use clap::Args;
use routemux_core::{FrameFormat, kernel_for};

/// List frame formats.
#[derive(Args)]
pub struct FormatsArgs {
    /// Show only routable formats
    #[arg(long)]
    pub routable: bool,
}

const FORMATS: [FrameFormat; 4] = [
    FrameFormat::S16Le,
    FrameFormat::S24_4Le,
    FrameFormat::S32Le,
    FrameFormat::Float,
];

/// Run the formats command.
pub fn run(args: FormatsArgs) -> anyhow::Result<()> {
    println!("Frame Formats:");
    println!("==============");
    println!("  {:8} {:>4} {:>6} {:>5}  kernel", "name", "tag", "bytes", "bits");

    for format in FORMATS {
        let routable = kernel_for(format).is_some();
        if args.routable && !routable {
            continue;
        }
        println!(
            "  {:8} {:>4} {:>6} {:>5}  {}",
            format.name(),
            format.raw(),
            format.sample_bytes().unwrap_or(0),
            format.valid_bits().unwrap_or(0),
            if routable { "yes" } else { "no" }
        );
    }

    Ok(())
}
