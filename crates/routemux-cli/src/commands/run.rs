//! Route WAV files through a mux or demux component.
//!
//! Each file is bound to a [`RingBuffer`] endpoint. Routed streams take the
//! files in route order, and the primary endpoint carries pipeline id 0. The
//! component then runs one copy cycle per period until every input is
//! drained.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use routemux_component::{Endpoint, MuxComponent, RingBuffer, Trigger, XrunEvent};
use routemux_config::Role;
use routemux_core::RouteConfig;

use super::common::{component_type, load_route};
use crate::wav::{PcmAudio, read_pcm, write_pcm};

/// Pipeline id of the primary endpoint.
const PRIMARY_PIPELINE: u32 = 0;

/// Component id reported in logs.
const COMPONENT_ID: u32 = 1;

/// Route audio files through a component.
#[derive(Args)]
pub struct RunArgs {
    /// Route name (factory) or path to a route TOML file
    #[arg(short, long)]
    pub route: String,

    /// Input WAV files (one for a demux, one per routed stream for a mux)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output WAV files (one per routed stream for a demux, one for a mux)
    #[arg(short, long, required = true, num_args = 1..)]
    pub output: Vec<PathBuf>,

    /// Frames per processing cycle
    #[arg(long, default_value = "48")]
    pub period: usize,

    /// Periods of buffering per endpoint
    #[arg(long, default_value = "2")]
    pub periods: usize,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

/// Buffer geometry and output depth shared by both directions.
struct Session {
    period: usize,
    periods: usize,
    sample_bytes: usize,
    bits: u16,
    quiet: bool,
}

impl Session {
    fn ring(&self, pipeline_id: u32, channels: u16) -> RingBuffer {
        let capacity = self.period * self.periods * usize::from(channels) * self.sample_bytes;
        RingBuffer::new(pipeline_id, channels, capacity)
    }

    /// Feed up to one period of `audio` from sample offset `fed`.
    fn feed(&self, ring: &mut RingBuffer, audio: &PcmAudio, fed: usize) -> usize {
        let end = (fed + self.period * usize::from(audio.channels)).min(audio.samples.len());
        let chunk = &audio.samples[fed..end];
        if self.sample_bytes == 2 {
            let narrow: Vec<i16> = chunk
                .iter()
                .map(|&s| i16::try_from(s).unwrap_or(if s < 0 { i16::MIN } else { i16::MAX }))
                .collect();
            ring.push_s16(&narrow)
        } else {
            ring.push_s32(chunk)
        }
    }

    fn drain(&self, ring: &mut RingBuffer, out: &mut Vec<i32>) {
        if self.sample_bytes == 2 {
            let mut narrow = Vec::new();
            ring.pop_s16(&mut narrow);
            out.extend(narrow.into_iter().map(i32::from));
        } else {
            ring.pop_s32(out);
        }
    }

    fn progress(&self, frames: usize) -> anyhow::Result<ProgressBar> {
        if self.quiet {
            return Ok(ProgressBar::hidden());
        }
        let pb = ProgressBar::new(frames as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("##-"),
        );
        Ok(pb)
    }
}

/// Run the run command.
pub fn run(args: RunArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.period > 0, "period must be at least one frame");
    anyhow::ensure!(args.periods > 0, "at least one period of buffering is required");

    let route = load_route(&args.route)?;
    let config = route.to_config()?;
    let format = config.frame_format();

    let mut component = MuxComponent::new(
        component_type(route.role),
        COMPONENT_ID,
        PRIMARY_PIPELINE,
        config.clone(),
    )?;
    component.set_xrun_handler(|event: XrunEvent| {
        tracing::debug!(
            kind = %event.kind,
            pipeline_id = event.pipeline_id,
            frames = event.frames,
            "xrun"
        );
    });
    component.prepare()?;
    component.trigger(Trigger::Start)?;

    let (Some(sample_bytes), Some(bits)) = (format.sample_bytes(), format.valid_bits()) else {
        anyhow::bail!("frame format {format} has no sample layout");
    };
    let session = Session {
        period: args.period,
        periods: args.periods,
        sample_bytes,
        bits,
        quiet: args.quiet,
    };

    println!(
        "Route: {} ({}, {}, {} streams)",
        route.name,
        route.role.name(),
        format,
        config.num_streams()
    );

    let stats = match route.role {
        Role::Demux => demux_files(&mut component, &config, &session, &args)?,
        Role::Mux => mux_files(&mut component, &config, &session, &args)?,
    };

    component.trigger(Trigger::Stop)?;
    component.reset();

    println!("\nStats:");
    println!("  Frames: {}", stats.frames);
    println!("  Cycles: {}", stats.cycles);
    println!("  Xruns:  {}", stats.xruns);
    println!("Done!");

    Ok(())
}

#[derive(Debug, Default)]
struct RunStats {
    frames: usize,
    cycles: usize,
    xruns: usize,
}

fn demux_files(
    component: &mut MuxComponent,
    config: &RouteConfig,
    session: &Session,
    args: &RunArgs,
) -> anyhow::Result<RunStats> {
    anyhow::ensure!(
        args.inputs.len() == 1,
        "a demux route takes one input, got {}",
        args.inputs.len()
    );
    anyhow::ensure!(
        args.output.len() == config.num_streams(),
        "route has {} streams but {} outputs were given",
        config.num_streams(),
        args.output.len()
    );

    println!("Reading {}...", args.inputs[0].display());
    let mut input = read_pcm(&args.inputs[0], session.bits)?;
    anyhow::ensure!(
        input.channels == config.channels(),
        "input has {} channels, route expects {}",
        input.channels,
        config.channels()
    );
    input
        .samples
        .truncate(input.frames() * usize::from(input.channels));

    let mut source = session.ring(PRIMARY_PIPELINE, input.channels);
    let mut sinks: Vec<RingBuffer> = config
        .streams()
        .iter()
        .map(|r| session.ring(r.pipeline_id, u16::from(r.channels)))
        .collect();
    let mut outputs = vec![Vec::new(); sinks.len()];

    let pb = session.progress(input.frames())?;
    let mut stats = RunStats::default();
    let mut fed = 0;

    loop {
        fed += session.feed(&mut source, &input, fed);
        if fed == input.samples.len() && source.avail_bytes() == 0 {
            break;
        }

        let report = {
            let mut sources: [&mut dyn Endpoint; 1] = [&mut source];
            let mut targets: Vec<&mut dyn Endpoint> =
                sinks.iter_mut().map(|s| s as &mut dyn Endpoint).collect();
            component.copy(&mut sources, &mut targets)?
        };
        anyhow::ensure!(report.frames > 0, "routing stalled after {} frames", stats.frames);

        for (sink, out) in sinks.iter_mut().zip(outputs.iter_mut()) {
            session.drain(sink, out);
        }
        stats.frames += report.frames;
        stats.xruns += report.xruns;
        stats.cycles += 1;
        pb.inc(report.frames as u64);
    }
    pb.finish_with_message("done");

    for ((path, samples), route) in args.output.iter().zip(outputs).zip(config.streams()) {
        let audio = PcmAudio {
            samples,
            channels: u16::from(route.channels),
            sample_rate: input.sample_rate,
        };
        println!("Writing {}...", path.display());
        write_pcm(path, &audio, session.bits)?;
    }

    Ok(stats)
}

fn mux_files(
    component: &mut MuxComponent,
    config: &RouteConfig,
    session: &Session,
    args: &RunArgs,
) -> anyhow::Result<RunStats> {
    anyhow::ensure!(
        args.output.len() == 1,
        "a mux route takes one output, got {}",
        args.output.len()
    );
    anyhow::ensure!(
        args.inputs.len() == config.num_streams(),
        "route has {} streams but {} inputs were given",
        config.num_streams(),
        args.inputs.len()
    );

    let mut inputs = Vec::with_capacity(args.inputs.len());
    for (path, route) in args.inputs.iter().zip(config.streams()) {
        println!("Reading {}...", path.display());
        let input = read_pcm(path, session.bits)?;
        anyhow::ensure!(
            input.channels == u16::from(route.channels),
            "{} has {} channels, stream {} expects {}",
            path.display(),
            input.channels,
            route.pipeline_id,
            route.channels
        );
        inputs.push(input);
    }

    // Shorter inputs are padded with silence so every stream ends together.
    let frames = inputs.iter().map(PcmAudio::frames).max().unwrap_or(0);
    for input in &mut inputs {
        input.samples.resize(frames * usize::from(input.channels), 0);
    }
    let sample_rate = inputs.first().map_or(48000, |i| i.sample_rate);
    if inputs.iter().any(|i| i.sample_rate != sample_rate) {
        tracing::warn!(sample_rate, "inputs differ in sample rate; output uses the first");
    }

    let mut sources: Vec<RingBuffer> = config
        .streams()
        .iter()
        .map(|r| session.ring(r.pipeline_id, u16::from(r.channels)))
        .collect();
    let mut sink = session.ring(PRIMARY_PIPELINE, config.channels());
    let mut output = Vec::new();

    let pb = session.progress(frames)?;
    let mut stats = RunStats::default();
    let mut fed = vec![0; inputs.len()];

    loop {
        for ((source, input), fed) in sources.iter_mut().zip(&inputs).zip(fed.iter_mut()) {
            *fed += session.feed(source, input, *fed);
        }
        if sources.iter().all(|s| s.avail_bytes() == 0) {
            break;
        }

        let report = {
            let mut feeds: Vec<&mut dyn Endpoint> =
                sources.iter_mut().map(|s| s as &mut dyn Endpoint).collect();
            let mut targets: [&mut dyn Endpoint; 1] = [&mut sink];
            component.copy(&mut feeds, &mut targets)?
        };

        session.drain(&mut sink, &mut output);
        stats.frames += report.frames;
        stats.xruns += report.xruns;
        stats.cycles += 1;
        pb.inc(report.frames as u64);
    }
    pb.finish_with_message("done");

    let audio = PcmAudio {
        samples: output,
        channels: config.channels(),
        sample_rate,
    };
    println!("Writing {}...", args.output[0].display());
    write_pcm(&args.output[0], &audio, session.bits)?;

    Ok(stats)
}
