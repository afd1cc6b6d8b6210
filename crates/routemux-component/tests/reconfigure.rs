//! Reconfiguration from a control thread while the pipeline thread copies.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use routemux_component::{ComponentType, Endpoint, MuxComponent, RingBuffer, Trigger};
use routemux_core::{FrameFormat, RouteConfig, StreamRoute, wire};

const FRAMES_PER_CYCLE: usize = 16;
const CYCLES: usize = 2000;

fn pick(mask: u8) -> RouteConfig {
    RouteConfig::new(
        FrameFormat::S16Le,
        2,
        vec![StreamRoute::new(1, &[mask, mask])],
    )
    .unwrap()
}

#[test]
fn every_cycle_sees_one_whole_configuration() {
    let mut comp = MuxComponent::new(ComponentType::Demux, 1, 0, pick(0b01)).unwrap();
    comp.prepare().unwrap();
    comp.trigger(Trigger::Start).unwrap();

    let control = comp.control();
    let left = wire::encode(&pick(0b01));
    let right = wire::encode(&pick(0b10));
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            let mut flip = false;
            while !done.load(Ordering::Relaxed) {
                let blob = if flip { &left } else { &right };
                control.set_values(blob).unwrap();
                flip = !flip;
            }
        });

        let mut source = RingBuffer::new(0, 2, FRAMES_PER_CYCLE * 4);
        let mut sink = RingBuffer::new(1, 2, FRAMES_PER_CYCLE * 4);
        let input: Vec<i16> = [1, 2].repeat(FRAMES_PER_CYCLE);
        let mut out = Vec::with_capacity(FRAMES_PER_CYCLE * 2);

        for _ in 0..CYCLES {
            source.push_s16(&input);
            let report = comp.copy(&mut [&mut source], &mut [&mut sink]).unwrap();
            assert_eq!(report.frames, FRAMES_PER_CYCLE);

            out.clear();
            sink.pop_s16(&mut out);
            let first = out[0];
            assert!(first == 1 || first == 2);
            assert!(out.iter().all(|&s| s == first), "mixed cycle: {out:?}");
            assert_eq!(source.avail_bytes(), 0);
        }

        done.store(true, Ordering::Relaxed);
    });
}

#[test]
fn rejected_updates_never_disturb_copy() {
    let mut comp = MuxComponent::new(ComponentType::Demux, 1, 0, pick(0b10)).unwrap();
    comp.prepare().unwrap();
    comp.trigger(Trigger::Start).unwrap();

    let control = comp.control();
    let mut bad = wire::encode(&pick(0b01));
    bad.push(0);
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                assert!(control.set_values(&bad).is_err());
            }
        });

        let mut source = RingBuffer::new(0, 2, 64);
        let mut sink = RingBuffer::new(1, 2, 64);
        let mut out = Vec::new();
        for _ in 0..500 {
            source.push_s16(&[5, 6]);
            comp.copy(&mut [&mut source], &mut [&mut sink]).unwrap();
            out.clear();
            sink.pop_s16(&mut out);
            assert_eq!(out, [6, 6]);
        }

        done.store(true, Ordering::Relaxed);
    });
}
