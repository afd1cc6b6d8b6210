//! Byte-addressed circular buffer implementing [`Endpoint`].
//!
//! This is the reference buffer used by the CLI and the tests. Samples are
//! stored little endian; 16-bit samples take two bytes, 24-bit and 32-bit
//! samples take a four-byte container. Reads and writes wrap byte by byte,
//! so the capacity need not be a multiple of the frame size.

use routemux_core::{SampleSink, SampleSource};

use crate::endpoint::Endpoint;

/// Circular sample buffer shared between two components.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    pipeline_id: u32,
    channels: u16,
    active: bool,
    data: Vec<u8>,
    read: usize,
    avail: usize,
}

impl RingBuffer {
    /// Creates an empty, active buffer of `capacity` bytes.
    pub fn new(pipeline_id: u32, channels: u16, capacity: usize) -> Self {
        Self {
            pipeline_id,
            channels,
            active: true,
            data: vec![0; capacity],
            read: 0,
            avail: 0,
        }
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Marks the component at the other end as streaming or not.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Discards all data and rewinds.
    pub fn clear(&mut self) {
        self.read = 0;
        self.avail = 0;
    }

    fn write_pos(&self) -> usize {
        if self.data.is_empty() {
            0
        } else {
            (self.read + self.avail) % self.data.len()
        }
    }

    fn load<const N: usize>(&self, byte: usize) -> [u8; N] {
        let len = self.data.len();
        let mut out = [0u8; N];
        for (i, b) in out.iter_mut().enumerate() {
            *b = self.data[(self.read + byte + i) % len];
        }
        out
    }

    fn store(&mut self, byte: usize, bytes: &[u8]) {
        let len = self.data.len();
        let start = self.write_pos();
        for (i, &b) in bytes.iter().enumerate() {
            self.data[(start + byte + i) % len] = b;
        }
    }

    /// Appends as many whole 16-bit samples as fit; returns how many.
    pub fn push_s16(&mut self, samples: &[i16]) -> usize {
        let count = samples.len().min(self.free_bytes() / 2);
        for (i, &s) in samples[..count].iter().enumerate() {
            self.write_s16(i, s);
        }
        self.produce(count * 2);
        count
    }

    /// Appends as many whole 32-bit containers as fit; returns how many.
    pub fn push_s32(&mut self, samples: &[i32]) -> usize {
        let count = samples.len().min(self.free_bytes() / 4);
        for (i, &s) in samples[..count].iter().enumerate() {
            self.write_s32(i, s);
        }
        self.produce(count * 4);
        count
    }

    /// Drains every whole 16-bit sample into `out`.
    pub fn pop_s16(&mut self, out: &mut Vec<i16>) -> usize {
        let count = self.avail / 2;
        out.extend((0..count).map(|i| self.read_s16(i)));
        self.consume(count * 2);
        count
    }

    /// Drains every whole 32-bit container into `out`.
    pub fn pop_s32(&mut self, out: &mut Vec<i32>) -> usize {
        let count = self.avail / 4;
        out.extend((0..count).map(|i| self.read_s32(i)));
        self.consume(count * 4);
        count
    }
}

impl SampleSource for RingBuffer {
    fn read_s16(&self, idx: usize) -> i16 {
        i16::from_le_bytes(self.load(idx * 2))
    }

    fn read_s32(&self, idx: usize) -> i32 {
        i32::from_le_bytes(self.load(idx * 4))
    }
}

impl SampleSink for RingBuffer {
    fn write_s16(&mut self, idx: usize, value: i16) {
        self.store(idx * 2, &value.to_le_bytes());
    }

    fn write_s32(&mut self, idx: usize, value: i32) {
        self.store(idx * 4, &value.to_le_bytes());
    }
}

impl Endpoint for RingBuffer {
    fn pipeline_id(&self) -> u32 {
        self.pipeline_id
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn avail_bytes(&self) -> usize {
        self.avail
    }

    fn free_bytes(&self) -> usize {
        self.data.len() - self.avail
    }

    fn produce(&mut self, bytes: usize) {
        debug_assert!(bytes <= self.free_bytes());
        self.avail = (self.avail + bytes).min(self.data.len());
    }

    fn consume(&mut self, bytes: usize) {
        debug_assert!(bytes <= self.avail);
        let bytes = bytes.min(self.avail);
        if !self.data.is_empty() {
            self.read = (self.read + bytes) % self.data.len();
        }
        self.avail -= bytes;
    }
}
