//! Fixed capacity mono sample storage.
//!
//! Every buffer allocates its full capacity once, when created. Recording
//! and playback only ever move the length and cursor around inside that
//! storage, so nothing here allocates from the audio callback.

use crate::units::*;

pub struct SampleBuffer {
    data: Box<[Sample]>,
    length: SamplePosition,
    cursor: SamplePosition,
    sample_rate: f64,
    full: bool,
    empty: bool,
    finished: bool,
}

impl SampleBuffer {
    pub fn new(capacity: SamplePosition) -> Self {
        SampleBuffer {
            data: vec!(0.0; capacity).into_boxed_slice(),
            length: 0,
            cursor: 0,
            sample_rate: 0.0,
            full: capacity == 0,
            empty: true,
            finished: false,
        }
    }

    pub fn capacity(self: &Self) -> SamplePosition {
        self.data.len()
    }

    pub fn len(self: &Self) -> SamplePosition {
        self.length
    }

    pub fn is_empty(self: &Self) -> bool {
        self.empty
    }

    pub fn is_full(self: &Self) -> bool {
        self.full
    }

    pub fn is_finished(self: &Self) -> bool {
        self.finished
    }

    pub fn cursor(self: &Self) -> SamplePosition {
        self.cursor
    }

    pub fn sample_rate(self: &Self) -> f64 {
        self.sample_rate
    }

    /// The recorded part of the buffer.
    pub fn as_slice(self: &Self) -> &[Sample] {
        &self.data[..self.length]
    }

    /// Append one sample. Once the buffer is full further samples are dropped.
    pub fn push(self: &mut Self, sample: Sample, sample_rate: f64) {
        if self.length < self.data.len() {
            self.data[self.length] = sample;
            self.length += 1;
            self.empty = false;
            self.sample_rate = sample_rate;
        }
        if self.length >= self.data.len() {
            self.full = true;
        }
    }

    pub fn reset_cursor(self: &mut Self, reverse: bool) {
        self.cursor = if reverse && self.length > 0 { self.length - 1 } else { 0 };
        self.finished = false;
    }

    /// Forget the contents. The storage itself is kept.
    pub fn clear(self: &mut Self) {
        self.length = 0;
        self.empty = true;
        self.full = self.data.len() == 0;
        self.reset_cursor(false);
    }

    /// Replace the contents with a copy of `other`, truncated to our capacity.
    pub fn copy_from(self: &mut Self, other: &SampleBuffer) {
        let length = std::cmp::min(other.length, self.data.len());
        self.data[..length].copy_from_slice(&other.data[..length]);
        self.length = length;
        self.empty = length == 0;
        self.full = length >= self.data.len();
        self.sample_rate = other.sample_rate;
        self.reset_cursor(false);
    }

    /// Write `length` samples produced by `next_sample` into the buffer,
    /// replacing what was there. Used by rate conversion.
    pub fn fill_with(self: &mut Self, length: SamplePosition, sample_rate: f64,
                     mut next_sample: impl FnMut() -> Sample) {
        let length = std::cmp::min(length, self.data.len());
        for slot in self.data[..length].iter_mut() {
            *slot = sanitize(next_sample());
        }
        self.length = length;
        self.empty = length == 0;
        self.full = length >= self.data.len();
        self.sample_rate = sample_rate;
        self.reset_cursor(false);
    }

    /// Read the sample under the cursor and move the cursor one step.
    ///
    /// Returns silence when there is nothing recorded or the cursor has
    /// already run off either end.
    pub fn play(self: &mut Self, reverse: bool) -> Sample {
        if self.finished || self.empty || self.cursor >= self.length {
            return 0.0;
        }

        let sample = self.data[self.cursor];
        if reverse {
            if self.cursor == 0 {
                self.finished = true;
            } else {
                self.cursor -= 1;
            }
        } else {
            self.cursor += 1;
            if self.cursor >= self.length {
                self.finished = true;
            }
        }
        return sample;
    }

    /// Playback position as a fraction of the recorded length.
    pub fn playhead(self: &Self) -> f32 {
        if self.length == 0 {
            return 0.0;
        }
        let progress = self.cursor as f32 / self.length as f32;
        progress.max(0.0).min(1.0)
    }
}
