use anyhow::{bail, Result};
use serde::Serialize;

use crate::exercises::Exercise;

/// Maps elapsed exercise time to a zero-based step index by dividing the
/// total duration into equal-length segments, one per step, clamping to the
/// last step. Monotonic in `elapsed_secs`.
pub fn step_index(duration_secs: u32, step_count: usize, elapsed_secs: u32) -> usize {
    debug_assert!(duration_secs > 0 && step_count >= 1);
    let step_duration = f64::from(duration_secs) / step_count as f64;
    let index = (f64::from(elapsed_secs) / step_duration) as usize;
    index.min(step_count - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    Stopped,
    Running,
    Paused,
    Finished,
}

/// Drives one guided exercise: a one-second tick advances elapsed time while
/// running, and the current step follows from elapsed time alone. The
/// presentation layer owns the timer that calls `tick`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playback {
    duration_secs: u32,
    step_count: usize,
    elapsed_secs: u32,
    status: PlaybackStatus,
}

impl Playback {
    pub fn new(duration_secs: u32, step_count: usize) -> Result<Self> {
        if duration_secs == 0 {
            bail!("exercise duration must be positive");
        }
        if step_count == 0 {
            bail!("exercise must have at least one step");
        }
        Ok(Self {
            duration_secs,
            step_count,
            elapsed_secs: 0,
            status: PlaybackStatus::Stopped,
        })
    }

    pub fn for_exercise(exercise: &Exercise) -> Result<Self> {
        Self::new(exercise.duration_secs, exercise.steps.len())
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.duration_secs - self.elapsed_secs
    }

    pub fn current_step(&self) -> usize {
        step_index(self.duration_secs, self.step_count, self.elapsed_secs)
    }

    pub fn progress_percent(&self) -> f64 {
        f64::from(self.elapsed_secs) / f64::from(self.duration_secs) * 100.0
    }

    /// Start from stopped, or resume from paused. No-op in other states.
    pub fn start(&mut self) {
        if matches!(self.status, PlaybackStatus::Stopped | PlaybackStatus::Paused) {
            self.status = PlaybackStatus::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Running {
            self.status = PlaybackStatus::Paused;
        }
    }

    /// Advances elapsed time by one second while running, finishing once
    /// elapsed reaches the duration.
    pub fn tick(&mut self) {
        if self.status != PlaybackStatus::Running {
            return;
        }
        self.elapsed_secs += 1;
        if self.elapsed_secs >= self.duration_secs {
            self.elapsed_secs = self.duration_secs;
            self.status = PlaybackStatus::Finished;
        }
    }

    /// The only transition that loses elapsed time.
    pub fn reset(&mut self) {
        self.elapsed_secs = 0;
        self.status = PlaybackStatus::Stopped;
    }
}
