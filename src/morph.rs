//! Morph driver: time-bounded interpolation between the two particle
//! layouts.
//!
//! The driver is pure state-machine logic. It never owns the live
//! buffers or the target sets; the scene hands them in on every tick,
//! which keeps the whole transition directly testable without any GL.

use crate::sampler::ParticleSet;

/// Progress gained per tick. A full morph takes about one second at a
/// nominal 72 updates per second.
pub const MORPH_STEP: f32 = 1.0 / 72.0;

pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Cubic ease-in-out, symmetric about the midpoint. Callers clamp
/// first; the polynomial leaves the unit range outside [0, 1].
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// The silhouette currently shown (or being morphed toward).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Tree,
    Cake,
}

impl Mode {
    pub fn other(self) -> Mode {
        match self {
            Mode::Tree => Mode::Cake,
            Mode::Cake => Mode::Tree,
        }
    }
}

/// Eased interpolation from a snapshot of the live buffers toward a
/// precomputed target set.
///
/// `mode` always names the target: while idle it is the silhouette on
/// screen, while morphing it is the one in flight. Requesting the mode
/// already in flight is a no-op; requesting the opposite one restarts
/// from the current partially blended buffer, so an interrupted morph
/// reverses smoothly instead of jumping.
pub struct MorphDriver {
    mode: Mode,
    progress: f32,
    morphing: bool,
    from_pos: Vec<f32>,
    from_col: Vec<f32>,
}

impl MorphDriver {
    /// `components` is the scalar length of each live buffer
    /// (particle count × 3).
    pub fn new(mode: Mode, components: usize) -> Self {
        Self {
            mode,
            progress: 1.0,
            morphing: false,
            from_pos: vec![0.0; components],
            from_col: vec![0.0; components],
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn in_progress(&self) -> bool {
        self.morphing
    }

    /// Start morphing toward `next`. Snapshots the live buffers as the
    /// `from` endpoint. Returns false (and changes nothing) when `next`
    /// is already the target.
    pub fn begin(&mut self, next: Mode, live_pos: &[f32], live_col: &[f32]) -> bool {
        if next == self.mode {
            return false;
        }
        self.from_pos.copy_from_slice(live_pos);
        self.from_col.copy_from_slice(live_col);
        self.progress = 0.0;
        self.morphing = true;
        self.mode = next;
        true
    }

    /// Advance one tick, rewriting the live buffers toward `to` (the
    /// set for [`Self::mode`]). Returns true when the buffers were
    /// rewritten. On the tick where progress reaches 1 the eased blend
    /// factor is exactly 1, so the live buffers land on `to`.
    pub fn tick(&mut self, to: &ParticleSet, live_pos: &mut [f32], live_col: &mut [f32]) -> bool {
        if !self.morphing {
            return false;
        }

        self.progress += MORPH_STEP;
        let p = ease_in_out_cubic(clamp01(self.progress));

        for (live, (from, target)) in live_pos
            .iter_mut()
            .zip(self.from_pos.iter().zip(to.positions.iter()))
        {
            *live = from + (target - from) * p;
        }
        for (live, (from, target)) in live_col
            .iter_mut()
            .zip(self.from_col.iter().zip(to.colors.iter()))
        {
            *live = from + (target - from) * p;
        }

        if self.progress >= 1.0 {
            self.morphing = false;
        }
        true
    }
}
