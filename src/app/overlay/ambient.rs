use {
    iced::Vector,
    instant::Instant,
    std::f32::consts::{PI, TAU},
};

/// Seconds for one full turn of the backdrop colour wash.
const BACKDROP_TURN: f32 = 18.0;

/// Seconds for one leg of the autoreversing animations.
const HALO_PULSE: f32 = 1.6;
const ORB_SWAY: f32 = 2.2;
const SHIMMER_SWEEP: f32 = 1.6;

const ORB_SWAY_X: f32 = 12.0;
const ORB_SWAY_Y: f32 = 10.0;

/// Clock for the decorative animations. Runs between [`Ambient::start`] and
/// [`Ambient::stop`], which the entry screen calls when the loading overlay
/// appears and disappears.
#[derive(Debug, Default)]
pub struct Ambient {
    started_at: Option<Instant>,
    phase: Phase,
}

impl Ambient {
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            tracing::debug!("ambient animation started");
            self.started_at = Some(now);
            self.phase = Phase::default();
        }
    }

    pub fn stop(&mut self) {
        if self.started_at.take().is_some() {
            tracing::debug!("ambient animation stopped");
        }

        self.phase = Phase::default();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(started_at) = self.started_at {
            if now > started_at {
                self.phase = Phase::from_secs((now - started_at).as_secs_f32());
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
}

/// Seconds since the animation started. Every visual parameter is a pure
/// function of it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Phase(f32);

impl Phase {
    pub fn from_secs(secs: f32) -> Self {
        Self(secs.max(0.0))
    }

    /// Rotation of the backdrop colour wash, in radians.
    pub fn backdrop_angle(self) -> f32 {
        (self.0 / BACKDROP_TURN).fract() * TAU
    }

    /// Scale of the hero halo, breathing between 0.95 and 1.05.
    pub fn halo_scale(self) -> f32 {
        0.95 + 0.1 * ease_in_out(self.0, HALO_PULSE)
    }

    /// Offset of the hero's inner orb, swaying between `(12, -10)` and
    /// `(-12, 10)`.
    pub fn orb_offset(self) -> Vector {
        let k = ease_in_out(self.0, ORB_SWAY);

        Vector::new(
            ORB_SWAY_X * (1.0 - 2.0 * k),
            ORB_SWAY_Y * (2.0 * k - 1.0),
        )
    }

    /// Position of the ground stripe highlight as a fraction of its width.
    pub fn shimmer(self) -> f32 {
        let t = (self.0 / SHIMMER_SWEEP) % 2.0;

        if t <= 1.0 { t } else { 2.0 - t }
    }
}

/// Goes 0 → 1 over `leg` seconds and back again, with eased ends.
fn ease_in_out(secs: f32, leg: f32) -> f32 {
    0.5 - 0.5 * (PI * secs / leg).cos()
}
