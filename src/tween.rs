use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Linear,
    SineInOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::SineInOut => -0.5 * ((PI * t).cos() - 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repeat {
    /// Number of extra cycles after the first one
    Times(u32),
    Forever,
}

/// A single animated property going from `from` to `to`
#[derive(Debug, Clone)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration_ms: u64,
    pub yoyo: bool,
    pub repeat: Repeat,
    pub ease: Ease,
    elapsed_ms: u64,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: u64) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(1),
            yoyo: false,
            repeat: Repeat::Times(0),
            ease: Ease::Linear,
            elapsed_ms: 0,
        }
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    fn cycle_ms(&self) -> u64 {
        if self.yoyo {
            self.duration_ms * 2
        } else {
            self.duration_ms
        }
    }

    /// Total running time, `None` for endless tweens
    pub fn total_ms(&self) -> Option<u64> {
        match self.repeat {
            Repeat::Times(n) => Some(self.cycle_ms() * (u64::from(n) + 1)),
            Repeat::Forever => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total_ms().is_some_and(|total| self.elapsed_ms >= total)
    }

    pub fn advance(&mut self, dt_ms: u64) -> f32 {
        self.elapsed_ms = match self.total_ms() {
            Some(total) => (self.elapsed_ms + dt_ms).min(total),
            None => self.elapsed_ms + dt_ms,
        };
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.is_complete() {
            return if self.yoyo { self.from } else { self.to };
        }

        let phase = self.elapsed_ms % self.cycle_ms();
        let progress = if phase <= self.duration_ms {
            phase as f32 / self.duration_ms as f32
        } else {
            // Coming back on the yoyo leg
            (self.cycle_ms() - phase) as f32 / self.duration_ms as f32
        };

        self.from + (self.to - self.from) * self.ease.apply(progress)
    }
}
