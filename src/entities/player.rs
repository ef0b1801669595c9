use super::projectile::{Projectile, ProjectileOwner};
use crate::config::GameConfig;
use crate::physics::Body;
use crate::tween::{Repeat, Tween};

/// Hull appearance: normal while shielded, damaged once the shield is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Normal,
    Damaged,
}

/// What a single hit did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    ShieldBroken,
    LifeLost,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub lives: u32,
    pub shield: bool,
    pub can_fire: bool,
    pub appearance: Appearance,
    /// Drawn only while alpha is at least one half
    pub alpha: f32,
    blink: Option<Tween>,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let (x, y) = config.player_spawn();
        Self {
            body: Body::new(x, y, config.player_size),
            lives: config.starting_lives,
            shield: true,
            can_fire: true,
            appearance: Appearance::Normal,
            alpha: 1.0,
            blink: None,
        }
    }

    pub fn x(&self) -> f32 {
        self.body.x
    }

    pub fn y(&self) -> f32 {
        self.body.y
    }

    /// Left wins when both directions are held
    pub fn steer(&mut self, left: bool, right: bool, speed: f32) {
        let vx = if left {
            -speed
        } else if right {
            speed
        } else {
            0.0
        };
        self.body.set_velocity(vx, 0.0);
    }

    /// Fires one bullet if the cooldown allows it and closes the trigger.
    /// The caller is responsible for reopening it with [`Player::restore_fire`].
    pub fn try_fire(&mut self, config: &GameConfig) -> Option<Projectile> {
        if !self.can_fire {
            return None;
        }
        self.can_fire = false;
        Some(Projectile::new(
            self.body.x,
            self.body.y - 20.0,
            ProjectileOwner::Player,
            config,
        ))
    }

    pub fn restore_fire(&mut self) {
        self.can_fire = true;
    }

    /// Shield/lives state machine for one hit
    pub fn absorb_hit(&mut self) -> HitOutcome {
        if self.shield {
            self.shield = false;
            self.appearance = Appearance::Damaged;
            HitOutcome::ShieldBroken
        } else {
            self.lives = self.lives.saturating_sub(1);
            self.shield = true;
            self.appearance = Appearance::Normal;
            HitOutcome::LifeLost
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    /// Restarts the fade-out/fade-in blink
    pub fn start_blink(&mut self, config: &GameConfig) {
        self.blink = Some(
            Tween::new(1.0, 0.0, config.blink_half_period_ms)
                .yoyo(true)
                .repeat(Repeat::Times(config.blink_repeats)),
        );
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_some()
    }

    pub fn update_blink(&mut self, dt_ms: u64) {
        if let Some(blink) = &mut self.blink {
            self.alpha = blink.advance(dt_ms);
            if blink.is_complete() {
                self.alpha = 1.0;
                self.blink = None;
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.alpha >= 0.5
    }

    pub fn reset_position(&mut self, config: &GameConfig) {
        let (x, y) = config.player_spawn();
        self.body.set_position(x, y);
    }

    pub fn get_sprite(&self) -> &'static str {
        match self.appearance {
            Appearance::Normal => "/A\\",
            Appearance::Damaged => "/a\\",
        }
    }
}
