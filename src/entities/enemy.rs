use crate::config::GameConfig;
use crate::physics::{Body, move_toward};
use crate::scheduler::TimerId;
use crate::tween::{Ease, Repeat, Tween};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    /// Spawned on even grid rows
    A,
    /// Spawned on odd grid rows
    B,
}

impl EnemyKind {
    pub fn for_row(row: u32) -> Self {
        if row % 2 == 0 { EnemyKind::A } else { EnemyKind::B }
    }

    pub fn points(self, config: &GameConfig) -> u32 {
        match self {
            EnemyKind::A => config.score_kind_a,
            EnemyKind::B => config.score_kind_b,
        }
    }
}

/// Movement and firing policy, picked once when the wave spawns
#[derive(Debug, Clone)]
pub enum EnemyBehavior {
    /// Sways sideways around the spawn point and fires periodically
    Oscillating { tween: Tween },
    /// Drifts down forever, wrapping from the bottom back to the top
    LoopingDescent,
    /// Waits in place until picked for a straight-line dive at the player
    Kamikaze { diving: bool },
}

impl EnemyBehavior {
    pub fn for_wave(wave: u32, spawn_x: f32, config: &GameConfig) -> Self {
        match wave {
            2 => EnemyBehavior::LoopingDescent,
            3 => EnemyBehavior::Kamikaze { diving: false },
            _ => EnemyBehavior::Oscillating {
                tween: Tween::new(
                    spawn_x,
                    spawn_x + config.oscillation_distance,
                    config.oscillation_duration_ms,
                )
                .yoyo(true)
                .repeat(Repeat::Forever)
                .ease(Ease::SineInOut),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u32);

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub body: Body,
    pub kind: EnemyKind,
    pub behavior: EnemyBehavior,
    pub active: bool,
    /// Facing in degrees, set when a dive starts
    pub angle_deg: f32,
    /// This enemy's own repeating fire timer
    pub fire_timer: Option<TimerId>,
}

impl Enemy {
    pub fn new(
        id: EnemyId,
        x: f32,
        y: f32,
        kind: EnemyKind,
        behavior: EnemyBehavior,
        config: &GameConfig,
    ) -> Self {
        let mut body = Body::new(x, y, config.enemy_size);
        if matches!(behavior, EnemyBehavior::LoopingDescent) {
            body.set_velocity(0.0, config.descent_speed);
        }

        Self {
            id,
            body,
            kind,
            behavior,
            active: true,
            angle_deg: 0.0,
            fire_timer: None,
        }
    }

    pub fn can_shoot(&self) -> bool {
        match self.behavior {
            EnemyBehavior::Oscillating { .. } | EnemyBehavior::LoopingDescent => true,
            EnemyBehavior::Kamikaze { .. } => false,
        }
    }

    pub fn is_diving(&self) -> bool {
        matches!(self.behavior, EnemyBehavior::Kamikaze { diving: true })
    }

    pub fn is_dive_candidate(&self) -> bool {
        self.active && matches!(self.behavior, EnemyBehavior::Kamikaze { diving: false })
    }

    /// Starts a ballistic dive toward `target`. The heading is fixed at launch.
    pub fn launch_dive(&mut self, target: (f32, f32), speed: f32) {
        self.behavior = EnemyBehavior::Kamikaze { diving: true };
        move_toward(&mut self.body, target, speed);
        self.angle_deg = self.body.velocity_angle_deg();
    }

    /// Advances the sideways sway, if this enemy has one
    pub fn update_tween(&mut self, dt_ms: u64) {
        if let EnemyBehavior::Oscillating { tween } = &mut self.behavior {
            self.body.x = tween.advance(dt_ms);
        }
    }

    /// Takes the enemy out of play and hands back its fire timer for cancelling
    pub fn deactivate(&mut self) -> Option<TimerId> {
        self.active = false;
        self.body.enabled = false;
        self.body.set_velocity(0.0, 0.0);
        self.fire_timer.take()
    }

    pub fn get_sprite(&self) -> &'static str {
        match self.kind {
            EnemyKind::A => "<O>",
            EnemyKind::B => "{#}",
        }
    }

    /// Single glyph pointing along the dive heading
    pub fn get_dive_glyph(&self) -> char {
        let angle = self.angle_deg.rem_euclid(360.0);
        match angle {
            a if !(22.5..337.5).contains(&a) => '>',
            a if a < 67.5 => '\\',
            a if a < 112.5 => 'v',
            a if a < 157.5 => '/',
            a if a < 202.5 => '<',
            a if a < 247.5 => '\\',
            a if a < 292.5 => '^',
            _ => '/',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_for_wave(wave: u32) -> Enemy {
        let config = GameConfig::default();
        let behavior = EnemyBehavior::for_wave(wave, 60.0, &config);
        Enemy::new(EnemyId(0), 60.0, 80.0, EnemyKind::A, behavior, &config)
    }

    #[test]
    fn test_enemy_points_by_kind() {
        let config = GameConfig::default();
        assert_eq!(EnemyKind::A.points(&config), 100);
        assert_eq!(EnemyKind::B.points(&config), 150);
    }

    #[test]
    fn test_kind_alternates_by_row() {
        assert_eq!(EnemyKind::for_row(0), EnemyKind::A);
        assert_eq!(EnemyKind::for_row(1), EnemyKind::B);
        assert_eq!(EnemyKind::for_row(4), EnemyKind::A);
    }

    #[test]
    fn test_behavior_by_wave() {
        assert!(matches!(
            enemy_for_wave(1).behavior,
            EnemyBehavior::Oscillating { .. }
        ));
        assert!(matches!(
            enemy_for_wave(2).behavior,
            EnemyBehavior::LoopingDescent
        ));
        assert!(matches!(
            enemy_for_wave(3).behavior,
            EnemyBehavior::Kamikaze { diving: false }
        ));
        assert!(matches!(
            enemy_for_wave(7).behavior,
            EnemyBehavior::Oscillating { .. }
        ));
    }

    #[test]
    fn test_looping_descent_moves_down() {
        let enemy = enemy_for_wave(2);
        assert_eq!(enemy.body.vy, 40.0);
        assert!(enemy.can_shoot());
    }

    #[test]
    fn test_kamikaze_cannot_shoot() {
        let mut enemy = enemy_for_wave(3);
        assert!(!enemy.can_shoot());
        assert!(enemy.is_dive_candidate());

        enemy.launch_dive((60.0, 280.0), 200.0);
        assert!(enemy.is_diving());
        assert!(!enemy.is_dive_candidate());
        assert!((enemy.body.vy - 200.0).abs() < 1e-3);
        assert!(enemy.body.vx.abs() < 1e-3);
        assert!((enemy.angle_deg - 90.0).abs() < 1e-3);
        assert_eq!(enemy.get_dive_glyph(), 'v');
    }

    #[test]
    fn test_oscillation_follows_tween() {
        let mut enemy = enemy_for_wave(1);
        enemy.update_tween(2000);
        assert!((enemy.body.x - 100.0).abs() < 1e-3);
        enemy.update_tween(2000);
        assert!((enemy.body.x - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_deactivate_returns_fire_timer() {
        let mut enemy = enemy_for_wave(2);
        let mut scheduler = crate::scheduler::Scheduler::new();
        enemy.fire_timer = Some(scheduler.every(5000, ()));

        let timer = enemy.deactivate();
        assert!(timer.is_some());
        assert!(!enemy.active);
        assert!(!enemy.body.enabled);
        assert_eq!(enemy.body.vy, 0.0);
        assert!(enemy.deactivate().is_none());
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_dive_keeps_speed(
                tx in -200.0f32..700.0,
                ty in -200.0f32..900.0
            ) {
                prop_assume!((tx - 60.0).abs() > 1.0 || (ty - 80.0).abs() > 1.0);
                let mut enemy = enemy_for_wave(3);
                enemy.launch_dive((tx, ty), 200.0);
                let speed = (enemy.body.vx.powi(2) + enemy.body.vy.powi(2)).sqrt();
                prop_assert!((speed - 200.0).abs() < 1e-2);
            }
        }
    }
}
