//! Play-scene logic: waves, enemy behavior, firing, collisions and player damage.
//!
//! Everything the scene knows lives in [`WaveDirector`]. Deferred work goes
//! through a [`Scheduler`] as [`TimerEvent`] values which are dispatched at
//! the start of the next [`WaveDirector::step`], so no handler ever runs
//! while another one is in progress.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entities::{
    Enemy, EnemyBehavior, EnemyId, EnemyKind, HitOutcome, Particle, Player, Projectile,
    ProjectileOwner, create_explosion_particles,
};
use crate::input::InputSnapshot;
use crate::scheduler::{Scheduler, TimerId};

/// Deferred work registered with the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    SpawnWave,
    RestoreFire,
    EnemyFire(EnemyId),
    LaunchDive,
    ReenablePlayerBody,
    ResetPlayerPosition,
}

/// Sound effects requested during a step, drained by the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Shoot,
    Boom,
    /// The life-lost boom, pitched down
    BoomDetuned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition {
    GameOver { score: u32 },
}

/// Registered overlap checks, evaluated in this order every step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPair {
    PlayerBulletsEnemies,
    EnemyBulletsPlayer,
    EnemiesPlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaveState {
    pub number: u32,
    pub active: bool,
    pub score: u32,
}

/// HUD text, refreshed explicitly by the director
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: String,
    pub lives: String,
    pub wave: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraShake {
    pub remaining_ms: u64,
    /// Fraction of the view size
    pub intensity: f32,
}

pub struct WaveDirector {
    config: GameConfig,
    rng: StdRng,
    scheduler: Scheduler<TimerEvent>,
    player: Player,
    enemies: Vec<Enemy>,
    player_bullets: Vec<Projectile>,
    enemy_bullets: Vec<Projectile>,
    particles: Vec<Particle>,
    wave: WaveState,
    hud: Hud,
    /// Wave-scoped kamikaze scheduler, only present during wave 3
    dive_timer: Option<TimerId>,
    collision_pairs: Vec<CollisionPair>,
    camera_shake: Option<CameraShake>,
    camera_offset: (f32, f32),
    sound_cues: Vec<SoundCue>,
    transition: Option<SceneTransition>,
    next_enemy_id: u32,
}

impl WaveDirector {
    /// Fresh play scene: full shield, no wave yet, first wave 750ms away
    pub fn new(config: GameConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        let player = Player::new(&config);
        let mut scheduler = Scheduler::new();
        scheduler.after(config.first_wave_delay_ms, TimerEvent::SpawnWave);

        let mut director = Self {
            rng,
            scheduler,
            player,
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            particles: Vec::new(),
            wave: WaveState::default(),
            hud: Hud {
                score: String::new(),
                lives: String::new(),
                wave: String::new(),
            },
            dive_timer: None,
            collision_pairs: vec![
                CollisionPair::PlayerBulletsEnemies,
                CollisionPair::EnemyBulletsPlayer,
                CollisionPair::EnemiesPlayer,
            ],
            camera_shake: None,
            camera_offset: (0.0, 0.0),
            sound_cues: Vec::new(),
            transition: None,
            next_enemy_id: 0,
            config,
        };
        director.update_hud();
        director
    }

    // ---- accessors -------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn player_bullets(&self) -> &[Projectile] {
        &self.player_bullets
    }

    pub fn enemy_bullets(&self) -> &[Projectile] {
        &self.enemy_bullets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn wave(&self) -> WaveState {
        self.wave
    }

    pub fn score(&self) -> u32 {
        self.wave.score
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn camera_shake(&self) -> Option<CameraShake> {
        self.camera_shake
    }

    pub fn camera_offset(&self) -> (f32, f32) {
        self.camera_offset
    }

    pub fn transition(&self) -> Option<SceneTransition> {
        self.transition
    }

    pub fn collision_pairs(&self) -> &[CollisionPair] {
        &self.collision_pairs
    }

    pub fn has_dive_timer(&self) -> bool {
        self.dive_timer
            .is_some_and(|id| self.scheduler.is_pending(id))
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.scheduler.is_pending(id)
    }

    pub fn active_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.active).count()
    }

    pub fn drain_sound_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sound_cues)
    }

    /// Adds a bullet as if an enemy had fired it; used by the collision pass tests
    pub fn push_enemy_bullet(&mut self, x: f32, y: f32) {
        self.enemy_bullets
            .push(Projectile::new(x, y, ProjectileOwner::Enemy, &self.config));
    }

    pub fn push_player_bullet(&mut self, x: f32, y: f32) {
        self.player_bullets
            .push(Projectile::new(x, y, ProjectileOwner::Player, &self.config));
    }

    // ---- frame -----------------------------------------------------------

    /// One engine tick: timers, tweens, physics, collisions, then the scene update.
    /// Does nothing once the scene has handed over to game over.
    pub fn step(&mut self, dt_ms: u64, input: &InputSnapshot) {
        if self.transition.is_some() {
            return;
        }

        for event in self.scheduler.advance(dt_ms) {
            self.dispatch(event);
            if self.transition.is_some() {
                return;
            }
        }

        self.update_tweens(dt_ms);
        self.update_effects(dt_ms);
        self.update_physics(dt_ms as f32 / 1000.0);
        self.run_collisions();
        if self.transition.is_some() {
            return;
        }

        self.on_frame(input);
    }

    /// Per-frame scene logic: input, enemy upkeep, then the wave completion check
    pub fn on_frame(&mut self, input: &InputSnapshot) {
        self.handle_player_input(input);
        self.maintain_enemies();

        if self.wave.active && self.active_enemy_count() == 0 {
            self.end_current_wave();
        }
    }

    fn dispatch(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::SpawnWave => self.spawn_wave(),
            TimerEvent::RestoreFire => self.player.restore_fire(),
            TimerEvent::EnemyFire(id) => self.enemy_fire(id),
            TimerEvent::LaunchDive => self.launch_dive(),
            TimerEvent::ReenablePlayerBody => self.player.body.enabled = true,
            TimerEvent::ResetPlayerPosition => self.player.reset_position(&self.config),
        }
    }

    fn update_tweens(&mut self, dt_ms: u64) {
        for enemy in self.enemies.iter_mut().filter(|e| e.active) {
            enemy.update_tween(dt_ms);
        }
        self.player.update_blink(dt_ms);
    }

    fn update_effects(&mut self, dt_ms: u64) {
        for particle in &mut self.particles {
            particle.update(dt_ms);
        }
        self.particles.retain(|p| !p.is_dead());

        self.camera_offset = (0.0, 0.0);
        let Some(mut shake) = self.camera_shake else {
            return;
        };
        shake.remaining_ms = shake.remaining_ms.saturating_sub(dt_ms);
        if shake.remaining_ms == 0 {
            self.camera_shake = None;
            return;
        }
        self.camera_shake = Some(shake);

        let max_x = shake.intensity * self.config.world_width;
        let max_y = shake.intensity * self.config.world_height;
        self.camera_offset = (
            self.rng.random_range(-max_x..=max_x),
            self.rng.random_range(-max_y..=max_y),
        );
    }

    fn update_physics(&mut self, dt_secs: f32) {
        let (width, height) = (self.config.world_width, self.config.world_height);

        self.player.body.integrate(dt_secs);
        self.player.body.clamp_x(width);

        for enemy in self.enemies.iter_mut().filter(|e| e.active) {
            enemy.body.integrate(dt_secs);
        }

        for bullet in self
            .player_bullets
            .iter_mut()
            .chain(self.enemy_bullets.iter_mut())
        {
            bullet.update(dt_secs);
        }
        self.player_bullets
            .retain(|b| !b.is_out_of_bounds(width, height));
        self.enemy_bullets
            .retain(|b| !b.is_out_of_bounds(width, height));
    }

    // ---- input & firing --------------------------------------------------

    fn handle_player_input(&mut self, input: &InputSnapshot) {
        self.player
            .steer(input.left, input.right, self.config.player_speed);

        if input.fire && self.player.can_fire {
            self.fire_player_bullet();
        }
    }

    /// Fires if the trigger is open and schedules it to reopen after the cooldown.
    /// A press during the cooldown is ignored, not queued.
    pub fn fire_player_bullet(&mut self) {
        if let Some(bullet) = self.player.try_fire(&self.config) {
            self.player_bullets.push(bullet);
            self.sound_cues.push(SoundCue::Shoot);
            self.scheduler
                .after(self.config.player_fire_cooldown_ms, TimerEvent::RestoreFire);
        }
    }

    fn schedule_enemy_fire(&mut self, id: EnemyId) -> TimerId {
        let (min, max) = self.config.enemy_fire_interval_range();
        let interval = self.rng.random_range(min..=max);
        self.scheduler.every(interval, TimerEvent::EnemyFire(id))
    }

    /// Fire tick for one enemy; stale or diving enemies are skipped
    pub fn enemy_fire(&mut self, id: EnemyId) {
        let Some(enemy) = self.enemies.iter().find(|e| e.id == id) else {
            return;
        };
        if !enemy.active || enemy.is_diving() || !enemy.can_shoot() {
            return;
        }

        let bullet = Projectile::new(
            enemy.body.x,
            enemy.body.y + 20.0,
            ProjectileOwner::Enemy,
            &self.config,
        );
        self.enemy_bullets.push(bullet);
    }

    // ---- waves -----------------------------------------------------------

    fn maintain_enemies(&mut self) {
        let config = &self.config;
        let wrap_below = config.world_height + config.wrap_margin;

        for enemy in self.enemies.iter_mut().filter(|e| e.active) {
            match enemy.behavior {
                EnemyBehavior::LoopingDescent => {
                    if enemy.body.y > wrap_below {
                        enemy.body.y = -config.wrap_margin;
                    }
                }
                EnemyBehavior::Kamikaze { diving: true } => {
                    let missed = enemy.body.is_outside(
                        config.world_width,
                        config.world_height,
                        config.dive_escape_margin,
                    );
                    if missed {
                        debug!(enemy = enemy.id.0, "dive missed");
                        if let Some(timer) = enemy.deactivate() {
                            self.scheduler.cancel(timer);
                        }
                    }
                }
                EnemyBehavior::Kamikaze { diving: false } | EnemyBehavior::Oscillating { .. } => {}
            }
        }
    }

    /// Spawns the next wave's grid and starts its behavior policy
    pub fn spawn_wave(&mut self) {
        for enemy in &mut self.enemies {
            if let Some(timer) = enemy.deactivate() {
                self.scheduler.cancel(timer);
            }
        }
        self.enemies.clear();

        self.wave.number += 1;
        self.player.lives += 1;
        self.update_hud();

        let wave = self.wave.number;
        let rows = self.config.rows_for_wave(wave);
        let (origin_x, origin_y) = self.config.grid_origin;
        let (spacing_x, spacing_y) = self.config.grid_spacing;

        for row in 0..rows {
            for col in 0..self.config.grid_columns {
                let x = origin_x + col as f32 * spacing_x;
                let y = origin_y + row as f32 * spacing_y;
                let id = EnemyId(self.next_enemy_id);
                self.next_enemy_id += 1;

                let behavior = EnemyBehavior::for_wave(wave, x, &self.config);
                let mut enemy = Enemy::new(id, x, y, EnemyKind::for_row(row), behavior, &self.config);
                if enemy.can_shoot() {
                    enemy.fire_timer = Some(self.schedule_enemy_fire(id));
                }
                self.enemies.push(enemy);
            }
        }

        if wave == 3 {
            self.dive_timer = Some(
                self.scheduler
                    .every(self.config.dive_interval_ms, TimerEvent::LaunchDive),
            );
        }

        self.wave.active = true;
        info!(
            wave,
            enemies = self.enemies.len(),
            lives = self.player.lives,
            "wave spawned"
        );
    }

    /// Closes the wave, tears down its timers and queues the next one
    pub fn end_current_wave(&mut self) {
        self.wave.active = false;

        if let Some(timer) = self.dive_timer.take() {
            self.scheduler.cancel(timer);
        }
        for enemy in &mut self.enemies {
            if let Some(timer) = enemy.fire_timer.take() {
                self.scheduler.cancel(timer);
            }
        }

        self.scheduler
            .after(self.config.next_wave_delay_ms, TimerEvent::SpawnWave);
        info!(wave = self.wave.number, score = self.wave.score, "wave cleared");
    }

    /// Sends the first idle kamikaze in roster order at the player's current position
    pub fn launch_dive(&mut self) {
        let target = (self.player.x(), self.player.y());
        let speed = self.config.dive_speed;

        let Some(enemy) = self.enemies.iter_mut().find(|e| e.is_dive_candidate()) else {
            return;
        };
        enemy.launch_dive(target, speed);
        debug!(enemy = enemy.id.0, angle = enemy.angle_deg, "dive launched");
    }

    // ---- collisions ------------------------------------------------------

    fn run_collisions(&mut self) {
        for idx in 0..self.collision_pairs.len() {
            if self.transition.is_some() {
                return;
            }
            match self.collision_pairs[idx] {
                CollisionPair::PlayerBulletsEnemies => self.collide_player_bullets(),
                CollisionPair::EnemyBulletsPlayer => self.collide_enemy_bullets(),
                CollisionPair::EnemiesPlayer => self.collide_enemies_with_player(),
            }
        }
    }

    fn collide_player_bullets(&mut self) {
        let mut bullet_idx = 0;
        while bullet_idx < self.player_bullets.len() {
            let bullet = &self.player_bullets[bullet_idx].body;
            let hit = self
                .enemies
                .iter()
                .position(|e| e.active && e.body.overlaps(bullet));
            match hit {
                Some(enemy_idx) => self.on_player_bullet_hits_enemy(bullet_idx, enemy_idx),
                None => bullet_idx += 1,
            }
        }
    }

    fn collide_enemy_bullets(&mut self) {
        let mut bullet_idx = 0;
        while bullet_idx < self.enemy_bullets.len() {
            if self.transition.is_some() {
                return;
            }
            if self.enemy_bullets[bullet_idx]
                .body
                .overlaps(&self.player.body)
            {
                self.on_enemy_bullet_hits_player(bullet_idx);
            } else {
                bullet_idx += 1;
            }
        }
    }

    fn collide_enemies_with_player(&mut self) {
        for enemy_idx in 0..self.enemies.len() {
            if self.transition.is_some() {
                return;
            }
            if self.enemies[enemy_idx].body.overlaps(&self.player.body) {
                self.on_enemy_collides_player(enemy_idx);
            }
        }
    }

    pub fn on_player_bullet_hits_enemy(&mut self, bullet_idx: usize, enemy_idx: usize) {
        if bullet_idx >= self.player_bullets.len() || enemy_idx >= self.enemies.len() {
            return;
        }
        self.player_bullets.remove(bullet_idx);

        let enemy = &mut self.enemies[enemy_idx];
        if !enemy.active {
            return;
        }
        if let Some(timer) = enemy.deactivate() {
            self.scheduler.cancel(timer);
        }

        let points = enemy.kind.points(&self.config);
        self.particles
            .extend(create_explosion_particles(enemy.body.x, enemy.body.y));
        self.sound_cues.push(SoundCue::Boom);
        self.add_score(points);
    }

    pub fn on_enemy_bullet_hits_player(&mut self, bullet_idx: usize) {
        if bullet_idx >= self.enemy_bullets.len() {
            return;
        }
        self.enemy_bullets.remove(bullet_idx);
        self.damage_player();
    }

    /// Body collision: the enemy spends itself on the player
    pub fn on_enemy_collides_player(&mut self, enemy_idx: usize) {
        let Some(enemy) = self.enemies.get_mut(enemy_idx) else {
            return;
        };
        if !enemy.active {
            return;
        }
        if let Some(timer) = enemy.deactivate() {
            self.scheduler.cancel(timer);
        }
        self.damage_player();
    }

    // ---- damage ----------------------------------------------------------

    /// Blinks the player, then breaks the shield or takes a life.
    /// The last life ends the scene with the score as it stands right now.
    pub fn damage_player(&mut self) {
        if self.transition.is_some() {
            return;
        }
        self.player.start_blink(&self.config);

        match self.player.absorb_hit() {
            HitOutcome::ShieldBroken => {
                self.player.body.enabled = false;
                self.scheduler.after(
                    self.config.invulnerability_ms,
                    TimerEvent::ReenablePlayerBody,
                );
                debug!("shield broken");
            }
            HitOutcome::LifeLost => {
                self.camera_shake = Some(CameraShake {
                    remaining_ms: self.config.shake_duration_ms,
                    intensity: self.config.shake_intensity,
                });
                self.scheduler
                    .after(self.config.respawn_delay_ms, TimerEvent::ResetPlayerPosition);
                self.sound_cues.push(SoundCue::BoomDetuned);
                info!(lives = self.player.lives, "life lost");

                if !self.player.is_alive() {
                    let score = self.wave.score;
                    self.transition = Some(SceneTransition::GameOver { score });
                    info!(score, wave = self.wave.number, "game over");
                    return;
                }
            }
        }

        self.update_hud();
    }

    fn add_score(&mut self, amount: u32) {
        self.wave.score = self.wave.score.saturating_add(amount);
        self.update_hud();
    }

    fn update_hud(&mut self) {
        self.hud = Hud {
            score: format!("Score: {}", self.wave.score),
            lives: format!("Lives: {}", self.player.lives),
            wave: format!("Wave: {}", self.wave.number),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: u64 = 16;

    fn director() -> WaveDirector {
        WaveDirector::new(GameConfig::with_seed(7))
    }

    fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    /// Runs frames until `ms` of simulated time have passed
    fn run_for(director: &mut WaveDirector, ms: u64) {
        let mut elapsed = 0;
        while elapsed < ms {
            let dt = FRAME_MS.min(ms - elapsed);
            director.step(dt, &idle());
            elapsed += dt;
        }
    }

    fn kill_all_enemies(director: &mut WaveDirector) {
        for idx in 0..director.enemies.len() {
            if director.enemies[idx].active {
                let (x, y) = (director.enemies[idx].body.x, director.enemies[idx].body.y);
                director.push_player_bullet(x, y);
                let bullet_idx = director.player_bullets.len() - 1;
                director.on_player_bullet_hits_enemy(bullet_idx, idx);
            }
        }
    }

    #[test]
    fn test_initial_state() {
        let director = director();
        assert_eq!(director.player().lives, 2);
        assert!(director.player().shield);
        assert_eq!(director.wave(), WaveState::default());
        assert!(director.enemies().is_empty());
        assert_eq!(director.collision_pairs().len(), 3);
        assert_eq!(director.hud().lives, "Lives: 2");
    }

    #[test]
    fn test_first_wave_after_delay() {
        let mut director = director();
        director.step(749, &idle());
        assert_eq!(director.wave().number, 0);

        director.step(1, &idle());
        let wave = director.wave();
        assert_eq!(wave.number, 1);
        assert!(wave.active);
        assert_eq!(director.enemies().len(), 18);
        assert_eq!(director.player().lives, 3);
        assert_eq!(director.hud().wave, "Wave: 1");
    }

    #[test]
    fn test_grid_layout() {
        let mut director = director();
        director.spawn_wave();

        let first = &director.enemies()[0];
        assert_eq!((first.body.x, first.body.y), (60.0, 80.0));
        assert_eq!(first.kind, EnemyKind::A);

        let second_row = &director.enemies()[6];
        assert_eq!((second_row.body.x, second_row.body.y), (60.0, 130.0));
        assert_eq!(second_row.kind, EnemyKind::B);

        let last = director.enemies().last().unwrap();
        assert_eq!((last.body.x, last.body.y), (360.0, 180.0));
    }

    #[test]
    fn test_fire_cooldown() {
        let mut director = director();
        let fire = InputSnapshot {
            fire: true,
            ..InputSnapshot::default()
        };

        director.step(FRAME_MS, &fire);
        assert_eq!(director.player_bullets().len(), 1);
        assert_eq!(director.drain_sound_cues(), vec![SoundCue::Shoot]);

        // Pressed again during cooldown: ignored
        director.step(FRAME_MS, &fire);
        assert_eq!(director.player_bullets().len(), 1);

        run_for(&mut director, 300);
        director.step(FRAME_MS, &fire);
        assert_eq!(director.player_bullets().len(), 2);
    }

    #[test]
    fn test_player_moves_horizontally_only() {
        let mut director = director();
        let left = InputSnapshot {
            left: true,
            ..InputSnapshot::default()
        };
        // Velocity is set this frame, applied on the next
        director.step(FRAME_MS, &left);
        director.step(1000, &left);
        // 240 - 250 would leave the field; the hull stops at its half width
        assert_eq!(director.player().x(), 16.0);
        assert_eq!(director.player().y(), 590.0);
    }

    #[test]
    fn test_shield_then_life() {
        let mut director = director();

        director.damage_player();
        assert!(!director.player().shield);
        assert_eq!(director.player().lives, 2);
        assert!(!director.player().body.enabled);
        assert!(director.player().is_blinking());

        run_for(&mut director, 800);
        assert!(director.player().body.enabled);

        let lives = director.player().lives;
        director.damage_player();
        assert!(director.player().shield);
        assert_eq!(director.player().lives, lives - 1);
        assert!(director.camera_shake().is_some());
        assert!(director.transition().is_none());
        assert_eq!(director.hud().lives, format!("Lives: {}", lives - 1));
    }

    #[test]
    fn test_player_respawns_after_life_lost() {
        let mut director = director();
        director.player_mut().shield = false;
        director.player_mut().body.x = 100.0;

        director.damage_player();
        assert_eq!(director.player().x(), 100.0);
        director.step(50, &idle());
        assert_eq!(director.player().x(), 240.0);
    }

    #[test]
    fn test_last_life_ends_scene_once() {
        let mut director = director();
        director.spawn_wave();
        kill_all_enemies(&mut director);
        let score = director.score();

        director.player_mut().lives = 1;
        director.player_mut().shield = false;
        director.damage_player();

        assert_eq!(
            director.transition(),
            Some(SceneTransition::GameOver { score })
        );

        // Nothing moves after the hand-over
        let now = director.now_ms();
        director.damage_player();
        director.step(5000, &idle());
        assert_eq!(director.now_ms(), now);
        assert_eq!(director.player().lives, 0);
    }

    #[test]
    fn test_score_by_kind() {
        let mut director = director();
        director.spawn_wave();

        director.push_player_bullet(60.0, 80.0);
        director.on_player_bullet_hits_enemy(0, 0);
        assert_eq!(director.score(), 100);

        director.push_player_bullet(60.0, 130.0);
        director.on_player_bullet_hits_enemy(0, 6);
        assert_eq!(director.score(), 250);
        assert_eq!(director.hud().score, "Score: 250");
        assert!(director.player_bullets().is_empty());
        assert_eq!(director.particles().len(), 18);
    }

    #[test]
    fn test_kill_cancels_fire_timer() {
        let mut director = director();
        director.spawn_wave();
        let timer = director.enemies()[0].fire_timer.unwrap();
        assert!(director.is_timer_pending(timer));

        director.push_player_bullet(60.0, 80.0);
        director.on_player_bullet_hits_enemy(0, 0);
        assert!(!director.is_timer_pending(timer));
    }

    #[test]
    fn test_wave_end_only_when_active() {
        let mut director = director();
        director.on_frame(&idle());
        assert!(!director.wave().active);
        // Nothing spawned, nothing scheduled beyond the first wave
        run_for(&mut director, 749);
        assert_eq!(director.wave().number, 0);

        director.step(1, &idle());
        kill_all_enemies(&mut director);
        assert!(director.wave().active);
        director.on_frame(&idle());
        assert!(!director.wave().active);

        run_for(&mut director, 1499);
        assert_eq!(director.wave().number, 1);
        director.step(1, &idle());
        assert_eq!(director.wave().number, 2);
        assert_eq!(director.enemies().len(), 24);
    }

    #[test]
    fn test_wave_two_wraps() {
        let mut director = director();
        run_for(&mut director, 750);
        kill_all_enemies(&mut director);
        director.on_frame(&idle());
        run_for(&mut director, 1500);
        assert_eq!(director.wave().number, 2);

        director.enemies_mut()[0].body.y = 640.0 + 31.0;
        director.on_frame(&idle());
        let enemy = &director.enemies()[0];
        assert_eq!(enemy.body.y, -30.0);
        assert!(enemy.active);
    }

    #[test]
    fn test_enemy_fire_skips_stale_enemy() {
        let mut director = director();
        director.spawn_wave();
        let id = director.enemies()[0].id;

        director.enemy_fire(id);
        assert_eq!(director.enemy_bullets().len(), 1);
        assert_eq!(director.enemy_bullets()[0].body.y, 100.0);

        director.enemies_mut()[0].deactivate();
        director.enemy_fire(id);
        director.enemy_fire(EnemyId(9999));
        assert_eq!(director.enemy_bullets().len(), 1);
    }

    #[test]
    fn test_enemies_fire_within_interval() {
        let mut director = director();
        // Out of every firing line
        director.player_mut().body.x = 464.0;
        run_for(&mut director, 750);
        assert!(director.enemy_bullets().is_empty());

        run_for(&mut director, 3990);
        assert!(director.enemy_bullets().is_empty());

        run_for(&mut director, 2016);
        assert_eq!(director.enemy_bullets().len(), 18);
    }

    #[test]
    fn test_dive_timer_only_in_wave_three() {
        let mut director = director();
        for wave in 1..=3 {
            director.spawn_wave();
            assert_eq!(director.has_dive_timer(), wave == 3);
            if wave < 3 {
                kill_all_enemies(&mut director);
                director.end_current_wave();
            }
        }

        director.end_current_wave();
        assert!(!director.has_dive_timer());
    }

    #[test]
    fn test_launch_dive_picks_first_idle() {
        let mut director = director();
        director.wave.number = 2;
        director.spawn_wave();

        director.launch_dive();
        assert!(director.enemies()[0].is_diving());
        assert!(!director.enemies()[1].is_diving());

        director.launch_dive();
        assert!(director.enemies()[1].is_diving());

        // Diving enemies never fire
        let id = director.enemies()[0].id;
        director.enemy_fire(id);
        assert!(director.enemy_bullets().is_empty());
    }

    #[test]
    fn test_dive_without_candidates_is_noop() {
        let mut director = director();
        director.wave.number = 2;
        director.spawn_wave();
        for enemy in director.enemies_mut() {
            enemy.deactivate();
        }
        director.launch_dive();
        assert!(director.enemies().iter().all(|e| !e.is_diving()));
    }

    #[test]
    fn test_missed_dive_is_removed() {
        let mut director = director();
        director.wave.number = 2;
        director.spawn_wave();
        director.launch_dive();

        director.enemies_mut()[0].body.x = -51.0;
        director.on_frame(&idle());
        assert!(!director.enemies()[0].active);
        assert_eq!(director.active_enemy_count(), 29);
    }

    #[test]
    fn test_enemy_body_collision_spends_enemy() {
        let mut director = director();
        director.spawn_wave();
        let (px, py) = (director.player().x(), director.player().y());
        director.enemies_mut()[3].body.set_position(px, py);

        director.step(FRAME_MS, &idle());
        assert!(!director.enemies()[3].active);
        assert!(!director.player().shield);
        assert_eq!(director.player().lives, 3);
    }

    #[test]
    fn test_enemy_bullet_collision() {
        let mut director = director();
        let (px, py) = (director.player().x(), director.player().y());
        director.push_enemy_bullet(px, py);
        director.push_enemy_bullet(px, py);

        director.step(FRAME_MS, &idle());
        // The first hit breaks the shield and disables the body
        assert_eq!(director.enemy_bullets().len(), 1);
        assert!(!director.player().shield);
        assert_eq!(director.player().lives, 2);
    }

    #[test]
    fn test_camera_shake_expires() {
        let mut director = director();
        director.player_mut().shield = false;
        director.damage_player();

        director.step(FRAME_MS, &idle());
        assert!(director.camera_shake().is_some());
        run_for(&mut director, 150);
        assert!(director.camera_shake().is_none());
        assert_eq!(director.camera_offset(), (0.0, 0.0));
    }

    // Property-based tests
    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_spawn_wave_grid_size(waves in 1u32..10) {
                let mut director = WaveDirector::new(GameConfig::default());
                for _ in 0..waves {
                    director.spawn_wave();
                }
                prop_assert_eq!(
                    director.enemies().len(),
                    6 * (2 + waves.min(4) as usize)
                );
            }

            #[test]
            fn test_score_never_decreases(hits in prop::collection::vec(0usize..18, 1..40)) {
                let mut director = WaveDirector::new(GameConfig::default());
                director.spawn_wave();
                let mut last = director.score();
                for idx in hits {
                    director.push_player_bullet(0.0, 0.0);
                    let bullet_idx = director.player_bullets().len() - 1;
                    director.on_player_bullet_hits_enemy(bullet_idx, idx);
                    prop_assert!(director.score() >= last);
                    last = director.score();
                }
            }

            #[test]
            fn test_damage_sequence(hits in 1usize..12) {
                let mut director = WaveDirector::new(GameConfig::default());
                let mut transitions = 0;
                for _ in 0..hits {
                    let shield = director.player().shield;
                    let lives = director.player().lives;
                    let already_over = director.transition().is_some();
                    director.damage_player();
                    if already_over {
                        continue;
                    }
                    if shield {
                        prop_assert_eq!(director.player().lives, lives);
                    } else {
                        prop_assert_eq!(director.player().lives, lives - 1);
                        prop_assert!(director.player().shield);
                    }
                    if director.transition().is_some() {
                        transitions += 1;
                    }
                }
                prop_assert!(transitions <= 1);
                prop_assert_eq!(transitions == 1, hits >= 4);
            }
        }
    }
}
