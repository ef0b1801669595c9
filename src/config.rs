/// Tunable gameplay constants
///
/// All distances are world units (the play field is 480x640, origin top-left),
/// all speeds are units per second and all delays are milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub world_width: f32,
    pub world_height: f32,

    pub starting_lives: u32,
    pub player_speed: f32,
    pub player_fire_cooldown_ms: u64,
    pub player_bullet_speed: f32,
    /// Distance from the bottom edge to the player spawn point
    pub player_spawn_offset: f32,
    pub player_size: (f32, f32),

    pub first_wave_delay_ms: u64,
    pub next_wave_delay_ms: u64,
    pub grid_columns: usize,
    pub max_extra_rows: u32,
    pub base_rows: u32,
    pub grid_origin: (f32, f32),
    pub grid_spacing: (f32, f32),
    pub enemy_size: (f32, f32),

    pub oscillation_distance: f32,
    pub oscillation_duration_ms: u64,
    pub descent_speed: f32,
    /// Enemies below `world_height + wrap_margin` reappear at `-wrap_margin`
    pub wrap_margin: f32,
    pub dive_interval_ms: u64,
    pub dive_speed: f32,
    /// How far past any edge a diving enemy may travel before it counts as a miss
    pub dive_escape_margin: f32,

    pub enemy_fire_rate_ms: u64,
    pub enemy_bullet_speed: f32,
    pub bullet_size: (f32, f32),

    pub score_kind_a: u32,
    pub score_kind_b: u32,

    pub blink_half_period_ms: u64,
    pub blink_repeats: u32,
    pub invulnerability_ms: u64,
    pub respawn_delay_ms: u64,
    pub shake_duration_ms: u64,
    pub shake_intensity: f32,

    /// Seed for every random draw the simulation makes
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 480.0,
            world_height: 640.0,

            starting_lives: 2,
            player_speed: 250.0,
            player_fire_cooldown_ms: 300,
            player_bullet_speed: 400.0,
            player_spawn_offset: 50.0,
            player_size: (32.0, 32.0),

            first_wave_delay_ms: 750,
            next_wave_delay_ms: 1500,
            grid_columns: 6,
            max_extra_rows: 4,
            base_rows: 2,
            grid_origin: (60.0, 80.0),
            grid_spacing: (60.0, 50.0),
            enemy_size: (32.0, 32.0),

            oscillation_distance: 40.0,
            oscillation_duration_ms: 2000,
            descent_speed: 40.0,
            wrap_margin: 30.0,
            dive_interval_ms: 1200,
            dive_speed: 200.0,
            dive_escape_margin: 50.0,

            enemy_fire_rate_ms: 5000,
            enemy_bullet_speed: 200.0,
            bullet_size: (6.0, 14.0),

            score_kind_a: 100,
            score_kind_b: 150,

            blink_half_period_ms: 80,
            blink_repeats: 5,
            invulnerability_ms: 800,
            respawn_delay_ms: 50,
            shake_duration_ms: 150,
            shake_intensity: 0.01,

            seed: 0x5EED,
        }
    }
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Where the player starts and where it is put back after losing a life
    pub fn player_spawn(&self) -> (f32, f32) {
        (
            self.world_width / 2.0,
            self.world_height - self.player_spawn_offset,
        )
    }

    /// Number of grid rows for a given wave number
    pub fn rows_for_wave(&self, wave: u32) -> u32 {
        self.base_rows + wave.min(self.max_extra_rows)
    }

    pub fn enemies_for_wave(&self, wave: u32) -> usize {
        self.grid_columns * self.rows_for_wave(wave) as usize
    }

    /// Inclusive bounds of the randomized per-enemy fire interval
    pub fn enemy_fire_interval_range(&self) -> (u64, u64) {
        let rate = self.enemy_fire_rate_ms as f64;
        ((rate * 0.8) as u64, (rate * 1.2) as u64)
    }
}
