/// Spark thrown out by an enemy hit
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub lifetime_ms: u64,
    pub char: char,
}

impl Particle {
    pub fn new(x: f32, y: f32, velocity_x: f32, velocity_y: f32, lifetime_ms: u64, char: char) -> Self {
        Self {
            x,
            y,
            velocity_x,
            velocity_y,
            lifetime_ms,
            char,
        }
    }

    pub fn update(&mut self, dt_ms: u64) {
        self.lifetime_ms = self.lifetime_ms.saturating_sub(dt_ms);

        let dt_secs = dt_ms as f32 / 1000.0;
        self.x += self.velocity_x * dt_secs;
        self.y += self.velocity_y * dt_secs;
    }

    pub fn is_dead(&self) -> bool {
        self.lifetime_ms == 0
    }
}

const SPARK_SPEED: f32 = 120.0;
const SPARK_LIFETIME_MS: u64 = 250;
const FLASH_LIFETIME_MS: u64 = 150;

/// Creates the hit effect at the given position: eight sparks and a flash
pub fn create_explosion_particles(center_x: f32, center_y: f32) -> Vec<Particle> {
    let directions: [(f32, f32); 8] = [
        (0.0, -1.0),
        (1.0, -1.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (0.0, 1.0),
        (-1.0, 1.0),
        (-1.0, 0.0),
        (-1.0, -1.0),
    ];

    let mut particles: Vec<Particle> = directions
        .iter()
        .map(|(dx, dy)| {
            Particle::new(
                center_x,
                center_y,
                dx * SPARK_SPEED,
                dy * SPARK_SPEED,
                SPARK_LIFETIME_MS,
                '*',
            )
        })
        .collect();

    particles.push(Particle::new(
        center_x,
        center_y,
        0.0,
        0.0,
        FLASH_LIFETIME_MS,
        'o',
    ));

    particles
}
