use crate::config::GameConfig;
use crate::physics::Body;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
    pub owner: ProjectileOwner,
}

impl Projectile {
    /// Player bullets travel up, enemy bullets travel down
    pub fn new(x: f32, y: f32, owner: ProjectileOwner, config: &GameConfig) -> Self {
        let vy = match owner {
            ProjectileOwner::Player => -config.player_bullet_speed,
            ProjectileOwner::Enemy => config.enemy_bullet_speed,
        };

        Self {
            body: Body::new(x, y, config.bullet_size).with_velocity(0.0, vy),
            owner,
        }
    }

    pub fn update(&mut self, dt_secs: f32) {
        self.body.integrate(dt_secs);
    }

    /// Bullets are culled once fully past any edge
    pub fn is_out_of_bounds(&self, world_width: f32, world_height: f32) -> bool {
        self.body
            .is_outside(world_width, world_height, self.body.height)
    }

    pub fn get_sprite(&self) -> char {
        match self.owner {
            ProjectileOwner::Player => '|',
            ProjectileOwner::Enemy => '!',
        }
    }
}
