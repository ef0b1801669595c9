mod enemy;
mod particle;
mod player;
mod projectile;

// Re-export all public types
pub use enemy::{Enemy, EnemyBehavior, EnemyId, EnemyKind};
pub use particle::{Particle, create_explosion_particles};
pub use player::{Appearance, HitOutcome, Player};
pub use projectile::{Projectile, ProjectileOwner};
