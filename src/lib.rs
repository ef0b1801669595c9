// Library exports for testing
pub use config::GameConfig;
pub use director::{
    CollisionPair, Hud, SceneTransition, SoundCue, TimerEvent, WaveDirector, WaveState,
};
pub use entities::{
    Appearance, Enemy, EnemyBehavior, EnemyId, EnemyKind, HitOutcome, Particle, Player,
    Projectile, ProjectileOwner,
};
pub use input::{InputManager, InputSnapshot};
pub use scene::{Scene, SceneManager};

pub mod app;
pub mod audio;
pub mod config;
pub mod director;
pub mod entities;
pub mod input;
pub mod physics;
pub mod renderer;
pub mod scene;
pub mod scheduler;
pub mod tween;
