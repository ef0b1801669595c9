use tracing::info;

use crate::config::GameConfig;
use crate::director::{SceneTransition, SoundCue, WaveDirector};
use crate::input::InputSnapshot;

pub enum Scene {
    Title,
    Play(Box<WaveDirector>),
    GameOver { score: u32 },
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Title => "title",
            Scene::Play(_) => "play",
            Scene::GameOver { .. } => "game_over",
        }
    }
}

/// Owns the current scene and performs the transitions between them
pub struct SceneManager {
    scene: Scene,
    config: GameConfig,
    /// Number of play scenes started, folded into each run's seed
    runs: u64,
}

impl SceneManager {
    pub fn new(config: GameConfig) -> Self {
        Self {
            scene: Scene::Title,
            config,
            runs: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn director(&self) -> Option<&WaveDirector> {
        match &self.scene {
            Scene::Play(director) => Some(&**director),
            _ => None,
        }
    }

    pub fn director_mut(&mut self) -> Option<&mut WaveDirector> {
        match &mut self.scene {
            Scene::Play(director) => Some(&mut **director),
            _ => None,
        }
    }

    pub fn update(&mut self, dt_ms: u64, input: &InputSnapshot) {
        // Title and game over only wait for confirm
        let next = if let Scene::Play(director) = &mut self.scene {
            director.step(dt_ms, input);
            director.transition().map(|transition| match transition {
                SceneTransition::GameOver { score } => Scene::GameOver { score },
            })
        } else if input.confirm {
            Some(self.new_play_scene())
        } else {
            None
        };

        if let Some(next) = next {
            self.transition_to(next);
        }
    }

    /// Sound cues raised by the play scene since the last call
    pub fn drain_sound_cues(&mut self) -> Vec<SoundCue> {
        self.director_mut()
            .map(WaveDirector::drain_sound_cues)
            .unwrap_or_default()
    }

    fn new_play_scene(&mut self) -> Scene {
        let config = GameConfig {
            seed: self.config.seed.wrapping_add(self.runs),
            ..self.config.clone()
        };
        self.runs += 1;
        Scene::Play(Box::new(WaveDirector::new(config)))
    }

    fn transition_to(&mut self, next: Scene) {
        info!(from = self.scene.name(), to = next.name(), "scene transition");
        self.scene = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirm() -> InputSnapshot {
        InputSnapshot {
            confirm: true,
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn test_title_waits_for_confirm() {
        let mut scenes = SceneManager::new(GameConfig::default());
        scenes.update(16, &InputSnapshot::default());
        assert!(matches!(scenes.scene(), Scene::Title));

        scenes.update(16, &confirm());
        assert!(matches!(scenes.scene(), Scene::Play(_)));
    }

    #[test]
    fn test_game_over_carries_score_and_retries() {
        let mut scenes = SceneManager::new(GameConfig::default());
        scenes.update(16, &confirm());

        let director = scenes.director_mut().unwrap();
        director.spawn_wave();
        director.push_player_bullet(60.0, 80.0);
        director.on_player_bullet_hits_enemy(0, 0);
        director.player_mut().lives = 1;
        director.player_mut().shield = false;
        director.damage_player();

        scenes.update(16, &InputSnapshot::default());
        assert!(matches!(scenes.scene(), Scene::GameOver { score: 100 }));
        assert!(scenes.director().is_none());

        scenes.update(16, &confirm());
        let director = scenes.director().unwrap();
        assert_eq!(director.score(), 0);
        assert_eq!(director.player().lives, 2);
    }

    #[test]
    fn test_sound_cues_come_from_play_scene() {
        let mut scenes = SceneManager::new(GameConfig::default());
        assert!(scenes.drain_sound_cues().is_empty());

        scenes.update(16, &confirm());
        let fire = InputSnapshot {
            fire: true,
            ..InputSnapshot::default()
        };
        scenes.update(16, &fire);
        assert_eq!(scenes.drain_sound_cues(), vec![SoundCue::Shoot]);
        assert!(scenes.drain_sound_cues().is_empty());
    }
}
