use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::director::WaveDirector;
use crate::entities::{Appearance, EnemyKind, ProjectileOwner};
use crate::scene::{Scene, SceneManager};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Maps world coordinates onto the cells of the play field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub world_width: f32,
    pub world_height: f32,
    /// Camera offset in world units
    pub offset: (f32, f32),
}

impl Viewport {
    /// Largest field with the world's aspect ratio that fits in `area`, centered
    pub fn fit(area: Rect, world_width: f32, world_height: f32) -> Rect {
        let wanted = (area.height as f32 * world_width / world_height * CELL_ASPECT) as u16;
        let width = wanted.min(area.width);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y,
            width,
            height: area.height,
        }
    }

    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = ((x + self.offset.0) / self.world_width * self.area.width as f32).floor();
        let row = ((y + self.offset.1) / self.world_height * self.area.height as f32).floor();
        if col < 0.0 || row < 0.0 || col >= self.area.width as f32 || row >= self.area.height as f32
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    /// Writes `text` centered on the world position, clipped to the field
    fn put_centered(&self, buffer: &mut Buffer, x: f32, y: f32, text: &str, style: Style) {
        let Some((col, row)) = self.to_cell(x, y) else {
            return;
        };
        let half = (text.chars().count() / 2) as u16;
        let start = col.saturating_sub(half).max(self.area.x);
        let room = (self.area.x + self.area.width).saturating_sub(start) as usize;
        buffer.set_stringn(start, row, text, room, style);
    }
}

/// Handles all rendering responsibilities for the game
#[derive(Default)]
pub struct GameRenderer {}

impl GameRenderer {
    pub fn new() -> Self {
        Self {}
    }

    /// Main render method that dispatches to scene-specific renderers
    pub fn render(&self, frame: &mut Frame, scenes: &SceneManager) {
        match scenes.scene() {
            Scene::Title => self.render_title(frame),
            Scene::Play(director) => self.render_play(frame, director),
            Scene::GameOver { score } => self.render_game_over(frame, *score),
        }
    }

    fn render_title(&self, frame: &mut Frame) {
        let text = vec![
            Line::from(""),
            Line::from("SPACE DEFENSE").centered().bold().cyan(),
            Line::from(""),
            Line::from("Press SPACE to Start").centered().white(),
            Line::from(""),
            Line::from("[A/D/Arrows: Move] [Space: Fire] [Q: Quit]")
                .centered()
                .dark_gray(),
        ];
        self.render_centered_box(frame, text, Color::Cyan);
    }

    fn render_game_over(&self, frame: &mut Frame, score: u32) {
        let text = vec![
            Line::from(""),
            Line::from("GAME OVER").centered().red().bold(),
            Line::from(""),
            Line::from(format!("Score: {}", score))
                .centered()
                .yellow()
                .bold(),
            Line::from(""),
            Line::from("Press SPACE to Retry").centered().white(),
            Line::from("Press Q to quit").centered().white(),
        ];
        self.render_centered_box(frame, text, Color::Red);
    }

    fn render_centered_box(&self, frame: &mut Frame, text: Vec<Line>, border: Color) {
        let area = frame.area();
        let height = (text.len() as u16 + 2).min(area.height);
        let width = 46.min(area.width);
        let boxed = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(
            Paragraph::new(text)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                )
                .alignment(Alignment::Center),
            boxed,
        );
    }

    /// Renders the active gameplay screen
    fn render_play(&self, frame: &mut Frame, director: &WaveDirector) {
        let area = frame.area();
        let config = director.config();

        // HUD on the first line, controls on the last, field in between
        let field_area = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height.saturating_sub(2),
        };
        let field = Viewport::fit(field_area, config.world_width, config.world_height);

        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(field);
        frame.render_widget(block, field);

        let viewport = Viewport {
            area: inner,
            world_width: config.world_width,
            world_height: config.world_height,
            offset: director.camera_offset(),
        };

        let buffer = frame.buffer_mut();
        render_backdrop(buffer, inner);

        for enemy in director.enemies().iter().filter(|e| e.active) {
            let color = match enemy.kind {
                EnemyKind::A => Color::Yellow,
                EnemyKind::B => Color::Magenta,
            };
            let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            if enemy.is_diving() {
                let glyph = enemy.get_dive_glyph().to_string();
                viewport.put_centered(buffer, enemy.body.x, enemy.body.y, &glyph, style);
            } else {
                let sprite = enemy.get_sprite();
                viewport.put_centered(buffer, enemy.body.x, enemy.body.y, sprite, style);
            }
        }

        let player = director.player();
        if player.is_visible() {
            let color = match player.appearance {
                Appearance::Normal => Color::Cyan,
                Appearance::Damaged => Color::Red,
            };
            viewport.put_centered(
                buffer,
                player.x(),
                player.y(),
                player.get_sprite(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }

        for projectile in director
            .player_bullets()
            .iter()
            .chain(director.enemy_bullets())
        {
            let color = match projectile.owner {
                ProjectileOwner::Player => Color::Yellow,
                ProjectileOwner::Enemy => Color::LightRed,
            };
            viewport.put_centered(
                buffer,
                projectile.body.x,
                projectile.body.y,
                &projectile.get_sprite().to_string(),
                Style::default().fg(color),
            );
        }

        for particle in director.particles() {
            // Fade from red to yellow as the spark dies
            let color = if particle.lifetime_ms > 160 {
                Color::Red
            } else if particle.lifetime_ms > 80 {
                Color::LightRed
            } else {
                Color::Yellow
            };
            viewport.put_centered(
                buffer,
                particle.x,
                particle.y,
                &particle.char.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            );
        }

        let hud_area = Rect {
            x: field.x + 1,
            y: area.y,
            width: field.width.saturating_sub(2),
            height: 1,
        };
        let hud = director.hud();
        let label = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let [lives_area, wave_area, score_area] =
            Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(hud_area);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hud.lives.as_str(), label))),
            lives_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hud.wave.as_str(), label))).centered(),
            wave_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hud.score.as_str(), label))).right_aligned(),
            score_area,
        );

        let controls = Line::from(vec![Span::styled(
            "[A/D/Arrows: Move] [Space: Fire] [Q: Quit]",
            Style::default().fg(Color::DarkGray),
        )]);
        let controls_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1,
        };
        frame.render_widget(Paragraph::new(controls).centered(), controls_area);
    }
}

/// Fixed star pattern so the backdrop does not flicker
fn render_backdrop(buffer: &mut Buffer, area: Rect) {
    if area.width == 0 {
        return;
    }
    let star = Style::default().fg(Color::DarkGray);
    for row in 0..area.height {
        if row % 3 != 0 {
            continue;
        }
        let col = (u32::from(row) * 37 + 11) % u32::from(area.width);
        buffer.set_string(area.x + col as u16, area.y + row, ".", star);
    }
}
