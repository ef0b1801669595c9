/// Axis-aligned bounding box described by its center and full size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Touching edges do not count as overlapping
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Physics body: position, velocity and collision box of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    /// Disabled bodies never overlap anything
    pub enabled: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, (width, height): (f32, f32)) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
            enabled: true,
        }
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.vx = vx;
        self.vy = vy;
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn integrate(&mut self, dt_secs: f32) {
        self.x += self.vx * dt_secs;
        self.y += self.vy * dt_secs;
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.enabled && other.enabled && self.aabb().overlaps(&other.aabb())
    }

    /// True when the center is more than `margin` past any edge of the world
    pub fn is_outside(&self, world_width: f32, world_height: f32, margin: f32) -> bool {
        self.y > world_height + margin
            || self.y < -margin
            || self.x < -margin
            || self.x > world_width + margin
    }

    /// Keeps the whole box inside the horizontal world bounds
    pub fn clamp_x(&mut self, world_width: f32) {
        let half = self.width / 2.0;
        self.x = self.x.clamp(half, (world_width - half).max(half));
    }

    /// Heading of the current velocity in degrees (0 = right, 90 = down)
    pub fn velocity_angle_deg(&self) -> f32 {
        self.vy.atan2(self.vx).to_degrees()
    }
}

/// Sets `body`'s velocity so it travels in a straight line toward `target` at `speed`
pub fn move_toward(body: &mut Body, target: (f32, f32), speed: f32) {
    let dx = target.0 - body.x;
    let dy = target.1 - body.y;
    let angle = dy.atan2(dx);
    body.set_velocity(angle.cos() * speed, angle.sin() * speed);
}
