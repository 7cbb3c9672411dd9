//! Actor kinematics and the animation state machine.
//!
//! Horizontal motion is an unsigned speed plus a facing; vertical motion is a
//! fall velocity in pixels per second (positive is down). A jump is a short
//! window of upward thrust, after which plain gravity takes over, so the arc
//! is two parabola pieces joined at `jump_time_max`.
//!
//! Ground contact is not decided here. The caller samples the tile map each
//! frame and reports it through `set_ground_contact` before `advance`.
//!
//! The active clip is derived from the motion state on demand:
//!
//! | vertical  | gait | clip |
//! |-----------|------|------|
//! | Jumping   | any  | Jump |
//! | Falling   | any  | Fall |
//! | Grounded  | Run  | Run  |
//! | Grounded  | Walk | Walk |
//!
//! An idle actor keeps its grounded clip with the frame held at the start.

use glam::Vec2;
use rj_core::animation::{Clip, ClipRange, ClipTable, FrameCursor};
use serde::Deserialize;

use crate::collision::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActorTuning {
    pub width: f32,
    pub height: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub walk_speed_max: f32,
    pub run_speed_max: f32,
    /// Animation frames per second.
    pub fps: f32,
    pub jump_gravity_factor: f32,
    /// Seconds of upward thrust after a jump starts.
    pub jump_time_max: f32,
    /// Terminal fall speed in pixels per second.
    pub fall_velocity_max: f32,
    /// Meters per second squared.
    pub world_gravitation: f32,
    pub meter_in_pixel: f32,
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 32.0,
            acceleration: 400.0,
            deceleration: 200.0,
            walk_speed_max: 100.0,
            run_speed_max: 250.0,
            fps: 12.0,
            jump_gravity_factor: 4.0,
            jump_time_max: 0.12,
            fall_velocity_max: 900.0,
            world_gravitation: 9.81,
            meter_in_pixel: 32.0,
        }
    }
}

impl ActorTuning {
    /// Downward acceleration in pixels per second squared.
    pub fn gravity(&self) -> f32 {
        self.meter_in_pixel * self.world_gravitation
    }

    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("fps", self.fps),
            ("fall_velocity_max", self.fall_velocity_max),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("Actor tuning validation failed: {name} must be > 0"));
            }
        }
        let non_negative = [
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("walk_speed_max", self.walk_speed_max),
            ("run_speed_max", self.run_speed_max),
            ("jump_gravity_factor", self.jump_gravity_factor),
            ("jump_time_max", self.jump_time_max),
            ("world_gravitation", self.world_gravitation),
            ("meter_in_pixel", self.meter_in_pixel),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("Actor tuning validation failed: {name} must be >= 0"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gait {
    #[default]
    Walk,
    Run,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Vertical {
    Grounded,
    /// Airborne with upward thrust; `elapsed` seconds since take-off.
    Jumping { elapsed: f32 },
    Falling,
}

/// Derived view of an actor, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Dead,
    Jumping,
    Falling,
    Running,
    Walking,
    Idle,
}

/// What the input layer (or AI) wants an actor to do this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub direction: Option<Facing>,
    pub run: bool,
    pub jump: bool,
}

/// Transitions that happened during one `advance`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub died: bool,
    pub jump_ended: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Top-left corner of the bounding box.
    pub position: Vec2,
    pub size: Vec2,
    pub frame_y_offset: u32,
    pub respawn_position: Vec2,
    pub world_size: Vec2,
    pub horizontal_speed: f32,
    pub fall_velocity: f32,
    /// Extra thrust for the current jump; the take-off speed.
    pub jump_velocity: f32,
    pub facing: Facing,
    pub moving: bool,
    pub gait: Gait,
    pub vertical: Vertical,
    pub dead: bool,
    pub animation: FrameCursor,
    active_clip: Clip,
    pub tuning: ActorTuning,
    pub clips: ClipTable,
}

impl Actor {
    /// New actor standing at `spawn`, which also becomes its respawn point.
    pub fn new(spawn: Vec2, world_size: Vec2, tuning: ActorTuning, clips: ClipTable) -> Self {
        Self {
            position: spawn,
            size: Vec2::new(tuning.width, tuning.height),
            frame_y_offset: 0,
            respawn_position: spawn,
            world_size,
            horizontal_speed: 0.0,
            fall_velocity: 0.0,
            jump_velocity: 0.0,
            facing: Facing::Right,
            moving: false,
            gait: Gait::Walk,
            vertical: Vertical::Grounded,
            dead: false,
            animation: FrameCursor::new(tuning.fps, clips.walk),
            active_clip: Clip::Walk,
            tuning,
            clips,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_pos_size(self.position, self.size)
    }

    pub fn is_airborne(&self) -> bool {
        !matches!(self.vertical, Vertical::Grounded)
    }

    pub fn velocity_max(&self) -> f32 {
        match self.gait {
            Gait::Walk => self.tuning.walk_speed_max,
            Gait::Run => self.tuning.run_speed_max,
        }
    }

    pub fn state(&self) -> MotionState {
        if self.dead {
            return MotionState::Dead;
        }
        match self.vertical {
            Vertical::Jumping { .. } => MotionState::Jumping,
            Vertical::Falling => MotionState::Falling,
            Vertical::Grounded if !self.moving => MotionState::Idle,
            Vertical::Grounded => match self.gait {
                Gait::Run => MotionState::Running,
                Gait::Walk => MotionState::Walking,
            },
        }
    }

    pub fn clip(&self) -> Clip {
        match self.vertical {
            Vertical::Jumping { .. } => Clip::Jump,
            Vertical::Falling => Clip::Fall,
            Vertical::Grounded => match self.gait {
                Gait::Run => Clip::Run,
                Gait::Walk => Clip::Walk,
            },
        }
    }

    pub fn clip_range(&self) -> ClipRange {
        self.clips.range(self.clip())
    }

    /// Feed the result of this frame's floor probe. A jump in progress keeps
    /// going even while its feet still touch the floor it started from.
    pub fn set_ground_contact(&mut self, on_ground: bool) {
        self.vertical = match (self.vertical, on_ground) {
            (Vertical::Jumping { elapsed }, _) => Vertical::Jumping { elapsed },
            (_, true) => Vertical::Grounded,
            (_, false) => Vertical::Falling,
        };
        self.sync_clip();
    }

    /// Start a jump if standing on the ground. The current horizontal speed
    /// becomes extra thrust, so running jumps go higher.
    pub fn jump(&mut self) -> bool {
        if self.dead || self.is_airborne() {
            return false;
        }
        self.vertical = Vertical::Jumping { elapsed: 0.0 };
        self.jump_velocity = self.horizontal_speed;
        self.sync_clip();
        true
    }

    /// Turning around stops the actor; it then accelerates the other way.
    pub fn set_facing(&mut self, facing: Facing) {
        if self.facing != facing {
            self.facing = facing;
            self.horizontal_speed = 0.0;
        }
    }

    /// Gait only changes on the ground: no running start or braking in mid-air.
    pub fn set_gait(&mut self, gait: Gait) {
        if !self.is_airborne() {
            self.gait = gait;
            self.sync_clip();
        }
    }

    /// Apply one frame of intent. Returns true when a jump started.
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        self.set_gait(if intent.run { Gait::Run } else { Gait::Walk });
        match intent.direction {
            Some(facing) => {
                self.set_facing(facing);
                self.moving = true;
            }
            None => self.moving = false,
        }
        intent.jump && self.jump()
    }

    /// Integrate one frame of `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        let was_dead = self.dead;
        self.sync_clip();

        // Horizontal speed.
        if self.moving {
            self.horizontal_speed += self.tuning.acceleration * dt;
        } else {
            self.horizontal_speed -= self.tuning.deceleration * dt;
        }
        self.horizontal_speed = self.horizontal_speed.min(self.velocity_max());
        if self.horizontal_speed <= 0.0 {
            self.horizontal_speed = 0.0;
            if !self.moving {
                // Idle pose.
                self.animation.frame = self.clip_range().start;
            }
        }

        let playing = self.moving || self.is_airborne();
        self.animation.tick(dt, playing, self.clip_range());

        if self.horizontal_speed > 0.0 {
            self.position.x += self.facing.sign() * self.horizontal_speed * dt;
        }

        let gravity = self.tuning.gravity();
        match self.vertical {
            Vertical::Jumping { elapsed } => {
                let elapsed = elapsed + dt;
                let thrust = -(gravity + self.jump_velocity) * self.tuning.jump_gravity_factor;
                if elapsed > self.tuning.jump_time_max {
                    self.vertical = Vertical::Falling;
                    report.jump_ended = true;
                } else {
                    self.vertical = Vertical::Jumping { elapsed };
                }
                self.integrate_fall(thrust, dt);
            }
            Vertical::Falling => self.integrate_fall(gravity, dt),
            Vertical::Grounded => self.fall_velocity = 0.0,
        }

        self.wrap_horizontally();

        // Below the world: dead, and pinned at the kill line until respawn.
        let kill_line = self.world_size.y + self.size.y;
        if self.position.y >= kill_line {
            self.dead = true;
        }
        if self.position.y > kill_line {
            self.position.y = kill_line;
        }
        report.died = self.dead && !was_dead;

        self.sync_clip();
        report
    }

    pub fn respawn(&mut self) {
        self.dead = false;
        self.moving = false;
        self.position = self.respawn_position;
    }

    fn integrate_fall(&mut self, acceleration: f32, dt: f32) {
        self.fall_velocity =
            (self.fall_velocity + acceleration * dt).min(self.tuning.fall_velocity_max);
        self.position.y += self.fall_velocity * dt;
    }

    /// The world is a cylinder along x: leaving one side by half a body width
    /// enters from the other.
    fn wrap_horizontally(&mut self) {
        let half_width = self.size.x / 2.0;
        if self.position.x < -half_width {
            self.position.x = self.world_size.x - half_width;
        } else if self.position.x > self.world_size.x - half_width {
            self.position.x = -half_width;
        }
    }

    fn sync_clip(&mut self) {
        let clip = self.clip();
        if clip != self.active_clip {
            log::trace!("Actor clip {} -> {}", self.active_clip, clip);
            self.active_clip = clip;
            self.animation.restart(self.clips.range(clip));
        }
    }
}
