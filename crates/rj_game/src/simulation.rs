//! One frame of game simulation, in a fixed order:
//!
//!   1. quit / pause handling
//!   2. player intent from input
//!   3. zoom and free-camera controls
//!   4. ground probe for every actor
//!   5. `Actor::advance`
//!   6. deaths and respawns
//!   7. NPC reactions to the player
//!   8. camera follow and clamp
//!
//! Sounds are not played here. `step` returns the transitions as `SimEvent`s
//! and the audio layer decides what to do with them.

use glam::Vec2;
use rj_core::animation::ClipTable;
use rj_core::input::{InputState, Key};
use rj_render::{Camera2D, DrawRequest};

use crate::actor::{Actor, Facing, Intent};
use crate::config::GameConfig;
use crate::level::Level;
use crate::tilemap::TileMap;

/// Index of the player in `SimulationState::actors`.
pub const PLAYER: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Jumped { actor: usize },
    /// The player fell out of the world.
    Died { actor: usize },
    /// An NPC fell out of the world and was put back.
    Impact { actor: usize },
    Respawned { actor: usize },
    Paused,
    Resumed,
}

pub struct SimulationState {
    pub map: TileMap,
    pub actors: Vec<Actor>,
    pub camera: Camera2D,
    pub paused: bool,
    pub quit_requested: bool,
    pub respawn_delay: f32,
    /// Seconds since the player died, while waiting to respawn.
    death_timer: Option<f32>,
}

impl SimulationState {
    pub fn new(level: Level, config: &GameConfig, clips: ClipTable) -> Self {
        let world_size = level.map.world_size();
        let map = level.map;
        let actors = level
            .spawns
            .iter()
            .map(|spawn| {
                let mut actor = Actor::new(
                    Vec2::new(spawn.x, spawn.y),
                    world_size,
                    config.actor,
                    clips,
                );
                actor.frame_y_offset = spawn.frame_y_offset;
                actor.set_ground_contact(map.ground_contact(actor.position, actor.size));
                actor
            })
            .collect();

        let mut camera = Camera2D::new(config.viewport_width, config.viewport_height, config.zoom);
        camera.free_speed = config.free_camera_speed;

        let mut state = Self {
            map,
            actors,
            camera,
            paused: false,
            quit_requested: false,
            respawn_delay: config.respawn_delay,
            death_timer: None,
        };
        state.update_camera();
        state
    }

    pub fn player(&self) -> &Actor {
        &self.actors[PLAYER]
    }

    pub fn step(&mut self, input: &InputState, dt: f32) -> Vec<SimEvent> {
        let mut events = Vec::new();

        if input.is_held(Key::Q) {
            self.quit_requested = true;
            return events;
        }
        self.handle_pause(input, &mut events);
        if self.paused {
            return events;
        }

        if self.actors[PLAYER].apply_intent(player_intent(input)) {
            events.push(SimEvent::Jumped { actor: PLAYER });
        }
        self.handle_camera_controls(input, dt);

        for actor in &mut self.actors {
            let on_ground = self.map.ground_contact(actor.position, actor.size);
            actor.set_ground_contact(on_ground);
        }
        for (i, actor) in self.actors.iter_mut().enumerate() {
            let report = actor.advance(dt);
            if report.jump_ended {
                log::trace!("Actor {i} jump window closed");
            }
            if report.died {
                log::debug!("Actor {i} fell out of the world");
            }
        }

        self.handle_deaths(dt, &mut events);
        self.npc_proximity();
        self.update_camera();
        events
    }

    /// Sprite draw requests for every actor, relative to the camera.
    pub fn draw_requests(&self) -> Vec<DrawRequest> {
        self.actors
            .iter()
            .map(|actor| {
                DrawRequest::for_sprite(
                    actor.animation.frame,
                    actor.frame_y_offset,
                    actor.size,
                    actor.position,
                    self.camera.position,
                    actor.facing == Facing::Left,
                )
            })
            .collect()
    }

    fn handle_pause(&mut self, input: &InputState, events: &mut Vec<SimEvent>) {
        if input.is_just_pressed(Key::Escape) {
            if !self.paused {
                log::info!("Paused");
                events.push(SimEvent::Paused);
            }
            self.paused = true;
        } else if input.is_just_pressed(Key::Space) && self.paused {
            log::info!("Resumed");
            events.push(SimEvent::Resumed);
            self.paused = false;
        }
    }

    fn handle_camera_controls(&mut self, input: &InputState, dt: f32) {
        if input.is_just_pressed(Key::Num1) {
            self.camera.reset_zoom();
        }
        let zoom_delta = match (input.is_held(Key::Num2), input.is_held(Key::Num3)) {
            (true, false) => -dt,
            (false, true) => dt,
            _ => 0.0,
        };
        if zoom_delta != 0.0 {
            if let Err(err) = self.camera.adjust_zoom(zoom_delta) {
                log::warn!("Zoom change ignored: {err}");
            }
        }

        self.camera.free = input.is_held(Key::F);
        if self.camera.free {
            let mut direction = Vec2::ZERO;
            if input.is_held(Key::Up) {
                direction.y -= 1.0;
            }
            if input.is_held(Key::Down) {
                direction.y += 1.0;
            }
            if input.is_held(Key::Left) {
                direction.x -= 1.0;
            }
            if input.is_held(Key::Right) {
                direction.x += 1.0;
            }
            self.camera.pan(direction, dt);
        }
    }

    /// NPCs respawn on the spot. The player's death freezes nothing but
    /// starts a timer; when it runs out the whole cast respawns.
    fn handle_deaths(&mut self, dt: f32, events: &mut Vec<SimEvent>) {
        for (i, actor) in self.actors.iter_mut().enumerate().skip(1) {
            if actor.dead {
                events.push(SimEvent::Impact { actor: i });
                actor.respawn();
                events.push(SimEvent::Respawned { actor: i });
            }
        }

        if !self.actors[PLAYER].dead {
            return;
        }
        let elapsed = match self.death_timer {
            None => {
                log::info!("Player died");
                events.push(SimEvent::Died { actor: PLAYER });
                dt
            }
            Some(elapsed) => elapsed + dt,
        };
        if elapsed > self.respawn_delay {
            for (i, actor) in self.actors.iter_mut().enumerate() {
                actor.respawn();
                events.push(SimEvent::Respawned { actor: i });
            }
            self.death_timer = None;
        } else {
            self.death_timer = Some(elapsed);
        }
    }

    /// An NPC the player bumps into turns away from the player and walks off.
    fn npc_proximity(&mut self) {
        let (player, npcs) = self.actors.split_at_mut(1);
        let player = &player[PLAYER];
        let player_box = player.bounding_box();
        for npc in npcs {
            if player_box.intersects(&npc.bounding_box()) {
                npc.facing = if player.position.x > npc.position.x {
                    Facing::Left
                } else {
                    Facing::Right
                };
                npc.moving = true;
            }
        }
    }

    fn update_camera(&mut self) {
        let player = &self.actors[PLAYER];
        self.camera
            .follow(player.position, player.size, self.map.world_size());
    }
}

/// Map held keys to the player's intent. `D` wins over `A` when both are down.
pub fn player_intent(input: &InputState) -> Intent {
    let direction = if input.is_held(Key::D) {
        Some(Facing::Right)
    } else if input.is_held(Key::A) {
        Some(Facing::Left)
    } else {
        None
    };
    Intent {
        direction,
        run: input.is_held(Key::LShift),
        jump: input.is_held(Key::Space),
    }
}
