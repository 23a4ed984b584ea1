//! Small gorillas waiting to be carried home.
//!
//! A gorilla starts IDLE, rides on the player's head while HELD, and wanders
//! back and forth while LOST after being dropped. Saving one at home makes it
//! inert for the rest of the level.

use arcade_engine::{Body, EntityId, Rng, Scene, SceneEntity, Timer};
use glam::Vec2;

use crate::config::GorillaTuning;
use crate::frame::Frame;
use crate::kinematics::{ContactMode, Mobile};
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GorillaState {
    Idle,
    Held,
    Lost,
}

#[derive(Debug, Clone)]
pub struct SmallGorilla {
    id: EntityId,
    pub mobile: Mobile,
    tuning: GorillaTuning,
    state: GorillaState,
    contact: ContactMode,
    was_never_picked_up: bool,
    moving_while_lost: bool,
    collected_and_saved: bool,
    move_timer: Timer,
    pickup_cooldown: Timer,
}

impl SmallGorilla {
    pub fn new(id: EntityId, pos: Vec2, tuning: &GorillaTuning, rng: &mut Rng) -> Self {
        let mirror = rng.sign() > 0.0;
        let body = Body::new(pos, Vec2::from(tuning.size)).with_mirror(mirror);
        let mut gorilla = Self {
            id,
            mobile: Mobile::new(body, tuning.move_acceleration, tuning.max_speed),
            tuning: tuning.clone(),
            state: GorillaState::Idle,
            contact: ContactMode::Sensor,
            was_never_picked_up: true,
            moving_while_lost: true,
            collected_and_saved: false,
            move_timer: Timer::new(),
            pickup_cooldown: Timer::new(),
        };
        gorilla.enter_idle();
        gorilla
    }

    pub fn state(&self) -> GorillaState {
        self.state
    }

    pub fn pos(&self) -> Vec2 {
        self.mobile.pos()
    }

    pub fn size(&self) -> Vec2 {
        self.mobile.body.size
    }

    pub fn contact(&self) -> ContactMode {
        self.contact
    }

    /// Saved gorillas are handed in and no longer drawn.
    pub fn is_visible(&self) -> bool {
        !self.collected_and_saved
    }

    pub fn is_held(&self) -> bool {
        self.state == GorillaState::Held
    }

    pub fn is_moving_while_lost(&self) -> bool {
        self.moving_while_lost
    }

    pub fn is_collected_and_saved(&self) -> bool {
        self.collected_and_saved
    }

    pub fn can_pick_up(&self) -> bool {
        !self.collected_and_saved
            && !self.pickup_cooldown.active()
            && matches!(self.state, GorillaState::Idle | GorillaState::Lost)
    }

    /// Put the gorilla on the player's stack. The first pickup of a gorilla
    /// scores a bonus; later ones don't.
    pub fn pick_up(&mut self, player: &mut Player, frame: &mut Frame) -> bool {
        if !self.can_pick_up() || player.is_dead() {
            return false;
        }
        self.set_state(GorillaState::Held, player, frame);
        true
    }

    /// Knock the gorilla off the stack. No-op unless held.
    pub fn drop_from_player(&mut self, player: &mut Player, frame: &mut Frame) {
        if self.state == GorillaState::Held {
            self.set_state(GorillaState::Lost, player, frame);
        }
    }

    /// Knocked off the stack by an enemy. Unlike a plain drop, the player
    /// has to wait out a cooldown before grabbing it again.
    pub fn knock_loose(&mut self, player: &mut Player, frame: &mut Frame) {
        if self.state != GorillaState::Held {
            return;
        }
        self.set_state(GorillaState::Lost, player, frame);
        self.pickup_cooldown.set(self.tuning.knock_cooldown);
    }

    /// Hand the gorilla in at home. It stays put for the rest of the level.
    pub fn collect_and_save(&mut self, player: &mut Player, frame: &mut Frame) -> bool {
        if self.state != GorillaState::Held {
            log::warn!("gorilla {:?} saved while {:?}", self.id, self.state);
            return false;
        }
        self.set_state(GorillaState::Idle, player, frame);
        self.collected_and_saved = true;
        self.contact = ContactMode::Off;
        true
    }

    pub fn update(&mut self, frame: &mut Frame, player: Option<&Player>) {
        if self.collected_and_saved {
            return;
        }
        self.move_timer.tick(frame.dt);
        self.pickup_cooldown.tick(frame.dt);

        match self.state {
            GorillaState::Idle => {}
            GorillaState::Held => {
                let Some(player) = player else {
                    log::debug!("gorilla {:?} held with no player", self.id);
                    return;
                };
                self.follow(player);
                return;
            }
            GorillaState::Lost => {
                if !self.move_timer.active() {
                    self.move_timer.set(self.tuning.phase);
                    self.moving_while_lost = !self.moving_while_lost;
                    if self.moving_while_lost {
                        self.mobile.move_input.x = -self.mobile.move_input.x;
                    }
                }
                self.mobile.face_input();
            }
        }

        self.mobile.apply_gravity_profile(self.tuning.hover_gravity_scale);
        self.mobile.clamp_vertical(frame.physics.object_max_speed);
        self.mobile
            .apply_lower_bound(frame.lower_bound_y, self.mobile.body.size.y * 0.5);
        self.mobile.clear_jump_if_falling();
        self.mobile.accelerate();
        if self.state == GorillaState::Lost && !self.moving_while_lost {
            self.mobile.body.velocity.x = 0.0;
        }
        self.mobile.apply_drag();
        self.mobile.detect_ground(frame.tiles);
        frame.integrate(&mut self.mobile);
    }

    /// Ride on the player's head at this gorilla's slot in the stack.
    fn follow(&mut self, player: &Player) {
        let slot = player.held_slot(self.id).unwrap_or(0);
        let lift = player.stack_offset(slot);
        self.mobile.body.pos = player.pos() + Vec2::new(0.0, lift);
        self.mobile.body.mirror = player.mirror();
        self.mobile.freeze();
    }

    fn set_state(&mut self, next: GorillaState, player: &mut Player, frame: &mut Frame) {
        self.exit_state(player);
        self.state = next;
        match next {
            GorillaState::Idle => self.enter_idle(),
            GorillaState::Held => {
                self.mobile.move_input.x = 0.0;
                self.mobile.freeze();
                self.mobile.body.collide_tiles = false;
                self.contact = ContactMode::Solid;
                let first = std::mem::replace(&mut self.was_never_picked_up, false);
                player.add_gorilla(self.id, first, frame.signals);
            }
            GorillaState::Lost => {
                let jitter = self.tuning.speed_jitter;
                self.mobile.max_speed = self.tuning.max_speed + frame.rng.range(-jitter, jitter);
                let [first_min, first_max] = self.tuning.first_phase;
                self.move_timer.set(frame.rng.range(first_min, first_max));
                self.mobile.move_input.x = frame.rng.sign();
                self.moving_while_lost = true;
                self.contact = ContactMode::Solid;
            }
        }
    }

    /// Leaving HELD is the only way off the player's stack.
    fn exit_state(&mut self, player: &mut Player) {
        match self.state {
            GorillaState::Idle => {}
            GorillaState::Held => {
                player.remove_gorilla(self.id);
                self.mobile.body.collide_tiles = true;
            }
            GorillaState::Lost => {
                self.move_timer.unset();
                self.mobile.move_input.x = 0.0;
            }
        }
    }

    fn enter_idle(&mut self) {
        self.state = GorillaState::Idle;
        self.mobile.move_input.x = 0.0;
        self.contact = ContactMode::Sensor;
    }
}

impl SceneEntity for SmallGorilla {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// True once every gorilla in the level has been saved.
pub fn all_saved(gorillas: &Scene<SmallGorilla>) -> bool {
    gorillas.iter().all(SmallGorilla::is_collected_and_saved)
}
