//! Chasing enemy.
//!
//! ```text
//! SPAWNING --timer--> CHASE <--landed / player behind-- JUMP
//!                       |  --wall or gap ahead-->        |
//!                       +--------- damage ---------> DEAD --timer--> removed, respawn requested
//! any state --queue_remove--> QUEUE_REMOVE --timer--> removed
//! ```

use std::f32::consts::FRAC_PI_2;

use arcade_engine::{Body, EntityId, SceneEntity, Timer};
use glam::Vec2;

use crate::config::EnemyTuning;
use crate::events::{PopupStyle, ScorePopup};
use crate::frame::Frame;
use crate::kinematics::{ContactMode, Mobile};
use crate::player::Player;
use crate::room::side;
use crate::spawn::SpawnId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Spawning,
    Chase,
    Jump,
    Dead,
    QueueRemove,
}

const POPUP_OFFSET: Vec2 = Vec2::new(0.0, 1.0);
const POPUP_DURATION: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct ChaseEnemy {
    id: EntityId,
    spawn_id: SpawnId,
    pub mobile: Mobile,
    tuning: EnemyTuning,
    state: EnemyState,
    contact: ContactMode,
    hidden: bool,
    paused: bool,
    destroyed: bool,
    pause_timer: Timer,
    spawning_timer: Timer,
    hiding_timer: Timer,
    jump_timer: Timer,
    death_timer: Timer,
    death_spin_timer: Timer,
    queue_remove_timer: Timer,
}

impl ChaseEnemy {
    /// A fresh enemy, hidden and spawning.
    pub fn new(id: EntityId, spawn_id: SpawnId, pos: Vec2, tuning: &EnemyTuning) -> Self {
        let body = Body::new(pos, Vec2::from(tuning.size));
        let mut enemy = Self {
            id,
            spawn_id,
            mobile: Mobile::new(body, tuning.move_acceleration, tuning.chase_max_speed),
            tuning: tuning.clone(),
            state: EnemyState::Spawning,
            contact: ContactMode::Off,
            hidden: true,
            paused: false,
            destroyed: false,
            pause_timer: Timer::new(),
            spawning_timer: Timer::new(),
            hiding_timer: Timer::new(),
            jump_timer: Timer::new(),
            death_timer: Timer::new(),
            death_spin_timer: Timer::new(),
            queue_remove_timer: Timer::new(),
        };
        enemy.enter_state(EnemyState::Spawning);
        enemy
    }

    pub fn spawn_id(&self) -> SpawnId {
        self.spawn_id
    }

    pub fn state(&self) -> EnemyState {
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

    pub fn is_visible(&self) -> bool {
        !self.hidden && !self.destroyed
    }

    pub fn is_alive(&self) -> bool {
        !self.destroyed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn can_take_damage(&self) -> bool {
        !self.destroyed && matches!(self.state, EnemyState::Chase | EnemyState::Jump)
    }

    /// Restart the spawn countdown. The enemy turns visible one second
    /// before it starts chasing.
    pub fn set_spawn_time(&mut self, seconds: f32) {
        self.spawning_timer.set(seconds);
        self.hiding_timer.set(seconds - 1.0);
    }

    /// Freeze all update logic for `seconds`. Timers don't advance meanwhile.
    pub fn pause(&mut self, seconds: f32) {
        self.paused = true;
        self.pause_timer.set(seconds);
    }

    /// Knock the enemy out. Returns false if it can't be damaged right now.
    pub fn damage(&mut self, frame: &mut Frame, player: Option<&Player>) -> bool {
        if !self.can_take_damage() {
            return false;
        }
        self.enter_state(EnemyState::Dead);

        let pos = self.pos();
        let toward = player
            .map(|p| frame.room.direction_to(pos.x, p.pos().x))
            .unwrap_or_else(|| self.mobile.heading());
        self.mobile.move_input.x = -toward;
        self.mobile.body.velocity.x = self.mobile.move_input.x * self.mobile.max_speed;

        frame.signals.popup(ScorePopup {
            pos,
            offset: POPUP_OFFSET,
            points: self.tuning.points,
            style: PopupStyle::Plain,
            duration: POPUP_DURATION,
        });
        frame.signals.add_score(self.tuning.points);
        log::debug!("enemy {:?} defeated", self.id);
        true
    }

    /// Take the enemy out quietly. No respawn is requested when it goes.
    pub fn queue_remove(&mut self) {
        if self.destroyed || self.state == EnemyState::QueueRemove {
            return;
        }
        self.enter_state(EnemyState::QueueRemove);
    }

    pub fn update(&mut self, frame: &mut Frame, player: Option<&Player>) {
        if self.destroyed {
            return;
        }
        if self.paused {
            self.pause_timer.tick(frame.dt);
            if self.pause_timer.active() {
                return;
            }
            self.paused = false;
        }
        self.tick_timers(frame.dt);

        match self.state {
            EnemyState::Spawning => self.update_spawning(frame, player),
            EnemyState::Chase => self.update_chase(frame, player),
            EnemyState::Jump => self.update_jump(frame, player),
            EnemyState::Dead => self.update_dead(frame),
            EnemyState::QueueRemove => {}
        }
        if self.destroyed {
            return;
        }

        self.mobile.face_input();
        self.mobile.apply_gravity_profile(self.tuning.hover_gravity_scale);
        self.mobile.clamp_vertical(frame.physics.object_max_speed);
        self.mobile
            .apply_lower_bound(frame.lower_bound_y, self.tuning.draw_half_height);
        self.mobile.clear_jump_if_falling();
        self.mobile.accelerate();
        if self.state == EnemyState::Dead {
            self.mobile.max_speed *= self.tuning.death_speed_decay;
        } else {
            self.mobile.apply_drag();
        }

        if self.state == EnemyState::QueueRemove {
            self.mobile.freeze();
            if !self.queue_remove_timer.active() {
                self.destroy();
                return;
            }
        }

        let grounded = self.mobile.detect_ground(frame.tiles);
        if self.state == EnemyState::Jump
            && grounded
            && !self.mobile.is_jumping
            && !self.jump_timer.active()
        {
            self.enter_state(EnemyState::Chase);
        }

        frame.integrate(&mut self.mobile);
    }

    fn tick_timers(&mut self, dt: f32) {
        for timer in [
            &mut self.spawning_timer,
            &mut self.hiding_timer,
            &mut self.jump_timer,
            &mut self.death_timer,
            &mut self.death_spin_timer,
            &mut self.queue_remove_timer,
        ] {
            timer.tick(dt);
        }
    }

    fn update_spawning(&mut self, frame: &mut Frame, player: Option<&Player>) {
        self.mobile.move_input.x = 0.0;
        self.mobile.body.velocity.x = 0.0;
        if !self.hiding_timer.active() {
            self.hidden = false;
        }
        if self.spawning_timer.active() {
            return;
        }
        let Some(player) = player else {
            log::debug!("enemy {:?} waiting for a player to chase", self.id);
            return;
        };
        self.mobile.move_input.x = frame.room.direction_to(self.pos().x, player.pos().x);
        self.enter_state(EnemyState::Chase);
    }

    fn update_chase(&mut self, frame: &mut Frame, player: Option<&Player>) {
        if player.is_none() {
            log::debug!("enemy {:?} has nobody to chase", self.id);
            return;
        }
        if self.mobile.is_jumping || !self.mobile.on_ground {
            return;
        }
        let dir = self.mobile.heading();
        let pos = self.pos();
        let wall_ahead = frame
            .tiles
            .cast(pos, pos + Vec2::new(self.tuning.wall_probe * dir, 0.0));
        let probe = pos + Vec2::new(self.tuning.gap_probe_offset * dir, 0.0);
        let gap_ahead = !frame.tiles.cast(probe, probe + Vec2::new(0.0, -1.0));
        if wall_ahead || gap_ahead {
            self.enter_state(EnemyState::Jump);
        }
    }

    fn update_jump(&mut self, frame: &mut Frame, player: Option<&Player>) {
        if self.jump_timer.active() {
            self.mobile.move_input.x = 0.0;
            return;
        }
        self.mobile.move_input.x = self.mobile.body.facing();
        if self.mobile.is_jumping || !self.mobile.on_ground {
            return;
        }
        let Some(player) = player else {
            log::debug!("enemy {:?} lost track of the player mid-jump", self.id);
            return;
        };

        let pos = self.pos();
        let target = player.pos();
        if target.y > pos.y {
            self.mobile.jump(self.tuning.high_jump_power);
        } else if target.y < pos.y {
            self.mobile.jump(self.tuning.low_jump_power);
        } else {
            let dir = frame.room.direction_to(pos.x, target.x);
            let probe_dir = side(dir);
            let wall_ahead = frame
                .tiles
                .cast(pos, pos + Vec2::new(self.tuning.wall_probe * probe_dir, 0.0));
            let facing_player =
                (dir < 0.0 && self.mobile.body.mirror) || (dir > 0.0 && !self.mobile.body.mirror);
            if wall_ahead || facing_player {
                self.mobile.jump(self.tuning.high_jump_power);
            } else {
                self.mobile.move_input.x = dir;
                self.enter_state(EnemyState::Chase);
            }
        }
    }

    fn update_dead(&mut self, frame: &mut Frame) {
        if !self.death_spin_timer.active() {
            let speed_ratio = self.mobile.max_speed / self.tuning.death_spin_reference_speed;
            self.death_spin_timer
                .set(self.tuning.death_spin_base * (1.0 - speed_ratio));
            self.mobile.body.angle += FRAC_PI_2 * self.mobile.body.facing();
        }
        if !self.death_timer.active() {
            frame.signals.enemy_died(self.spawn_id);
            self.destroy();
        }
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.contact = ContactMode::Off;
        log::trace!("enemy {:?} removed", self.id);
    }

    fn enter_state(&mut self, next: EnemyState) {
        self.exit_state();
        self.state = next;
        match next {
            EnemyState::Spawning => {
                self.spawning_timer.set(self.tuning.spawn_duration);
                self.hiding_timer.set(self.tuning.hide_duration);
                self.hidden = true;
                self.contact = ContactMode::Off;
            }
            EnemyState::Chase => {
                self.mobile.max_speed = self.tuning.chase_max_speed;
                self.hidden = false;
                self.contact = ContactMode::Solid;
            }
            EnemyState::Jump => {
                self.jump_timer.set(self.tuning.jump_windup);
                self.mobile.max_speed = self.tuning.jump_max_speed;
            }
            EnemyState::Dead => {
                self.mobile.max_speed = self.tuning.death_max_speed;
                self.death_timer.set(self.tuning.death_duration);
                self.death_spin_timer.unset();
                self.contact = ContactMode::Sensor;
            }
            EnemyState::QueueRemove => {
                self.queue_remove_timer.set(self.tuning.queue_remove_delay);
                self.mobile.freeze();
                self.mobile.body.collide_tiles = false;
                self.contact = ContactMode::Off;
            }
        }
    }

    fn exit_state(&mut self) {
        match self.state {
            EnemyState::Spawning => {
                self.spawning_timer.unset();
                self.hiding_timer.unset();
            }
            EnemyState::Jump => self.jump_timer.unset(),
            EnemyState::Dead => {
                self.death_timer.unset();
                self.death_spin_timer.unset();
            }
            EnemyState::QueueRemove => self.queue_remove_timer.unset(),
            EnemyState::Chase => {}
        }
    }
}

impl SceneEntity for ChaseEnemy {
    fn id(&self) -> EntityId {
        self.id
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
