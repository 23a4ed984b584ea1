//! The player.
//!
//! Behavior is a stack of modifiers rather than one state enum. Movement
//! always runs; death, saving and finished-level each override the motion
//! it produced when engaged. [`MODIFIER_ORDER`] fixes the order they apply.

use std::f32::consts::FRAC_PI_2;

use arcade_engine::{Body, EntityId, Scene, SceneEntity, Timer};
use glam::Vec2;

use crate::config::PlayerTuning;
use crate::controls::Controls;
use crate::enemy::ChaseEnemy;
use crate::events::{PopupStyle, ScorePopup, Signals, Sound};
use crate::frame::Frame;
use crate::gorilla::{self, SmallGorilla};
use crate::kinematics::Mobile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Movement,
    Death,
    Saving,
    FinishedLevel,
}

/// Apply order. Later modifiers see and override what earlier ones did.
pub const MODIFIER_ORDER: [Modifier; 4] = [
    Modifier::Movement,
    Modifier::Death,
    Modifier::Saving,
    Modifier::FinishedLevel,
];

const SAVE_POPUP_BASE: f32 = 0.25;
const SAVE_POPUP_STEP: f32 = 0.5;
const SAVE_POPUP_DURATION: f32 = 0.75;

#[derive(Debug, Clone)]
pub struct Player {
    id: EntityId,
    pub mobile: Mobile,
    tuning: PlayerTuning,
    coyote_timer: Timer,

    is_dead: bool,
    playing_death_animation: bool,
    is_respawning: bool,
    finished_level: bool,
    death_timer: Timer,
    death_spin_timer: Timer,

    held_gorillas: u32,
    /// Held gorillas in pickup order. Saving pops from the front.
    held: Vec<EntityId>,
    saved_index: usize,
    saving: bool,
    save_timer: Timer,

    action_pressed: bool,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2, tuning: &PlayerTuning) -> Self {
        let body = Body::new(pos, Vec2::from(tuning.size));
        Self {
            id,
            mobile: Mobile::new(body, tuning.move_acceleration, tuning.max_speed),
            tuning: tuning.clone(),
            coyote_timer: Timer::new(),
            is_dead: false,
            playing_death_animation: false,
            is_respawning: false,
            finished_level: false,
            death_timer: Timer::new(),
            death_spin_timer: Timer::new(),
            held_gorillas: 0,
            held: Vec::new(),
            saved_index: 0,
            saving: false,
            save_timer: Timer::new(),
            action_pressed: false,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.mobile.pos()
    }

    pub fn size(&self) -> Vec2 {
        self.mobile.body.size
    }

    pub fn mirror(&self) -> bool {
        self.mobile.body.mirror
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_respawning(&self) -> bool {
        self.is_respawning
    }

    pub fn finished_level(&self) -> bool {
        self.finished_level
    }

    pub fn can_move(&self) -> bool {
        !self.is_dead && !self.finished_level
    }

    pub fn is_visible(&self) -> bool {
        if self.is_dead {
            self.playing_death_animation
        } else {
            !self.finished_level
        }
    }

    /// Action was pressed during the last update while able to move.
    pub fn attack_requested(&self) -> bool {
        self.action_pressed
    }

    pub fn held_gorillas(&self) -> u32 {
        self.held_gorillas
    }

    pub fn held(&self) -> &[EntityId] {
        &self.held
    }

    /// Position of a gorilla in the stack, bottom first.
    pub fn held_slot(&self, id: EntityId) -> Option<usize> {
        self.held.iter().position(|&h| h == id)
    }

    /// Height above the player's center of the given stack slot.
    pub fn stack_offset(&self, slot: usize) -> f32 {
        self.tuning.stack_base_offset + slot as f32 * self.tuning.stack_spacing
    }

    pub fn add_gorilla(&mut self, id: EntityId, first_pickup: bool, signals: &mut Signals) {
        if first_pickup {
            signals.add_score(self.tuning.first_pickup_bonus);
        }
        if !self.held.contains(&id) {
            self.held.push(id);
            self.held_gorillas += 1;
        }
        signals.sound(Sound::Pickup);
    }

    pub fn remove_gorilla(&mut self, id: EntityId) {
        match self.held_slot(id) {
            Some(slot) => {
                self.held.remove(slot);
                self.held_gorillas = self.held_gorillas.saturating_sub(1);
            }
            None => log::debug!("gorilla {:?} was not on the stack", id),
        }
    }

    /// Start handing in every held gorilla. Enemies hold still until the
    /// last one is in. Returns false if already saving or empty-handed.
    pub fn save_held_gorillas(
        &mut self,
        gorillas: &Scene<SmallGorilla>,
        enemies: &mut Scene<ChaseEnemy>,
    ) -> bool {
        if self.saving || self.held_gorillas == 0 {
            return false;
        }
        self.saving = true;

        let held: Vec<EntityId> = self
            .held
            .iter()
            .copied()
            .filter(|&id| gorillas.get(id).is_some_and(SmallGorilla::is_held))
            .collect();
        if held.len() != self.held_gorillas as usize {
            log::warn!(
                "held count {} does not match {} gorillas on the stack",
                self.held_gorillas,
                held.len()
            );
        }
        self.held_gorillas = held.len() as u32;
        self.held = held;

        let pause = self.held_gorillas as f32 * self.tuning.save_interval;
        for enemy in enemies.iter_mut() {
            enemy.pause(pause);
        }
        self.saved_index = 0;
        self.save_timer.set(self.tuning.save_interval);
        log::debug!("saving {} gorillas", self.held_gorillas);
        true
    }

    /// Kill the player and scatter whatever it was carrying. Returns false
    /// if already dead.
    pub fn damage(&mut self, frame: &mut Frame, gorillas: &mut Scene<SmallGorilla>) -> bool {
        if self.is_dead {
            return false;
        }
        self.is_dead = true;
        for gorilla in gorillas.iter_mut() {
            if gorilla.is_held() {
                gorilla.drop_from_player(self, frame);
            }
        }
        self.held_gorillas = 0;
        self.held.clear();
        frame.signals.player_died();

        self.mobile.body.velocity.y = 0.0;
        self.playing_death_animation = true;
        self.death_timer.set(self.tuning.death_spin_duration);
        true
    }

    pub fn update(
        &mut self,
        controls: &Controls,
        frame: &mut Frame,
        gorillas: &mut Scene<SmallGorilla>,
    ) {
        for timer in [
            &mut self.coyote_timer,
            &mut self.death_timer,
            &mut self.death_spin_timer,
            &mut self.save_timer,
        ] {
            timer.tick(frame.dt);
        }
        self.action_pressed = controls.action && self.can_move();

        for modifier in MODIFIER_ORDER {
            if !self.engaged(modifier) {
                continue;
            }
            match modifier {
                Modifier::Movement => self.update_movement(controls, frame),
                Modifier::Death => self.update_death(frame),
                Modifier::Saving => self.update_saving(frame, gorillas),
                Modifier::FinishedLevel => self.mobile.freeze(),
            }
        }

        frame.integrate(&mut self.mobile);
    }

    fn engaged(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Movement => true,
            Modifier::Death => self.is_dead,
            Modifier::Saving => self.saving,
            Modifier::FinishedLevel => self.finished_level,
        }
    }

    fn update_movement(&mut self, controls: &Controls, frame: &mut Frame) {
        if self.can_move() {
            self.mobile.move_input = Vec2::new(controls.move_x, controls.move_y);
        }
        self.mobile.face_input();

        if self.can_move()
            && controls.jump
            && (self.mobile.on_ground || self.coyote_timer.active())
        {
            self.mobile.jump(self.tuning.jump_power);
            self.coyote_timer.unset();
        }

        self.mobile.apply_gravity_profile(self.tuning.hover_gravity_scale);
        self.mobile.clamp_vertical(frame.physics.object_max_speed);
        self.mobile
            .apply_lower_bound(frame.lower_bound_y, self.tuning.draw_half_height);
        self.mobile.clear_jump_if_falling();
        self.mobile.accelerate();
        self.mobile.apply_drag();

        let was_on_ground = self.mobile.on_ground;
        let on_ground = self.mobile.detect_ground(frame.tiles);
        if !on_ground && was_on_ground && !self.mobile.is_jumping {
            self.coyote_timer.set(self.tuning.coyote_time);
        }
    }

    fn update_death(&mut self, frame: &mut Frame) {
        self.mobile.body.velocity.x = 0.0;
        if !self.death_spin_timer.active() {
            self.death_spin_timer.set(self.tuning.death_spin_interval);
            self.mobile.body.angle += FRAC_PI_2 * self.mobile.body.facing();
        }
        if self.death_timer.active() {
            return;
        }
        if self.playing_death_animation {
            self.playing_death_animation = false;
            self.death_timer.set(self.tuning.death_pause);
        } else if !self.is_respawning {
            self.is_respawning = true;
            frame.signals.respawn_player();
        }
    }

    fn update_saving(&mut self, frame: &mut Frame, gorillas: &mut Scene<SmallGorilla>) {
        self.mobile.freeze();
        if self.save_timer.active() {
            return;
        }
        if self.held_gorillas > 0 {
            self.save_timer.set(self.tuning.save_interval);
            self.save_next(frame, gorillas);
        } else {
            self.saved_index = 0;
            self.held.clear();
            if gorilla::all_saved(gorillas) {
                self.finished_level = true;
                log::info!("every gorilla is home");
            }
            self.saving = false;
        }
    }

    fn save_next(&mut self, frame: &mut Frame, gorillas: &mut Scene<SmallGorilla>) {
        let Some(&id) = self.held.first() else {
            log::warn!("{} gorillas held but the stack is empty", self.held_gorillas);
            self.held_gorillas = 0;
            return;
        };
        let saved = gorillas
            .get_mut(id)
            .is_some_and(|gorilla| gorilla.collect_and_save(self, frame));
        if !saved {
            log::warn!("stack entry {:?} is not a held gorilla", id);
            self.remove_gorilla(id);
            return;
        }

        let tiers = &self.tuning.save_points;
        let points = tiers
            .get(self.saved_index)
            .or(tiers.last())
            .copied()
            .unwrap_or(0);
        frame.signals.add_score(points);
        frame.signals.sound(Sound::Collected);
        frame.signals.popup(ScorePopup {
            pos: self.pos(),
            offset: Vec2::new(0.0, SAVE_POPUP_BASE + SAVE_POPUP_STEP * self.saved_index as f32),
            points,
            style: PopupStyle::Saved,
            duration: SAVE_POPUP_DURATION,
        });
        self.saved_index += 1;
    }
}

impl SceneEntity for Player {
    fn id(&self) -> EntityId {
        self.id
    }
}
