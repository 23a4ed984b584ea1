//! Run configuration and per-entity tuning.
//!
//! Every number the entities use lives here so a host can override any of
//! them from JSON. Missing fields fall back to the arcade defaults.

use serde::Deserialize;

/// What happens when the player touches a live enemy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyDefeat {
    /// Enemies can't be hurt by the player; touching one kills the player.
    #[default]
    Never,
    /// Touching a damageable enemy knocks it out instead.
    OnContact,
    /// The action button strikes enemies in front of the player.
    OnAttack,
}

/// What happens when an enemy touches a gorilla the player is carrying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeldGorillaHit {
    #[default]
    Ignore,
    /// The gorilla is knocked off the stack and runs around lost.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub move_acceleration: f32,
    pub max_speed: f32,
    pub size: [f32; 2],
    /// Half the drawn height, used against the lower bound.
    pub draw_half_height: f32,
    pub jump_power: f32,
    pub coyote_time: f32,
    pub hover_gravity_scale: f32,
    pub death_spin_interval: f32,
    pub death_spin_duration: f32,
    pub death_pause: f32,
    /// Gap between consecutive gorilla saves.
    pub save_interval: f32,
    pub first_pickup_bonus: u32,
    /// Points for the n-th gorilla saved in one visit home.
    pub save_points: Vec<u32>,
    pub stack_base_offset: f32,
    pub stack_spacing: f32,
    pub attack_reach: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_acceleration: 0.0625,
            max_speed: 0.125,
            size: [1.5, 0.75],
            draw_half_height: 1.0,
            jump_power: 0.4375,
            coyote_time: 0.2,
            hover_gravity_scale: 0.5,
            death_spin_interval: 0.075,
            death_spin_duration: 1.5,
            death_pause: 1.25,
            save_interval: 0.1,
            first_pickup_bonus: 10,
            save_points: vec![100, 200, 300, 400, 500, 1000, 2000, 5000],
            stack_base_offset: 0.5625,
            stack_spacing: 0.25,
            attack_reach: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub points: u32,
    pub move_acceleration: f32,
    pub chase_max_speed: f32,
    pub jump_max_speed: f32,
    pub high_jump_power: f32,
    pub low_jump_power: f32,
    pub size: [f32; 2],
    pub draw_half_height: f32,
    pub hover_gravity_scale: f32,
    /// Length of the horizontal wall probe.
    pub wall_probe: f32,
    /// Forward offset of the downward gap probe.
    pub gap_probe_offset: f32,
    /// Time a jump decision waits after entering JUMP.
    pub jump_windup: f32,
    pub spawn_duration: f32,
    pub hide_duration: f32,
    pub death_max_speed: f32,
    pub death_duration: f32,
    pub death_spin_base: f32,
    pub death_spin_reference_speed: f32,
    pub death_speed_decay: f32,
    pub queue_remove_delay: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            points: 200,
            move_acceleration: 0.0625,
            chase_max_speed: 0.09,
            jump_max_speed: 0.26,
            high_jump_power: 0.4375,
            low_jump_power: 0.225,
            size: [1.5, 0.75],
            draw_half_height: 0.5,
            hover_gravity_scale: 0.65,
            wall_probe: 1.25,
            gap_probe_offset: 0.25,
            jump_windup: 1.0,
            spawn_duration: 2.0,
            hide_duration: 1.0,
            death_max_speed: 0.25,
            death_duration: 2.5,
            death_spin_base: 0.15,
            death_spin_reference_speed: 0.35,
            death_speed_decay: 0.965,
            queue_remove_delay: 1.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GorillaTuning {
    pub move_acceleration: f32,
    pub max_speed: f32,
    /// Lost gorillas run at `max_speed` plus or minus this.
    pub speed_jitter: f32,
    pub size: [f32; 2],
    pub hover_gravity_scale: f32,
    /// Range of the first lost-wander phase.
    pub first_phase: [f32; 2],
    pub phase: f32,
    /// A gorilla knocked off the stack can't be grabbed again for this long.
    pub knock_cooldown: f32,
}

impl Default for GorillaTuning {
    fn default() -> Self {
        Self {
            move_acceleration: 0.0625,
            max_speed: 0.075,
            speed_jitter: 0.015,
            size: [1.0, 1.0],
            hover_gravity_scale: 0.65,
            first_phase: [0.9, 1.2],
            phase: 1.0,
            knock_cooldown: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RescueConfig {
    pub starting_lives: u32,
    pub starting_high_score: u32,
    pub enemy_respawn_delay: f32,
    pub level_clear_delay: f32,
    /// Nothing falls below this line.
    pub lower_bound_y: f32,
    pub seed: u64,
    pub enemy_defeat: EnemyDefeat,
    pub held_gorilla_hit: HeldGorillaHit,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub gorilla: GorillaTuning,
}

impl Default for RescueConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            starting_high_score: 1_000_000,
            enemy_respawn_delay: 3.0,
            level_clear_delay: 3.0,
            lower_bound_y: -16.0,
            seed: 0x6A09_E667_F3BC_C908,
            enemy_defeat: EnemyDefeat::default(),
            held_gorilla_hit: HeldGorillaHit::default(),
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            gorilla: GorillaTuning::default(),
        }
    }
}

impl RescueConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
