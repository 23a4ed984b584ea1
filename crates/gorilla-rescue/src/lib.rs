//! Wrap-around rescue platformer built on `arcade-engine`.
//!
//! The player carries small gorillas to a home tile while chase enemies hunt
//! them. Everything runs headless; the host reads sounds and [`game::event_kinds`]
//! events from the runner after each frame.

pub mod config;
pub mod contact;
pub mod controls;
pub mod enemy;
pub mod events;
pub mod frame;
pub mod game;
pub mod gorilla;
pub mod home;
pub mod kinematics;
pub mod level;
pub mod player;
pub mod room;
pub mod spawn;

pub use config::{EnemyDefeat, EnemyTuning, GorillaTuning, HeldGorillaHit, PlayerTuning, RescueConfig};
pub use controls::{ControlMapper, Controls};
pub use enemy::{ChaseEnemy, EnemyState};
pub use events::{RunEvent, Signals};
pub use frame::Frame;
pub use game::{RescueGame, RunPhase};
pub use gorilla::{GorillaState, SmallGorilla};
pub use kinematics::{ContactMode, Mobile};
pub use level::{LevelDef, LevelError};
pub use player::Player;
pub use room::Room;
pub use spawn::{SpawnCoordinator, SpawnId};
