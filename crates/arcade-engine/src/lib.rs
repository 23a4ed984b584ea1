pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod input;
pub mod runner;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, SoundEvent, GameEvent};
pub use assets::tiled::{MapError, TiledLayer, TiledMap, TiledObject};
pub use components::body::Body;
pub use components::tilemap::TileCollision;
pub use core::physics::{step_body, PhysicsSettings, StepOutcome};
pub use core::rng::Rng;
pub use core::scene::{Scene, SceneEntity};
pub use core::time::{FixedTimestep, Timer};
pub use input::keyboard::KeyboardState;
pub use input::queue::{InputEvent, InputQueue};
pub use runner::GameRunner;
