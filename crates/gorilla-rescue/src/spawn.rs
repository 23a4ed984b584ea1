//! Enemy spawn points.
//!
//! Every enemy remembers the point it came from. When one dies the game asks
//! the coordinator for a replacement at the same point; when the player
//! respawns every point is repopulated with its level delay.

use arcade_engine::{EngineContext, EntityId, Scene};
use glam::Vec2;

use crate::config::EnemyTuning;
use crate::enemy::ChaseEnemy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpawnId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub id: SpawnId,
    pub pos: Vec2,
    /// Spawn time used when the level (re)starts.
    pub delay: f32,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnCoordinator {
    points: Vec<SpawnPoint>,
    respawn_delay: f32,
}

impl SpawnCoordinator {
    pub fn new(respawn_delay: f32) -> Self {
        Self {
            points: Vec::new(),
            respawn_delay,
        }
    }

    pub fn register(&mut self, pos: Vec2, delay: f32) -> SpawnId {
        let id = SpawnId(self.points.len() as u32);
        self.points.push(SpawnPoint { id, pos, delay });
        id
    }

    pub fn point(&self, id: SpawnId) -> Option<&SpawnPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn points(&self) -> &[SpawnPoint] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// One fresh enemy per point, each with that point's delay.
    pub fn spawn_all(
        &self,
        ctx: &mut EngineContext,
        enemies: &mut Scene<ChaseEnemy>,
        tuning: &EnemyTuning,
    ) -> usize {
        for point in &self.points {
            let mut enemy = ChaseEnemy::new(ctx.next_id(), point.id, point.pos, tuning);
            enemy.set_spawn_time(point.delay);
            enemies.spawn(enemy);
        }
        self.points.len()
    }

    /// A replacement for an enemy that died, at the same point.
    pub fn respawn(&self, spawn_id: SpawnId, id: EntityId, tuning: &EnemyTuning) -> Option<ChaseEnemy> {
        let Some(point) = self.point(spawn_id) else {
            log::warn!("no spawn point {:?} to respawn at", spawn_id);
            return None;
        };
        let mut enemy = ChaseEnemy::new(id, point.id, point.pos, tuning);
        enemy.set_spawn_time(self.respawn_delay);
        Some(enemy)
    }
}
