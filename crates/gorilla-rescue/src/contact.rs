//! Overlap checks between entities, run once per update after everything
//! has moved.

use arcade_engine::Scene;
use glam::Vec2;

use crate::config::{EnemyDefeat, HeldGorillaHit};
use crate::enemy::ChaseEnemy;
use crate::frame::Frame;
use crate::gorilla::SmallGorilla;
use crate::home::Home;
use crate::kinematics::ContactMode;
use crate::player::Player;
use crate::room::Room;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPolicy {
    pub enemy_defeat: EnemyDefeat,
    pub held_gorilla_hit: HeldGorillaHit,
    pub attack_reach: f32,
}

/// Box overlap measured the short way around the room. Touching edges
/// don't count.
pub fn overlaps(room: &Room, a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    let dx = room.distance(a_pos.x, b_pos.x);
    let dy = (a_pos.y - b_pos.y).abs();
    dx < (a_size.x + b_size.x) * 0.5 && dy < (a_size.y + b_size.y) * 0.5
}

pub fn resolve(
    player: Option<&mut Player>,
    enemies: &mut Scene<ChaseEnemy>,
    gorillas: &mut Scene<SmallGorilla>,
    homes: &[Home],
    policy: &ContactPolicy,
    frame: &mut Frame,
) {
    let Some(player) = player else {
        return;
    };
    if player.is_dead() {
        return;
    }

    if policy.enemy_defeat == EnemyDefeat::OnAttack && player.attack_requested() {
        strike(player, enemies, policy.attack_reach, frame);
    }

    for enemy in enemies.iter_mut() {
        if enemy.contact() != ContactMode::Solid
            || !overlaps(&frame.room, player.pos(), player.size(), enemy.pos(), enemy.size())
        {
            continue;
        }
        if policy.enemy_defeat == EnemyDefeat::OnContact && enemy.can_take_damage() {
            enemy.damage(frame, Some(&*player));
        } else {
            player.damage(frame, gorillas);
            return;
        }
    }

    if policy.held_gorilla_hit == HeldGorillaHit::Drop {
        for gorilla in gorillas.iter_mut().filter(|g| g.is_held()) {
            let hit = enemies.iter().any(|enemy| {
                enemy.contact() == ContactMode::Solid
                    && overlaps(&frame.room, gorilla.pos(), gorilla.size(), enemy.pos(), enemy.size())
            });
            if hit {
                log::debug!("enemy knocked a gorilla off the stack");
                gorilla.knock_loose(player, frame);
            }
        }
    }

    for gorilla in gorillas.iter_mut() {
        if gorilla.can_pick_up()
            && overlaps(&frame.room, player.pos(), player.size(), gorilla.pos(), gorilla.size())
        {
            gorilla.pick_up(player, frame);
        }
    }

    if player.is_saving() {
        return;
    }
    let at_home = homes
        .iter()
        .any(|home| overlaps(&frame.room, player.pos(), player.size(), home.pos(), home.size()));
    if at_home {
        player.save_held_gorillas(gorillas, enemies);
    }
}

/// Damage every enemy within reach in front of the player.
fn strike(player: &Player, enemies: &mut Scene<ChaseEnemy>, reach: f32, frame: &mut Frame) {
    let facing = player.mobile.body.facing();
    for enemy in enemies.iter_mut().filter(|e| e.can_take_damage()) {
        let ahead = frame.room.delta(player.pos().x, enemy.pos().x) * facing;
        let dy = (player.pos().y - enemy.pos().y).abs();
        if ahead > 0.0 && ahead <= reach && dy < (player.size().y + enemy.size().y) * 0.5 {
            enemy.damage(frame, Some(player));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyTuning, GorillaTuning, PlayerTuning};
    use crate::controls::Controls;
    use crate::enemy::EnemyState;
    use crate::gorilla::GorillaState;
    use crate::frame::TestWorld;
    use crate::spawn::SpawnId;
    use arcade_engine::EntityId;

    const REST_Y: f32 = 1.375;

    fn policy(enemy_defeat: EnemyDefeat, held_gorilla_hit: HeldGorillaHit) -> ContactPolicy {
        ContactPolicy {
            enemy_defeat,
            held_gorilla_hit,
            attack_reach: 1.5,
        }
    }

    fn player_at(x: f32) -> Player {
        Player::new(EntityId(1), Vec2::new(x, REST_Y), &PlayerTuning::default())
    }

    /// An enemy already chasing, standing at `x`.
    fn enemy_at(world: &mut TestWorld, x: f32, target: &Player) -> ChaseEnemy {
        let mut enemy = ChaseEnemy::new(
            EntityId(20),
            SpawnId(0),
            Vec2::new(x, REST_Y),
            &EnemyTuning::default(),
        );
        enemy.set_spawn_time(0.0);
        enemy.update(&mut world.frame(), Some(target));
        assert_eq!(enemy.state(), EnemyState::Chase);
        enemy.mobile.body.pos.x = x;
        enemy
    }

    fn scene_of(enemy: ChaseEnemy) -> Scene<ChaseEnemy> {
        let mut scene = Scene::new();
        scene.spawn(enemy);
        scene
    }

    #[test]
    fn overlap_across_the_edge() {
        let room = Room::new(16.0);
        let size = Vec2::new(1.5, 0.75);
        assert!(overlaps(&room, Vec2::new(0.2, 1.0), size, Vec2::new(15.8, 1.0), size));
        assert!(!overlaps(&room, Vec2::new(2.0, 1.0), size, Vec2::new(14.0, 1.0), size));
        // Edges touching exactly.
        assert!(!overlaps(&room, Vec2::new(4.0, 1.0), size, Vec2::new(5.5, 1.0), size));
    }

    #[test]
    fn enemy_contact_kills_the_player_by_default() {
        let mut world = TestWorld::floor();
        let mut player = player_at(4.0);
        let mut enemies = scene_of(enemy_at(&mut world, 4.5, &player));
        let mut gorillas = Scene::new();
        resolve(
            Some(&mut player),
            &mut enemies,
            &mut gorillas,
            &[],
            &policy(EnemyDefeat::Never, HeldGorillaHit::Ignore),
            &mut world.frame(),
        );
        assert!(player.is_dead());
        assert!(enemies.iter().all(|e| e.state() == EnemyState::Chase));
    }

    #[test]
    fn spawning_enemy_is_harmless() {
        let mut world = TestWorld::floor();
        let mut player = player_at(4.0);
        let spawning = ChaseEnemy::new(
            EntityId(20),
            SpawnId(0),
            Vec2::new(4.5, REST_Y),
            &EnemyTuning::default(),
        );
        let mut enemies = scene_of(spawning);
        resolve(
            Some(&mut player),
            &mut enemies,
            &mut Scene::new(),
            &[],
            &policy(EnemyDefeat::Never, HeldGorillaHit::Ignore),
            &mut world.frame(),
        );
        assert!(!player.is_dead());
    }

    #[test]
    fn contact_policy_defeats_the_enemy() {
        let mut world = TestWorld::floor();
        let mut player = player_at(4.0);
        let mut enemies = scene_of(enemy_at(&mut world, 4.5, &player));
        world.signals.drain();
        resolve(
            Some(&mut player),
            &mut enemies,
            &mut Scene::new(),
            &[],
            &policy(EnemyDefeat::OnContact, HeldGorillaHit::Ignore),
            &mut world.frame(),
        );
        assert!(!player.is_dead());
        assert!(enemies.iter().all(|e| e.state() == EnemyState::Dead));
        assert_eq!(world.signals.scores(), vec![200]);
    }

    #[test]
    fn attack_hits_only_in_front() {
        let mut world = TestWorld::floor();
        let mut player = player_at(4.0);
        let mut gorillas = Scene::new();
        let attack = Controls {
            action: true,
            ..Controls::default()
        };
        player.update(&attack, &mut world.frame(), &mut gorillas);
        assert!(player.attack_requested());
        assert!(!player.mirror());

        // Exactly one body width away on either side: in reach, not touching.
        let mut ahead = scene_of(enemy_at(&mut world, 5.5, &player));
        let mut behind = scene_of(enemy_at(&mut world, 2.5, &player));
        let p = policy(EnemyDefeat::OnAttack, HeldGorillaHit::Ignore);

        resolve(Some(&mut player), &mut ahead, &mut gorillas, &[], &p, &mut world.frame());
        assert!(ahead.iter().all(|e| e.state() == EnemyState::Dead));
        resolve(Some(&mut player), &mut behind, &mut gorillas, &[], &p, &mut world.frame());
        assert!(behind.iter().all(|e| e.state() == EnemyState::Chase));
        assert!(!player.is_dead());
    }

    #[test]
    fn attack_needs_the_policy() {
        let mut world = TestWorld::floor();
        let mut player = player_at(4.0);
        let mut gorillas = Scene::new();
        let attack = Controls {
            action: true,
            ..Controls::default()
        };
        player.update(&attack, &mut world.frame(), &mut gorillas);
        let mut ahead = scene_of(enemy_at(&mut world, 5.5, &player));
        let p = policy(EnemyDefeat::Never, HeldGorillaHit::Ignore);
        resolve(Some(&mut player), &mut ahead, &mut gorillas, &[], &p, &mut world.frame());
        assert!(ahead.iter().all(|e| e.state() == EnemyState::Chase));
    }

    #[test]
    fn touching_a_gorilla_picks_it_up() {
        let mut world = TestWorld::floor();
        let mut player = player_at(4.0);
        let mut gorillas = Scene::new();
        gorillas.spawn(SmallGorilla::new(
            EntityId(30),
            Vec2::new(4.8, 1.5),
            &GorillaTuning::default(),
            &mut world.rng,
        ));
        resolve(
            Some(&mut player),
            &mut Scene::new(),
            &mut gorillas,
            &[],
            &policy(EnemyDefeat::Never, HeldGorillaHit::Ignore),
            &mut world.frame(),
        );
        assert_eq!(player.held_gorillas(), 1);
        assert_eq!(world.signals.scores(), vec![10]);
    }

    #[test]
    fn reaching_home_starts_saving() {
        let mut world = TestWorld::floor();
        let mut player = player_at(4.0);
        let mut gorillas = Scene::new();
        let mut g = SmallGorilla::new(
            EntityId(30),
            Vec2::new(10.0, 1.5),
            &GorillaTuning::default(),
            &mut world.rng,
        );
        g.pick_up(&mut player, &mut world.frame());
        gorillas.spawn(g);
        let homes = [Home::new(Vec2::new(4.0, 1.5))];
        resolve(
            Some(&mut player),
            &mut Scene::new(),
            &mut gorillas,
            &homes,
            &policy(EnemyDefeat::Never, HeldGorillaHit::Ignore),
            &mut world.frame(),
        );
        assert!(player.is_saving());
    }

    #[test]
    fn enemy_can_knock_a_held_gorilla_loose() {
        let mut world = TestWorld::floor();
        let mut player = player_at(4.0);
        let mut gorillas = Scene::new();
        let mut g = SmallGorilla::new(
            EntityId(30),
            Vec2::new(10.0, 1.5),
            &GorillaTuning::default(),
            &mut world.rng,
        );
        g.pick_up(&mut player, &mut world.frame());
        g.update(&mut world.frame(), Some(&player));
        gorillas.spawn(g);

        // Level with the gorilla on the stack, clear of the player.
        let mut enemy = enemy_at(&mut world, 4.5, &player);
        enemy.mobile.body.pos.y = REST_Y + 0.5625 + 0.6;
        let mut enemies = scene_of(enemy);

        resolve(
            Some(&mut player),
            &mut enemies,
            &mut gorillas,
            &[],
            &policy(EnemyDefeat::Never, HeldGorillaHit::Ignore),
            &mut world.frame(),
        );
        assert_eq!(player.held_gorillas(), 1);

        resolve(
            Some(&mut player),
            &mut enemies,
            &mut gorillas,
            &[],
            &policy(EnemyDefeat::Never, HeldGorillaHit::Drop),
            &mut world.frame(),
        );
        assert!(!player.is_dead());
        assert_eq!(player.held_gorillas(), 0);
        assert!(gorillas.iter().all(|g| g.state() == GorillaState::Lost));
    }
}
