//! Respawn spawners - logic-only entities that restore their enemy on a
//! timer after it dies, until a permanent-kill flag retires them.

use crate::components::*;
use crate::events::EffectBus;
use crate::flags::FlagStore;
use crate::map::TILE_SIZE;
use crate::systems::enemy::spawn_enemy;
use crate::systems::movement::DeltaTime;
use bevy_ecs::prelude::*;

/// Seconds before the respawn lands that the portal warning effect fires.
pub const PRE_SPAWN_WARN: f32 = 0.4;

/// Default seconds from death to respawn.
pub const RESPAWN_DELAY_DEFAULT: f32 = 8.0;

/// Create a spawner and its first enemy. If the permanent-kill flag is
/// already set the spawner is created retired, with no enemy.
pub fn create_spawner(
    world: &mut World,
    def: EnemyDef,
    flag_name: Option<String>,
    respawn_delay: f32,
) -> Entity {
    let retired = flag_name
        .as_deref()
        .map(|f| world.resource::<FlagStore>().get(f))
        .unwrap_or(false);
    let enemy = if retired { None } else { Some(spawn_enemy(world, &def)) };
    world
        .spawn(Spawner {
            def,
            flag_name,
            respawn_delay,
            timer: None,
            pre_spawn_fired: false,
            enemy,
        })
        .id()
}

/// The respawn loop. Exclusive because a respawn must check entity
/// liveness, read the flag store, and spawn a full enemy in one pass.
///
/// Cycle per spawner: enemy dies -> countdown starts -> portal warning at
/// `PRE_SPAWN_WARN` remaining -> flag re-checked at zero -> respawn from
/// the stored def. A set flag freezes the spawner at any point.
pub fn spawner_system(world: &mut World) {
    let delta = world.resource::<DeltaTime>().0;

    let mut spawners = Vec::new();
    let mut q = world.query_filtered::<Entity, With<Spawner>>();
    for entity in q.iter(world) {
        spawners.push(entity);
    }

    for spawner_entity in spawners {
        let Some(spawner) = world.get::<Spawner>(spawner_entity) else { continue };
        let flag_name = spawner.flag_name.clone();
        let flag_set = flag_name
            .as_deref()
            .map(|f| world.resource::<FlagStore>().get(f))
            .unwrap_or(false);
        if flag_set {
            continue;
        }

        let timer = spawner.timer;
        match timer {
            None => {
                let alive = spawner
                    .enemy
                    .map(|e| world.entities().contains(e))
                    .unwrap_or(false);
                if !alive {
                    let mut spawner = world.get_mut::<Spawner>(spawner_entity).unwrap();
                    spawner.enemy = None;
                    spawner.timer = Some(spawner.respawn_delay);
                    spawner.pre_spawn_fired = false;
                }
            }
            Some(mut remaining) => {
                remaining -= delta;

                let pre_spawn_fired = spawner.pre_spawn_fired;
                let (wx, wy) = (spawner.def.x, spawner.def.y);
                if !pre_spawn_fired && remaining <= PRE_SPAWN_WARN {
                    let mut fx = world.resource_mut::<EffectBus>();
                    fx.burst(wx + TILE_SIZE / 2.0, wy + TILE_SIZE / 2.0, "portal");
                    fx.sfx("portal");
                    world.get_mut::<Spawner>(spawner_entity).unwrap().pre_spawn_fired = true;
                }

                if remaining <= 0.0 {
                    // The flag may have been set mid-countdown.
                    let flag_set = flag_name
                        .as_deref()
                        .map(|f| world.resource::<FlagStore>().get(f))
                        .unwrap_or(false);
                    if flag_set {
                        world.get_mut::<Spawner>(spawner_entity).unwrap().timer = None;
                        continue;
                    }
                    let def = world.get::<Spawner>(spawner_entity).unwrap().def.clone();
                    let enemy = spawn_enemy(world, &def);
                    let mut spawner = world.get_mut::<Spawner>(spawner_entity).unwrap();
                    spawner.enemy = Some(enemy);
                    spawner.timer = None;
                } else {
                    world.get_mut::<Spawner>(spawner_entity).unwrap().timer = Some(remaining);
                }
            }
        }
    }
}
