//! Public API for the simulation.
//!
//! `SimWorld` owns the ECS world and schedule and is the only type a
//! client needs. One `step(delta)` call runs exactly one tick with the
//! supplied delta; the client owns frame pacing. State flows out through
//! `snapshot()` and the drained effect list; commands flow in through the
//! spawn, input, flag, and aggro methods.

use crate::components::*;
use crate::events::{CombatEvents, Effect, EffectBus};
use crate::flags::FlagStore;
use crate::map::TileMap;
use crate::spatial::{spatial_index_system, SpatialGrid};
use crate::systems::aggro::{aggro_decay_system, AggroTable};
use crate::systems::animation::{animation_system, flicker_system, IframeFlicker};
use crate::systems::combat::{damage_system, projectile_system, swing_system};
use crate::systems::enemy::{enemy_ai_system, spawn_enemy, spawn_ranged_enemy};
use crate::systems::movement::{
    movement_system, patrol_system, player_input_system, script_move_system, DeltaTime,
    InputLocked, PlayerInput,
};
use crate::systems::spawner::{create_spawner, spawner_system};
use crate::world::Snapshot;
use bevy_ecs::prelude::*;

/// The main simulation world container.
pub struct SimWorld {
    world: World,
    schedule: Schedule,
    tick: u64,
    time: f32,
}

impl SimWorld {
    /// Create a simulation over the given tile map.
    pub fn new(map: TileMap) -> Self {
        let mut world = World::new();
        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(map);
        world.insert_resource(SpatialGrid::default());
        world.insert_resource(AggroTable::default());
        world.insert_resource(FlagStore::default());
        world.insert_resource(EffectBus::default());
        world.insert_resource(CombatEvents::default());
        world.insert_resource(IframeFlicker::default());
        world.insert_resource(PlayerInput::default());
        world.insert_resource(InputLocked(false));

        // Strict sequential order; the sync point after the AI system is
        // what lets queued attack spawns take damage in the same tick.
        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                player_input_system,
                script_move_system,
                patrol_system,
                enemy_ai_system,
                swing_system,
                projectile_system,
                damage_system,
                movement_system,
                animation_system,
                flicker_system,
                spatial_index_system,
                spawner_system,
                aggro_decay_system,
            )
                .chain(),
        );

        Self { world, schedule, tick: 0, time: 0.0 }
    }

    /// Advance the simulation by exactly one tick of `delta` seconds.
    /// Combat events from the previous tick are discarded here, so read
    /// them between steps.
    pub fn step(&mut self, delta: f32) {
        self.world.resource_mut::<DeltaTime>().0 = delta;
        self.world.resource_mut::<CombatEvents>().clear();
        self.schedule.run(&mut self.world);
        self.tick += 1;
        self.time += delta;
    }

    // ------------------------------------------------------------------
    // Spawning
    // ------------------------------------------------------------------

    /// Spawn the player entity.
    pub fn spawn_player(
        &mut self,
        x: f32,
        y: f32,
        sprite: impl Into<String>,
        speed: f32,
        hp: f32,
    ) -> Entity {
        let sprite = sprite.into();
        self.world
            .spawn((
                Player,
                Position::new(x, y),
                Velocity::with_speed(speed),
                Collider,
                Animator::new(clips_from_sprite(&sprite), "idle"),
                Damageable::new(hp, 0.8, Some("player".to_string())),
            ))
            .id()
    }

    pub fn spawn_enemy(&mut self, def: &EnemyDef) -> Entity {
        spawn_enemy(&mut self.world, def)
    }

    pub fn spawn_ranged_enemy(&mut self, x: f32, y: f32, proj_sprite: impl Into<String>) -> Entity {
        spawn_ranged_enemy(&mut self.world, x, y, proj_sprite)
    }

    /// Create a respawning spawner (and its first enemy, unless the flag
    /// is already set).
    pub fn create_spawner(
        &mut self,
        def: EnemyDef,
        flag_name: Option<String>,
        respawn_delay: f32,
    ) -> Entity {
        create_spawner(&mut self.world, def, flag_name, respawn_delay)
    }

    /// Destroy any entity. Idempotent: destroying a dead or stale id is a
    /// no-op returning false.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if self.world.entities().contains(entity) {
            self.world.despawn(entity)
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Input and scripted movement
    // ------------------------------------------------------------------

    /// Set the player's movement intent for upcoming ticks.
    pub fn set_player_input(&mut self, dx: f32, dy: f32) {
        let mut input = self.world.resource_mut::<PlayerInput>();
        input.dx = dx;
        input.dy = dy;
    }

    pub fn lock_input(&mut self) {
        self.world.resource_mut::<InputLocked>().0 = true;
    }

    pub fn unlock_input(&mut self) {
        self.world.resource_mut::<InputLocked>().0 = false;
    }

    /// Walk an entity to a point, overriding its normal control until it
    /// arrives.
    pub fn script_move(&mut self, entity: Entity, x: f32, y: f32, speed: f32) {
        if self.world.entities().contains(entity) {
            self.world
                .entity_mut(entity)
                .insert(ScriptMove { target_x: x, target_y: y, speed });
        }
    }

    // ------------------------------------------------------------------
    // Aggro and flags
    // ------------------------------------------------------------------

    /// Raise a group alarm by hand (scripted ambushes).
    pub fn alert_group(&mut self, group: &str, x: f32, y: f32) {
        self.world.resource_mut::<AggroTable>().alert(group, x, y);
    }

    pub fn clear_aggro_group(&mut self, group: &str) {
        self.world.resource_mut::<AggroTable>().clear(group);
    }

    pub fn aggro_active(&self, group: &str) -> bool {
        self.world.resource::<AggroTable>().is_active(group)
    }

    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.world.resource_mut::<FlagStore>().set(name);
    }

    pub fn flag(&self, name: &str) -> bool {
        self.world.resource::<FlagStore>().get(name)
    }

    pub fn clear_flag(&mut self, name: &str) {
        self.world.resource_mut::<FlagStore>().clear(name);
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Extract the current state. Drains the pending effect list.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::from_world(&mut self.world, self.tick, self.time)
    }

    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Take the pending effect triggers without building a full snapshot.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.world.resource_mut::<EffectBus>().drain()
    }

    /// Combat outcomes from the most recent tick.
    pub fn combat_events(&self) -> &CombatEvents {
        self.world.resource::<CombatEvents>()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn current_time(&self) -> f32 {
        self.time
    }

    /// Direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new(TileMap::new(40, 30))
    }
}
