//! Gloamvale - Simulation Core
//!
//! A deterministic, tick-driven ECS simulation for a 2D tile RPG:
//! tile collision, enemy AI state machines, group aggro propagation,
//! melee/projectile combat, and respawn spawners.
//! Uses `bevy_ecs` for the entity-component-system architecture.

pub mod api;
pub mod components;
pub mod events;
pub mod flags;
pub mod map;
pub mod spatial;
pub mod systems;
pub mod world;

pub use api::SimWorld;
pub use components::*;
pub use events::{CombatEvents, DeathEvent, Effect, EffectBus, HitEvent};
pub use flags::FlagStore;
pub use map::{TileMap, TILE_SIZE};
pub use spatial::SpatialGrid;
pub use systems::*;
pub use world::Snapshot;
