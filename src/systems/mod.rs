//! ECS Systems for the Gloamvale simulation.
//!
//! Systems contain the game logic that operates on components.
//!
//! ## Tick Order
//!
//! The schedule in `api.rs` chains every system, so each tick runs them
//! strictly in sequence with command sync points between:
//!
//! 1. `player_input_system` - input direction into player velocity
//! 2. `script_move_system` - cutscene movement overrides
//! 3. `patrol_system` - friendly NPC waypoint walking
//! 4. `enemy_ai_system` - state machines; queued attack spawns apply
//!    at the following sync point
//! 5. `swing_system` - melee hitbox lifetimes
//! 6. `projectile_system` - projectile flight and impact despawns
//! 7. `damage_system` - the damage sweep (exclusive)
//! 8. `movement_system` - velocity into position with tile collision
//! 9. `animation_system` / `flicker_system` - playback cursors
//! 10. `spatial_index_system` - rebuild the proximity grid
//! 11. `spawner_system` - respawn countdowns
//! 12. `aggro_decay_system` - group alarm TTLs

pub mod aggro;
pub mod animation;
pub mod combat;
pub mod enemy;
pub mod movement;
pub mod spawner;

pub use aggro::*;
pub use animation::*;
pub use combat::*;
pub use enemy::*;
pub use movement::*;
pub use spawner::*;
