//! Movement systems - input, scripted moves, NPC patrol, and the tile-aware
//! position integration.

use crate::components::*;
use crate::map::TileMap;
use bevy_ecs::prelude::*;

/// Resource containing the delta time for the current tick, in seconds.
#[derive(Resource, Default)]
pub struct DeltaTime(pub f32);

/// Raw player input direction for this tick, as set by the client.
/// Components need not be normalized; the input system normalizes.
#[derive(Resource, Debug, Default)]
pub struct PlayerInput {
    pub dx: f32,
    pub dy: f32,
}

/// While true the player's velocity is forced to zero (cutscenes, dialog).
/// Scripted moves still run.
#[derive(Resource, Debug, Default)]
pub struct InputLocked(pub bool);

/// System that turns the input direction into player velocity.
/// Suspended entirely while a `ScriptMove` is steering the player.
pub fn player_input_system(
    input: Res<PlayerInput>,
    locked: Res<InputLocked>,
    mut query: Query<&mut Velocity, (With<Player>, Without<ScriptMove>)>,
) {
    for mut vel in query.iter_mut() {
        if locked.0 {
            vel.stop();
            continue;
        }
        let len = (input.dx * input.dx + input.dy * input.dy).sqrt();
        if len > 0.0 {
            vel.dx = input.dx / len * vel.speed;
            vel.dy = input.dy / len * vel.speed;
        } else {
            vel.stop();
        }
    }
}

/// System that drives entities with a `ScriptMove` straight at their target,
/// snapping and removing the component inside 2 px.
pub fn script_move_system(
    mut commands: Commands,
    mut query: Query<(Entity, &mut Position, &mut Velocity, &ScriptMove)>,
) {
    for (entity, mut pos, mut vel, script) in query.iter_mut() {
        let dx = script.target_x - pos.x;
        let dy = script.target_y - pos.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < 2.0 {
            pos.x = script.target_x;
            pos.y = script.target_y;
            vel.stop();
            commands.entity(entity).remove::<ScriptMove>();
        } else {
            vel.dx = dx / dist * script.speed;
            vel.dy = dy / dist * script.speed;
        }
    }
}

/// System that walks friendly NPCs along their waypoint loop.
/// Arrival inside 2 px advances to the next waypoint, wrapping around.
pub fn patrol_system(
    mut query: Query<(&Position, &mut Velocity, &mut Patrol), Without<ScriptMove>>,
) {
    for (pos, mut vel, mut patrol) in query.iter_mut() {
        if patrol.waypoints.is_empty() {
            vel.stop();
            continue;
        }
        let target = patrol.waypoints[patrol.waypoint_idx % patrol.waypoints.len()];
        let dx = target.x - pos.x;
        let dy = target.y - pos.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < 2.0 {
            patrol.waypoint_idx = (patrol.waypoint_idx + 1) % patrol.waypoints.len();
            vel.stop();
        } else {
            vel.dx = dx / dist * patrol.speed;
            vel.dy = dy / dist * patrol.speed;
        }
    }
}

/// System that applies velocity to position. Entities with a `Collider`
/// resolve against the tile map; everything else moves freely. Projectiles
/// are excluded here because `projectile_system` integrates them itself.
pub fn movement_system(
    dt: Res<DeltaTime>,
    map: Res<TileMap>,
    mut query: Query<(&mut Position, &Velocity, Option<&Collider>), Without<Projectile>>,
) {
    let delta = dt.0;
    for (mut pos, vel, collider) in query.iter_mut() {
        if !vel.is_moving() {
            continue;
        }
        let dx = vel.dx * delta;
        let dy = vel.dy * delta;
        if collider.is_some() {
            let (nx, ny) = map.resolve_move(pos.x, pos.y, dx, dy);
            pos.x = nx;
            pos.y = ny;
        } else {
            pos.x += dx;
            pos.y += dy;
        }
    }
}
