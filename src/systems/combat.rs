//! Combat systems - attack spawning, projectile flight, melee swing
//! lifetimes, and the damage sweep.

use crate::components::*;
use crate::events::{CombatEvents, DeathEvent, HitEvent};
use crate::events::EffectBus;
use crate::map::{TileMap, TILE_SIZE};
use crate::systems::movement::DeltaTime;
use bevy_ecs::prelude::*;

/// Spawn an attack entity for `owner`, positioned from the owner's top-left
/// position `(x, y)` and aimed along the cardinal direction `(dir_x, dir_y)`.
///
/// Melee weapons produce a short-lived `Swing` hitbox held out in front of
/// the attacker; ranged weapons produce a `Projectile`. A ranged weapon with
/// no projectile sprite spawns nothing and returns `None`; the factories
/// warn about that configuration once at spawn time.
pub fn spawn_attack(
    world: &mut World,
    owner: Entity,
    weapon: &WeaponDef,
    x: f32,
    y: f32,
    dir_x: f32,
    dir_y: f32,
) -> Option<Entity> {
    let cx = x + TILE_SIZE / 2.0;
    let cy = y + TILE_SIZE / 2.0;

    match weapon.kind {
        WeaponKind::Melee => {
            let reach = TILE_SIZE * 0.75 + weapon.swing_w * 0.25;
            let sx = (cx + dir_x * reach - weapon.swing_w / 2.0).floor();
            let sy = (cy + dir_y * reach - weapon.swing_h / 2.0).floor();
            let mut e = world.spawn((
                Position::new(sx, sy),
                Swing { life: weapon.swing_life },
                Damager {
                    damage: weapon.damage,
                    team: weapon.team.clone(),
                    knockback: weapon.knockback,
                },
            ));
            if let Some(sprite) = &weapon.swing_sprite {
                e.insert(Sprite::new(sprite.clone()));
            }
            Some(e.id())
        }
        WeaponKind::Ranged => {
            let sprite = weapon.proj_sprite.as_ref()?;
            let e = world
                .spawn((
                    Position::new((cx - TILE_SIZE / 2.0).floor(), (cy - TILE_SIZE / 2.0).floor()),
                    Projectile {
                        vx: dir_x * weapon.proj_speed,
                        vy: dir_y * weapon.proj_speed,
                        life: weapon.proj_life,
                        owner,
                        piercing: weapon.piercing,
                    },
                    Damager {
                        damage: weapon.damage,
                        team: weapon.team.clone(),
                        knockback: weapon.knockback,
                    },
                    Sprite::new(sprite.clone()),
                ))
                .id();
            Some(e)
        }
    }
}

/// System that flies projectiles and despawns them on life expiry, on
/// leaving the world, or on hitting a solid tile. Runs before the damage
/// sweep so a projectile never deals damage through a wall it just entered.
pub fn projectile_system(
    dt: Res<DeltaTime>,
    map: Res<TileMap>,
    mut commands: Commands,
    mut query: Query<(Entity, &mut Position, &mut Projectile)>,
) {
    let delta = dt.0;
    for (entity, mut pos, mut proj) in query.iter_mut() {
        proj.life -= delta;
        if proj.life <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }
        pos.x += proj.vx * delta;
        pos.y += proj.vy * delta;
        if pos.x < 0.0
            || pos.x + TILE_SIZE > map.width()
            || pos.y < 0.0
            || pos.y + TILE_SIZE > map.height()
        {
            commands.entity(entity).despawn();
            continue;
        }
        if map.collides_at(pos.x, pos.y) {
            commands.entity(entity).despawn();
        }
    }
}

/// System that expires melee swing hitboxes.
pub fn swing_system(
    dt: Res<DeltaTime>,
    mut commands: Commands,
    mut query: Query<(Entity, &mut Swing)>,
) {
    for (entity, mut swing) in query.iter_mut() {
        swing.life -= dt.0;
        if swing.life <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

struct AttackerRec {
    entity: Entity,
    x: f32,
    y: f32,
    damage: f32,
    team: Option<String>,
    knockback: f32,
    /// `Some(piercing)` when the attacker is a projectile.
    projectile: Option<bool>,
}

/// The damage sweep. Exclusive so hits, deaths, and first-hit projectile
/// destruction all land inside one tick with no deferred despawns.
///
/// Attacker boxes are a fixed 6x6 inset of the damager's tile; victim boxes
/// are the map's sub-tile hitbox. Hits are skipped for self, for matching
/// declared teams, and for victims inside their invincibility window.
/// After the sweep every damageable's iframes decay by the tick delta.
pub fn damage_system(world: &mut World) {
    let delta = world.resource::<DeltaTime>().0;
    let hitbox = world.resource::<TileMap>().hitbox;

    let mut attackers = Vec::new();
    let mut q = world.query::<(Entity, &Position, &Damager, Option<&Projectile>)>();
    for (entity, pos, damager, proj) in q.iter(world) {
        attackers.push(AttackerRec {
            entity,
            x: pos.x,
            y: pos.y,
            damage: damager.damage,
            team: damager.team.clone(),
            knockback: damager.knockback,
            projectile: proj.map(|p| p.piercing),
        });
    }

    let mut victims = Vec::new();
    let mut q = world.query_filtered::<(Entity, &Position), With<Damageable>>();
    for (entity, pos) in q.iter(world) {
        victims.push((entity, pos.x, pos.y));
    }

    for atk in attackers {
        if !world.entities().contains(atk.entity) {
            continue;
        }
        let ax0 = atk.x + 1.0;
        let ay0 = atk.y + 1.0;
        let ax1 = ax0 + 6.0;
        let ay1 = ay0 + 6.0;

        for &(victim, vx, vy) in &victims {
            if victim == atk.entity || !world.entities().contains(victim) {
                continue;
            }
            let bx0 = vx + hitbox.x;
            let by0 = vy + hitbox.y;
            let bx1 = bx0 + hitbox.w;
            let by1 = by0 + hitbox.h;
            if ax0 >= bx1 || ax1 <= bx0 || ay0 >= by1 || ay1 <= by0 {
                continue;
            }

            let Some(damageable) = world.get::<Damageable>(victim) else { continue };
            if let (Some(at), Some(vt)) = (atk.team.as_deref(), damageable.team.as_deref()) {
                if at == vt {
                    continue;
                }
            }
            if damageable.iframes > 0.0 {
                continue;
            }

            let hp_after = {
                let mut damageable = world.get_mut::<Damageable>(victim).unwrap();
                damageable.damage(atk.damage);
                damageable.iframes = damageable.iframe_max;
                damageable.hp
            };

            if atk.knockback != 0.0 {
                if let Some(mut vel) = world.get_mut::<Velocity>(victim) {
                    let sign = if vx >= atk.x { 1.0 } else { -1.0 };
                    vel.dx = sign * atk.knockback;
                }
            }

            world.resource_mut::<CombatEvents>().hits.push(HitEvent {
                victim,
                attacker: atk.entity,
                amount: atk.damage,
            });

            if hp_after <= 0.0 {
                world
                    .resource_mut::<CombatEvents>()
                    .deaths
                    .push(DeathEvent { victim, attacker: atk.entity });
                let mut fx = world.resource_mut::<EffectBus>();
                fx.burst(vx + TILE_SIZE / 2.0, vy + TILE_SIZE / 2.0, "hit");
                fx.sfx("hit");
                if world.get::<DespawnOnDeath>(victim).is_some() {
                    world.despawn(victim);
                }
            }

            // Non-piercing projectiles stop at their first confirmed hit.
            if atk.projectile == Some(false) {
                world.despawn(atk.entity);
                break;
            }
        }
    }

    let mut q = world.query::<&mut Damageable>();
    for mut damageable in q.iter_mut(world) {
        damageable.iframes = (damageable.iframes - delta).max(0.0);
    }
}
