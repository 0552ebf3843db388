//! ECS Components for the Gloamvale simulation.
//!
//! Components are pure data containers attached to entities.
//! All game logic lives in systems that query these components.
//! No component holds a closure; hit/death notifications travel through
//! the event resources in `events.rs` so everything stays serializable.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// World-space pixel position, anchored at the sprite's top-left corner.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Sprite-center point (positions are top-left anchored).
    pub fn center(&self) -> (f32, f32) {
        (
            self.x + crate::map::TILE_SIZE / 2.0,
            self.y + crate::map::TILE_SIZE / 2.0,
        )
    }
}

/// Movement intent in pixels per second. `speed` is the scalar magnitude
/// systems use to rebuild `dx`/`dy` from a normalized direction.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
    pub speed: f32,
}

impl Velocity {
    pub fn with_speed(speed: f32) -> Self {
        Self { dx: 0.0, dy: 0.0, speed }
    }

    pub fn stop(&mut self) {
        self.dx = 0.0;
        self.dy = 0.0;
    }

    pub fn is_moving(&self) -> bool {
        self.dx != 0.0 || self.dy != 0.0
    }
}

/// Marker: movement resolution blocks this entity on solid tiles.
/// Entities never block each other, only the static collision layer.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Collider;

/// Marker for the player entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Static sprite reference for entities without an animator
/// (projectiles, swing visuals).
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Sprite {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), flip_x: false, flip_y: false }
    }
}

// ============================================================================
// ANIMATION COMPONENTS
// ============================================================================

/// A single named animation clip: frame sprite names plus a shared
/// per-frame duration in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    pub frames: Vec<String>,
    pub duration: f32,
}

impl Clip {
    pub fn new(frames: Vec<String>, duration: f32) -> Self {
        Self { frames, duration }
    }

    /// One-frame clip from a single sprite name.
    pub fn single(frame: impl Into<String>, duration: f32) -> Self {
        Self { frames: vec![frame.into()], duration }
    }
}

/// Named clip table plus a playback cursor.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Animator {
    pub clips: HashMap<String, Clip>,
    pub current: String,
    pub frame_idx: usize,
    pub timer: f32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Animator {
    pub fn new(clips: HashMap<String, Clip>, start: &str) -> Self {
        Self {
            clips,
            current: start.to_string(),
            frame_idx: 0,
            timer: 0.0,
            flip_x: false,
            flip_y: false,
        }
    }

    /// Switch to a named clip. Re-playing the current clip is a no-op so
    /// the cursor is never reset mid-cycle. Unknown clip names are ignored.
    pub fn play(&mut self, name: &str) {
        if self.current == name || !self.clips.contains_key(name) {
            return;
        }
        self.current = name.to_string();
        self.frame_idx = 0;
        self.timer = 0.0;
    }

    /// Sprite name of the current frame, if the current clip exists.
    pub fn current_frame(&self) -> Option<&str> {
        let clip = self.clips.get(&self.current)?;
        if clip.frames.is_empty() {
            return None;
        }
        clip.frames.get(self.frame_idx % clip.frames.len()).map(|s| s.as_str())
    }

    /// Advance the playback cursor by `delta` seconds, looping.
    pub fn advance(&mut self, delta: f32) {
        let Some(clip) = self.clips.get(&self.current) else { return };
        if clip.frames.is_empty() || clip.duration <= 0.0 {
            return;
        }
        self.timer += delta;
        while self.timer >= clip.duration {
            self.timer -= clip.duration;
            self.frame_idx = (self.frame_idx + 1) % clip.frames.len();
        }
    }
}

/// Build the minimal five-clip table every walking entity uses from a
/// single static sprite name.
pub fn clips_from_sprite(sprite: &str) -> HashMap<String, Clip> {
    let mut clips = HashMap::new();
    clips.insert("idle".to_string(), Clip::single(sprite, 0.5));
    clips.insert("walk_down".to_string(), Clip::single(sprite, 0.18));
    clips.insert("walk_up".to_string(), Clip::single(sprite, 0.18));
    clips.insert("walk_side".to_string(), Clip::single(sprite, 0.18));
    clips.insert("attack".to_string(), Clip::single(sprite, 0.10));
    clips
}

// ============================================================================
// COMBAT COMPONENTS
// ============================================================================

/// Hit points plus the invincibility window granted after each hit.
/// Invariant: `0 <= hp <= max_hp`; `iframes` only rises on a confirmed hit.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Damageable {
    pub hp: f32,
    pub max_hp: f32,
    pub iframes: f32,
    pub iframe_max: f32,
    /// Hits only land across different declared teams.
    pub team: Option<String>,
}

impl Damageable {
    pub fn new(hp: f32, iframe_max: f32, team: Option<String>) -> Self {
        Self { hp, max_hp: hp, iframes: 0.0, iframe_max, team }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).max(0.0);
    }
}

/// Marker: despawn this entity when its hp reaches zero.
/// Attached by the enemy factories; the player stays in the world at 0 hp
/// so the embedding client can run its own game-over flow.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct DespawnOnDeath;

/// Transient damage source carried by swing and projectile entities.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Damager {
    pub damage: f32,
    pub team: Option<String>,
    /// Horizontal impulse (px/s) pushed into the victim's velocity.
    /// Zero disables knockback.
    pub knockback: f32,
}

/// Flying attack entity. Non-piercing projectiles despawn on their first
/// confirmed hit; all projectiles despawn on life expiry, world edge, or
/// solid-tile impact.
#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile {
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub owner: Entity,
    pub piercing: bool,
}

/// Melee hitbox lifetime countdown.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Swing {
    pub life: f32,
}

// ============================================================================
// WEAPON / ENEMY DEFINITIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Melee,
    Ranged,
}

/// Plain weapon definition forwarded to `spawn_attack`. Scene data supplies
/// these; the defaults below match the stock enemy claws.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponDef {
    pub kind: WeaponKind,
    pub name: String,
    pub damage: f32,
    pub cooldown_max: f32,
    pub team: Option<String>,
    pub knockback: f32,
    // Melee fields.
    pub swing_w: f32,
    pub swing_h: f32,
    pub swing_life: f32,
    pub swing_sprite: Option<String>,
    // Ranged fields.
    pub proj_sprite: Option<String>,
    pub proj_speed: f32,
    pub proj_life: f32,
    pub piercing: bool,
}

impl WeaponDef {
    /// Default melee weapon for enemies that don't specify one.
    pub fn claws() -> Self {
        Self {
            kind: WeaponKind::Melee,
            name: "Claws".to_string(),
            damage: 1.0,
            cooldown_max: 1.2,
            team: Some("enemy".to_string()),
            knockback: 40.0,
            swing_w: 12.0,
            swing_h: 10.0,
            swing_life: 0.12,
            swing_sprite: None,
            proj_sprite: None,
            proj_speed: 0.0,
            proj_life: 0.0,
            piercing: false,
        }
    }

    /// Default projectile weapon for ranged enemies. `proj_sprite` is
    /// intentionally left unset; callers must supply it.
    pub fn shot() -> Self {
        Self {
            kind: WeaponKind::Ranged,
            name: "Shot".to_string(),
            damage: 1.0,
            cooldown_max: 1.8,
            team: Some("enemy".to_string()),
            knockback: 20.0,
            swing_w: 0.0,
            swing_h: 0.0,
            swing_life: 0.0,
            swing_sprite: None,
            proj_sprite: None,
            proj_speed: 90.0,
            proj_life: 2.0,
            piercing: false,
        }
    }
}

impl Default for WeaponDef {
    fn default() -> Self {
        Self::claws()
    }
}

/// World-space patrol point.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
}

impl Waypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Plain enemy definition supplied by scene data and stored by spawners so
/// respawns recreate the enemy exactly. `Default` carries the stock melee
/// tuning; `ranged(..)` layers the ranged tuning on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyDef {
    pub x: f32,
    pub y: f32,
    /// Static sprite name; ignored when `clips` is supplied.
    pub sprite: Option<String>,
    /// Full clip table for animated enemies.
    pub clips: Option<HashMap<String, Clip>>,
    pub speed: f32,
    pub hp: f32,
    pub iframe_max: f32,
    pub team: String,
    pub alert_range: f32,
    pub attack_range: f32,
    pub leash_range: f32,
    pub kite_range: f32,
    pub idle_duration: f32,
    pub waypoints: Vec<Waypoint>,
    /// Weapon override; the factory fills in `claws()` when unset.
    pub weapon: Option<WeaponDef>,
    pub aggro_group: Option<String>,
    /// 0 = whole-group broadcast.
    pub propagate_radius: f32,
    pub use_los: bool,
    pub lost_sight_max: f32,
}

impl Default for EnemyDef {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            sprite: None,
            clips: None,
            speed: 28.0,
            hp: 3.0,
            iframe_max: 0.8,
            team: "enemy".to_string(),
            alert_range: 48.0,
            attack_range: 14.0,
            leash_range: 96.0,
            kite_range: 0.0,
            idle_duration: 1.8,
            waypoints: Vec::new(),
            weapon: None,
            aggro_group: None,
            propagate_radius: 0.0,
            use_los: true,
            lost_sight_max: 2.5,
        }
    }
}

impl EnemyDef {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, ..Self::default() }
    }

    /// Ranged tuning: slower, squishier, notices the player from farther
    /// away, fires at distance, and backs off when crowded.
    pub fn ranged(x: f32, y: f32, proj_sprite: impl Into<String>) -> Self {
        let mut weapon = WeaponDef::shot();
        weapon.proj_sprite = Some(proj_sprite.into());
        Self {
            x,
            y,
            speed: 20.0,
            hp: 2.0,
            alert_range: 72.0,
            attack_range: 56.0,
            kite_range: 22.0,
            leash_range: 120.0,
            idle_duration: 2.5,
            weapon: Some(weapon),
            ..Self::default()
        }
    }
}

// ============================================================================
// AI COMPONENTS
// ============================================================================

/// Enemy state machine states. Transitions only happen through
/// `systems::enemy::transition` so entry side effects are never skipped.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Idle,
    Patrol,
    Chase,
    Attack,
}

/// Full per-enemy state machine memory.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct EnemyAi {
    pub state: EnemyState,
    /// Entering this radius of the player triggers chase (LOS-gated).
    pub alert_range: f32,
    /// Entering this radius triggers attack.
    pub attack_range: f32,
    /// Distance from home beyond which chase is abandoned.
    pub leash_range: f32,
    pub home_x: f32,
    pub home_y: f32,
    pub weapon: WeaponDef,
    /// Seconds until the next attack may fire.
    pub attack_cooldown: f32,
    /// Seconds spent in the current state; resets on transition.
    pub state_timer: f32,
    /// Ranged enemies back away when the player closes inside this. 0 = melee.
    pub kite_range: f32,
    /// Seconds idle before resuming patrol.
    pub idle_duration: f32,
    pub waypoints: Vec<Waypoint>,
    pub waypoint_idx: usize,
    /// Last movement direction, for idle facing.
    pub last_dir_x: f32,
    pub last_dir_y: f32,
    /// Shared alarm group; `None` skips alarm broadcast entirely.
    pub aggro_group: Option<String>,
    /// Radius from the alarm origin within which this enemy reacts.
    /// 0 = react regardless of distance.
    pub propagate_radius: f32,
    /// When true, alert_range only triggers with a clear tile line of sight.
    pub use_los: bool,
    /// While chasing with broken LOS, counts up toward `lost_sight_max`.
    pub lost_sight_timer: f32,
    pub lost_sight_max: f32,
    /// Last confirmed player position; pursued while sight is broken.
    pub last_known_x: f32,
    pub last_known_y: f32,
}

/// Plain waypoint walker for friendly NPCs. Distinct from the enemy state
/// machine: no alerting, no combat, suppressed while a `ScriptMove` runs.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Patrol {
    pub waypoints: Vec<Waypoint>,
    pub waypoint_idx: usize,
    pub speed: f32,
}

/// Externally driven movement override (cutscenes). While present, the
/// patrol and player-input systems leave this entity's velocity alone;
/// `script_move_system` steers it and removes the component on arrival.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScriptMove {
    pub target_x: f32,
    pub target_y: f32,
    pub speed: f32,
}

// ============================================================================
// SPAWNER COMPONENT
// ============================================================================

/// Pure logic entity: no position, collider, or sprite. Monitors the live
/// enemy it owns and restarts it on a timer after death, unless the
/// permanent-kill flag has been set.
#[derive(Component, Debug, Clone)]
pub struct Spawner {
    /// Full enemy def, captured at creation and reused for every respawn.
    pub def: EnemyDef,
    /// Permanent-kill guard: when this flag is set the spawner is retired.
    pub flag_name: Option<String>,
    /// Seconds from death to the next spawn.
    pub respawn_delay: f32,
    /// `None` while the enemy is expected alive; `Some(remaining)` while
    /// the respawn countdown runs.
    pub timer: Option<f32>,
    /// Guards the pre-spawn warning effect to exactly once per cycle.
    pub pre_spawn_fired: bool,
    /// Current live enemy, if any.
    pub enemy: Option<Entity>,
}
