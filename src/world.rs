//! Snapshot extraction - the read-only boundary handed to the renderer.

use crate::components::*;
use crate::events::{Effect, EffectBus};
use crate::systems::animation::IframeFlicker;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// One visible entity in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    /// Current sprite frame, from the animator when present, otherwise the
    /// static sprite.
    pub sprite: Option<String>,
    pub flip_x: bool,
    pub flip_y: bool,
    /// False while the shared iframe strobe blanks a hurt entity.
    pub visible: bool,
    pub hp: Option<f32>,
    pub max_hp: Option<f32>,
}

/// Complete per-tick state for the render collaborator: entity views plus
/// the effect triggers raised since the last snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time: f32,
    pub entities: Vec<EntityView>,
    pub effects: Vec<Effect>,
}

impl Snapshot {
    /// Extract a snapshot, draining the effect bus.
    pub fn from_world(world: &mut World, tick: u64, time: f32) -> Self {
        let flicker_visible = world
            .get_resource::<IframeFlicker>()
            .map(|f| f.visible)
            .unwrap_or(true);

        let mut entities = Vec::new();
        let mut q = world.query::<(
            Entity,
            &Position,
            Option<&Animator>,
            Option<&Sprite>,
            Option<&Damageable>,
        )>();
        for (entity, pos, animator, sprite, damageable) in q.iter(world) {
            let (frame, flip_x, flip_y) = match (animator, sprite) {
                (Some(anim), _) => (
                    anim.current_frame().map(|s| s.to_string()),
                    anim.flip_x,
                    anim.flip_y,
                ),
                (None, Some(sprite)) => {
                    (Some(sprite.name.clone()), sprite.flip_x, sprite.flip_y)
                }
                (None, None) => (None, false, false),
            };
            let iframed = damageable.map(|d| d.iframes > 0.0).unwrap_or(false);
            entities.push(EntityView {
                id: entity.index(),
                x: pos.x,
                y: pos.y,
                sprite: frame,
                flip_x,
                flip_y,
                visible: !iframed || flicker_visible,
                hp: damageable.map(|d| d.hp),
                max_hp: damageable.map(|d| d.max_hp),
            });
        }

        let effects = world
            .get_resource_mut::<EffectBus>()
            .map(|mut bus| bus.drain())
            .unwrap_or_default();

        Self { tick, time, entities, effects }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}
