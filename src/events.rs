//! Event resources bridging combat outcomes to the embedding client.
//!
//! Components carry no callbacks; systems push plain records into these
//! resources and the client drains them once per tick. Anything left
//! undrained is cleared at the start of the next tick.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// A confirmed hit from the damage sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub victim: Entity,
    pub attacker: Entity,
    pub amount: f32,
}

/// A damageable reaching zero hp during the damage sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathEvent {
    pub victim: Entity,
    pub attacker: Entity,
}

/// Per-tick combat outcomes, in the order they were resolved.
#[derive(Resource, Debug, Default)]
pub struct CombatEvents {
    pub hits: Vec<HitEvent>,
    pub deaths: Vec<DeathEvent>,
}

impl CombatEvents {
    pub fn clear(&mut self) {
        self.hits.clear();
        self.deaths.clear();
    }
}

/// Presentation-side trigger. The core never renders or plays anything;
/// it names what happened and where, and the client interprets the names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Named sound trigger ("alert", "hit", "portal").
    Sfx { name: String },
    /// Particle burst request at a world position, by preset name
    /// ("sparkle", "hit", "portal").
    Burst { x: f32, y: f32, preset: String },
}

/// Queue of presentation triggers raised this tick.
#[derive(Resource, Debug, Default)]
pub struct EffectBus {
    pub effects: Vec<Effect>,
}

impl EffectBus {
    pub fn sfx(&mut self, name: impl Into<String>) {
        self.effects.push(Effect::Sfx { name: name.into() });
    }

    pub fn burst(&mut self, x: f32, y: f32, preset: impl Into<String>) {
        self.effects.push(Effect::Burst { x, y, preset: preset.into() });
    }

    /// Take everything raised so far, leaving the bus empty.
    pub fn drain(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}
