//! Named boolean flag store.
//!
//! The quest/persistence layer lives outside the core; the simulation only
//! reads and writes opaque named booleans. Spawners consult these for
//! permanent kills.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagStore {
    set: HashSet<String>,
}

impl FlagStore {
    pub fn get(&self, name: &str) -> bool {
        self.set.contains(name)
    }

    pub fn set(&mut self, name: impl Into<String>) {
        self.set.insert(name.into());
    }

    pub fn clear(&mut self, name: &str) {
        self.set.remove(name);
    }
}
