//! Group aggro - the shared alarm table that lets enemies alert each other.
//!
//! When any member of a named group enters chase it stamps an alarm with its
//! position. Other members react if the alarm origin is within their
//! propagate radius. Alarms expire on a TTL that freezes while any member
//! is actively chasing or attacking, so a fight keeps the whole group hot.

use crate::components::{EnemyAi, EnemyState};
use crate::systems::movement::DeltaTime;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Seconds an alarm lives without being refreshed.
pub const AGGRO_TTL_DEFAULT: f32 = 15.0;

/// A live alarm: remaining lifetime plus the position it was raised from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AggroEntry {
    pub ttl: f32,
    pub alert_x: f32,
    pub alert_y: f32,
}

/// Alarm table resource, keyed by group name.
#[derive(Resource, Debug, Default, Serialize, Deserialize)]
pub struct AggroTable {
    entries: HashMap<String, AggroEntry>,
}

impl AggroTable {
    /// Raise or refresh the alarm for a group. Refreshing resets the TTL
    /// and overwrites the origin with the newest alert position.
    pub fn alert(&mut self, group: &str, x: f32, y: f32) {
        self.entries.insert(
            group.to_string(),
            AggroEntry { ttl: AGGRO_TTL_DEFAULT, alert_x: x, alert_y: y },
        );
    }

    /// Whether an enemy at `(x, y)` should react to its group's alarm.
    /// `propagate_radius` of zero means the whole group reacts regardless
    /// of distance.
    pub fn triggered(&self, group: Option<&str>, propagate_radius: f32, x: f32, y: f32) -> bool {
        let Some(group) = group else { return false };
        let Some(entry) = self.entries.get(group) else { return false };
        if propagate_radius <= 0.0 {
            return true;
        }
        let dx = entry.alert_x - x;
        let dy = entry.alert_y - y;
        dx * dx + dy * dy <= propagate_radius * propagate_radius
    }

    pub fn is_active(&self, group: &str) -> bool {
        self.entries.contains_key(group)
    }

    pub fn clear(&mut self, group: &str) {
        self.entries.remove(group);
    }

    pub fn get(&self, group: &str) -> Option<&AggroEntry> {
        self.entries.get(group)
    }
}

/// System that ages alarms. A group with any member currently in `Chase`
/// or `Attack` is hot: its TTL is frozen for the tick. Everything else
/// decays and is removed at zero.
pub fn aggro_decay_system(
    dt: Res<DeltaTime>,
    mut table: ResMut<AggroTable>,
    query: Query<&EnemyAi>,
) {
    let delta = dt.0;
    let mut hot: Vec<&str> = Vec::new();
    for ai in query.iter() {
        if matches!(ai.state, EnemyState::Chase | EnemyState::Attack) {
            if let Some(group) = ai.aggro_group.as_deref() {
                if !hot.contains(&group) {
                    hot.push(group);
                }
            }
        }
    }
    table.entries.retain(|group, entry| {
        if hot.iter().any(|g| g == group) {
            return true;
        }
        entry.ttl -= delta;
        entry.ttl > 0.0
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::EnemyDef;
    use crate::systems::enemy::ai_from_def;

    #[test]
    fn test_alert_refresh_overwrites_origin() {
        let mut table = AggroTable::default();
        table.alert("crypt", 10.0, 10.0);
        table.alert("crypt", 50.0, 60.0);
        let entry = table.get("crypt").unwrap();
        assert_eq!((entry.alert_x, entry.alert_y), (50.0, 60.0));
        assert_eq!(entry.ttl, AGGRO_TTL_DEFAULT);
    }

    #[test]
    fn test_triggered_respects_radius() {
        let mut table = AggroTable::default();
        table.alert("crypt", 0.0, 0.0);

        // No group, no trigger.
        assert!(!table.triggered(None, 0.0, 0.0, 0.0));
        // Unknown group, no trigger.
        assert!(!table.triggered(Some("cave"), 0.0, 0.0, 0.0));
        // Zero radius broadcasts to the whole group.
        assert!(table.triggered(Some("crypt"), 0.0, 999.0, 999.0));
        // Finite radius is a distance check from the alarm origin.
        assert!(table.triggered(Some("crypt"), 50.0, 30.0, 40.0));
        assert!(!table.triggered(Some("crypt"), 49.0, 30.0, 40.0));
    }

    #[test]
    fn test_decay_removes_expired() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(8.0));
        let mut table = AggroTable::default();
        table.alert("crypt", 0.0, 0.0);
        world.insert_resource(table);

        let mut schedule = Schedule::default();
        schedule.add_systems(aggro_decay_system);
        schedule.run(&mut world);
        assert!(world.resource::<AggroTable>().is_active("crypt"));
        schedule.run(&mut world);
        assert!(!world.resource::<AggroTable>().is_active("crypt"));
    }

    #[test]
    fn test_chasing_member_freezes_ttl() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(8.0));
        let mut table = AggroTable::default();
        table.alert("crypt", 0.0, 0.0);
        world.insert_resource(table);

        let mut def = EnemyDef::new(0.0, 0.0);
        def.aggro_group = Some("crypt".to_string());
        let mut ai = ai_from_def(&def);
        ai.state = crate::components::EnemyState::Chase;
        world.spawn(ai);

        let mut schedule = Schedule::default();
        schedule.add_systems(aggro_decay_system);
        for _ in 0..5 {
            schedule.run(&mut world);
        }
        // 40 seconds elapsed but the group stayed hot.
        assert!(world.resource::<AggroTable>().is_active("crypt"));
        assert_eq!(world.resource::<AggroTable>().get("crypt").unwrap().ttl, AGGRO_TTL_DEFAULT);
    }
}
