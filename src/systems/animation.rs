//! Animation playback and the shared iframe flicker clock.

use crate::components::*;
use crate::systems::movement::DeltaTime;
use bevy_ecs::prelude::*;

/// Global visibility strobe for entities inside their invincibility window.
/// Snapshot extraction reads `visible` instead of per-entity flicker state,
/// so every hurt entity blinks in phase.
#[derive(Resource, Debug)]
pub struct IframeFlicker {
    pub timer: f32,
    pub visible: bool,
}

impl Default for IframeFlicker {
    fn default() -> Self {
        Self { timer: 0.0, visible: true }
    }
}

/// Seconds between flicker toggles.
const FLICKER_PERIOD: f32 = 0.08;

/// Pick the walk clip matching a movement direction, or idle when still.
/// Left-facing movement reuses `walk_side` with a horizontal flip.
pub fn apply_walk_anim(animator: &mut Animator, dx: f32, dy: f32) {
    if dx == 0.0 && dy == 0.0 {
        animator.play("idle");
        return;
    }
    if dy.abs() > dx.abs() {
        animator.play(if dy > 0.0 { "walk_down" } else { "walk_up" });
    } else {
        animator.play("walk_side");
        animator.flip_x = dx < 0.0;
    }
}

/// System that selects walk clips from velocity and advances every playback
/// cursor. Enemies are skipped for clip selection because the state machine
/// drives their clips, but their cursors still advance here.
pub fn animation_system(
    dt: Res<DeltaTime>,
    mut query: Query<(&mut Animator, Option<&Velocity>, Option<&EnemyAi>)>,
) {
    let delta = dt.0;
    for (mut animator, vel, ai) in query.iter_mut() {
        if ai.is_none() {
            if let Some(vel) = vel {
                apply_walk_anim(&mut animator, vel.dx, vel.dy);
            }
        }
        animator.advance(delta);
    }
}

/// System that advances the shared flicker strobe.
pub fn flicker_system(dt: Res<DeltaTime>, mut flicker: ResMut<IframeFlicker>) {
    flicker.timer += dt.0;
    while flicker.timer >= FLICKER_PERIOD {
        flicker.timer -= FLICKER_PERIOD;
        flicker.visible = !flicker.visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::clips_from_sprite;

    #[test]
    fn test_walk_anim_selection() {
        let mut anim = Animator::new(clips_from_sprite("hero"), "idle");

        apply_walk_anim(&mut anim, 0.0, 10.0);
        assert_eq!(anim.current, "walk_down");

        apply_walk_anim(&mut anim, 0.0, -10.0);
        assert_eq!(anim.current, "walk_up");

        apply_walk_anim(&mut anim, -10.0, 2.0);
        assert_eq!(anim.current, "walk_side");
        assert!(anim.flip_x);

        apply_walk_anim(&mut anim, 0.0, 0.0);
        assert_eq!(anim.current, "idle");
    }

    #[test]
    fn test_animator_advances_and_loops() {
        let mut clips = std::collections::HashMap::new();
        clips.insert(
            "walk_down".to_string(),
            Clip::new(vec!["a".into(), "b".into()], 0.1),
        );
        let mut world = World::new();
        world.insert_resource(DeltaTime(0.15));
        let e = world
            .spawn((
                Animator::new(clips, "walk_down"),
                Velocity { dx: 0.0, dy: 5.0, speed: 5.0 },
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(animation_system);
        schedule.run(&mut world);

        let anim = world.get::<Animator>(e).unwrap();
        assert_eq!(anim.current_frame(), Some("b"));
    }

    #[test]
    fn test_flicker_toggles() {
        let mut world = World::new();
        world.insert_resource(DeltaTime(0.1));
        world.insert_resource(IframeFlicker::default());

        let mut schedule = Schedule::default();
        schedule.add_systems(flicker_system);
        schedule.run(&mut world);

        assert!(!world.resource::<IframeFlicker>().visible);
        schedule.run(&mut world);
        assert!(world.resource::<IframeFlicker>().visible);
    }
}
