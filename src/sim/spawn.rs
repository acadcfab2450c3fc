//! Obstacle spawner
//!
//! Runs on a fixed 1-second cadence whenever the simulation steps, including
//! before the round is started. Pre-start spawning is deliberate: pads are
//! already queuing up when the first tap lands.

use rand::Rng;

use super::state::{Obstacle, ObstacleVariant, OscPhase, Round, Side, SimEvent};
use crate::consts::*;

/// Map a uniform roll in `0..=300` to an obstacle side and variant.
///
/// Six 50-wide buckets, alternating right/left:
/// plain, plain, hazardous, hazardous, moving, moving.
pub fn bucket(roll: u32) -> (Side, ObstacleVariant) {
    match roll {
        0..=50 => (Side::Right, ObstacleVariant::Plain),
        51..=100 => (Side::Left, ObstacleVariant::Plain),
        101..=150 => (Side::Right, ObstacleVariant::Hazardous),
        151..=200 => (Side::Left, ObstacleVariant::Hazardous),
        201..=250 => (Side::Right, ObstacleVariant::Moving),
        _ => (Side::Left, ObstacleVariant::Moving),
    }
}

/// Spawn one obstacle at the bottom edge
pub fn spawn_obstacle(round: &mut Round) {
    let roll = round.rng.random_range(0..=SPAWN_ROLL_MAX);
    let (side, variant) = bucket(roll);
    let id = round.next_entity_id();

    round.obstacles.push(Obstacle {
        id,
        variant,
        side,
        spawn_tick: round.time_ticks,
        y: -PAD_HEIGHT,
        osc_offset: 0.0,
        osc_phase: OscPhase::Advance,
        osc_elapsed: 0.0,
    });
    round.events.push(SimEvent::ObstacleSpawned { id, variant });
    log::debug!("spawned obstacle {id}: roll={roll} {side:?} {variant:?}");
}

/// Drop obstacles whose traversal lifetime has elapsed
pub fn despawn_expired(round: &mut Round) {
    let lifetime =
        Obstacle::lifetime_ticks(round.tuning.field_height, round.tuning.fall_speed) as u64;
    let now = round.time_ticks;
    round.obstacles.retain(|o| now - o.spawn_tick < lifetime);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_bucket_boundaries() {
        // One probe per row boundary of the spawn table
        assert_eq!(bucket(0), (Side::Right, ObstacleVariant::Plain));
        assert_eq!(bucket(50), (Side::Right, ObstacleVariant::Plain));
        assert_eq!(bucket(100), (Side::Left, ObstacleVariant::Plain));
        assert_eq!(bucket(150), (Side::Right, ObstacleVariant::Hazardous));
        assert_eq!(bucket(200), (Side::Left, ObstacleVariant::Hazardous));
        assert_eq!(bucket(250), (Side::Right, ObstacleVariant::Moving));
        assert_eq!(bucket(300), (Side::Left, ObstacleVariant::Moving));
    }

    #[test]
    fn test_bucket_interiors() {
        assert_eq!(bucket(51), (Side::Left, ObstacleVariant::Plain));
        assert_eq!(bucket(101), (Side::Right, ObstacleVariant::Hazardous));
        assert_eq!(bucket(201), (Side::Right, ObstacleVariant::Moving));
        assert_eq!(bucket(251), (Side::Left, ObstacleVariant::Moving));
    }

    #[test]
    fn test_spawn_enters_at_bottom() {
        let mut round = Round::new(42, Tuning::default());
        spawn_obstacle(&mut round);
        assert_eq!(round.obstacles.len(), 1);
        let o = &round.obstacles[0];
        assert_eq!(o.y, -PAD_HEIGHT);
        assert_eq!(o.osc_offset, 0.0);
    }

    #[test]
    fn test_spawn_deterministic_per_seed() {
        let mut a = Round::new(1234, Tuning::default());
        let mut b = Round::new(1234, Tuning::default());
        for _ in 0..20 {
            spawn_obstacle(&mut a);
            spawn_obstacle(&mut b);
        }
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(oa.variant, ob.variant);
            assert_eq!(oa.side, ob.side);
        }
    }

    #[test]
    fn test_despawn_after_traversal() {
        let tuning = Tuning::default();
        let lifetime = Obstacle::lifetime_ticks(tuning.field_height, tuning.fall_speed) as u64;
        let mut round = Round::new(42, tuning);
        spawn_obstacle(&mut round);

        round.time_ticks = lifetime - 1;
        despawn_expired(&mut round);
        assert_eq!(round.obstacles.len(), 1);

        round.time_ticks = lifetime;
        despawn_expired(&mut round);
        assert!(round.obstacles.is_empty());
    }
}
