//! Plane vs coin collection
//!
//! Coins are circles; the plane is approximated by a circle of half its larger
//! dimension. The test is discrete (once per fixed step), so a plane covering
//! more than a coin's width in one step can pass through it.

use super::coin::Coin;
use super::flight::FlyingBody;
use super::pool::EntityPool;
use super::state::GameEvent;

/// Overlap test between a coin and the plane's bounding circle
#[inline]
pub fn coin_hits_plane(coin: &Coin, plane: &FlyingBody) -> bool {
    let dist = coin.body.pos.distance(plane.body.pos);
    let plane_extent = plane.body.half_extents().max_element();
    dist < coin.radius + plane_extent
}

/// Collect `coin` if it's live and overlapping. True only on the step it's
/// collected; collected or inactive coins never hit again.
pub fn try_collect(coin: &mut Coin, plane: &FlyingBody) -> bool {
    if !coin.body.active || coin.collected {
        return false;
    }
    coin_hits_plane(coin, plane) && coin.collect()
}

/// Run the collection test over every live coin, pushing one event per newly
/// collected coin. Returns the total value collected this step.
pub fn collect_coins(
    coins: &mut EntityPool<Coin>,
    plane: &FlyingBody,
    events: &mut Vec<GameEvent>,
) -> u64 {
    let mut value = 0;
    for (_, coin) in coins.iter_mut() {
        if try_collect(coin, plane) {
            value += coin.value;
            events.push(GameEvent::CoinCollected {
                value: coin.value,
                pos: coin.body.pos,
            });
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Entity;
    use crate::tuning::Tuning;
    use crate::upgrades::Multipliers;
    use glam::DVec2;

    fn plane_at(pos: DVec2) -> FlyingBody {
        let mut plane = FlyingBody::default();
        plane.prepare(pos, Multipliers::default(), &Tuning::default());
        plane
    }

    fn coin_at(pos: DVec2) -> Coin {
        let mut coin = Coin::default();
        coin.spawn(pos, 0.0, &Tuning::default());
        coin
    }

    #[test]
    fn test_hit_distance() {
        let plane = plane_at(DVec2::new(100.0, 100.0));
        // radius 15 + half of 60 = 45
        assert!(coin_hits_plane(&coin_at(DVec2::new(144.9, 100.0)), &plane));
        assert!(!coin_hits_plane(&coin_at(DVec2::new(145.0, 100.0)), &plane));
        assert!(coin_hits_plane(&coin_at(DVec2::new(100.0, 140.0)), &plane));
    }

    #[test]
    fn test_collection_idempotent() {
        let plane = plane_at(DVec2::new(100.0, 100.0));
        let mut coin = coin_at(DVec2::new(110.0, 100.0));
        assert!(try_collect(&mut coin, &plane));
        for _ in 0..5 {
            assert!(!try_collect(&mut coin, &plane));
            assert!(coin.collected);
            assert!(!coin.is_active());
        }
    }

    #[test]
    fn test_inactive_coin_ignored() {
        let plane = plane_at(DVec2::new(100.0, 100.0));
        let mut coin = Coin::default();
        coin.body.pos = DVec2::new(100.0, 100.0);
        assert!(!try_collect(&mut coin, &plane));
        assert!(!coin.collected);
    }

    #[test]
    fn test_pass_emits_once_per_coin() {
        let plane = plane_at(DVec2::new(100.0, 100.0));
        let mut coins: EntityPool<Coin> = EntityPool::with_capacity(3);
        for x in [100.0, 120.0, 900.0] {
            let h = coins.acquire();
            coins
                .get_mut(h)
                .unwrap()
                .spawn(DVec2::new(x, 100.0), 0.0, &Tuning::default());
        }

        let mut events = Vec::new();
        assert_eq!(collect_coins(&mut coins, &plane, &mut events), 20);
        assert_eq!(events.len(), 2);

        assert_eq!(collect_coins(&mut coins, &plane, &mut events), 0);
        assert_eq!(events.len(), 2);
    }
}
