use bevy::prelude::*;
use rand::Rng;

use crate::collections::{ProbSelectable, WeightedSliceExt};

/// Configuration of one object pool.
#[derive(Clone, Debug, PartialEq)]
pub struct Pool {
    pub tag: String,
    /// Asset path of the scene instantiated to fill the pool.
    pub prefab: String,
    pub size: usize,
    weight: f32,
    /// `weight` normalized against the other pools of a catalog.
    share: f32,
}

impl Pool {
    pub fn new(tag: impl Into<String>, prefab: impl Into<String>, size: usize) -> Self {
        Self {
            tag: tag.into(),
            prefab: prefab.into(),
            size,
            weight: 0.0,
            share: 0.0,
        }
    }

    /// Relative weight in `[0, 1]`. A catalog derives each pool's spawn
    /// probability from the weights of all its pools.
    pub fn with_spawn_probability(mut self, probability: f32) -> Self {
        self.weight = clamp_unit(probability);
        self.share = self.weight;
        self
    }

    /// The configured weight, untouched by normalization.
    pub fn weight(&self) -> f32 {
        self.weight
    }

    /// Probability of this pool being picked from its catalog.
    pub fn spawn_probability(&self) -> f32 {
        self.share
    }
}

fn clamp_unit(probability: f32) -> f32 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}

impl ProbSelectable for Pool {
    fn select_probability(&self) -> f32 {
        self.share
    }

    fn set_select_probability(&mut self, probability: f32) {
        self.share = clamp_unit(probability);
    }
}

#[derive(Resource, Clone, Debug, Default)]
pub struct PoolCatalog {
    pools: Vec<Pool>,
}

impl PoolCatalog {
    /// Builds a catalog with spawn probabilities normalized from the pool weights.
    pub fn new(pools: Vec<Pool>) -> Self {
        let mut catalog = Self { pools };
        catalog.normalize();
        catalog
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn find(&self, tag: &str) -> Option<&Pool> {
        self.pools.iter().find(|p| p.tag == tag)
    }

    pub fn push(&mut self, pool: Pool) {
        if self.find(&pool.tag).is_some() {
            warn!("pool tag {:?} registered twice, lookups return the first", pool.tag);
        }
        self.pools.push(pool);
        self.normalize();
    }

    /// Recomputes every spawn probability from the configured weights, so the
    /// result does not depend on insertion order or on earlier calls.
    pub fn normalize(&mut self) {
        self.pools.normalize_probabilities_by(Pool::weight);
    }

    /// Weighted random pool.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<&Pool> {
        self.pools.select_with_probability(rng)
    }

    pub fn total_size(&self) -> usize {
        self.pools.iter().map(|p| p.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawn_probability_is_clamped() {
        let pool = |p| Pool::new("a", "a.glb", 1).with_spawn_probability(p);
        assert_eq!(pool(1.5).weight(), 1.0);
        assert_eq!(pool(-2.0).weight(), 0.0);
        assert_eq!(pool(f32::NAN).weight(), 0.0);
    }

    #[test]
    fn catalog_normalizes_across_pools() {
        let catalog = PoolCatalog::new(vec![
            Pool::new("rock", "rock.glb", 16).with_spawn_probability(0.5),
            Pool::new("gem", "gem.glb", 4).with_spawn_probability(0.5),
            Pool::new("coin", "coin.glb", 8).with_spawn_probability(1.0),
        ]);
        assert_relative_eq!(catalog.find("rock").unwrap().spawn_probability(), 0.25);
        assert_relative_eq!(catalog.find("coin").unwrap().spawn_probability(), 0.5);
        assert_eq!(catalog.total_size(), 28);
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn unweighted_catalog_is_uniform() {
        let mut catalog = PoolCatalog::default();
        catalog.push(Pool::new("a", "a.glb", 1));
        catalog.push(Pool::new("b", "b.glb", 1));
        for pool in catalog.pools() {
            assert_relative_eq!(pool.spawn_probability(), 0.5);
            assert_eq!(pool.weight(), 0.0);
        }
    }

    #[test]
    fn pushed_pools_keep_weights_and_ignore_order() {
        let pools = [
            Pool::new("rock", "rock.glb", 16).with_spawn_probability(0.2),
            Pool::new("gem", "gem.glb", 4).with_spawn_probability(0.6),
            Pool::new("coin", "coin.glb", 8).with_spawn_probability(0.2),
        ];
        let mut forward = PoolCatalog::default();
        for pool in pools.iter().cloned() {
            forward.push(pool);
        }
        let mut backward = PoolCatalog::default();
        for pool in pools.iter().rev().cloned() {
            backward.push(pool);
        }
        forward.normalize();

        for tag in ["rock", "gem", "coin"] {
            let a = forward.find(tag).unwrap();
            let b = backward.find(tag).unwrap();
            assert_relative_eq!(a.spawn_probability(), b.spawn_probability());
        }
        assert_relative_eq!(forward.find("gem").unwrap().spawn_probability(), 0.6);
        assert_relative_eq!(forward.find("gem").unwrap().weight(), 0.6);
        assert_relative_eq!(forward.find("rock").unwrap().spawn_probability(), 0.2);
    }

    #[test]
    fn pick_only_returns_weighted_pools() {
        let catalog = PoolCatalog::new(vec![
            Pool::new("off", "off.glb", 1),
            Pool::new("on", "on.glb", 1).with_spawn_probability(0.3),
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(catalog.pick(&mut rng).unwrap().tag, "on");
        }
        assert!(PoolCatalog::default().pick(&mut rng).is_none());
    }
}
