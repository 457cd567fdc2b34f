//! Scored, filtered and weighted-random picks over slices.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait ScoredSliceExt<T> {
    /// First element with the highest score.
    fn max_by_score(&self, score: impl Fn(&T) -> f64) -> Option<&T>;
    /// First element with the lowest score.
    fn min_by_score(&self, score: impl Fn(&T) -> f64) -> Option<&T>;
    fn all_max_by_score(&self, score: impl Fn(&T) -> f64) -> Vec<&T>;
    fn all_min_by_score(&self, score: impl Fn(&T) -> f64) -> Vec<&T>;
    /// Elements accepted by every predicate, in order.
    fn matching_all(&self, predicates: &[&dyn Fn(&T) -> bool]) -> Vec<&T>;
    fn shuffle_seeded(&mut self, seed: u64) -> &mut Self;
    /// Pairs each element with the first element of `other` it matches.
    /// Elements without a match are left out.
    fn zip_with_first_matching<'a, U>(
        &'a self,
        other: &'a [U],
        matches: impl Fn(&T, &U) -> bool,
    ) -> Vec<(&'a T, &'a U)>;
}

fn best_by<T>(
    items: &[T],
    score: impl Fn(&T) -> f64,
    better: fn(f64, f64) -> bool,
) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for item in items {
        let s = score(item);
        if best.map_or(true, |(_, b)| better(s, b)) {
            best = Some((item, s));
        }
    }
    best.map(|(item, _)| item)
}

fn all_best_by<T>(
    items: &[T],
    score: impl Fn(&T) -> f64,
    better: fn(f64, f64) -> bool,
) -> Vec<&T> {
    let Some(target) = best_by(items, &score, better).map(&score) else {
        return Vec::new();
    };
    items.iter().filter(|item| score(*item) == target).collect()
}

impl<T> ScoredSliceExt<T> for [T] {
    fn max_by_score(&self, score: impl Fn(&T) -> f64) -> Option<&T> {
        best_by(self, score, |a, b| a > b)
    }

    fn min_by_score(&self, score: impl Fn(&T) -> f64) -> Option<&T> {
        best_by(self, score, |a, b| a < b)
    }

    fn all_max_by_score(&self, score: impl Fn(&T) -> f64) -> Vec<&T> {
        all_best_by(self, score, |a, b| a > b)
    }

    fn all_min_by_score(&self, score: impl Fn(&T) -> f64) -> Vec<&T> {
        all_best_by(self, score, |a, b| a < b)
    }

    fn matching_all(&self, predicates: &[&dyn Fn(&T) -> bool]) -> Vec<&T> {
        self.iter()
            .filter(|item| predicates.iter().all(|p| p(*item)))
            .collect()
    }

    fn shuffle_seeded(&mut self, seed: u64) -> &mut Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let len = self.len();
        for i in 0..len.saturating_sub(1) {
            let j = rng.gen_range(i..len);
            self.swap(i, j);
        }
        self
    }

    fn zip_with_first_matching<'a, U>(
        &'a self,
        other: &'a [U],
        matches: impl Fn(&T, &U) -> bool,
    ) -> Vec<(&'a T, &'a U)> {
        self.iter()
            .filter_map(|a| other.iter().find(|b| matches(a, b)).map(|b| (a, b)))
            .collect()
    }
}

/// Something picked by probability.
pub trait ProbSelectable {
    fn select_probability(&self) -> f32;
    fn set_select_probability(&mut self, probability: f32);
}

pub trait WeightedSliceExt<T: ProbSelectable> {
    /// Draws `r` in `[0, 1)` and returns the first element whose cumulative
    /// probability exceeds it. Falls back to the last element with a positive
    /// probability when the probabilities sum to less than `r`.
    fn select_with_probability<R: Rng>(&self, rng: &mut R) -> Option<&T>;
    /// Sets each probability to `value / sum(value)`, or to `1 / len` when the
    /// values sum to zero.
    fn normalize_probabilities_by(&mut self, value: impl Fn(&T) -> f32);
    fn normalize_probabilities(&mut self);
}

impl<T: ProbSelectable> WeightedSliceExt<T> for [T] {
    fn select_with_probability<R: Rng>(&self, rng: &mut R) -> Option<&T> {
        let r: f32 = rng.gen();
        let mut cumulative = 0.0;
        for item in self {
            cumulative += item.select_probability();
            if r < cumulative {
                return Some(item);
            }
        }
        self.iter()
            .rev()
            .find(|item| item.select_probability() > 0.0)
            .or_else(|| self.last())
    }

    fn normalize_probabilities_by(&mut self, value: impl Fn(&T) -> f32) {
        let values: Vec<f32> = self.iter().map(&value).collect();
        let sum: f32 = values.iter().sum();
        let uniform = 1.0 / self.len() as f32;
        for (item, v) in self.iter_mut().zip(values) {
            item.set_select_probability(if sum == 0.0 { uniform } else { v / sum });
        }
    }

    fn normalize_probabilities(&mut self) {
        self.normalize_probabilities_by(T::select_probability);
    }
}
