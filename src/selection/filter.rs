use super::raycast::RayHit;

/// A single gate evaluated against a ray cast hit.
pub type Predicate = Box<dyn Fn(&RayHit) -> bool + Send + Sync>;

/// AND-composition of injected predicates. Append-only.
#[derive(Default)]
pub struct PredicateFilter {
    predicates: Vec<Predicate>,
}

impl PredicateFilter {
    pub fn inject<I>(&mut self, predicates: I)
    where
        I: IntoIterator<Item = Predicate>,
    {
        self.predicates.extend(predicates);
    }

    pub fn push(&mut self, predicate: impl Fn(&RayHit) -> bool + Send + Sync + 'static) {
        self.predicates.push(Box::new(predicate));
    }

    /// True when every predicate accepts `hit`. An empty filter accepts everything.
    pub fn satisfies(&self, hit: &RayHit) -> bool {
        self.predicates.iter().all(|p| p(hit))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl std::fmt::Debug for PredicateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredicateFilter")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}
