//! Score capture for manual index cursors

use stratagraph_core::LegacyIndexHits;

/// An entity id paired with the score the cursor reported for it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredHit {
    /// Entity id
    pub id: u64,
    /// Score at the position the id was produced; `None` for exact lookups
    pub score: Option<f32>,
}

impl ScoredHit {
    /// Score as a result weight; an unscored hit weighs `0.0`
    pub fn weight(&self) -> f64 {
        self.score.map(f64::from).unwrap_or(0.0)
    }
}

/// Adapts a [`LegacyIndexHits`] cursor into [`ScoredHit`]s.
///
/// The score is read immediately after each `next()`, before the cursor can
/// move on, so every hit carries the score of its own position.
pub struct ScoredHits {
    hits: Box<dyn LegacyIndexHits>,
}

impl ScoredHits {
    /// Wrap a cursor
    pub fn new(hits: Box<dyn LegacyIndexHits>) -> Self {
        ScoredHits { hits }
    }
}

impl Iterator for ScoredHits {
    type Item = ScoredHit;

    fn next(&mut self) -> Option<ScoredHit> {
        let id = self.hits.next()?;
        Some(ScoredHit {
            id,
            score: self.hits.current_score(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.hits.size_hint()
    }
}
