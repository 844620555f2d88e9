//! Manual (legacy) index store
//!
//! A manual index maps `key -> value text -> entity ids`. Exact lookups
//! return ids in ascending order without scores. Pattern queries are scored
//! with an IDF sum over the matching clauses and returned best first.
//!
//! # Scoring
//!
//! For each clause, `df` is the number of distinct entities matching it and
//! `N` the number of distinct entities in the index:
//!
//! ```text
//! IDF(clause) = ln((N - df + 0.5) / (df + 0.5) + 1)
//! score(id)   = sum of IDF over the clauses id matches
//! ```

use std::collections::{BTreeMap, BTreeSet};

use stratagraph_core::{
    EntityType, GraphError, GraphResult, IndexConfig, LegacyIndexHits, QueryClause,
};

/// Default configuration given to newly created manual indexes
pub fn default_index_config() -> IndexConfig {
    let mut config = IndexConfig::new();
    config.insert("provider".to_string(), "lucene".to_string());
    config.insert("type".to_string(), "exact".to_string());
    config
}

/// One manual index
#[derive(Debug, Clone)]
pub(crate) struct ManualIndex {
    config: IndexConfig,
    entries: BTreeMap<String, BTreeMap<String, BTreeSet<u64>>>,
}

impl ManualIndex {
    pub(crate) fn new(config: IndexConfig) -> Self {
        ManualIndex {
            config,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub(crate) fn add(&mut self, id: u64, key: &str, text: String) {
        self.entries
            .entry(key.to_string())
            .or_default()
            .entry(text)
            .or_default()
            .insert(id);
    }

    /// Remove the entity's entries under `key`, or under every key
    pub(crate) fn remove(&mut self, id: u64, key: Option<&str>) {
        match key {
            Some(key) => {
                if let Some(values) = self.entries.get_mut(key) {
                    Self::remove_from(values, id);
                    if values.is_empty() {
                        self.entries.remove(key);
                    }
                }
            }
            None => {
                for values in self.entries.values_mut() {
                    Self::remove_from(values, id);
                }
                self.entries.retain(|_, values| !values.is_empty());
            }
        }
    }

    fn remove_from(values: &mut BTreeMap<String, BTreeSet<u64>>, id: u64) {
        for ids in values.values_mut() {
            ids.remove(&id);
        }
        values.retain(|_, ids| !ids.is_empty());
    }

    /// Exact lookup, ascending ids
    pub(crate) fn get(&self, key: &str, text: &str) -> Vec<u64> {
        self.entries
            .get(key)
            .and_then(|values| values.get(text))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Scored search, best first; ties broken by ascending id
    pub(crate) fn query(&self, clauses: &[QueryClause]) -> Vec<(u64, f32)> {
        let total = self.entity_count().max(1) as f32;
        let mut scores: BTreeMap<u64, f32> = BTreeMap::new();

        for clause in clauses {
            let matched = self.matching_ids(clause);
            if matched.is_empty() {
                continue;
            }
            let df = matched.len() as f32;
            let idf = ((total - df + 0.5) / (df + 0.5) + 1.0).ln();
            for id in matched {
                *scores.entry(id).or_insert(0.0) += idf;
            }
        }

        let mut hits: Vec<(u64, f32)> = scores.into_iter().collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        hits
    }

    fn matching_ids(&self, clause: &QueryClause) -> BTreeSet<u64> {
        let Some(values) = self.entries.get(&clause.key) else {
            return BTreeSet::new();
        };
        if clause.has_wildcards() {
            values
                .iter()
                .filter(|(text, _)| glob_match(&clause.pattern, text))
                .flat_map(|(_, ids)| ids.iter().copied())
                .collect()
        } else {
            values.get(&clause.pattern).cloned().unwrap_or_default()
        }
    }

    /// Number of distinct entities with at least one entry
    pub(crate) fn entity_count(&self) -> usize {
        self.entries
            .values()
            .flat_map(|values| values.values())
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// All manual indexes, per entity kind, in name order
#[derive(Debug, Default)]
pub(crate) struct ManualIndexes {
    nodes: BTreeMap<String, ManualIndex>,
    relationships: BTreeMap<String, ManualIndex>,
}

impl ManualIndexes {
    pub(crate) fn indexes(&self, entity: EntityType) -> &BTreeMap<String, ManualIndex> {
        match entity {
            EntityType::Node => &self.nodes,
            EntityType::Relationship => &self.relationships,
        }
    }

    pub(crate) fn indexes_mut(&mut self, entity: EntityType) -> &mut BTreeMap<String, ManualIndex> {
        match entity {
            EntityType::Node => &mut self.nodes,
            EntityType::Relationship => &mut self.relationships,
        }
    }

    pub(crate) fn get(&self, entity: EntityType, name: &str) -> GraphResult<&ManualIndex> {
        self.indexes(entity)
            .get(name)
            .ok_or_else(|| GraphError::LegacyIndexNotFound {
                entity,
                name: name.to_string(),
            })
    }

    pub(crate) fn get_mut(&mut self, entity: EntityType, name: &str) -> GraphResult<&mut ManualIndex> {
        self.indexes_mut(entity)
            .get_mut(name)
            .ok_or_else(|| GraphError::LegacyIndexNotFound {
                entity,
                name: name.to_string(),
            })
    }

    pub(crate) fn get_or_create(&mut self, entity: EntityType, name: &str) -> &mut ManualIndex {
        self.indexes_mut(entity)
            .entry(name.to_string())
            .or_insert_with(|| ManualIndex::new(default_index_config()))
    }
}

/// Match `text` against a glob with `*` and `?`
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            t = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '*')
}

/// Materialized hit cursor
///
/// Hits are computed when the lookup runs; the cursor owns them so it does
/// not borrow the store.
pub struct IndexHits {
    hits: std::vec::IntoIter<(u64, Option<f32>)>,
    current: Option<f32>,
}

impl IndexHits {
    /// Hits without scores
    pub fn unscored(ids: Vec<u64>) -> Self {
        IndexHits {
            hits: ids
                .into_iter()
                .map(|id| (id, None))
                .collect::<Vec<_>>()
                .into_iter(),
            current: None,
        }
    }

    /// Hits with a score per id
    pub fn scored(hits: Vec<(u64, f32)>) -> Self {
        IndexHits {
            hits: hits
                .into_iter()
                .map(|(id, score)| (id, Some(score)))
                .collect::<Vec<_>>()
                .into_iter(),
            current: None,
        }
    }
}

impl Iterator for IndexHits {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let (id, score) = self.hits.next()?;
        self.current = score;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.hits.size_hint()
    }
}

impl LegacyIndexHits for IndexHits {
    fn current_score(&self) -> Option<f32> {
        self.current
    }
}
