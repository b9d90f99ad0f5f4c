//! Builds autoplay search queries from a seed track.
//!
//! Each provider gets its own query builder, registered by source name, so
//! adding a provider is additive. Sources without a registered builder fall
//! back to a plain author-name search.

use crate::track::Track;
use std::collections::HashMap;

pub type QueryBuilder = fn(&Track) -> String;

pub struct QueryRegistry {
    builders: HashMap<String, QueryBuilder>,
}

impl QueryRegistry {
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registry with the builders for the providers we ship support for
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("youtube", youtube_mix_query);
        registry
    }

    pub fn register(&mut self, source: &str, builder: QueryBuilder) {
        self.builders.insert(source.to_ascii_lowercase(), builder);
    }

    /// Builds the similarity query for a seed track
    pub fn build(&self, seed: &Track) -> String {
        match self.builders.get(&seed.source.to_ascii_lowercase()) {
            Some(builder) => builder(seed),
            None => author_query(seed),
        }
    }
}

impl Default for QueryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// YouTube mix/radio playlist keyed by the seed's video id
pub fn youtube_mix_query(seed: &Track) -> String {
    format!(
        "https://www.youtube.com/watch?v={id}&list=RD{id}",
        id = seed.identifier
    )
}

/// Plain author-name search, the generic strategy
pub fn author_query(seed: &Track) -> String {
    seed.author.clone()
}

/// Exact-phrase author search, used when a mix lookup is unsupported
pub fn quoted_author_query(seed: &Track) -> String {
    format!("\"{}\"", seed.author)
}
