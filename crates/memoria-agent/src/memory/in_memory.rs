//! Keyword-matching memory kept in process memory

use super::{MemoryEntry, MemoryService, SearchMemoryResponse};
use crate::error::MemoriaResult;
use crate::session::Session;
use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::{debug, info};

type ScopeKey = (String, String);

struct IndexedEntry {
    entry: MemoryEntry,
    words: HashSet<String>,
}

struct IngestedSession {
    session_id: String,
    entries: Vec<IndexedEntry>,
}

/// Memory service for development and tests
///
/// An event matches a query when they share at least one word (ASCII
/// letters, case-insensitive). Ingestion is keyed by session id: adding the
/// same session again replaces its earlier snapshot, so ingesting after
/// every turn never duplicates entries.
#[derive(Default)]
pub struct InMemoryMemoryService {
    scopes: RwLock<HashMap<ScopeKey, Vec<IngestedSession>>>,
}

impl InMemoryMemoryService {
    /// Create an empty memory
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of remembered entries for a user
    pub fn entry_count(&self, app_name: &str, user_id: &str) -> usize {
        self.scopes
            .read()
            .get(&(app_name.to_string(), user_id.to_string()))
            .map(|sessions| sessions.iter().map(|s| s.entries.len()).sum())
            .unwrap_or(0)
    }

    /// Number of distinct sessions ingested for a user
    pub fn session_count(&self, app_name: &str, user_id: &str) -> usize {
        self.scopes
            .read()
            .get(&(app_name.to_string(), user_id.to_string()))
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for InMemoryMemoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMemoryService")
            .field("scopes", &self.scopes.read().len())
            .finish()
    }
}

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z]+").expect("static pattern is valid"))
}

fn extract_words(text: &str) -> HashSet<String> {
    word_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

#[async_trait]
impl MemoryService for InMemoryMemoryService {
    async fn add_session_to_memory(&self, session: &Session) -> MemoriaResult<()> {
        let entries: Vec<IndexedEntry> = session
            .events
            .iter()
            .filter_map(|event| {
                let content = event.content.as_ref()?;
                let text = content.text()?;
                Some(IndexedEntry {
                    words: extract_words(&text),
                    entry: MemoryEntry {
                        content: content.clone(),
                        author: event.author.clone(),
                        timestamp: event.timestamp,
                    },
                })
            })
            .collect();

        let entry_count = entries.len();
        let scope = (session.app_name.clone(), session.user_id.clone());

        let mut scopes = self.scopes.write();
        let sessions = scopes.entry(scope).or_default();
        match sessions.iter_mut().find(|s| s.session_id == session.id) {
            Some(existing) => existing.entries = entries,
            None => sessions.push(IngestedSession {
                session_id: session.id.clone(),
                entries,
            }),
        }
        drop(scopes);

        info!(
            app_name = %session.app_name,
            user_id = %session.user_id,
            session_id = %session.id,
            entry_count,
            "Session added to memory"
        );

        Ok(())
    }

    async fn search_memory(
        &self,
        app_name: &str,
        user_id: &str,
        query: &str,
    ) -> MemoriaResult<SearchMemoryResponse> {
        let query_words = extract_words(query);
        if query_words.is_empty() {
            return Ok(SearchMemoryResponse::default());
        }

        let scopes = self.scopes.read();
        let memories: Vec<MemoryEntry> = scopes
            .get(&(app_name.to_string(), user_id.to_string()))
            .into_iter()
            .flatten()
            .flat_map(|s| s.entries.iter())
            .filter(|e| !e.words.is_disjoint(&query_words))
            .map(|e| e.entry.clone())
            .collect();
        drop(scopes);

        debug!(app_name, user_id, query, matches = memories.len(), "Memory searched");

        Ok(SearchMemoryResponse { memories })
    }
}
