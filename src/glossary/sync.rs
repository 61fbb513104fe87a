/*!
 * Remote glossary synchronization.
 *
 * The remote service may hold any number of glossaries; this crate owns the
 * one carrying a fixed logical name. When the local file changes, that
 * glossary is deleted and recreated for the language pair in use. Otherwise
 * the cached handle is reused, or one left by an earlier run is looked up once.
 */

use log::{debug, info, warn};

use super::GlossaryStore;
use crate::errors::GlossaryError;
use crate::language_utils;
use crate::providers::{self, RemoteGlossary, TranslationBackend};

/// Logical name of the glossary this crate manages remotely
pub const GLOSSARY_NAME: &str = "myllm_glossary";

/// Keeps the remote glossary in step with the local glossary file
#[derive(Debug)]
pub struct GlossarySync {
    store: GlossaryStore,
    name: String,
    active: Option<RemoteGlossary>,
    // Set once this session has either looked up or rebuilt the remote glossary
    lookup_settled: bool,
    // Set once a pending change has been reported for an auto-detected source
    auto_pending_reported: bool,
    // Language pairs already reported as not served by the cached glossary
    skipped_pairs: Vec<(String, String)>,
}

impl GlossarySync {
    pub fn new(store: GlossaryStore) -> Self {
        Self::with_name(store, GLOSSARY_NAME)
    }

    pub fn with_name(store: GlossaryStore, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            active: None,
            lookup_settled: false,
            auto_pending_reported: false,
            skipped_pairs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &GlossaryStore {
        &self.store
    }

    /// The cached remote glossary, whatever its language pair
    pub fn active(&self) -> Option<&RemoteGlossary> {
        self.active.as_ref()
    }

    /// Drop the cached glossary reference
    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Make sure the remote glossary reflects the local file, and return the
    /// glossary to use for this language pair.
    ///
    /// Unchanged file: the cached glossary (no remote calls), or `None` when
    /// nothing is cached or it was built for another language pair. The remote
    /// glossary is only rebuilt when the file changes, so a glossary created
    /// for en -> fr is not used for en -> de until the file is edited.
    ///
    /// Changed file: the first remote glossary with our name is deleted (a
    /// failed delete is only logged), then a new one is created from the file
    /// unless it has no usable entries. Any failure clears the cache and is
    /// returned for the caller to degrade on.
    ///
    /// An `auto` source cannot key a glossary: a change found then is left
    /// unrecorded, reported once as `AutoSourceLanguage`, and synchronized by
    /// the first call with an explicit source language.
    pub async fn ensure_glossary<B: TranslationBackend + ?Sized>(
        &mut self,
        backend: &B,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Option<RemoteGlossary>, GlossaryError> {
        if language_utils::is_auto(source_lang) {
            if self.store.pending_fingerprint()?.is_none() || self.auto_pending_reported {
                return Ok(None);
            }
            self.auto_pending_reported = true;
            return Err(GlossaryError::AutoSourceLanguage);
        }

        if !self.store.is_modified_since_last_sync()? {
            return Ok(self.usable(source_lang, target_lang));
        }

        info!("Glossary {:?} changed, synchronizing remote glossary '{}'", self.store.path(), self.name);
        self.lookup_settled = true;
        self.active = None;

        let created = self.replace(backend, source_lang, target_lang).await?;
        self.active = created.clone();
        Ok(created)
    }

    /// Reuse a glossary an earlier run left on the service.
    ///
    /// Lists remote glossaries at most once per session, and not at all once
    /// `ensure_glossary` has rebuilt it. The first glossary with our name is
    /// cached and returned if it serves this language pair.
    pub async fn discover_existing<B: TranslationBackend + ?Sized>(
        &mut self,
        backend: &B,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Option<RemoteGlossary>, GlossaryError> {
        if self.lookup_settled || self.active.is_some() {
            return Ok(self.usable(source_lang, target_lang));
        }
        self.lookup_settled = true;

        let existing = backend.list_glossaries().await?;
        self.active = providers::find_by_name(&existing, &self.name).cloned();
        match &self.active {
            Some(glossary) => info!(
                "Reusing remote glossary '{}' ({} -> {}, {} entries)",
                glossary.name, glossary.source_lang, glossary.target_lang, glossary.entry_count
            ),
            None => debug!("No remote glossary named '{}'", self.name),
        }

        Ok(self.usable(source_lang, target_lang))
    }

    async fn replace<B: TranslationBackend + ?Sized>(
        &self,
        backend: &B,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Option<RemoteGlossary>, GlossaryError> {
        let existing = backend.list_glossaries().await?;
        if let Some(stale) = providers::find_by_name(&existing, &self.name) {
            match backend.delete_glossary(stale).await {
                Ok(()) => debug!("Deleted remote glossary {}", stale.glossary_id),
                Err(e) => warn!("Failed to delete remote glossary {}, creating anyway: {}", stale.glossary_id, e),
            }
        }

        let entries = self.store.read_entries()?;
        if entries.is_empty() {
            info!("Glossary {:?} has no usable entries, not creating a remote glossary", self.store.path());
            return Ok(None);
        }

        let created = backend
            .create_glossary(&self.name, source_lang, target_lang, &entries)
            .await?;
        info!(
            "Created remote glossary '{}' ({} -> {}, {} entries)",
            created.name, created.source_lang, created.target_lang, entries.len()
        );
        Ok(Some(created))
    }

    // Cached glossary, unless it belongs to another language pair
    fn usable(&mut self, source_lang: &str, target_lang: &str) -> Option<RemoteGlossary> {
        let glossary = self.active.as_ref()?;
        if glossary.matches_pair(source_lang, target_lang) {
            return Some(glossary.clone());
        }

        let pair = (source_lang.to_string(), target_lang.to_string());
        if self.skipped_pairs.contains(&pair) {
            debug!("Skipping glossary '{}' for {} -> {}", glossary.name, source_lang, target_lang);
        } else {
            info!(
                "Glossary '{}' is for {} -> {}, translating {} -> {} without it; edit the glossary file to rebuild it for this pair",
                glossary.name, glossary.source_lang, glossary.target_lang, source_lang, target_lang
            );
            self.skipped_pairs.push(pair);
        }
        None
    }
}
