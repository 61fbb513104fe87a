/*!
 * Glossary-aware translation adapter.
 *
 * The adapter is what the subtitle layer talks to. Each `translate` call
 * synchronizes the glossary if the local file changed, tries the translation
 * with the glossary, and falls back to a plain translation when anything about
 * the glossary goes wrong. Only a failure of that plain translation reaches the
 * caller.
 */

use log::{debug, error, info, warn};

use crate::app_config::Config;
use crate::errors::{AdapterError, TranslationError};
use crate::glossary::{GlossaryStore, GlossarySync};
use crate::providers::deepl::DeepL;
use crate::providers::{RemoteGlossary, TranslationBackend};

/// Translation session with glossary synchronization
///
/// `translate` takes `&mut self`: the cached glossary and the fingerprint
/// record are updated without locking, so one session serves one caller.
#[derive(Debug)]
pub struct TranslationAdapter<B: TranslationBackend = DeepL> {
    backend: B,
    glossary: GlossarySync,
    closed: bool,
}

impl TranslationAdapter<DeepL> {
    /// Build a DeepL-backed adapter from the application configuration
    pub async fn from_config(config: &Config) -> Result<Self, AdapterError> {
        let api_key = config.deepl.api_key.trim();
        if api_key.is_empty() {
            return Err(AdapterError::Configuration(
                "DeepL API key is required. Set DEEPL_API_KEY or pass --auth".to_string(),
            ));
        }

        let backend = DeepL::new(api_key, config.deepl.endpoint.as_str(), config.deepl.timeout_secs)
            .map_err(|e| AdapterError::Configuration(e.to_string()))?;
        let store = GlossaryStore::with_sidecar(&config.glossary.path, &config.glossary.hash_path);
        let glossary = GlossarySync::with_name(store, config.glossary.name.as_str());

        Self::connect(backend, glossary).await
    }
}

impl<B: TranslationBackend> TranslationAdapter<B> {
    /// Open a session on `backend`, probing it first
    ///
    /// A backend that cannot report its usage is not usable; the error is
    /// returned as is, without retrying.
    pub async fn connect(backend: B, glossary: GlossarySync) -> Result<Self, AdapterError> {
        let usage = backend.get_usage().await.map_err(|e| {
            error!("Error initializing translation backend: {}", e);
            error!("Check the API key and make sure the account is active.");
            AdapterError::Connectivity(e)
        })?;
        info!("Connected to translation service: {}", usage);

        Ok(Self {
            backend,
            glossary,
            closed: false,
        })
    }

    /// Translate `text` from `source_lang` to `target_lang`
    ///
    /// Blank text is returned unchanged without contacting the service.
    pub async fn translate(
        &mut self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError> {
        if self.closed {
            return Err(TranslationError::SessionClosed);
        }
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        if let Some(glossary) = self.resolve_glossary(source_lang, target_lang).await {
            match self.backend.translate_text(text, source_lang, target_lang, Some(&glossary)).await {
                Ok(translated) => return Ok(translated),
                Err(e) => warn!(
                    "Translation with glossary '{}' failed, retrying without it: {}",
                    glossary.name, e
                ),
            }
        }

        let translated = self.backend.translate_text(text, source_lang, target_lang, None).await?;
        Ok(translated)
    }

    /// Glossary for this call, or `None` when there is none or it cannot be used
    async fn resolve_glossary(&mut self, source_lang: &str, target_lang: &str) -> Option<RemoteGlossary> {
        match self.glossary.ensure_glossary(&self.backend, source_lang, target_lang).await {
            Ok(Some(glossary)) => return Some(glossary),
            Ok(None) => {}
            Err(e) => {
                warn!("Glossary unavailable, translating without it: {}", e);
                return None;
            }
        }

        match self.glossary.discover_existing(&self.backend, source_lang, target_lang).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Error finding existing glossary: {}", e);
                None
            }
        }
    }

    /// End the session. Later `translate` calls fail; calling again does nothing.
    pub fn quit(&mut self) {
        if self.closed {
            return;
        }
        self.glossary.clear();
        self.closed = true;
        debug!("Translation session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn glossary(&self) -> &GlossarySync {
        &self.glossary
    }
}
