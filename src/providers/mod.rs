/*!
 * Translation backends.
 *
 * This module defines the capability set the translation adapter needs from a
 * remote service, and its implementations:
 * - DeepL: the DeepL REST API
 * - Mock: scripted in-process backend for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

use crate::errors::ProviderError;
use crate::glossary::GlossaryEntries;
use crate::language_utils;

/// Common trait for all translation backends
///
/// Any service that can translate text and store named glossaries can sit
/// behind the translation adapter.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Translate `text`, optionally constrained by a stored glossary
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source_lang` - Source language code, or `auto` for detection
    /// * `target_lang` - Target language code
    /// * `glossary` - Glossary to apply, if any
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        glossary: Option<&RemoteGlossary>,
    ) -> Result<String, ProviderError>;

    /// All glossaries stored for this account
    async fn list_glossaries(&self) -> Result<Vec<RemoteGlossary>, ProviderError>;

    /// Store a new glossary for one language pair
    async fn create_glossary(
        &self,
        name: &str,
        source_lang: &str,
        target_lang: &str,
        entries: &GlossaryEntries,
    ) -> Result<RemoteGlossary, ProviderError>;

    /// Remove a stored glossary
    async fn delete_glossary(&self, glossary: &RemoteGlossary) -> Result<(), ProviderError>;

    /// Account usage; doubles as the connectivity check
    async fn get_usage(&self) -> Result<Usage, ProviderError>;
}

/// Handle to a glossary stored by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGlossary {
    /// Service-assigned identifier
    pub glossary_id: String,

    /// Human-readable name
    pub name: String,

    /// Source language of the pair
    pub source_lang: String,

    /// Target language of the pair
    pub target_lang: String,

    /// Number of entries
    #[serde(default)]
    pub entry_count: u64,
}

impl RemoteGlossary {
    /// Whether this glossary serves translations from `source_lang` to `target_lang`
    pub fn matches_pair(&self, source_lang: &str, target_lang: &str) -> bool {
        language_utils::language_pair_matches(
            &self.source_lang,
            &self.target_lang,
            source_lang,
            target_lang,
        )
    }
}

/// First glossary called `name`, in listing order
pub fn find_by_name<'a>(glossaries: &'a [RemoteGlossary], name: &str) -> Option<&'a RemoteGlossary> {
    glossaries.iter().find(|g| g.name == name)
}

/// Character usage of the account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub character_count: u64,
    #[serde(default)]
    pub character_limit: u64,
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} characters used", self.character_count, self.character_limit)
    }
}

pub mod deepl;
pub mod mock;
