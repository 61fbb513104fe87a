/*!
 * Mock backend implementation for testing.
 *
 * `MockBackend` keeps an in-memory glossary registry, records every call it
 * receives, and can be told to fail individual operations:
 * - `MockBackend::working()` - every operation succeeds
 * - `failing_usage()`, `failing_list()`, `failing_create()`, `failing_delete()`
 * - `failing_glossary_translation()` - translations that use a glossary fail
 * - `failing_translation()` - every translation fails
 * - `failing_translation_after(n)` - translations fail once `n` have succeeded
 *
 * Translations are rendered as `[<target>] <text>`, with glossary terms
 * substituted when a glossary is used, so tests can see whether it was applied.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::glossary::GlossaryEntries;
use super::{RemoteGlossary, TranslationBackend, Usage};

/// A call received by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Translate {
        text: String,
        source_lang: String,
        target_lang: String,
        glossary_id: Option<String>,
    },
    ListGlossaries,
    CreateGlossary {
        name: String,
        source_lang: String,
        target_lang: String,
        entries: GlossaryEntries,
    },
    DeleteGlossary {
        glossary_id: String,
    },
    GetUsage,
}

#[derive(Debug, Default)]
struct MockState {
    glossaries: Vec<RemoteGlossary>,
    entries: HashMap<String, GlossaryEntries>,
    calls: Vec<MockCall>,
    next_id: usize,
    fail_usage: bool,
    fail_list: bool,
    fail_create: bool,
    fail_delete: bool,
    fail_glossary_translation: bool,
    fail_translation: bool,
    translations_left: Option<usize>,
}

/// Scripted translation backend. Clones share state, so a test can keep one
/// handle while the adapter owns another.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// A backend where every operation succeeds
    pub fn working() -> Self {
        Self::default()
    }

    /// Pre-populate a remote glossary, as if left by an earlier run
    pub fn with_remote_glossary(
        self,
        name: &str,
        source_lang: &str,
        target_lang: &str,
        entries: GlossaryEntries,
    ) -> Self {
        {
            let mut state = self.state.lock();
            state.register(name, source_lang, target_lang, entries);
        }
        self
    }

    pub fn failing_usage(self) -> Self {
        self.state.lock().fail_usage = true;
        self
    }

    pub fn failing_list(self) -> Self {
        self.state.lock().fail_list = true;
        self
    }

    pub fn failing_create(self) -> Self {
        self.state.lock().fail_create = true;
        self
    }

    pub fn failing_delete(self) -> Self {
        self.state.lock().fail_delete = true;
        self
    }

    pub fn failing_glossary_translation(self) -> Self {
        self.state.lock().fail_glossary_translation = true;
        self
    }

    pub fn failing_translation(self) -> Self {
        self.state.lock().fail_translation = true;
        self
    }

    pub fn failing_translation_after(self, successes: usize) -> Self {
        self.state.lock().translations_left = Some(successes);
        self
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Glossaries currently stored
    pub fn remote_glossaries(&self) -> Vec<RemoteGlossary> {
        self.state.lock().glossaries.clone()
    }

    /// Entries stored for a glossary
    pub fn glossary_entries(&self, glossary_id: &str) -> Option<GlossaryEntries> {
        self.state.lock().entries.get(glossary_id).cloned()
    }

    pub fn list_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::ListGlossaries))
    }

    pub fn create_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::CreateGlossary { .. }))
    }

    pub fn delete_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::DeleteGlossary { .. }))
    }

    pub fn translate_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Translate { .. }))
    }

    fn count(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    fn render(text: &str, target_lang: &str, entries: Option<&GlossaryEntries>) -> String {
        let mut translated = text.to_string();
        if let Some(entries) = entries {
            // Longer terms first so "villainy" wins over "villain"
            let mut terms: Vec<_> = entries.iter().collect();
            terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
            for (source, target) in terms {
                translated = translated.replace(source.as_str(), target);
            }
        }
        format!("[{}] {}", target_lang, translated)
    }
}

impl MockState {
    fn register(
        &mut self,
        name: &str,
        source_lang: &str,
        target_lang: &str,
        entries: GlossaryEntries,
    ) -> RemoteGlossary {
        self.next_id += 1;
        let glossary = RemoteGlossary {
            glossary_id: format!("mock-glossary-{}", self.next_id),
            name: name.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            entry_count: entries.len() as u64,
        };
        self.entries.insert(glossary.glossary_id.clone(), entries);
        self.glossaries.push(glossary.clone());
        glossary
    }
}

fn simulated(operation: &str) -> ProviderError {
    ProviderError::ApiError {
        status_code: 500,
        message: format!("Simulated {} failure", operation),
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate_text(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        glossary: Option<&RemoteGlossary>,
    ) -> Result<String, ProviderError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::Translate {
            text: text.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            glossary_id: glossary.map(|g| g.glossary_id.clone()),
        });

        if state.fail_translation {
            return Err(simulated("translation"));
        }
        let left = state.translations_left;
        match left {
            Some(0) => return Err(simulated("translation")),
            Some(left) => state.translations_left = Some(left - 1),
            None => {}
        }

        match glossary {
            Some(glossary) => {
                if state.fail_glossary_translation {
                    return Err(simulated("glossary translation"));
                }
                let entries = state.entries.get(&glossary.glossary_id).ok_or_else(|| {
                    ProviderError::ApiError {
                        status_code: 404,
                        message: format!("Glossary {} not found", glossary.glossary_id),
                    }
                })?;
                Ok(Self::render(text, target_lang, Some(entries)))
            }
            None => Ok(Self::render(text, target_lang, None)),
        }
    }

    async fn list_glossaries(&self) -> Result<Vec<RemoteGlossary>, ProviderError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::ListGlossaries);
        if state.fail_list {
            return Err(simulated("list"));
        }
        Ok(state.glossaries.clone())
    }

    async fn create_glossary(
        &self,
        name: &str,
        source_lang: &str,
        target_lang: &str,
        entries: &GlossaryEntries,
    ) -> Result<RemoteGlossary, ProviderError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::CreateGlossary {
            name: name.to_string(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            entries: entries.clone(),
        });
        if state.fail_create {
            return Err(simulated("create"));
        }
        Ok(state.register(name, source_lang, target_lang, entries.clone()))
    }

    async fn delete_glossary(&self, glossary: &RemoteGlossary) -> Result<(), ProviderError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::DeleteGlossary {
            glossary_id: glossary.glossary_id.clone(),
        });
        if state.fail_delete {
            return Err(simulated("delete"));
        }
        state.glossaries.retain(|g| g.glossary_id != glossary.glossary_id);
        state.entries.remove(&glossary.glossary_id);
        Ok(())
    }

    async fn get_usage(&self) -> Result<Usage, ProviderError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::GetUsage);
        if state.fail_usage {
            return Err(ProviderError::AuthenticationError("Simulated invalid key".to_string()));
        }
        Ok(Usage {
            character_count: 0,
            character_limit: 500_000,
        })
    }
}
