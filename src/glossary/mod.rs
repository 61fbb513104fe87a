/*!
 * Terminology glossary support.
 *
 * The user maintains a CSV glossary on disk; this module keeps the remote
 * service's copy of it in step:
 * - `fingerprint`: content digests used to notice edits to the glossary file
 * - `store`: reading glossary rows and remembering the last-synced digest
 * - `sync`: replacing or reusing the remote glossary for a language pair
 */

use std::collections::BTreeMap;

pub mod fingerprint;
pub mod store;
pub mod sync;

pub use fingerprint::ContentFingerprinter;
pub use store::{FileFingerprintStore, FingerprintStore, GlossaryStore, MemoryFingerprintStore};
pub use sync::{GlossarySync, GLOSSARY_NAME};

/// Source term -> target term. Case-sensitive, one target per source term.
pub type GlossaryEntries = BTreeMap<String, String>;

/// Default location of the user's glossary file
pub const DEFAULT_GLOSSARY_PATH: &str = "glossary/glossary.csv";

/// Default location of the fingerprint sidecar, next to the glossary
pub const DEFAULT_HASH_PATH: &str = "glossary/.glossary_hash";
