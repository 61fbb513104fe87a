/*!
 * Translation of subtitle text through a remote service.
 *
 * - `adapter`: the glossary-aware translation session used by the subtitle layer
 */

// Re-export main types for easier usage
pub use self::adapter::TranslationAdapter;

// Submodules
pub mod adapter;
