use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for normalizing and matching ISO 639-1
/// (2-letter) and ISO 639-2 (3-letter) language codes, and for turning
/// user-facing codes (`en`, `pt-br`, `auto`) into the forms the DeepL API
/// and its glossaries expect.

/// Source language value meaning "let the service detect it"
pub const AUTO_DETECT: &str = "auto";

/// Map an ISO 639-2/B code to its ISO 639-2/T equivalent, if it differs
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"), // French
        "ger" => Some("deu"), // German
        "dut" => Some("nld"), // Dutch
        "gre" => Some("ell"), // Greek
        "chi" => Some("zho"), // Chinese
        "cze" => Some("ces"), // Czech
        "ice" => Some("isl"), // Icelandic
        "alb" => Some("sqi"), // Albanian
        "arm" => Some("hye"), // Armenian
        "baq" => Some("eus"), // Basque
        "bur" => Some("mya"), // Burmese
        "per" => Some("fas"), // Persian
        "geo" => Some("kat"), // Georgian
        "may" => Some("msa"), // Malay
        "mac" => Some("mkd"), // Macedonian
        "rum" => Some("ron"), // Romanian
        "slo" => Some("slk"), // Slovak
        "wel" => Some("cym"), // Welsh
        _ => None,
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        if let Some(part2t) = part2b_to_part2t(&normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    } else if normalized_code.len() == 3 {
        let part2t: &str = match part2b_to_part2t(&normalized_code) {
            Some(part2t) => part2t,
            None => &normalized_code,
        };

        if let Some(lang) = Language::from_639_3(part2t) {
            if let Some(code_639_1) = lang.to_639_1() {
                return Ok(code_639_1.to_string());
            }
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let normalized1 = match normalize_to_part2t(code1) {
        Ok(n) => n,
        Err(_) => return false,
    };

    let normalized2 = match normalize_to_part2t(code2) {
        Ok(n) => n,
        Err(_) => return false,
    };

    normalized1 == normalized2
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(primary_subtag(code).as_str())?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Whether the code asks for source language detection
pub fn is_auto(code: &str) -> bool {
    let code = code.trim();
    code.is_empty() || code.eq_ignore_ascii_case(AUTO_DETECT)
}

/// Lowercased primary subtag of a language tag (`pt-BR` -> `pt`, `zh_Hans` -> `zh`)
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Canonical short form of the primary subtag, ISO 639-1 where one exists
fn canonical_primary(code: &str) -> String {
    let primary = primary_subtag(code);
    normalize_to_part1_or_part2t(&primary).unwrap_or(primary)
}

/// Source language as sent to the translate endpoint; `None` means auto-detect
pub fn deepl_source_code(code: &str) -> Option<String> {
    if is_auto(code) {
        None
    } else {
        Some(canonical_primary(code).to_uppercase())
    }
}

/// Target language as sent to the translate endpoint (`fre` -> `FR`).
/// Regional variants are kept (`pt_br` -> `PT-BR`).
pub fn deepl_target_code(code: &str) -> String {
    let code = code.trim().replace('_', "-");
    let primary = canonical_primary(&code);
    match code.split_once('-') {
        Some((_, variant)) => format!("{}-{}", primary, variant).to_uppercase(),
        None => primary.to_uppercase(),
    }
}

/// Language code as used in glossary language pairs (`EN-US` -> `en`)
pub fn glossary_code(code: &str) -> String {
    canonical_primary(code)
}

/// Check whether a glossary's language pair serves a requested pair.
///
/// Only primary subtags are compared. An auto-detected source never matches.
pub fn language_pair_matches(
    glossary_source: &str,
    glossary_target: &str,
    requested_source: &str,
    requested_target: &str,
) -> bool {
    if is_auto(requested_source) || is_auto(glossary_source) {
        return false;
    }
    primary_codes_match(glossary_source, requested_source)
        && primary_codes_match(glossary_target, requested_target)
}

fn primary_codes_match(code1: &str, code2: &str) -> bool {
    let (primary1, primary2) = (primary_subtag(code1), primary_subtag(code2));
    primary1 == primary2 || language_codes_match(&primary1, &primary2)
}
