//! Path segments linking a summary entry to its detail page.
//!
//! A slug is `{municipality}-{exam type}` with anything outside word characters,
//! kana, and CJK ideographs replaced by hyphens, then percent-encoded. Decoding
//! splits at the first hyphen, so a municipality that itself contains a hyphen
//! does not survive a round trip. Existing links depend on that split point.

use serde::Serialize;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugParts {
    pub municipality: String,
    pub exam_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("slug is empty")]
    Empty,
    #[error("slug '{0}' is not valid percent-encoded UTF-8")]
    InvalidEncoding(String),
    #[error("slug '{0}' has no municipality separator")]
    MissingSeparator(String),
    #[error("slug '{0}' has an empty municipality or exam type")]
    EmptyPart(String),
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || c == '-'
        || ('\u{3040}'..='\u{309F}').contains(&c)
        || ('\u{30A0}'..='\u{30FF}').contains(&c)
        || ('\u{4E00}'..='\u{9FAF}').contains(&c)
}

/// Unencoded slug text; useful for logging and comparisons.
pub fn slug_text(municipality: &str, exam_type: &str) -> String {
    let replaced: String = format!("{municipality}-{exam_type}")
        .chars()
        .map(|c| if is_slug_char(c) { c } else { '-' })
        .collect();

    replaced
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn encode(municipality: &str, exam_type: &str) -> String {
    urlencoding::encode(&slug_text(municipality, exam_type)).into_owned()
}

/// Decodes the last segment of `path`, tolerating a trailing slash.
pub fn decode(path: &str) -> Result<SlugParts, SlugError> {
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    if segment.is_empty() {
        return Err(SlugError::Empty);
    }

    let decoded: Cow<'_, str> = urlencoding::decode(segment)
        .map_err(|_| SlugError::InvalidEncoding(segment.to_string()))?;

    let (municipality, exam_type) = decoded
        .split_once('-')
        .ok_or_else(|| SlugError::MissingSeparator(decoded.to_string()))?;

    if municipality.is_empty() || exam_type.is_empty() {
        return Err(SlugError::EmptyPart(decoded.to_string()));
    }

    Ok(SlugParts {
        municipality: municipality.to_string(),
        exam_type: exam_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_hyphen_free_municipality() {
        let slug = encode("川越市", "行政職員採用試験");
        let parts = decode(&slug).expect("decodes");
        assert_eq!(parts.municipality, "川越市");
        assert_eq!(parts.exam_type, "行政職員採用試験");
    }

    #[test]
    fn punctuation_collapses_to_single_hyphens() {
        assert_eq!(
            slug_text("札幌市", "職員採用試験（大学の部・一般方式）"),
            "札幌市-職員採用試験-大学の部・一般方式"
        );
        assert_eq!(slug_text(" 市 ", "A  &  B"), "市-A-B");
    }

    #[test]
    fn encoded_slug_is_a_single_ascii_segment() {
        let slug = encode("川越市", "上級 / 技術職");
        assert!(slug.is_ascii());
        assert!(!slug.contains('/'));
    }

    #[test]
    fn decodes_from_full_path_with_trailing_slash() {
        let path = format!("/koumuin_shiken/{}/", encode("札幌市", "大学卒業程度"));
        let parts = decode(&path).expect("decodes");
        assert_eq!(parts.municipality, "札幌市");
        assert_eq!(parts.exam_type, "大学卒業程度");
    }

    #[test]
    fn splits_at_first_hyphen_only() {
        let parts = decode("foo-bar-baz").expect("decodes");
        assert_eq!(parts.municipality, "foo");
        assert_eq!(parts.exam_type, "bar-baz");
    }

    #[test]
    fn hyphenated_municipality_does_not_round_trip() {
        let parts = decode(&encode("New-Town", "General")).expect("decodes");
        assert_eq!(parts.municipality, "New");
        assert_eq!(parts.exam_type, "Town-General");
    }

    #[test]
    fn missing_separator_is_reported() {
        assert_eq!(
            decode("/koumuin_shiken/kawagoe/"),
            Err(SlugError::MissingSeparator("kawagoe".to_string()))
        );
        assert_eq!(decode("/"), Err(SlugError::Empty));
    }

    #[test]
    fn invalid_percent_encoding_is_reported() {
        assert!(matches!(
            decode("%E5%B7-x"),
            Err(SlugError::InvalidEncoding(_))
        ));
    }
}
