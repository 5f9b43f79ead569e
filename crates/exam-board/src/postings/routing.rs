use super::slug::{self, SlugError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Municipality + exam type resolved for a detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteParams {
    pub municipality: String,
    pub exam_type: String,
    pub origin: RouteOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOrigin {
    Slug,
    KnownMunicipality,
    Query,
}

/// Query-string parameters accepted as the last resort.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteQuery {
    pub municipality: Option<String>,
    #[serde(rename = "examType", alias = "exam_type")]
    pub exam_type: Option<String>,
}

/// Known slug fragment mapped to a default detail page.
#[derive(Debug, Clone)]
pub struct KnownMunicipality {
    pub fragments: Vec<String>,
    pub municipality: String,
    pub default_exam_type: String,
}

impl KnownMunicipality {
    pub fn new(
        fragments: &[&str],
        municipality: impl Into<String>,
        default_exam_type: impl Into<String>,
    ) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            municipality: municipality.into(),
            default_exam_type: default_exam_type.into(),
        }
    }

    fn matches(&self, segment: &str) -> bool {
        self.fragments
            .iter()
            .any(|fragment| segment.contains(fragment.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("could not resolve municipality and exam type from '{path}' ({slug})")]
    Unresolved { path: String, slug: SlugError },
}

/// Resolves detail-page parameters: slug first, then the known-municipality
/// table, then the query string.
#[derive(Debug, Clone)]
pub struct RouteResolver {
    known: Vec<KnownMunicipality>,
}

impl Default for RouteResolver {
    fn default() -> Self {
        Self::new(vec![
            KnownMunicipality::new(&["川越市", "kawagoe"], "川越市", "行政職員採用試験"),
            KnownMunicipality::new(
                &["札幌市", "sapporo"],
                "札幌市",
                "職員採用試験（大学の部・一般方式）",
            ),
        ])
    }
}

impl RouteResolver {
    pub fn new(known: Vec<KnownMunicipality>) -> Self {
        Self { known }
    }

    pub fn resolve(&self, path: &str, query: &RouteQuery) -> Result<RouteParams, RouteError> {
        let slug_error = match slug::decode(path) {
            Ok(parts) => {
                return Ok(RouteParams {
                    municipality: parts.municipality,
                    exam_type: parts.exam_type,
                    origin: RouteOrigin::Slug,
                })
            }
            Err(err) => err,
        };
        debug!(%path, error = %slug_error, "slug decode failed; trying fallbacks");

        let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();
        if segments.len() >= 2 {
            let last = segments[segments.len() - 1];
            let last = urlencoding::decode(last)
                .map(|cow| cow.into_owned())
                .unwrap_or_else(|_| last.to_string());
            if let Some(known) = self.known.iter().find(|known| known.matches(&last)) {
                return Ok(RouteParams {
                    municipality: known.municipality.clone(),
                    exam_type: known.default_exam_type.clone(),
                    origin: RouteOrigin::KnownMunicipality,
                });
            }
        }

        let from_query = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        match (from_query(&query.municipality), from_query(&query.exam_type)) {
            (Some(municipality), Some(exam_type)) => Ok(RouteParams {
                municipality,
                exam_type,
                origin: RouteOrigin::Query,
            }),
            _ => Err(RouteError::Unresolved {
                path: path.to_string(),
                slug: slug_error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_wins_over_fallbacks() {
        let resolver = RouteResolver::default();
        let path = format!("/koumuin_shiken/{}/", slug::encode("札幌市", "大学卒業程度"));
        let query = RouteQuery {
            municipality: Some("川越市".to_string()),
            exam_type: Some("x".to_string()),
        };
        let params = resolver.resolve(&path, &query).expect("resolves");
        assert_eq!(params.origin, RouteOrigin::Slug);
        assert_eq!(params.municipality, "札幌市");
    }

    #[test]
    fn known_fragment_supplies_default_exam_type() {
        let resolver = RouteResolver::default();
        let params = resolver
            .resolve("/koumuin_shiken/kawagoe/", &RouteQuery::default())
            .expect("resolves");
        assert_eq!(params.origin, RouteOrigin::KnownMunicipality);
        assert_eq!(params.municipality, "川越市");
        assert_eq!(params.exam_type, "行政職員採用試験");
    }

    #[test]
    fn single_segment_skips_known_table() {
        let resolver = RouteResolver::default();
        let query = RouteQuery {
            municipality: Some("札幌市".to_string()),
            exam_type: Some("高校卒業程度".to_string()),
        };
        let params = resolver.resolve("sapporo", &query).expect("resolves");
        assert_eq!(params.origin, RouteOrigin::Query);
        assert_eq!(params.exam_type, "高校卒業程度");
    }

    #[test]
    fn nothing_usable_is_unresolved() {
        let resolver = RouteResolver::new(Vec::new());
        let query = RouteQuery {
            municipality: Some("札幌市".to_string()),
            exam_type: Some("   ".to_string()),
        };
        let err = resolver
            .resolve("/koumuin_shiken/unknown/", &query)
            .expect_err("unresolved");
        assert!(matches!(
            err,
            RouteError::Unresolved {
                slug: SlugError::MissingSeparator(_),
                ..
            }
        ));
    }
}
