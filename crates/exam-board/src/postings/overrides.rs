use std::collections::HashMap;
use tracing::warn;

/// Explicit destination URLs keyed by exam type, replacing generated slugs in summary links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOverrides {
    links: HashMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    #[error("link overrides are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("link overrides must be a JSON object of exam type to URL")]
    NotAnObject,
}

impl LinkOverrides {
    pub fn parse(raw: &str) -> Result<Self, OverrideError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let object = value.as_object().ok_or(OverrideError::NotAnObject)?;

        let links = object
            .iter()
            .filter_map(|(exam_type, url)| {
                url.as_str()
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(|url| (exam_type.clone(), url.to_string()))
            })
            .collect();

        Ok(Self { links })
    }

    /// Like [`LinkOverrides::parse`], but a malformed payload only logs and yields no overrides.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            return Self::default();
        };

        match Self::parse(raw) {
            Ok(overrides) => overrides,
            Err(error) => {
                warn!(%error, "ignoring malformed link overrides");
                Self::default()
            }
        }
    }

    pub fn get(&self, exam_type: &str) -> Option<&str> {
        self.links.get(exam_type).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl FromIterator<(String, String)> for LinkOverrides {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            links: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_entries_and_skips_others() {
        let overrides = LinkOverrides::parse(
            r#"{"行政職員採用試験": "https://example.com/kawagoe", "技術職": 3, "空": ""}"#,
        )
        .expect("parses");
        assert_eq!(
            overrides.get("行政職員採用試験"),
            Some("https://example.com/kawagoe")
        );
        assert_eq!(overrides.get("技術職"), None);
        assert_eq!(overrides.get("空"), None);
    }

    #[test]
    fn malformed_payloads_degrade_to_empty() {
        assert!(matches!(
            LinkOverrides::parse("[1, 2]"),
            Err(OverrideError::NotAnObject)
        ));
        assert!(LinkOverrides::parse_lenient(Some("{not json")).is_empty());
        assert!(LinkOverrides::parse_lenient(Some("[]")).is_empty());
        assert!(LinkOverrides::parse_lenient(None).is_empty());
    }
}
