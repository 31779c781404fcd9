//! Paper records returned by the search service.

use serde::{Deserialize, Serialize};

/// A retrieved paper that is eligible for relevance scoring.
///
/// Only built through [`Candidate::from_raw`], which guarantees a non-blank
/// abstract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Semantic Scholar paper identifier.
    pub paper_id: Option<String>,
    /// Paper title, when the service knows it.
    pub title: Option<String>,
    /// Paper abstract, never blank.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Publication year.
    pub year: Option<i32>,
    /// Landing page URL.
    pub url: Option<String>,
}

impl Candidate {
    /// Build a candidate from a raw record, dropping records without an abstract.
    #[must_use]
    pub fn from_raw(raw: RawPaper) -> Option<Self> {
        let abstract_text = raw.abstract_text.filter(|text| !text.trim().is_empty())?;
        Some(Self {
            paper_id: raw.paper_id,
            title: raw.title,
            abstract_text,
            year: raw.year,
            url: raw.url,
        })
    }

    /// Title for display, with a placeholder when missing.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or("(untitled)")
    }
}

/// Raw paper record as sent by the search service. Every field may be absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawPaper {
    #[serde(rename = "paperId", default)]
    pub(crate) paper_id: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(rename = "abstract", default)]
    pub(crate) abstract_text: Option<String>,
    #[serde(default)]
    pub(crate) year: Option<i32>,
    #[serde(default)]
    pub(crate) url: Option<String>,
}

/// Paginated search response envelope.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub(crate) total: Option<u64>,
    #[serde(default)]
    pub(crate) data: Vec<RawPaper>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: Option<&str>, abstract_text: Option<&str>) -> RawPaper {
        RawPaper {
            paper_id: Some("p1".to_string()),
            title: title.map(String::from),
            abstract_text: abstract_text.map(String::from),
            year: Some(2021),
            url: None,
        }
    }

    #[test]
    fn test_from_raw_requires_abstract() {
        assert!(Candidate::from_raw(raw(Some("t"), None)).is_none());
        assert!(Candidate::from_raw(raw(Some("t"), Some(""))).is_none());
        assert!(Candidate::from_raw(raw(Some("t"), Some("   \n"))).is_none());

        let candidate = Candidate::from_raw(raw(Some("t"), Some("An abstract.")));
        assert_eq!(
            candidate.map(|c| c.abstract_text),
            Some("An abstract.".to_string())
        );
    }

    #[test]
    fn test_display_title_placeholder() {
        let candidate = Candidate::from_raw(raw(None, Some("text")));
        assert_eq!(
            candidate.as_ref().map(Candidate::display_title),
            Some("(untitled)")
        );
    }

    #[test]
    fn test_search_page_tolerates_missing_fields() {
        let page: SearchPage = serde_json::from_str(
            r#"{"total": 2, "data": [{"title": "A"}, {"abstract": "B", "year": null}]}"#,
        )
        .unwrap_or_default();
        assert_eq!(page.total, Some(2));
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].abstract_text.as_deref(), Some("B"));

        let empty: SearchPage = serde_json::from_str(r#"{"total": 0}"#).unwrap_or_default();
        assert!(empty.data.is_empty());
    }
}
