//! Typed views of service responses

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A conversion job as listed by `GET /processes`
///
/// Only `url` is relied upon; every other field is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Scheme-less job URL, e.g. `//host123.cloudconvert.com/process/abc`
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Conversion {
    /// Job id, when the service includes one as a string
    pub fn id(&self) -> Option<&str> {
        self.extra.get("id").and_then(Value::as_str)
    }

    /// Absolute job URL using the given scheme
    ///
    /// URLs that already carry a scheme are returned unchanged.
    pub fn absolute_url(&self, scheme: &str) -> String {
        absolute_url(&self.url, scheme)
    }
}

pub(crate) fn absolute_url(url: &str, scheme: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}:{}", scheme, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_parsing_keeps_extra_fields() {
        let json = r#"[
            {
                "id": "abc123",
                "url": "//host123d1qm.cloudconvert.com/process/abc123",
                "host": "host123d1qm.cloudconvert.com",
                "step": "finished",
                "starttime": 1434203462
            },
            {
                "url": "//host7.cloudconvert.com/process/def456"
            }
        ]"#;

        let conversions: Vec<Conversion> = serde_json::from_str(json).unwrap();
        assert_eq!(conversions.len(), 2);
        assert_eq!(conversions[0].id(), Some("abc123"));
        assert_eq!(conversions[0].extra["step"], "finished");
        assert_eq!(conversions[1].id(), None);
        assert!(conversions[1].extra.is_empty());
    }

    #[test]
    fn test_conversion_requires_url() {
        let result: Result<Conversion, _> = serde_json::from_str(r#"{"id": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_absolute_url() {
        let conversion = Conversion {
            url: "//host/process/1".to_string(),
            extra: Map::new(),
        };
        assert_eq!(conversion.absolute_url("https"), "https://host/process/1");
        assert_eq!(absolute_url("http://host/process/1", "https"), "http://host/process/1");
    }
}
