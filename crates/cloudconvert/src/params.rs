//! Request parameters
//!
//! [`Params`] is the per-call parameter bag sent either as a query string or
//! as a request body. [`ConversionOptions`] is the typed front for the
//! `convert` endpoint: formats are fields, anything else goes in `extra`.

use std::path::{Path, PathBuf};
use url::form_urlencoded;

use crate::error::{CloudConvertError, Result};

/// A single parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Bool(bool),
    /// Content of a local file, sent as a multipart attachment
    File(PathBuf),
}

impl ParamValue {
    pub fn file<P: Into<PathBuf>>(path: P) -> Self {
        ParamValue::File(path.into())
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ParamValue::File(_))
    }

    /// Wire form of a scalar value; `true` is sent as `1` and `false` as an empty string
    pub fn as_wire_text(&self) -> Option<String> {
        match self {
            ParamValue::Text(text) => Some(text.clone()),
            ParamValue::Bool(true) => Some("1".to_string()),
            ParamValue::Bool(false) => Some(String::new()),
            ParamValue::File(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f64);

/// Ordered parameter mapping
///
/// Keys are compared case-insensitively because they are lower-cased on the
/// wire; setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter
    pub fn set<K: Into<String>, V: Into<ParamValue>>(&mut self, key: K, value: V) -> &mut Self {
        let key = key.into();
        let value = value.into();

        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&key))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Builder-style [`set`](Self::set)
    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Whether the parameters need a multipart body
    pub fn has_files(&self) -> bool {
        self.entries.iter().any(|(_, value)| value.is_file())
    }

    /// Copy every entry of `other` over this mapping, `other` winning on conflicts
    pub fn merge(&mut self, other: &Params) {
        for (key, value) in other.iter() {
            self.set(key, value.clone());
        }
    }

    /// Encode as `key=value` pairs joined by `&`
    ///
    /// Keys are lower-cased and values form-encoded. File attachments have no
    /// textual form and are rejected.
    pub fn to_query_string(&self) -> Result<String> {
        let mut pairs = Vec::with_capacity(self.entries.len());

        for (key, value) in &self.entries {
            let text = value.as_wire_text().ok_or_else(|| CloudConvertError::Configuration {
                message: format!("Parameter '{}' is a file attachment and cannot be sent in a query string", key),
                field: Some(key.clone()),
                suggestion: Some("Send file attachments with a POST request".to_string()),
            })?;
            let encoded: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();
            pairs.push(format!("{}={}", key.to_lowercase(), encoded));
        }

        Ok(pairs.join("&"))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

/// How the service gets hold of the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMethod {
    /// The service fetches the file from a URL
    Download,
    /// The file is attached to the request
    Upload,
}

impl InputMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMethod::Download => "download",
            InputMethod::Upload => "upload",
        }
    }
}

/// Options for a single conversion
///
/// `extra` carries any service parameter without a dedicated field. The keys
/// set by the client itself (`apikey`, `inputformat`, `outputformat`,
/// `input`, `file`, `wait`) always take precedence over `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    pub input_format: String,
    pub output_format: String,
    pub extra: Params,
}

impl ConversionOptions {
    pub fn new<I: Into<String>, O: Into<String>>(input_format: I, output_format: O) -> Self {
        Self {
            input_format: input_format.into(),
            output_format: output_format.into(),
            extra: Params::new(),
        }
    }

    pub fn with_param<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.extra.set(key, value);
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.extra.merge(&params);
        self
    }

    /// Build the full parameter set for a `convert` call
    pub(crate) fn to_params(&self, api_key: &str, input: InputMethod, file: ParamValue) -> Params {
        let mut params = self.extra.clone();
        params.set("apikey", api_key);
        params.set("inputformat", self.input_format.as_str());
        params.set("outputformat", self.output_format.as_str());
        params.set("input", input.as_str());
        params.set("file", file);
        params.set("wait", true);
        params
    }

    /// File name suffix used for temporary uploads, e.g. `.docx`
    pub(crate) fn temp_suffix(&self) -> String {
        format!(".{}", self.input_format)
    }
}

/// Local path helper for upload parameters
pub(crate) fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_lowercases_keys_and_encodes_values() {
        let params = Params::new()
            .with("ApiKey", "a b&c")
            .with("File", "https://example.com/a file.docx?x=1");

        assert_eq!(
            params.to_query_string().unwrap(),
            "apikey=a+b%26c&file=https%3A%2F%2Fexample.com%2Fa+file.docx%3Fx%3D1"
        );
    }

    #[test]
    fn test_booleans_encode_as_one_or_empty() {
        let params = Params::new().with("wait", true).with("download", false);
        assert_eq!(params.to_query_string().unwrap(), "wait=1&download=");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut params = Params::new();
        params.set("a", "1").set("b", "2").set("A", "3");

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a"), Some(&ParamValue::from("3")));
        assert_eq!(params.to_query_string().unwrap(), "a=3&b=2");
    }

    #[test]
    fn test_empty_params_encode_to_empty_string() {
        assert_eq!(Params::new().to_query_string().unwrap(), "");
    }

    #[test]
    fn test_file_cannot_be_query_encoded() {
        let params = Params::new().with("file", ParamValue::file("/tmp/x.pdf"));
        assert!(params.has_files());
        let err = params.to_query_string().unwrap_err();
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn test_numbers_convert_to_text() {
        let params: Params = vec![("timeout", ParamValue::from(30u32))].into_iter().collect();
        assert_eq!(params.to_query_string().unwrap(), "timeout=30");
    }

    #[test]
    fn test_fixed_keys_win_over_extras() {
        let options = ConversionOptions::new("docx", "pdf")
            .with_param("wait", false)
            .with_param("InputFormat", "odt")
            .with_param("apikey", "other")
            .with_param("callback", "https://example.com/hook");

        let params = options.to_params("key", InputMethod::Download, "https://example.com/in.docx".into());

        assert_eq!(params.get("apikey"), Some(&ParamValue::from("key")));
        assert_eq!(params.get("inputformat"), Some(&ParamValue::from("docx")));
        assert_eq!(params.get("wait"), Some(&ParamValue::Bool(true)));
        assert_eq!(params.get("input"), Some(&ParamValue::from("download")));
        assert_eq!(
            params.get("callback"),
            Some(&ParamValue::from("https://example.com/hook"))
        );
        assert_eq!(params.len(), 7);
    }

    #[test]
    fn test_temp_suffix_uses_input_format() {
        assert_eq!(ConversionOptions::new("md", "html").temp_suffix(), ".md");
    }
}
