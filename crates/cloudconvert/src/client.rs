//! CloudConvert API client
//!
//! Every operation funnels through [`CloudConvertClient::execute`], which
//! encodes parameters for the HTTP method, sends a single request and
//! classifies the response (see [`crate::response`]).

use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{CloudConvertError, FileOperation, Result};
use crate::models::{Conversion, absolute_url};
use crate::params::{ConversionOptions, InputMethod, ParamValue, Params, upload_file_name};
use crate::response::{ApiResponse, classify};

/// Client for the CloudConvert API
///
/// Holds the immutable configuration and a `reqwest` handle; both are safe to
/// share between tasks, so a client can be cloned or put behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CloudConvertClient {
    config: ClientConfig,
    client: Client,
    scheme: String,
}

impl CloudConvertClient {
    /// Create a client for the public API with the given key
    pub fn new<S: Into<String>>(api_key: S) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Create a client with the API key (and optional overrides) from the environment
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let scheme = config.base_scheme()?;

        let mut builder = Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| CloudConvertError::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
            field: None,
            suggestion: None,
        })?;

        Ok(Self {
            config,
            client,
            scheme,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// List the conversions of this account
    pub async fn list_conversions(&self) -> Result<Vec<Conversion>> {
        let params = Params::new().with("apikey", self.config.api_key.as_str());
        let url = self.config.endpoint("processes");

        let response = self.execute(Method::GET, &url, &params).await?;
        let conversions: Option<Vec<Conversion>> = response.deserialize("a list of conversions")?;
        let conversions = conversions.unwrap_or_default();

        debug!("Listed {} conversions", conversions.len());
        Ok(conversions)
    }

    /// Delete one conversion by the URL the service reported for it
    ///
    /// The service hands out scheme-less URLs (`//host/process/id`); the scheme
    /// of the configured base URL is prepended.
    pub async fn delete_conversion(&self, url: &str) -> Result<ApiResponse> {
        let url = absolute_url(url, &self.scheme);
        self.execute(Method::DELETE, &url, &Params::new()).await
    }

    /// Delete every listed conversion, one after another
    ///
    /// Stops at the first failed deletion; conversions after it are left
    /// untouched. Returns the number of deletions performed.
    pub async fn delete_conversions(&self) -> Result<usize> {
        let conversions = self.list_conversions().await?;

        for conversion in &conversions {
            self.delete_conversion(&conversion.url).await?;
            info!("Deleted conversion {}", conversion.url);
        }

        Ok(conversions.len())
    }

    /// Convert a file the service downloads from `file_url`
    ///
    /// Waits for the conversion to finish (`wait=true`).
    pub async fn convert_download(
        &self,
        options: &ConversionOptions,
        file_url: &str,
    ) -> Result<ApiResponse> {
        let params = options.to_params(&self.config.api_key, InputMethod::Download, file_url.into());
        let url = self.config.endpoint("convert");

        self.execute(Method::GET, &url, &params).await
    }

    /// Convert a local file uploaded with the request
    pub async fn convert_upload(
        &self,
        options: &ConversionOptions,
        path: impl AsRef<Path>,
    ) -> Result<ApiResponse> {
        let file = ParamValue::file(path.as_ref());
        let params = options.to_params(&self.config.api_key, InputMethod::Upload, file);
        let url = self.config.endpoint("convert");

        self.execute(Method::POST, &url, &params).await
    }

    /// Convert in-memory data
    ///
    /// The data is written to a temporary file named after the input format,
    /// since the service also looks at the extension, and uploaded with
    /// [`convert_upload`](Self::convert_upload). The file is removed before
    /// this returns, whatever the outcome.
    pub async fn convert_upload_data(
        &self,
        options: &ConversionOptions,
        data: impl AsRef<[u8]>,
    ) -> Result<ApiResponse> {
        let suffix = options.temp_suffix();
        let mut builder = tempfile::Builder::new();
        builder.prefix("cc").suffix(&suffix);

        let temp = match &self.config.temp_dir {
            Some(dir) => builder
                .tempfile_in(dir)
                .map_err(|e| CloudConvertError::file_system(dir, FileOperation::Create, e))?,
            None => builder
                .tempfile()
                .map_err(|e| CloudConvertError::file_system(std::env::temp_dir(), FileOperation::Create, e))?,
        };
        let temp_path = temp.path().to_path_buf();
        debug!("Writing upload data to {}", temp_path.display());

        let result = match tokio::fs::write(&temp_path, data.as_ref()).await {
            Ok(()) => self.convert_upload(options, &temp_path).await,
            Err(e) => Err(CloudConvertError::file_system(&temp_path, FileOperation::Write, e)),
        };

        if let Err(e) = temp.close() {
            warn!("Failed to remove temporary upload {}: {}", temp_path.display(), e);
        }

        result
    }

    /// Send one request and classify the response
    ///
    /// `POST` sends `params` as the body (multipart when a file is attached,
    /// form-encoded otherwise). Every other method, custom ones included,
    /// appends them to `url` as a query string.
    pub async fn execute(&self, method: Method, url: &str, params: &Params) -> Result<ApiResponse> {
        let request = self.build_request(&method, url, params).await?;

        debug!("CloudConvert request: {} {}", method, url);
        let response = request.send().await.map_err(|source| CloudConvertError::Transport {
            url: url.to_string(),
            source: source.without_url(),
        })?;

        let status = response.status().as_u16();
        debug!("CloudConvert response: {} from {} {}", status, method, url);

        let body = response
            .bytes()
            .await
            .map_err(|source| CloudConvertError::Transport {
                url: url.to_string(),
                source: source.without_url(),
            })?
            .to_vec();

        let result = classify(status, body);
        if let Err(ref e) = result {
            warn!("CloudConvert {} {} failed ({}): {}", method, url, e.category(), e);
        }
        result
    }

    async fn build_request(&self, method: &Method, url: &str, params: &Params) -> Result<RequestBuilder> {
        if *method == Method::POST {
            let request = self.client.post(url);
            let request = if params.has_files() {
                request.multipart(multipart_form(params).await?)
            } else {
                request
                    .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(params.to_query_string()?)
            };
            return Ok(request);
        }

        let url = append_query(url, &params.to_query_string()?);
        Ok(self.client.request(method.clone(), url))
    }
}

fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&{}", url, query)
    } else {
        format!("{}?{}", url, query)
    }
}

async fn multipart_form(params: &Params) -> Result<Form> {
    let mut form = Form::new();

    for (key, value) in params.iter() {
        let key = key.to_lowercase();
        form = match value {
            ParamValue::File(path) => {
                let data = tokio::fs::read(path)
                    .await
                    .map_err(|e| CloudConvertError::file_system(path, FileOperation::Read, e))?;
                form.part(key, Part::bytes(data).file_name(upload_file_name(path)))
            }
            scalar => form.text(key, scalar.as_wire_text().unwrap_or_default()),
        };
    }

    Ok(form)
}
