//! CloudConvert Client Library
//!
//! A thin async client for the CloudConvert file conversion API: list and
//! delete conversion jobs, and run conversions from a remote URL, a local file
//! or in-memory data.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cloudconvert::{ApiResponse, CloudConvertClient, ConversionOptions};
//!
//! # async fn example() -> cloudconvert::Result<()> {
//! let client = CloudConvertClient::new("your-api-key")?;
//!
//! let options = ConversionOptions::new("docx", "pdf")
//!     .with_param("download", "inline");
//!
//! match client.convert_download(&options, "https://example.com/report.docx").await? {
//!     ApiResponse::Raw(pdf) => println!("Got {} bytes of PDF", pdf.len()),
//!     ApiResponse::Json(job) => println!("Job: {}", job),
//!     ApiResponse::Empty => println!("No content"),
//! }
//!
//! for conversion in client.list_conversions().await? {
//!     println!("{}", conversion.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Responses
//!
//! Only HTTP 200 counts as success. A successful body that is trimmed-bracket
//! shaped (`{...}` or `[...]`) must be valid JSON and comes back as
//! [`ApiResponse::Json`]; any other body is returned byte for byte as
//! [`ApiResponse::Raw`]. Errors are described by [`CloudConvertError`].

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod params;
pub mod response;

pub use client::CloudConvertClient;
pub use config::{CLOUDCONVERT_API_BASE, ClientConfig};
pub use error::{CloudConvertError, FileOperation, Result, ServiceError};
pub use models::Conversion;
pub use params::{ConversionOptions, InputMethod, ParamValue, Params};
pub use response::ApiResponse;

pub use reqwest::Method;
