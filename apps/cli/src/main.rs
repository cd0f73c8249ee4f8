//! Command-line front end for the CloudConvert client
//!
//! ```bash
//! export CLOUDCONVERT_API_KEY=...
//! cloudconvert-cli download docx pdf https://example.com/report.docx -o report.pdf
//! cat notes.md | cloudconvert-cli upload md html - -p download=inline
//! cloudconvert-cli delete-all
//! ```

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cloudconvert::{
    ApiResponse, CLOUDCONVERT_API_BASE, ClientConfig, CloudConvertClient, ConversionOptions,
};
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(version, about = "Convert files with the CloudConvert API")]
struct Cli {
    /// CloudConvert API key
    #[arg(long, env = "CLOUDCONVERT_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Service base URL
    #[arg(long, env = "CLOUDCONVERT_BASE_URL", default_value = CLOUDCONVERT_API_BASE)]
    base_url: String,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List conversions
    List,
    /// Delete one conversion by its URL (as shown by `list`)
    Delete { url: String },
    /// Delete every conversion
    DeleteAll,
    /// Convert a file the service downloads from a URL
    Download {
        #[command(flatten)]
        conversion: ConversionArgs,
        /// URL of the input file
        file_url: String,
    },
    /// Convert a local file, or standard input when PATH is `-`
    Upload {
        #[command(flatten)]
        conversion: ConversionArgs,
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ConversionArgs {
    input_format: String,
    output_format: String,

    /// Extra service parameter, repeatable
    #[arg(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    params: Vec<(String, String)>,

    /// Write the result here instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ConversionArgs {
    fn options(&self) -> ConversionOptions {
        self.params.iter().fold(
            ConversionOptions::new(&self.input_format, &self.output_format),
            |options, (key, value)| options.with_param(key.as_str(), value.as_str()),
        )
    }
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Ignore error if .env not present
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::new(cli.api_key).with_base_url(cli.base_url);
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = CloudConvertClient::with_config(config).context("Failed to set up CloudConvert client")?;

    match cli.command {
        Command::List => {
            let conversions = client.list_conversions().await.context("Failed to list conversions")?;
            println!("{}", serde_json::to_string_pretty(&conversions)?);
        }
        Command::Delete { url } => {
            let response = client
                .delete_conversion(&url)
                .await
                .with_context(|| format!("Failed to delete conversion {}", url))?;
            write_response(response, None)?;
        }
        Command::DeleteAll => {
            let deleted = client.delete_conversions().await.context("Failed to delete conversions")?;
            println!("Deleted {} conversions", deleted);
        }
        Command::Download { conversion, file_url } => {
            info!("Converting {} from {} to {}", file_url, conversion.input_format, conversion.output_format);
            let response = client
                .convert_download(&conversion.options(), &file_url)
                .await
                .with_context(|| format!("Failed to convert {}", file_url))?;
            write_response(response, conversion.output.as_deref())?;
        }
        Command::Upload { conversion, path } => {
            let options = conversion.options();
            let response = if path.as_os_str() == "-" {
                let mut data = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut data)
                    .context("Failed to read standard input")?;
                info!("Converting {} bytes from standard input", data.len());
                client.convert_upload_data(&options, data).await
            } else {
                info!("Converting {}", path.display());
                client.convert_upload(&options, &path).await
            }
            .with_context(|| format!("Failed to convert {}", path.display()))?;
            write_response(response, conversion.output.as_deref())?;
        }
    }

    Ok(())
}

/// Print JSON responses pretty, raw payloads as-is
fn write_response(response: ApiResponse, output: Option<&Path>) -> Result<()> {
    let bytes = match response {
        ApiResponse::Json(value) => {
            let mut text = serde_json::to_string_pretty(&value)?;
            text.push('\n');
            text.into_bytes()
        }
        ApiResponse::Raw(bytes) => bytes,
        ApiResponse::Empty => return Ok(()),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
