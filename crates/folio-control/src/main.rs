//! Folio content backend CLI.
//!
//! `serve` runs the HTTP backend for the portfolio site; `check` decodes a
//! captured multipart request body the way the upload endpoints would.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

mod api;
mod blob;
mod error;
mod logging;
mod server;
mod store;

use api::RouterOptions;
use blob::{BlobStore, LocalBlobStore, VercelBlobStore, VERCEL_BASE_URL};
use logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "folio-control", about = "Folio content backend", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BlobBackend {
    /// Files under `--uploads-dir`, served by this process.
    Local,
    /// Vercel Blob storage.
    Vercel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve {
        /// Listen address.
        #[arg(long, env = "FOLIO_LISTEN", default_value = "127.0.0.1:3000")]
        listen: SocketAddr,

        /// Directory holding projects.json and contacts.json.
        #[arg(long, env = "FOLIO_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,

        /// Static site served for unmatched paths.
        #[arg(long, env = "FOLIO_PUBLIC_DIR")]
        public_dir: Option<PathBuf>,

        /// Where uploaded images are stored.
        #[arg(long, env = "FOLIO_BLOB_BACKEND", value_enum, default_value_t = BlobBackend::Local)]
        blob_backend: BlobBackend,

        /// Upload directory for the local backend.
        #[arg(long, env = "FOLIO_UPLOADS_DIR", default_value = "uploads")]
        uploads_dir: PathBuf,

        /// URL prefix local uploads are served under.
        #[arg(long, env = "FOLIO_UPLOADS_PREFIX", default_value = "/uploads")]
        uploads_prefix: String,

        /// Read-write token for the Vercel backend.
        #[arg(long, env = "BLOB_READ_WRITE_TOKEN", hide_env_values = true)]
        blob_token: Option<String>,

        /// Base URL of the Vercel Blob API.
        #[arg(long, env = "FOLIO_BLOB_BASE_URL", default_value = VERCEL_BASE_URL)]
        blob_base_url: String,

        /// Largest accepted request body, in bytes.
        #[arg(long, env = "FOLIO_MAX_BODY_BYTES", default_value_t = api::DEFAULT_MAX_BODY_BYTES)]
        max_body_bytes: usize,

        /// Log level, overridden by RUST_LOG.
        #[arg(long, env = "FOLIO_LOG_LEVEL", default_value = "info")]
        log_level: String,

        /// Log output format.
        #[arg(long, env = "FOLIO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
        log_format: LogFormat,
    },

    /// Decode a saved multipart body and print its fields and files.
    Check {
        /// File holding the raw request body.
        body: PathBuf,

        /// The request's Content-Type header value.
        #[arg(long)]
        content_type: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            listen,
            data_dir,
            public_dir,
            blob_backend,
            uploads_dir,
            uploads_prefix,
            blob_token,
            blob_base_url,
            max_body_bytes,
            log_level,
            log_format,
        } => {
            if let Err(e) = logging::init_logging(&log_level, log_format) {
                eprintln!("error: {e:#}");
                return ExitCode::FAILURE;
            }

            let blobs = match blob_backend {
                BlobBackend::Local => {
                    Ok(BlobStore::Local(LocalBlobStore::new(uploads_dir, uploads_prefix)))
                }
                BlobBackend::Vercel => build_vercel_store(blob_base_url, blob_token),
            };
            let blobs = match blobs {
                Ok(blobs) => blobs,
                Err(e) => {
                    tracing::error!(error = %format!("{e:#}"), "invalid blob storage configuration");
                    return ExitCode::FAILURE;
                }
            };

            let config = server::ServerConfig {
                listen_addr: listen,
                data_dir,
                blobs,
                router: RouterOptions {
                    max_body_bytes,
                    public_dir,
                },
            };

            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(error = %e, "failed to create runtime");
                    return ExitCode::FAILURE;
                }
            };
            rt.block_on(async {
                match server::run(config).await {
                    Ok(()) => ExitCode::SUCCESS,
                    Err(e) => {
                        tracing::error!(error = %format!("{e:#}"), "server error");
                        ExitCode::FAILURE
                    }
                }
            })
        }

        Command::Check { body, content_type } => match check(&body, &content_type) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn build_vercel_store(base_url: String, token: Option<String>) -> anyhow::Result<BlobStore> {
    let token = token
        .filter(|t| !t.is_empty())
        .context("--blob-token (BLOB_READ_WRITE_TOKEN) is required for the vercel backend")?;
    Ok(BlobStore::Vercel(VercelBlobStore::new(base_url, token)?))
}

fn check(path: &std::path::Path, content_type: &str) -> anyhow::Result<()> {
    let body =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let form = folio_multipart::decode(&body, Some(content_type))?;

    let mut fields: Vec<_> = form.fields.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    let mut files: Vec<_> = form.files.iter().collect();
    files.sort_by(|a, b| a.0.cmp(b.0));

    println!("{} field(s), {} file(s)", fields.len(), files.len());
    for (name, value) in fields {
        println!("  field {name}: {value:?}");
    }
    for (name, file) in files {
        println!(
            "  file {name}: {} ({}, {} bytes)",
            file.filename,
            file.content_type,
            file.len()
        );
    }
    Ok(())
}
