//! Download, stamp, encode, upload, record the link

use crate::error::*;
use crate::progress::ProgressReporter;
use crate::text::Typeface;
use crate::{composite, encode_to_file, fetch_animation, http_client, upload_file};
use crate::{GifDecoder, Overlay, Settings, StampedFrame, DEFAULT_UPLOAD_ENDPOINT};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};

/// The animation every run starts from
pub const DEFAULT_SOURCE_URL: &str = "https://i.pinimg.com/originals/7a/97/6d/7a976d8749e34fad7f34d93a44c42d8a.gif";
pub const DEFAULT_OUTPUT_DIR: &str = "gif_output";
pub const DEFAULT_USERNAME: &str = "Anonymous";

/// Everything a run needs besides the username and the font
#[derive(Clone, Debug)]
pub struct Config {
    pub source_url: String,
    pub upload_endpoint: String,
    /// Hosting service credential, sent as `Client-ID`
    pub client_id: String,
    pub output_dir: PathBuf,
    /// Skip TLS certificate validation. Only for testing against self-signed servers.
    pub accept_invalid_certs: bool,
    /// Remove the temporary GIF when uploading (or anything after encoding) fails
    pub cleanup_on_failure: bool,
    pub settings: Settings,
}

impl Config {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_owned(),
            upload_endpoint: DEFAULT_UPLOAD_ENDPOINT.to_owned(),
            client_id: client_id.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            accept_invalid_certs: false,
            cleanup_on_failure: false,
            settings: Settings::default(),
        }
    }

    /// Temporary GIF, named after the user
    pub fn output_path(&self, username: &str) -> PathBuf {
        self.output_dir.join(format!("{}.gif", username.to_lowercase()))
    }

    pub fn link_path(&self) -> PathBuf {
        self.output_dir.join("link.txt")
    }
}

/// What a successful run left behind
#[derive(Clone, Debug)]
pub struct RunOutput {
    pub url: String,
    pub link_path: PathBuf,
    pub frames: usize,
}

/// Runs the whole thing once. Any failure aborts the run.
///
/// The link is written before the temporary GIF is removed.
pub fn run(config: &Config, username: &str, typeface: &dyn Typeface, reporter: &mut dyn ProgressReporter) -> CatResult<RunOutput> {
    let username = if username.is_empty() { DEFAULT_USERNAME } else { username };
    fs::create_dir_all(&config.output_dir)?;
    let client = http_client(config.accept_invalid_certs)?;

    log::info!("fetching {}", config.source_url);
    let data = fetch_animation(&client, &config.source_url)?;
    let frames = GifDecoder::new(data)?.collect::<CatResult<Vec<_>>>()?;
    log::info!("stamping '{}' on {} frames", username, frames.len());
    let stamped = composite(frames, typeface, &Overlay::new(username), reporter)?;

    let gif_path = config.output_path(username);
    let res = encode_upload_and_persist(config, &client, &stamped, &gif_path);
    if res.is_err() && config.cleanup_on_failure && gif_path.exists() {
        log::warn!("removing {} after failure", gif_path.display());
        if let Err(err) = fs::remove_file(&gif_path) {
            log::warn!("can't remove {}: {}", gif_path.display(), err);
        }
    }
    let url = res?;

    Ok(RunOutput {
        url,
        link_path: config.link_path(),
        frames: stamped.len(),
    })
}

fn encode_upload_and_persist(config: &Config, client: &Client, stamped: &[StampedFrame], gif_path: &Path) -> CatResult<String> {
    encode_to_file(stamped, gif_path, &config.settings)?;
    log::info!("wrote {}", gif_path.display());

    let url = upload_file(client, &config.upload_endpoint, &config.client_id, gif_path)?;
    log::info!("uploaded to {}", url);

    let link_path = config.link_path();
    fs::write(&link_path, format!("{}\n", url))?;
    fs::remove_file(gif_path)?;
    Ok(url)
}
