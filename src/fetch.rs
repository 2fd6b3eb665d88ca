use crate::error::*;
use reqwest::blocking::Client;

/// The one blocking client used for both the download and the upload.
///
/// Certificates are validated unless `accept_invalid_certs` is explicitly set.
pub fn http_client(accept_invalid_certs: bool) -> CatResult<Client> {
    let mut builder = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
    if accept_invalid_certs {
        log::warn!("TLS certificate validation is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder.build().map_err(Error::HttpClient)
}

/// Downloads the source animation. Anything but a 2xx response is an error.
pub fn fetch_animation(client: &Client, url: &str) -> CatResult<Vec<u8>> {
    let fetch_err = |err: reqwest::Error| Error::Fetch(url.to_owned(), err.to_string());

    let response = client.get(url).send().map_err(fetch_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Fetch(url.to_owned(), format!("HTTP status {}", status)));
    }
    let body = response.bytes().map_err(fetch_err)?;
    log::debug!("fetched {} bytes from {}", body.len(), url);
    Ok(body.to_vec())
}
