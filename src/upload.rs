use crate::error::*;
use reqwest::blocking::{multipart, Client};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Deserialize;
use std::path::Path;

/// Imgur's image upload endpoint
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://api.imgur.com/3/image";

#[derive(Deserialize)]
struct UploadResponse {
    data: UploadedImage,
}

#[derive(Deserialize)]
struct UploadedImage {
    link: String,
}

/// Posts the file as the `image` form field and returns its public URL.
///
/// Only a 200 response is a success; the file is left untouched either way.
pub fn upload_file(client: &Client, endpoint: &str, client_id: &str, path: &Path) -> CatResult<String> {
    let form = multipart::Form::new().file("image", path)?;
    let response = client.post(endpoint)
        .header(AUTHORIZATION, format!("Client-ID {}", client_id))
        .multipart(form)
        .send()
        .map_err(Error::UploadTransport)?;

    let status = response.status();
    let body = response.text().map_err(Error::UploadTransport)?;
    if status != StatusCode::OK {
        return Err(Error::Upload(status.as_u16(), body));
    }
    link_from_response(&body)
}

fn link_from_response(body: &str) -> CatResult<String> {
    let res: UploadResponse = serde_json::from_str(body).map_err(|e| Error::UploadResponse(e.to_string()))?;
    Ok(res.data.link)
}
