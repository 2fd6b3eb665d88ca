#![allow(dead_code)]

use gifstamp::text::{TextMask, Typeface};
use std::borrow::Cow;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use tiny_http::{Method, Response, Server, StatusCode};

pub fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "gifstamp_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        name = name,
    ))
}

/// 64×48 frames alternating between red and blue, with the given delays (1/100s)
pub fn source_gif(delays: &[u16]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut enc = gif::Encoder::new(&mut out, 64, 48, &[255, 0, 0, 0, 0, 255]).unwrap();
        for (n, &delay) in delays.iter().enumerate() {
            enc.write_frame(&gif::Frame {
                width: 64,
                height: 48,
                delay,
                buffer: Cow::Owned(vec![(n % 2) as u8; 64 * 48]),
                ..gif::Frame::default()
            }).unwrap();
        }
    }
    out
}

/// Frames of a GIF embedded somewhere in `data`, e.g. a multipart body
pub fn gif_frames(data: &[u8]) -> Vec<gif::Frame<'static>> {
    let start = data.windows(6).position(|w| w == b"GIF89a").expect("GIF in body");
    let mut opts = gif::DecodeOptions::new();
    opts.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = opts.read_info(&data[start..]).unwrap();
    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        frames.push(frame.clone());
    }
    frames
}

/// Every char is a solid 10×20 block, with 2px between chars
pub struct BlockFace;

impl Typeface for BlockFace {
    fn render(&self, text: &str, _px: f32) -> TextMask {
        let n = text.chars().count();
        if n == 0 {
            return TextMask::default();
        }
        let width = n * 12 - 2;
        let coverage = (0..20 * width).map(|i| if i % width % 12 < 10 { 255 } else { 0 }).collect();
        TextMask { width, height: 20, top: 5, coverage }
    }
}

pub struct ReceivedUpload {
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

/// Serves the source GIF at `/anim.gif` and imitates the upload API at `/3/image`
pub struct MockHost {
    base: String,
    uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
}

impl MockHost {
    pub fn start(gif: Vec<u8>, upload_status: u16, upload_body: &str) -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&uploads);
        let upload_body = upload_body.to_owned();

        thread::spawn(move || {
            for mut req in server.incoming_requests() {
                let method = req.method().clone();
                let url = req.url().to_string();
                match (method, url.as_str()) {
                    (Method::Get, "/anim.gif") => {
                        let _ = req.respond(Response::from_data(gif.clone()));
                    }
                    (Method::Post, "/3/image") => {
                        let authorization = req.headers().iter()
                            .find(|h| h.field.equiv("Authorization"))
                            .map(|h| h.value.as_str().to_owned());
                        let mut body = Vec::new();
                        let _ = req.as_reader().read_to_end(&mut body);
                        seen.lock().unwrap().push(ReceivedUpload { authorization, body });
                        let _ = req.respond(Response::from_string(upload_body.clone()).with_status_code(upload_status));
                    }
                    _ => {
                        let _ = req.respond(Response::empty(StatusCode(404)));
                    }
                }
            }
        });

        Self {
            base: format!("http://{}", addr),
            uploads,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn uploads(&self) -> std::sync::MutexGuard<'_, Vec<ReceivedUpload>> {
        self.uploads.lock().unwrap()
    }
}
