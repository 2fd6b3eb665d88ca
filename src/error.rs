use std::io;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        /// The source animation could not be downloaded
        Fetch(url: String, msg: String) {
            display("Can't fetch {}: {}", url, msg)
        }
        Decode(msg: String) {
            display("Can't decode the animation: {}", msg)
        }
        NoFrames {
            display("Found no usable frames to encode")
        }
        WrongSize(msg: String) {
            display("{}", msg)
        }
        Gif(err: gif::EncodingError) {
            from()
            display("GIF encoding error: {}", err)
            source(err)
        }
        Quant(liq: imagequant::liq_error) {
            from()
            display("pngquant error: {:?}", liq)
        }
        Font(msg: String) {
            display("Can't load font: {}", msg)
        }
        HttpClient(err: reqwest::Error) {
            display("Can't set up the HTTP client: {}", err)
            source(err)
        }
        UploadTransport(err: reqwest::Error) {
            display("Upload request failed: {}", err)
            source(err)
        }
        /// The hosting service answered with something other than 200
        Upload(status: u16, body: String) {
            display("Upload failed: {} - {}", status, body)
        }
        UploadResponse(msg: String) {
            display("Unexpected upload response: {}", msg)
        }
        Io(err: io::Error) {
            from()
            display("I/O: {}", err)
            source(err)
        }
        Aborted {
            display("aborted")
        }
    }
}

pub type CatResult<T, E = Error> = Result<T, E>;
