#[macro_use] extern crate quick_error;

use gifstamp::progress::{NoProgress, ProgressReporter};
use gifstamp::text::FontFace;
use gifstamp::{Config, PaletteMode, Settings};

mod error;
use crate::error::*;

use clap::*;
use pbr::ProgressBar;

use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = bin_main() {
        eprintln!("error: {}", e);
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  caused by: {}", err);
            source = err.source();
        }
        std::process::exit(1);
    }
}

fn bin_main() -> BinResult<()> {
    let matches = App::new(crate_name!())
                        .version(crate_version!())
                        .about("Writes a username on every frame of an animated GIF and uploads it")
                        .setting(AppSettings::UnifiedHelpMessage)
                        .setting(AppSettings::DeriveDisplayOrder)
                        .arg(Arg::with_name("client-id")
                            .long("client-id")
                            .help("Image hosting API client ID")
                            .takes_value(true)
                            .empty_values(false)
                            .value_name("id")
                            .env("IMGUR_CLIENT_ID")
                            .hide_env_values(true))
                        .arg(Arg::with_name("source")
                            .long("source")
                            .help("Animated GIF to start from")
                            .empty_values(false)
                            .value_name("url")
                            .default_value(gifstamp::DEFAULT_SOURCE_URL))
                        .arg(Arg::with_name("endpoint")
                            .long("endpoint")
                            .help("Upload API endpoint")
                            .empty_values(false)
                            .value_name("url")
                            .default_value(gifstamp::DEFAULT_UPLOAD_ENDPOINT))
                        .arg(Arg::with_name("font")
                            .long("font")
                            .help("TrueType/OpenType font for the text [default: bundled DejaVu Sans Mono]")
                            .takes_value(true)
                            .empty_values(false)
                            .value_name("file.ttf"))
                        .arg(Arg::with_name("output-dir")
                            .long("output-dir")
                            .short("o")
                            .help("Directory for the temporary GIF and link.txt")
                            .empty_values(false)
                            .value_name("dir")
                            .default_value(gifstamp::DEFAULT_OUTPUT_DIR))
                        .arg(Arg::with_name("palette")
                            .long("palette")
                            .help("One palette for all frames, or one per frame (may flicker)")
                            .possible_values(&["global", "per-frame"])
                            .default_value("global"))
                        .arg(Arg::with_name("quality")
                            .long("quality")
                            .value_name("1-100")
                            .takes_value(true)
                            .help("Lower quality may give smaller file"))
                        .arg(Arg::with_name("fast")
                            .long("fast")
                            .help("Faster quantization, but lower quality"))
                        .arg(Arg::with_name("insecure")
                            .long("insecure")
                            .help("Don't validate TLS certificates (for testing only)"))
                        .arg(Arg::with_name("cleanup-on-failure")
                            .long("cleanup-on-failure")
                            .help("Delete the temporary GIF if the upload fails"))
                        .arg(Arg::with_name("quiet")
                            .long("quiet")
                            .short("q")
                            .help("Do not show a progress bar"))
                        .arg(Arg::with_name("USERNAME")
                            .help("Name to write on the animation")
                            .default_value(gifstamp::DEFAULT_USERNAME))
                        .get_matches_from(wild::args_os());

    let client_id = matches.value_of("client-id").ok_or(BinError::MissingClientId)?;
    let username = matches.value_of("USERNAME").unwrap_or(gifstamp::DEFAULT_USERNAME);
    let settings = Settings {
        palette: value_t!(matches, "palette", PaletteMode).map_err(|e| BinError::Arg(e.message))?,
        quality: parse_opt(matches.value_of("quality"))?.unwrap_or(100).max(1).min(100),
        fast: matches.is_present("fast"),
    };
    let config = Config {
        source_url: matches.value_of("source").ok_or(BinError::MissingArg("source"))?.to_owned(),
        upload_endpoint: matches.value_of("endpoint").ok_or(BinError::MissingArg("endpoint"))?.to_owned(),
        output_dir: PathBuf::from(matches.value_of_os("output-dir").ok_or(BinError::MissingArg("output-dir"))?),
        accept_invalid_certs: matches.is_present("insecure"),
        cleanup_on_failure: matches.is_present("cleanup-on-failure"),
        settings,
        ..Config::new(client_id)
    };

    let typeface = match matches.value_of_os("font") {
        Some(path) => FontFace::from_file(Path::new(path))?,
        None => FontFace::bundled()?,
    };

    let mut progress: Box<dyn ProgressReporter> = if matches.is_present("quiet") {
        Box::new(NoProgress {})
    } else {
        let mut pb = ProgressBar::new(0);
        pb.show_speed = false;
        pb.show_percent = false;
        pb.format(" #_. ");
        pb.message("Frame ");
        pb.set_max_refresh_rate(Some(Duration::from_millis(250)));
        Box::new(pb)
    };

    let out = gifstamp::run(&config, username, &typeface, &mut *progress)?;

    progress.done(&format!("gifstamp stamped {} frames, link saved in {}", out.frames, out.link_path.display()));
    println!("{}", out.url);
    Ok(())
}

fn parse_opt<T: std::str::FromStr<Err = std::num::ParseIntError>>(s: Option<&str>) -> BinResult<Option<T>> {
    match s {
        Some(s) => Ok(Some(s.parse()?)),
        None => Ok(None),
    }
}
