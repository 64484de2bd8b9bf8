mod api;
mod app;
mod application;
mod domain;
mod ui;
mod utils;

use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,flac_downloader=debug"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    iced::application(app::boot, app::update, app::view)
        .title("FLAC Downloader")
        .run()
}
