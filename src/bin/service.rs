use clap::Parser;
use junction_lookup::{Command, Config};
use tracing::error;

#[tokio::main]
async fn main() {
    junction_lookup::init_logging();

    let config = Config::parse();

    if let Some(Command::Query { road, junc }) = &config.command {
        match junction_lookup::query(&config, road, junc).await {
            Ok(body) => println!("{body}"),
            Err(err) => {
                eprintln!("No coordinates for {road} junction {junc}: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(err) = junction_lookup::serve(&config).await {
        error!(%err, "error running service");
        std::process::exit(1);
    }

    // An ingestion worker interrupted by Ctrl-C would otherwise keep the
    // runtime alive until it finishes decoding.
    std::process::exit(0);
}
