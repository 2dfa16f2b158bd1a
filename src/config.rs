use clap::{Parser, Subcommand};

use crate::source::{Format, Location};

pub const DEFAULT_INPUT: &str = "great-britain-latest.osm.pbf";
pub const DEFAULT_URL: &str = "http://download.geofabrik.de/europe/great-britain-latest.osm.pbf";

/// Motorway junction coordinate lookup service.
#[derive(Debug, Clone, Parser)]
#[command(name = "junction-service", version, about)]
pub struct Config {
    /// Stream the dataset from `--url` instead of reading `--input`.
    #[arg(long, env = "JUNCTION_LOOKUP_REMOTE")]
    pub remote: bool,

    /// Local OSM extract (.osm.pbf, .osm or .osm.gz).
    #[arg(long, env = "JUNCTION_LOOKUP_INPUT", default_value = DEFAULT_INPUT)]
    pub input: String,

    /// Remote OSM extract, used with `--remote`.
    #[arg(long, env = "JUNCTION_LOOKUP_URL", default_value = DEFAULT_URL)]
    pub url: String,

    #[arg(long, env = "JUNCTION_LOOKUP_FORMAT", value_enum, default_value_t = Format::Auto)]
    pub format: Format,

    /// Address for junction lookups; bound once the index is built.
    #[arg(long, env = "JUNCTION_LOOKUP_ADDRESS", default_value = "localhost:8080")]
    pub address: String,

    /// Address for readiness and liveness probes; bound at startup.
    #[arg(long, env = "JUNCTION_LOOKUP_READY_ADDRESS", default_value = "localhost:8081")]
    pub ready_address: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Build the index, print the coordinates of one junction and exit.
    Query {
        #[arg(long)]
        road: String,
        #[arg(long)]
        junc: String,
    },
}

impl Config {
    pub fn location(&self) -> Location {
        if self.remote {
            Location::Remote(self.url.clone())
        } else {
            Location::Local(self.input.clone())
        }
    }
}
