//! Command-line interface for cityscout.

mod commands;

use clap::{Parser, Subcommand};

/// cityscout - location-keyed caching proxy for city information
#[derive(Parser)]
#[command(name = "cityscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API (default)
    #[command(alias = "web")]
    Serve,

    /// Resolve a search string to a stored location
    #[command(alias = "r")]
    Resolve {
        /// Free-text location, e.g. "seattle wa"
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Fetch one resource for a location through the cache
    #[command(alias = "f")]
    Fetch {
        /// weather, yelp, trails, movies or events
        resource: String,
        /// Free-text location
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
