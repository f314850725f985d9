//! OpenAPI from pages - Command-line tool for documenting an application's REST endpoints.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-pages [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate YAML documentation:
//! ```bash
//! openapi-from-pages ./my-app -o openapi.yaml
//! ```
//!
//! Generate French JSON documentation from `messages_fr.properties`:
//! ```bash
//! openapi-from-pages ./my-app --catalog messages -l fr -f json -o openapi.json
//! ```

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use openapi_from_pages::cli::{self, CliArgs};

fn main() -> Result<()> {
    // The verbose flag decides the log level, so parse before the logger exists
    let args = CliArgs::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    info!(
        "openapi-from-pages {} documenting {} (locale {})",
        env!("CARGO_PKG_VERSION"),
        args.project_path.display(),
        args.locale
    );

    cli::run(cli::parse_args_from_parsed(args)?)
}
