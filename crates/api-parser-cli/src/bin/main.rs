//! api-parser CLI
//!
//! Reads an OpenAPI spec (file or URL) and prints the parsed models and path
//! tree as JSON, for consumption by SDK generators.

use api_parser_cli::{init_tracing, run, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    run(&cli).await
}
