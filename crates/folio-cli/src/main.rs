//! `folio`: inspect markdown content and manage editor pages.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use folio_cli::{CliArgs, FolioCli};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    FolioCli::init_logging(args.verbose, args.quiet);

    let cli = FolioCli::from_args("folio", &args)?;
    cli.run(args).await?;
    Ok(())
}
