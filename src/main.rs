//! Git Repository Reports
//!
//! A command line tool charting release branch ages, contributor activity and open issues.

use anyhow::Result;
use tokio::runtime::Runtime;

use gitreports::cli::Cli;
use gitreports::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.common.log_config());

    let rt = Runtime::new()?;
    rt.block_on(cli.execute())
}
