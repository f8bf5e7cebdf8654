use clap::Parser;

use ipgeo::cli::Cli;
use ipgeo::config::{StaticConfig, init_config};
use ipgeo::runtime::modes::run_server;
use ipgeo::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    }

    dotenvy::dotenv().ok();

    let config = init_config(cli.config.as_deref());
    // guard 需要存活到进程结束，否则缓冲的日志会丢失
    let _log_guard = init_logging(&config.logging)?;

    run_server(&config).await
}
