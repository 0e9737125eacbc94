use clap::Parser;
use monview::config;
use monview::sys::runtime;
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "monview", version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(short = 'a', long)]
    address: Option<IpAddr>,

    /// Port to listen on
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Open the page in a browser once the server is up
    #[arg(long)]
    show: bool,

    /// Config file to read and watch (defaults to the user config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => Some(path),
        None => config::get_config_path()
            .inspect_err(|e| log::warn!("{}; running without a config file", e))
            .ok(),
    };

    let mut config = config::load_or_default(config_path.as_deref());
    if let Some(address) = cli.address {
        config.server.address = address;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.show {
        config.server.open_browser = true;
    }

    runtime::run(config, config_path)
}
