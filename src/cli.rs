use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value_t = log::LevelFilter::Info)]
    pub logging_level: log::LevelFilter,

    /// TOML config file. Built-in defaults are used when absent.
    #[arg(long, env = "XPLOGD_WEB_CONFIG")]
    pub config_file: Option<std::path::PathBuf>,

    /// Overrides `server.address` from the config file.
    #[arg(long)]
    pub address: Option<std::net::SocketAddr>,
}
