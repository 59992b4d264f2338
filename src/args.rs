use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "task-board")]
#[command(about = "Task tracking server with a JSON HTTP API")]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Bind host override
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port override
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL override
    #[arg(long)]
    pub database_url: Option<String>,
}
