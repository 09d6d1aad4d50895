use clap::Parser;

/// Scoreboard user service
#[derive(Debug, Clone, Parser)]
#[command(name = "scoreboard")]
#[command(about = "Stores users and their point totals behind a small JSON API", long_about = None)]
pub struct Config {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://database.db")]
    pub database_url: String,

    /// Address to bind
    #[arg(long, env = "SCOREBOARD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "SCOREBOARD_PORT", default_value_t = 5000)]
    pub port: u16,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
