use crate::configuration::Configuration;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Restaurant table booking service")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on
    #[arg(short, long, env = "PORT", default_value = "4000")]
    port: u16,

    /// PostgreSQL connection URL. Bookings are kept in memory when omitted
    #[arg(short, long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Value expected in the `x-admin-password` header of admin routes
    #[arg(long, env = "ADMIN_PASSWORD", default_value = "123", hide_env_values = true)]
    admin_password: String,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            tracing::debug!(%err, "No .env file loaded");
        }
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn admin_password(&self) -> String {
        self.admin_password.clone()
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }

    fn port(&self) -> String {
        self.port.to_string()
    }
}
