use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub events: EventsConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsConfig {
    /// Placeholder images resolve to `{image_base_url}/{event id}/400/200`.
    pub image_base_url: String,
}

/// Accounts guaranteed to exist after startup.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_gid: String,
    pub admin_name: String,
    pub admin_password: String,
    pub student_gid: String,
    pub student_name: String,
    pub student_password: String,
    pub student_email: String,
    pub student_phone: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", i64::from(defaults.database.max_connections))?
            .set_default("auth.jwt_secret", defaults.auth.jwt_secret)?
            .set_default("auth.token_ttl_hours", defaults.auth.token_ttl_hours)?
            .set_default("events.image_base_url", defaults.events.image_base_url)?
            .set_default("bootstrap.admin_gid", defaults.bootstrap.admin_gid)?
            .set_default("bootstrap.admin_name", defaults.bootstrap.admin_name)?
            .set_default("bootstrap.admin_password", defaults.bootstrap.admin_password)?
            .set_default("bootstrap.student_gid", defaults.bootstrap.student_gid)?
            .set_default("bootstrap.student_name", defaults.bootstrap.student_name)?
            .set_default("bootstrap.student_password", defaults.bootstrap.student_password)?
            .set_default("bootstrap.student_email", defaults.bootstrap.student_email)?
            .set_default("bootstrap.student_phone", defaults.bootstrap.student_phone)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with AURAPASS__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("AURAPASS").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite://aurapass.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production".to_string(),
                token_ttl_hours: 24,
            },
            events: EventsConfig {
                image_base_url: "https://picsum.photos/seed".to_string(),
            },
            bootstrap: BootstrapConfig {
                admin_gid: "Organizer".to_string(),
                admin_name: "Admin User".to_string(),
                admin_password: "Admin".to_string(),
                student_gid: "Aurapass-YCP-0001".to_string(),
                student_name: "Aarav Kulkarni".to_string(),
                student_password: "456".to_string(),
                student_email: "aarav@student.com".to_string(),
                student_phone: "9876543210".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_load_without_sources() {
        let settings = Settings::new().expect("defaults should deserialize");
        assert_eq!(settings.events.image_base_url, "https://picsum.photos/seed");
        assert_eq!(settings.auth.token_ttl_hours, 24);
        assert_eq!(settings.bootstrap.admin_gid, "Organizer");
    }
}
