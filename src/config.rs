use std::env;

use crate::power;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub power_base_url: String,
    pub power_community: String,
    pub power_record_start: String,
    pub power_record_end: String,
    pub power_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            power_base_url: env::var("POWER_BASE_URL")
                .unwrap_or_else(|_| power::DEFAULT_BASE_URL.to_string()),
            power_community: env::var("POWER_COMMUNITY")
                .unwrap_or_else(|_| power::DEFAULT_COMMUNITY.to_string()),
            power_record_start: env::var("POWER_RECORD_START")
                .unwrap_or_else(|_| power::DEFAULT_RECORD_START.to_string()),
            power_record_end: env::var("POWER_RECORD_END")
                .unwrap_or_else(|_| power::DEFAULT_RECORD_END.to_string()),
            power_timeout_secs: env::var("POWER_TIMEOUT_SECS")
                .unwrap_or_else(|_| power::DEFAULT_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(power::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
