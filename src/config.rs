use rust_decimal::Decimal;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

/// Runtime configuration, read once from the environment at startup.
pub struct Config {
    pub bind_addr: SocketAddr,
    pub db_path: String,
    pub api_key: String,
    pub fmcsa_webkey: String,
    /// Fraction above the listed rate a counter offer may reach before it
    /// is rejected outright. Default 0.10 (10%).
    pub counter_tolerance: Decimal,
}

impl Config {
    pub fn from_env() -> Result<Config, String> {
        let api_key = env::var("APP_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| "APP_API_KEY must be configured before starting the service".to_string())?;

        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|e| format!("invalid BIND_ADDR: {e}"))?;

        let db_path = env::var("DB_PATH").unwrap_or_else(|_| "carrier_api.sqlite3".to_string());

        let fmcsa_webkey = env::var("FMCSA_WEBKEY").unwrap_or_default();

        let counter_tolerance = Decimal::from_str(
            &env::var("NEGOTIATION_TOLERANCE").unwrap_or_else(|_| "0.10".to_string()),
        )
        .map_err(|e| format!("invalid NEGOTIATION_TOLERANCE: {e}"))?;
        if counter_tolerance < Decimal::ZERO {
            return Err("NEGOTIATION_TOLERANCE must not be negative".to_string());
        }

        Ok(Config {
            bind_addr,
            db_path,
            api_key,
            fmcsa_webkey,
            counter_tolerance,
        })
    }
}
