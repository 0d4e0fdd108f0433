use shared::config::{AppConfig, ConfigError};

/// Load configuration baked in at build time (`SUPABASE_URL=… trunk build`).
pub fn load() -> Result<AppConfig, ConfigError> {
    AppConfig::from_lookup(|key| build_env(key).map(str::to_string))
}

fn build_env(key: &str) -> Option<&'static str> {
    match key {
        "SUPABASE_URL" => option_env!("SUPABASE_URL"),
        "SUPABASE_ANON_KEY" => option_env!("SUPABASE_ANON_KEY"),
        "API_BASE_URL" => option_env!("API_BASE_URL"),
        "AUTH_GUARD_TIMEOUT_MS" => option_env!("AUTH_GUARD_TIMEOUT_MS"),
        "AUTH_GUARD_ON_ERROR" => option_env!("AUTH_GUARD_ON_ERROR"),
        _ => None,
    }
}
