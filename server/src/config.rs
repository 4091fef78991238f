use platform_db::DatabaseSettings;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Self {
        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        );
        Self {
            database: DatabaseSettings::from_env(),
            cors_allowed_origins,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}
