/// Runtime settings, read from the environment (and `.env` via dotenvy).
///
/// The CORS origin list is effectively a stub: the default is `"*"`, and
/// any list containing `"*"` falls back to the wildcard layer.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub cors_origins: Vec<String>,
    pub bind_addr: String,
}

impl Settings {
    pub fn from_env() -> Self {
        let app_name =
            dotenvy::var("APP_NAME").unwrap_or_else(|_| "Simple Chat Backend".to_string());

        let cors_origins = dotenvy::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let bind_addr = dotenvy::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        Self {
            app_name,
            cors_origins,
            bind_addr,
        }
    }

    pub fn allow_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}
