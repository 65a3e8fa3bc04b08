use std::env;

use super::error::AppError;

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub jwt_secret: String,
    pub production: bool,
    /// `CORS_ORIGIN`, comma separated
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = get("PORT", "5000")
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("PORT is not a valid port: {}", e)))?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Config("JWT_SECRET must be set".to_string()))?;

        let cors_origins: Vec<String> = get("CORS_ORIGIN", "http://localhost:5173")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if cors_origins.is_empty() {
            return Err(AppError::Config("CORS_ORIGIN must list at least one origin".to_string()));
        }
        // Credentialed CORS cannot use a wildcard origin
        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(AppError::Config("CORS_ORIGIN must not be \"*\"".to_string()));
        }

        Ok(Self {
            host: get("HOST", "0.0.0.0"),
            port,
            mongodb_uri: get("MONGODB_URI", "mongodb://localhost:27017"),
            mongodb_database: get("MONGODB_DATABASE", "tutorhubDB"),
            jwt_secret,
            production: get("NODE_ENV", "development") == "production",
            cors_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.mongodb_database, "tutorhubDB");
        assert_eq!(config.cors_origins, vec!["http://localhost:5173".to_string()]);
        assert!(!config.production);
    }

    #[test]
    fn test_missing_secret_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("PORT", "8080")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_cors_origin_list() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "x"),
            ("CORS_ORIGIN", "http://localhost:5173, https://tutorhub.app"),
        ]))
        .unwrap();
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:5173".to_string(), "https://tutorhub.app".to_string()]
        );
    }

    #[test]
    fn test_wildcard_or_empty_cors_origin_is_rejected() {
        for value in ["*", "https://tutorhub.app,*", " , "] {
            let result = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("CORS_ORIGIN", value)]));
            assert!(matches!(result, Err(AppError::Config(_))), "accepted {:?}", value);
        }
    }

    #[test]
    fn test_production_and_bad_port() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "x"),
            ("NODE_ENV", "production"),
        ]))
        .unwrap();
        assert!(config.production);

        let result = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("PORT", "http")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
