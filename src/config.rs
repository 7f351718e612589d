use std::env;

#[derive(Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub jwt_secret: String,
    pub cors_origin: Option<String>,
    pub admin_username: String,
    pub admin_password: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        let listen_addr = env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string());

        // Absent means "allow any origin" (development default).
        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty());

        let admin_username = env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            env::var("ADMIN_PASSWORD").map_err(|_| "ADMIN_PASSWORD must be set".to_string())?;

        Ok(ServerConfig {
            listen_addr,
            jwt_secret,
            cors_origin,
            admin_username,
            admin_password,
        })
    }

    /// Fixed configuration for router-level tests; no environment reads.
    pub fn test_default() -> Self {
        ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            jwt_secret: "test-secret".to_string(),
            cors_origin: None,
            admin_username: "admin".to_string(),
            admin_password: "admin-test-password".to_string(),
        }
    }
}
