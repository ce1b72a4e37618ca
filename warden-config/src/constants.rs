/// Placeholder pepper used when none is configured. Accepted with a warning
/// so a fresh checkout starts, but never suitable outside development.
pub const DEFAULT_PASSWORD_PEPPER: &str = "warden-dev-password-pepper-change-me";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_ID_HEADER: &str = "x-user-id";
pub const DEFAULT_ROLE_HEADER: &str = "x-user-role";

pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=warn";

/// Environment variable naming an explicit TOML config path.
pub const CONFIG_PATH_VAR: &str = "WARDEN_CONFIG";
