// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3003;
pub const AUTH_PATH: &str = "auth";
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";
pub const MAX_BODY_BYTES: u64 = 16 * 1024;
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 900;
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 604_800;
pub const MIN_AUTH_LATENCY_MS: u64 = 100;
