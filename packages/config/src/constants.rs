// ABOUTME: Environment variable name constants and built-in defaults
// ABOUTME: Centralized definitions of every environment variable FlowInsight reads

// Backend
pub const FLOWINSIGHT_API_URL: &str = "FLOWINSIGHT_API_URL";
pub const FLOWINSIGHT_OAUTH_PROVIDER: &str = "FLOWINSIGHT_OAUTH_PROVIDER";

// Retry Policy
pub const FLOWINSIGHT_RETRY_ATTEMPTS: &str = "FLOWINSIGHT_RETRY_ATTEMPTS";
pub const FLOWINSIGHT_RETRY_DELAY_MS: &str = "FLOWINSIGHT_RETRY_DELAY_MS";
pub const FLOWINSIGHT_RETRY_CLIENT_ERRORS: &str = "FLOWINSIGHT_RETRY_CLIENT_ERRORS";

// HTTP Timeouts
pub const FLOWINSIGHT_HTTP_REQUEST_TIMEOUT_SECS: &str = "FLOWINSIGHT_HTTP_REQUEST_TIMEOUT_SECS";
pub const FLOWINSIGHT_HTTP_CONNECT_TIMEOUT_SECS: &str = "FLOWINSIGHT_HTTP_CONNECT_TIMEOUT_SECS";

// Session Storage
pub const FLOWINSIGHT_SESSION_FILE: &str = "FLOWINSIGHT_SESSION_FILE";

// Defaults
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_OAUTH_PROVIDER: &str = "replit";
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Directory under the home directory holding local FlowInsight state
pub const FLOWINSIGHT_DIR: &str = ".flowinsight";
pub const SESSION_FILE_NAME: &str = "session.json";
