//! Route paths.

pub const GET_API_HEALTH: &str = "/api/health";
pub const POST_AUTH_CALLBACK_CREDENTIALS: &str = "/api/auth/callback/credentials";
pub const POST_AUTH_SIGNOUT: &str = "/api/auth/signout";
pub const GET_AUTH_SESSION: &str = "/api/auth/session";
pub const GET_AUTH_ME: &str = "/api/auth/me";
