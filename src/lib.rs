// Service configuration
pub mod config;

// Outbound request spacing
pub mod rate_limit;

// OnlyFans REST API client
pub mod onlyfans;

// OAuth token model and encryption
pub mod credentials;

// Template store and cache
pub mod templates;

// Creator sync tracking and worker
pub mod sync;

// Dependency health checks
pub mod health;

// HTTP API
pub mod api;
