//! Build metadata accessors.
//! Includes the generated version.rs from the build script, providing a single
//! source of truth for the binary and the HTTP user agent.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Crate version from Cargo metadata
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// User agent sent with every provider request
pub fn user_agent() -> String {
    format!("repoaudit/{}", version())
}
