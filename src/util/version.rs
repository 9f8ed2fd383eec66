pub const APP_NAME: &str = "Guild Price Board";
pub const APP_REPO_URL: &str = "https://github.com/skynatbs/guild_price_board";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_TAG: Option<&str> = option_env!("GIT_TAG");

/// Release label: the git tag when the build had one, else the crate version.
pub fn version_label() -> String {
    if let Some(tag) = GIT_TAG {
        tag.to_string()
    } else {
        format!("v{APP_VERSION}")
    }
}

/// User agent sent with every outbound request.
pub fn user_agent() -> String {
    format!("{}/{} (+{})", APP_NAME, version_label(), APP_REPO_URL)
}
