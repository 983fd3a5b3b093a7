//! Token discovery from the Terraform CLI credentials file.
//!
//! When no token is passed explicitly, the hostname is looked up in
//! `~/.terraform.d/credentials.tfrc.json`, the file `terraform login`
//! maintains. This is a CLI-side convenience; the library itself only ever
//! accepts a token string.

use std::path::PathBuf;

/// Locate the credentials file for the current user.
fn credentials_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".terraform.d").join("credentials.tfrc.json"))
}

/// Look up a stored token for a backend hostname, if one exists.
pub fn token_from_cli_config(hostname: &str) -> Option<String> {
    let path = credentials_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    let token = parse_credentials(&content, hostname);
    if token.is_some() {
        tracing::debug!(path = %path.display(), hostname = %hostname, "using token from credentials file");
    }
    token
}

fn parse_credentials(content: &str, hostname: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(content).ok()?;
    parsed
        .get("credentials")?
        .get(hostname)?
        .get("token")?
        .as_str()
        .map(String::from)
}
