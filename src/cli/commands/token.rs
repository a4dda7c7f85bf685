use anyhow::Context;
use serde_json::json;

use crate::auth::issue_local_token;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

pub fn handle(
    uid: &str,
    email: Option<String>,
    hours: Option<u64>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    // Only the auth section matters here, so storage settings are not required
    let config = AppConfig::from_lookup(|key| match key {
        "STORAGE_BACKEND" => Some("memory".to_string()),
        "AUTH_PROVIDER" => Some("local".to_string()),
        _ => std::env::var(key).ok(),
    })
    .context("invalid configuration")?;

    let secret = config.auth.jwt_secret.as_deref().context("JWT_SECRET is not set")?;
    let hours = hours.unwrap_or(config.auth.jwt_expiry_hours);
    let token = issue_local_token(secret, uid, email, hours)?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "uid": uid, "expiresInHours": hours, "token": token }))?
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
