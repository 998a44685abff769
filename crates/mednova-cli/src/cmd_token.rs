use std::time::Duration;

use clap::Args;
use mednova_core::Settings;
use mednova_token::{AccessToken, VideoGrants};

#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Participant identity written into the token subject
    #[arg(long, default_value = "mednova-agent")]
    pub identity: String,
    /// Room the grant applies to (`*` = any room)
    #[arg(long, default_value = "*")]
    pub room: String,
    /// Token lifetime in hours
    #[arg(long, default_value_t = 6)]
    pub ttl_hours: u64,
    /// API key (overrides LIVEKIT_API_KEY / config)
    #[arg(long)]
    pub api_key: Option<String>,
    /// API secret (overrides LIVEKIT_API_SECRET / config)
    #[arg(long)]
    pub api_secret: Option<String>,
}

/// `mednova token`
pub fn execute(settings: &Settings, args: &TokenArgs) -> anyhow::Result<()> {
    let token = mint(settings, args)?;
    println!("Agent Token:\n{token}");
    Ok(())
}

pub fn mint(settings: &Settings, args: &TokenArgs) -> anyhow::Result<String> {
    let Some(key) = args.api_key.clone().or_else(|| settings.livekit_api_key.clone()) else {
        anyhow::bail!("no API key: pass --api-key or set LIVEKIT_API_KEY");
    };
    let Some(secret) = args
        .api_secret
        .clone()
        .or_else(|| settings.livekit_api_secret.clone())
    else {
        anyhow::bail!("no API secret: pass --api-secret or set LIVEKIT_API_SECRET");
    };

    let Some(ttl_secs) = args.ttl_hours.checked_mul(60 * 60) else {
        anyhow::bail!("--ttl-hours {} is too large", args.ttl_hours);
    };

    let token = AccessToken::new(key, secret)
        .with_identity(&args.identity)
        .with_ttl(Duration::from_secs(ttl_secs))
        .with_grants(VideoGrants::join(&args.room))
        .to_jwt()?;
    Ok(token)
}
