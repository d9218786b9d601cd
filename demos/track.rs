use klaviyo_http::{EventProperties, KlaviyoClient, ProfileProperties};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let email = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: track <email>"))?;

    let client = KlaviyoClient::from_env()?;
    let profile = ProfileProperties::with_email(&email).set("source", "klaviyo-http demo");

    let identified = client.identify(&profile).await?;
    let tracked = client
        .track(
            "Demo Event",
            &profile,
            &EventProperties::default().set("step", 1),
        )
        .await?;

    println!("identify={identified} track={tracked}");
    Ok(())
}
