use klaviyo_http::KlaviyoClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let group_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: group_members <group-id>"))?;

    let client = KlaviyoClient::from_env()?;
    let members = client.lists().get_group_profiles(&group_id).await?;

    println!("{} member(s) in {group_id}", members.len());
    for member in members {
        println!("{}\t{}", member.id, member.email.unwrap_or_default());
    }

    Ok(())
}
