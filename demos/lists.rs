use klaviyo_http::KlaviyoClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = KlaviyoClient::from_env()?;
    let lists = client.lists();

    let created = lists.create_list("klaviyo-http demo").await?;
    println!("created list {}", created.list_id);

    lists
        .update_list(&created.list_id, "klaviyo-http demo (renamed)")
        .await?;

    if let Some(details) = lists.get_list_details(&created.list_id).await? {
        println!("{} -> {}", details.list_id, details.list_name);
    }

    for list in lists.get_lists().await? {
        println!("{}\t{}", list.list_id, list.list_name);
    }

    lists.delete_list(&created.list_id).await?;
    println!("deleted list {}", created.list_id);

    Ok(())
}
