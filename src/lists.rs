//! v2 list and group membership endpoints.

use crate::{
    decode::decode_json,
    request::Endpoint,
    wire::{ApiKeyBody, GroupMembersPage, ListNameBody},
    KlaviyoClient, List, ListDetails, ListIdentifier, ProfileIdentifier, Result,
};

/// List endpoints, obtained from [`KlaviyoClient::lists`].
///
/// # Example
///
/// ```no_run
/// # async fn example(client: klaviyo_http::KlaviyoClient) -> klaviyo_http::Result<()> {
/// let created = client.lists().create_list("VIP").await?;
/// let members = client.lists().get_group_profiles(&created.list_id).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ListsApi<'a> {
    client: &'a KlaviyoClient,
}

impl<'a> ListsApi<'a> {
    pub(crate) fn new(client: &'a KlaviyoClient) -> Self {
        Self { client }
    }

    /// Returns every member of a list or segment, following `marker`
    /// across pages.
    ///
    /// An unknown group yields an empty vector.
    pub async fn get_group_profiles(&self, group_id: &str) -> Result<Vec<ProfileIdentifier>> {
        let endpoint = Endpoint::get(["v2", "group", group_id, "members", "all"])
            .query("api_key", self.client.api_key()?)
            .paginated("marker");
        self.client
            .fetch_all_pages::<GroupMembersPage>(&endpoint)
            .await
    }

    pub async fn create_list(&self, name: &str) -> Result<ListIdentifier> {
        let endpoint = Endpoint::post(["v2", "lists"]).json(&ListNameBody {
            api_key: self.client.api_key()?,
            list_name: name,
        })?;
        let body = self.client.execute(&endpoint).await?;
        decode_json(&body, "list identifier")
    }

    /// Returns all lists in the account; empty when the API answers 404.
    pub async fn get_lists(&self) -> Result<Vec<List>> {
        let endpoint = Endpoint::get(["v2", "lists"]).query("api_key", self.client.api_key()?);
        let lists = self.client.fetch_optional(&endpoint, "lists").await?;
        Ok(lists.unwrap_or_default())
    }

    /// Returns `None` when the list does not exist.
    pub async fn get_list_details(&self, list_id: &str) -> Result<Option<ListDetails>> {
        let endpoint =
            Endpoint::get(["v2", "list", list_id]).query("api_key", self.client.api_key()?);
        self.client.fetch_optional(&endpoint, "list details").await
    }

    /// Renames a list.
    pub async fn update_list(&self, list_id: &str, name: &str) -> Result<()> {
        let endpoint = Endpoint::put(["v2", "list", list_id]).json(&ListNameBody {
            api_key: self.client.api_key()?,
            list_name: name,
        })?;
        self.client.execute(&endpoint).await?;
        Ok(())
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<()> {
        let endpoint = Endpoint::delete(["v2", "list", list_id]).json(&ApiKeyBody {
            api_key: self.client.api_key()?,
        })?;
        self.client.execute(&endpoint).await?;
        Ok(())
    }
}
