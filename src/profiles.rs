//! v1 people endpoints.

use crate::{
    decode::{decode_json, query_value},
    request::Endpoint,
    wire::TimelinePage,
    Event, KlaviyoClient, KlaviyoError, Profile, ProfileProperties, Result, TimelineQuery,
};

/// Person endpoints, obtained from [`KlaviyoClient::profiles`].
#[derive(Clone, Copy, Debug)]
pub struct ProfilesApi<'a> {
    client: &'a KlaviyoClient,
}

impl<'a> ProfilesApi<'a> {
    pub(crate) fn new(client: &'a KlaviyoClient) -> Self {
        Self { client }
    }

    /// Returns `None` when no person has this id.
    pub async fn get_profile(&self, person_id: &str) -> Result<Option<Profile>> {
        let endpoint =
            Endpoint::get(["v1", "person", person_id]).query("api_key", self.client.api_key()?);
        self.client.fetch_optional(&endpoint, "profile").await
    }

    /// Sets properties on a person and returns the updated record.
    ///
    /// Properties travel as query parameters; `null` custom values are
    /// skipped.
    pub async fn update_profile(
        &self,
        person_id: &str,
        properties: &ProfileProperties,
    ) -> Result<Profile> {
        let mut endpoint =
            Endpoint::put(["v1", "person", person_id]).query("api_key", self.client.api_key()?);

        let encoded = serde_json::to_value(properties)
            .map_err(|err| KlaviyoError::Encode(format!("profile properties: {err}")))?;
        if let serde_json::Value::Object(fields) = encoded {
            for (key, value) in &fields {
                endpoint = endpoint.query_opt(key.as_str(), query_value(value));
            }
        }

        let body = self.client.execute(&endpoint).await?;
        decode_json(&body, "profile")
    }

    /// Returns the person's full event timeline across all metrics.
    ///
    /// Pages are chained through `next`, sent back as `since`.
    pub async fn get_profile_events(
        &self,
        person_id: &str,
        query: &TimelineQuery,
    ) -> Result<Vec<Event>> {
        let endpoint = self.timeline(["v1", "person", person_id, "metrics", "timeline"], query)?;
        self.client.fetch_all_pages::<TimelinePage>(&endpoint).await
    }

    /// Returns the person's timeline for a single metric.
    pub async fn get_profile_metric_events(
        &self,
        person_id: &str,
        metric_id: &str,
        query: &TimelineQuery,
    ) -> Result<Vec<Event>> {
        let endpoint = self.timeline(
            ["v1", "person", person_id, "metric", metric_id, "timeline"],
            query,
        )?;
        self.client.fetch_all_pages::<TimelinePage>(&endpoint).await
    }

    fn timeline<const N: usize>(
        &self,
        segments: [&str; N],
        query: &TimelineQuery,
    ) -> Result<Endpoint> {
        Ok(Endpoint::get(segments)
            .query("api_key", self.client.api_key()?)
            .query_opt("since", query.since.clone())
            .query_opt("count", query.count.map(|count| count.to_string()))
            .query_opt("sort", query.sort.map(|sort| sort.as_str()))
            .paginated("since"))
    }
}
