//! Public identify/track endpoints, authorized by the public token.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use crate::{
    decode::decode_flag,
    request::Endpoint,
    wire::{IdentifyPayload, TrackPayload},
    EventProperties, KlaviyoClient, KlaviyoError, ProfileProperties, Result,
};

impl KlaviyoClient {
    /// Creates or updates a person from the given properties.
    ///
    /// Returns the acknowledgement flag sent back by the API.
    pub async fn identify(&self, profile: &ProfileProperties) -> Result<bool> {
        let payload = IdentifyPayload {
            token: self.public_token()?,
            properties: profile,
        };
        self.send_payload("identify", &payload).await
    }

    /// Records an event against a person.
    pub async fn track(
        &self,
        event: &str,
        profile: &ProfileProperties,
        properties: &EventProperties,
    ) -> Result<bool> {
        self.send_track(event, profile, properties, None).await
    }

    /// Records an event that happened at `time` (unix seconds).
    pub async fn track_at(
        &self,
        event: &str,
        profile: &ProfileProperties,
        properties: &EventProperties,
        time: i64,
    ) -> Result<bool> {
        self.send_track(event, profile, properties, Some(time)).await
    }

    async fn send_track(
        &self,
        event: &str,
        profile: &ProfileProperties,
        properties: &EventProperties,
        time: Option<i64>,
    ) -> Result<bool> {
        let payload = TrackPayload {
            token: self.public_token()?,
            event,
            customer_properties: profile,
            properties,
            time,
        };
        self.send_payload("track", &payload).await
    }

    async fn send_payload<P: Serialize>(&self, path: &str, payload: &P) -> Result<bool> {
        let endpoint = Endpoint::get([path]).query("data", encode_payload(payload)?);
        let body = self.execute(&endpoint).await?;
        decode_flag(&body)
    }
}

fn encode_payload<P: Serialize>(payload: &P) -> Result<String> {
    let json = serde_json::to_vec(payload)
        .map_err(|err| KlaviyoError::Encode(format!("track payload: {err}")))?;
    Ok(STANDARD.encode(json))
}
