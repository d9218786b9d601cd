use serde::{Deserialize, Serialize};

use crate::{Event, EventProperties, ProfileIdentifier, ProfileProperties};

/// Continuation marker: a number on the v2 group endpoint, a string on the
/// v1 timelines.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Marker {
    Number(serde_json::Number),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct GroupMembersPage {
    #[serde(default)]
    pub marker: Option<Marker>,
    #[serde(default)]
    pub records: Vec<ProfileIdentifier>,
}

#[derive(Debug, Deserialize)]
pub struct TimelinePage {
    #[serde(default)]
    pub data: Vec<Event>,
    #[serde(default)]
    pub next: Option<Marker>,
}

#[derive(Debug, Serialize)]
pub struct ListNameBody<'a> {
    pub api_key: &'a str,
    pub list_name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyBody<'a> {
    pub api_key: &'a str,
}

#[derive(Debug, Serialize)]
pub struct IdentifyPayload<'a> {
    pub token: &'a str,
    pub properties: &'a ProfileProperties,
}

#[derive(Debug, Serialize)]
pub struct TrackPayload<'a> {
    pub token: &'a str,
    pub event: &'a str,
    pub customer_properties: &'a ProfileProperties,
    pub properties: &'a EventProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}
