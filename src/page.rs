use serde::de::DeserializeOwned;

use crate::wire::{GroupMembersPage, Marker, TimelinePage};
use crate::{Event, ProfileIdentifier};

/// Decoded body of one page of a paginated endpoint.
pub(crate) trait Page: DeserializeOwned {
    type Item;

    /// Splits the page into its items and the marker for the next page.
    ///
    /// `None` means this is the last page.
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

impl Page for GroupMembersPage {
    type Item = ProfileIdentifier;

    fn into_parts(self) -> (Vec<ProfileIdentifier>, Option<String>) {
        (self.records, self.marker.and_then(Marker::into_param))
    }
}

impl Page for TimelinePage {
    type Item = Event;

    fn into_parts(self) -> (Vec<Event>, Option<String>) {
        (self.data, self.next.and_then(Marker::into_param))
    }
}

impl Marker {
    /// Query-string form of the marker; an empty string ends pagination.
    fn into_param(self) -> Option<String> {
        let value = match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text,
        };
        (!value.is_empty()).then_some(value)
    }
}
