use serde::Deserialize;

/// Inbound "user created" event.
///
/// The event source emits two known shapes: an audit-trail envelope with the
/// user name nested under `detail.requestParameters`, and a flat shape with
/// a top-level `userName`. Anything else is kept verbatim as `Unrecognized`
/// and resolution falls back to querying the identity service. Variant order
/// matters: the envelope shape takes precedence when a payload carries both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CreateUserEvent {
    Detail { detail: EventDetail },
    Flat {
        #[serde(rename = "userName")]
        user_name: String,
    },
    Unrecognized(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDetail {
    #[serde(rename = "requestParameters")]
    pub request_parameters: RequestParameters,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequestParameters {
    #[serde(rename = "userName")]
    pub user_name: String,
}

impl CreateUserEvent {
    /// The user name the event carries, if any.
    pub fn user_name(&self) -> Option<&str> {
        match self {
            CreateUserEvent::Detail { detail } => {
                Some(detail.request_parameters.user_name.as_str())
            }
            CreateUserEvent::Flat { user_name } => Some(user_name.as_str()),
            CreateUserEvent::Unrecognized(_) => None,
        }
    }
}
