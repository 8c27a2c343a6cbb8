use serde::Serialize;
use serde_json::Value;

/// One normalized gallery entry. Whatever shape the list endpoint returns,
/// every photo the UI handles looks like this, with a non-empty `id` and a
/// usable `url`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Photo {
    pub id: String,
    pub url: String,
    pub title: String,
    /// Carried verbatim from the server (string or epoch number) and only
    /// parsed when displayed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<Value>,
}
