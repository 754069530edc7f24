use serde::Serialize;

pub mod extract;
pub mod reconcile;
pub mod render;

/// One externally tracked browser tab. Identity is `id`; `title` and `url`
/// are descriptive and only ever change on the remote side. Records are
/// fetched fresh at the start of a run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabRecord {
    pub id: String,
    pub title: String,
    pub url: String,
}
