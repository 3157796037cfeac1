use serde::Serialize;

/// query parameters accepted when listing objects
#[derive(Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// label selector, e.g. `app=web,tier!=db`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_filter: Option<String>,

    /// ask for full objects instead of name only entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_fields: Option<String>,
}

impl ListOptions {
    pub fn with_labels<T: Into<String>>(label_filter: T) -> Self {
        Self {
            label_filter: Some(label_filter.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
