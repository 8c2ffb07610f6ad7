use serde::{Deserialize, Serialize};

/// Identity and approval metadata shared by protocols and templates.
///
/// Approval status and treatment style are free text. Compare them with the
/// substring helpers here, never with `==`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    pub id: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub approval_status: String,
    #[serde(default)]
    pub approval_history: Option<String>,
    #[serde(default)]
    pub treatment_site: String,
    #[serde(default)]
    pub treatment_style: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub last_modified: String,
}

impl Preview {
    pub fn is_approved(&self) -> bool {
        self.approval_status.contains("Approved")
    }
}
