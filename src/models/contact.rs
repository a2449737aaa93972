use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// Dispatch line used when a case is escalated past hospital selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyServices {
    pub name: String,
    pub phone: String,
}

impl Default for EmergencyServices {
    fn default() -> Self {
        Self {
            name: "Emergency Services".into(),
            phone: "911".into(),
        }
    }
}
