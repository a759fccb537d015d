use serde::{Deserialize, Serialize};

use crate::store::job::Priority;

/// Read-only service-order context used to group unassigned jobs.
///
/// Order lifecycle (financials, materials, communications) lives outside
/// this crate; the scheduling core only consumes id, title, and priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: String,
    pub title: String,
    pub priority: Priority,
}

impl ServiceOrder {
    pub fn new(id: impl Into<String>, title: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority,
        }
    }
}
