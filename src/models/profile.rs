use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MeasurementSystem;

/// Per-user preferences. The preferred system is only a default for
/// conversion requests; stored quantities always keep the unit the
/// creator entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub preferred_system: MeasurementSystem,
}

impl UserProfile {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            preferred_system: MeasurementSystem::Metric,
        }
    }
}
