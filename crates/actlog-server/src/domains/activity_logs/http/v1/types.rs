use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use actlog_core::ActivityLog;

pub(crate) const CREATED_MESSAGE: &str = "Activity log created successfully";
pub(crate) const RETRIEVED_MESSAGE: &str = "Activity logs retrieved successfully";

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct CreateActivityLogRequest {
    pub(crate) user_id: String,
    pub(crate) action_type: String,
    pub(crate) description: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct CreateActivityLogResponse {
    pub(crate) id: String,
    pub(crate) message: &'static str,
    pub(crate) status_code: u16,
    pub(crate) timestamp: DateTime<Utc>,
}

impl CreateActivityLogResponse {
    pub(crate) fn from_log(log: &ActivityLog) -> Self {
        Self {
            id: log.id.clone(),
            message: CREATED_MESSAGE,
            status_code: 201,
            timestamp: log.timestamp,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct ActivityLogListResponse {
    pub(crate) message: &'static str,
    pub(crate) status_code: u16,
    pub(crate) data: Vec<ActivityLog>,
}

impl ActivityLogListResponse {
    pub(crate) fn new(data: Vec<ActivityLog>) -> Self {
        Self {
            message: RETRIEVED_MESSAGE,
            status_code: 200,
            data,
        }
    }
}
