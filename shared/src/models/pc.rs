//! PC (resource) Model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ResourceId;

/// A station as listed by `GET admin/pc`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pc {
    pub id: ResourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Availability label pushed for a PC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PcStatus {
    Idle,
    #[serde(alias = "in-use", alias = "in_use")]
    Busy,
    Offline,
}

impl PcStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for PcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One push event: the latest status of one PC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcStatusEvent {
    #[serde(rename = "pc_id", alias = "resourceId")]
    pub resource_id: ResourceId,
    pub status: PcStatus,
}

impl PcStatusEvent {
    pub fn new(resource_id: impl Into<ResourceId>, status: PcStatus) -> Self {
        Self {
            resource_id: resource_id.into(),
            status,
        }
    }
}
