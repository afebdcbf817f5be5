use serde::{Deserialize, Serialize};

use crate::error::InspectError;
use crate::model::value::ResourceInfo;

/// What to pull from an agent's live inspection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceQuery {
    /// Every resource the agent manages, with attribute payloads only
    /// for the listed identifiers.
    AllWithAttributesFor(Vec<String>),
    /// Only the listed resources, each with its attribute payload.
    OnlyWithAttributes(Vec<String>),
}

/// The live inspection service this backend consumes. It is the only
/// blocking dependency of a request; everything downstream of it is a
/// pure transformation over already-resident data.
#[async_trait::async_trait]
pub trait InspectionSource: Send + Sync {
    /// Whether the agent is currently reachable.
    async fn is_available(&self, agent_id: &str) -> Result<bool, InspectError>;

    /// Fetch the flat resource dump for one agent. Connectivity loss
    /// surfaces as `SourceUnavailable`, never as a generic fault.
    async fn fetch_resources(
        &self,
        agent_id: &str,
        query: ResourceQuery,
    ) -> Result<Vec<ResourceInfo>, InspectError>;
}
