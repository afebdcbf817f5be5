use std::collections::HashMap;
use std::time::Duration;

use log::debug;

use crate::config::AgentEndpoint;
use crate::error::InspectError;
use crate::model::value::ResourceInfo;
use crate::source::traits::{InspectionSource, ResourceQuery};

/// Reaches registered agents over their local inspection endpoint.
///
/// Each agent exposes `GET /inspect/ping` and `POST /inspect/resources`
/// taking a `ResourceQuery` body. The request timeout lives here; tree
/// assembly and value decoding downstream are pure and need none.
pub struct HttpSource {
    client: reqwest::Client,
    endpoints: HashMap<String, String>,
}

impl HttpSource {
    pub fn new(agents: &[AgentEndpoint]) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            endpoints: agents
                .iter()
                .map(|agent| (agent.id.clone(), agent.url.clone()))
                .collect(),
        })
    }

    fn endpoint(&self, agent_id: &str) -> Result<&str, InspectError> {
        self.endpoints
            .get(agent_id)
            .map(String::as_str)
            .ok_or_else(|| {
                InspectError::SourceUnavailable(format!(
                    "no agent registered with id '{}'",
                    agent_id
                ))
            })
    }
}

#[async_trait::async_trait]
impl InspectionSource for HttpSource {
    async fn is_available(&self, agent_id: &str) -> Result<bool, InspectError> {
        let Ok(base) = self.endpoint(agent_id) else {
            return Ok(false);
        };
        match self.client.get(format!("{}/inspect/ping", base)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!("ping failed for agent '{}': {}", agent_id, e);
                Ok(false)
            }
        }
    }

    async fn fetch_resources(
        &self,
        agent_id: &str,
        query: ResourceQuery,
    ) -> Result<Vec<ResourceInfo>, InspectError> {
        let base = self.endpoint(agent_id)?;
        let response = self
            .client
            .post(format!("{}/inspect/resources", base))
            .json(&query)
            .send()
            .await
            .map_err(|e| InspectError::SourceUnavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(InspectError::SourceUnavailable(format!(
                "agent '{}' returned {}",
                agent_id,
                response.status()
            )));
        }
        response
            .json::<Vec<ResourceInfo>>()
            .await
            .map_err(|e| InspectError::SourceUnavailable(e.to_string()))
    }
}
