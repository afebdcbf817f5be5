use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::InspectError;
use crate::logic::{build_tree, decode_attributes};
use crate::model::tree::ResourceForest;
use crate::model::value::AttributeMap;
use crate::source::traits::{InspectionSource, ResourceQuery};

pub type AppState<S> = Arc<S>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AgentQuery {
    #[serde(rename = "agent-id")]
    pub agent_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AttributeMapQuery {
    #[serde(rename = "agent-id")]
    pub agent_id: String,
    pub identifier: String,
}

/// Query for the tree endpoint. `expanded` repeats, and identifiers can
/// contain commas, so this is decoded from the raw key/value pairs
/// instead of a derived struct.
#[derive(Debug, Default, PartialEq)]
pub struct TreeRequest {
    pub agent_id: String,
    pub expanded: Vec<String>,
}

impl TreeRequest {
    pub fn from_pairs(
        pairs: Vec<(String, String)>,
    ) -> Result<Self, (StatusCode, Json<ErrorResponse>)> {
        let mut agent_id = None;
        let mut expanded = Vec::new();
        for (key, value) in pairs {
            match key.as_str() {
                "agent-id" => agent_id = Some(value),
                "expanded" => expanded.push(value),
                _ => {}
            }
        }
        let Some(agent_id) = agent_id else {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("missing agent-id parameter")),
            ));
        };
        Ok(Self { agent_id, expanded })
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TreeResponse {
    NotConnected {
        #[serde(rename = "agentNotConnected")]
        agent_not_connected: bool,
    },
    Forest(ResourceForest),
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AttributeMapResponse {
    NotConnected {
        #[serde(rename = "agentNotConnected")]
        agent_not_connected: bool,
    },
    Attributes(AttributeMap),
}

fn internal_error(error: &InspectError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(&error.to_string())),
    )
}

pub async fn get_agent_connected<S: InspectionSource>(
    State(source): State<AppState<S>>,
    Query(query): Query<AgentQuery>,
) -> Result<Json<bool>, (StatusCode, Json<ErrorResponse>)> {
    match source.is_available(&query.agent_id).await {
        Ok(available) => Ok(Json(available)),
        Err(e) => Err(internal_error(&e)),
    }
}

pub async fn get_resource_tree<S: InspectionSource>(
    State(source): State<AppState<S>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TreeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = TreeRequest::from_pairs(pairs)?;
    let records = match source
        .fetch_resources(
            &request.agent_id,
            ResourceQuery::AllWithAttributesFor(request.expanded.clone()),
        )
        .await
    {
        Ok(records) => records,
        Err(e) if e.is_not_connected() => {
            debug!("agent '{}' not connected: {}", request.agent_id, e);
            return Ok(Json(TreeResponse::NotConnected {
                agent_not_connected: true,
            }));
        }
        Err(e) => return Err(internal_error(&e)),
    };
    let expanded: HashSet<String> = request.expanded.into_iter().collect();
    let forest = build_tree(&records, &expanded).map_err(|e| internal_error(&e))?;
    Ok(Json(TreeResponse::Forest(forest)))
}

pub async fn get_attribute_map<S: InspectionSource>(
    State(source): State<AppState<S>>,
    Query(query): Query<AttributeMapQuery>,
) -> Result<Json<AttributeMapResponse>, (StatusCode, Json<ErrorResponse>)> {
    let records = match source
        .fetch_resources(
            &query.agent_id,
            ResourceQuery::OnlyWithAttributes(vec![query.identifier.clone()]),
        )
        .await
    {
        Ok(records) => records,
        Err(e) if e.is_not_connected() => {
            debug!("agent '{}' not connected: {}", query.agent_id, e);
            return Ok(Json(AttributeMapResponse::NotConnected {
                agent_not_connected: true,
            }));
        }
        Err(e) => return Err(internal_error(&e)),
    };
    let Some(record) = records.first() else {
        let error = InspectError::NotFound(query.identifier.clone());
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(&error.to_string())),
        ));
    };
    if records.len() > 1 {
        warn!(
            "source returned more than one resource for identifier: {}",
            query.identifier
        );
    }
    let attributes = decode_attributes(&record.attributes).map_err(|e| internal_error(&e))?;
    Ok(Json(AttributeMapResponse::Attributes(attributes)))
}
