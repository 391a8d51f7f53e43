//! Backend HTTP calls.

use gloo_net::http::Request;
use serde::Deserialize;
use thiserror::Error;

use crate::components::action_graph::GraphSnapshot;
use crate::config::api_base;

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("request failed: {0}")]
	Request(String),
	#[error("HTTP error: {0}")]
	Status(u16),
	#[error("failed to parse JSON: {0}")]
	Decode(String),
}

/// Body of `GET /api/state`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RecorderState {
	#[serde(default)]
	pub recording: bool,
	#[serde(default)]
	pub session_id: Option<String>,
	#[serde(default)]
	pub allowed_hosts: Vec<String>,
}

async fn get_json<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, FetchError> {
	let url = format!("{}{path}", api_base());

	let response = Request::get(&url)
		.send()
		.await
		.map_err(|e| FetchError::Request(e.to_string()))?;

	if !response.ok() {
		return Err(FetchError::Status(response.status()));
	}

	response
		.json()
		.await
		.map_err(|e| FetchError::Decode(e.to_string()))
}

pub async fn fetch_graph() -> Result<GraphSnapshot, FetchError> {
	get_json("/api/graph").await
}

pub async fn fetch_recorder_state() -> Result<RecorderState, FetchError> {
	get_json("/api/state").await
}
