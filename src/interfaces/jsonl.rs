//! Line-delimited JSON transport for [`ForecastService`].
//!
//! Each input line is an envelope `{"route": "/predict", "body": {...}}`.
//! Each output line is `{"status": 200, "body": {...}}`; failures carry
//! `{"detail": "..."}` as their body. Routes: `/`, `/health`, `/metrics`,
//! `/train`, `/predict`.

use crate::domain::footfall::PredictionRequest;
use crate::interfaces::api::{ApiError, ErrorBody, ForecastService, TrainRequest};
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info};

#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub route: String,
    #[serde(default)]
    pub body: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn ok<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::detail(500, format!("Failed to encode response: {}", e)),
        }
    }

    fn detail(status: u16, detail: impl Into<String>) -> Self {
        let body = ErrorBody {
            detail: detail.into(),
        };
        Self {
            status,
            body: serde_json::to_value(body).unwrap_or(Value::Null),
        }
    }

    fn from_error(error: &ApiError) -> Self {
        Self::detail(error.status_code(), error.to_string())
    }

    fn from_result<T: Serialize>(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Self::ok(&value),
            Err(e) => Self::from_error(&e),
        }
    }
}

/// Serve envelopes from `reader` until EOF, writing one reply per line.
pub async fn serve<R, W>(service: Arc<ForecastService>, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = dispatch(&service, &line).await;
        let mut encoded = serde_json::to_vec(&reply)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
        handled += 1;
    }

    info!("Input closed after {} requests", handled);
    Ok(())
}

async fn dispatch(service: &Arc<ForecastService>, line: &str) -> Reply {
    let envelope: Envelope = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(e) => return Reply::detail(400, format!("Malformed envelope: {}", e)),
    };
    debug!("Request {}", envelope.route);

    match envelope.route.as_str() {
        "/" => Reply::ok(&service.root()),
        "/health" => Reply::from_result(service.health()),
        "/metrics" => Reply::ok(&service.metrics_report()),
        "/train" => {
            let request: TrainRequest = match decode(envelope.body) {
                Ok(request) => request,
                Err(reply) => return reply,
            };
            // The fit is CPU bound; keep it off the async workers.
            let svc = Arc::clone(service);
            match tokio::task::spawn_blocking(move || svc.train(request)).await {
                Ok(result) => Reply::from_result(result),
                Err(e) => {
                    error!("Training task aborted: {}", e);
                    Reply::detail(500, "Training task aborted")
                }
            }
        }
        "/predict" => {
            let request: PredictionRequest = match decode(envelope.body) {
                Ok(request) => request,
                Err(reply) => return reply,
            };
            Reply::from_result(service.predict(request))
        }
        other => Reply::detail(404, format!("Unknown route {}", other)),
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, Reply> {
    serde_json::from_value(body).map_err(|e| Reply::detail(422, format!("Invalid body: {}", e)))
}
