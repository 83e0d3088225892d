use catalyst::utils::error::ErrorCategory;
use catalyst::utils::{logger, validation::Validate};
use catalyst::{AppState, LambdaConfig};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// `{"function": "smart-timetable", "body": {...}}`
#[derive(Deserialize)]
pub struct Request {
    pub function: String,
    #[serde(default)]
    pub body: Value,
}

async fn function_handler(state: Arc<AppState>, event: LambdaEvent<Request>) -> Result<Value, Error> {
    let Request { function, body } = event.payload;
    tracing::info!("Invoking {}", function);

    let body = serde_json::to_vec(&body)?;
    match state.invoke(&function, &body).await {
        Ok(response) => Ok(response),
        // bad input is an answer, not a failed invocation
        Err(e) if e.category() == ErrorCategory::Input => {
            tracing::warn!("Rejected {} request: {}", function, e);
            Ok(json!({ "success": false, "error": e.to_string() }))
        }
        Err(e) => {
            tracing::error!("❌ {} failed: {} ({})", function, e, e.recovery_suggestion());
            Err(Box::new(e))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_json_logger();

    let config = LambdaConfig::from_env()?;
    config.validate()?;
    let state = AppState::from_config(&config)?;

    run(service_fn(move |event| function_handler(state.clone(), event))).await
}
