use aws_lambda_events::sns::SnsEvent;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use std::sync::Arc;
use submission_relay::{Config, SubmissionRelay};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_current_span(false)
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env()?;
    let relay = Arc::new(SubmissionRelay::from_config(config).await?);

    tracing::info!("starting submission relay");

    let func = service_fn(move |event: LambdaEvent<SnsEvent>| {
        let relay = relay.clone();

        async move {
            tracing::debug!(request_id = %event.context.request_id, "invocation");
            Ok::<String, Error>(relay.handle(&event.payload).await)
        }
    });

    run(func).await
}
