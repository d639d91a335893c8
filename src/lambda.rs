use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use synth_billing::app::{ProxyRequest, ProxyResponse};
use synth_billing::utils::{logger, validation::Validate};
use synth_billing::{BillingRelay, LambdaConfig};

async fn function_handler(
    relay: &BillingRelay,
    event: LambdaEvent<ProxyRequest>,
) -> Result<ProxyResponse, Error> {
    let request = event.payload;
    tracing::info!(
        request_id = %event.context.request_id,
        "📥 {} {}",
        request.http_method,
        request.path
    );

    let response = relay.handle_proxy(&request).await;
    tracing::info!("📤 Responded {}", response.status_code);
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時讀取設定並建立共用連線
    let config = LambdaConfig::from_env()?;
    config.validate()?;
    let relay = BillingRelay::from_config(&config)?;
    let relay = &relay;

    run(service_fn(move |event| async move {
        function_handler(relay, event).await
    }))
    .await
}
