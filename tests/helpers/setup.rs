use callme_reminder_api::Application;
use callme_reminder_infra::{CallmeContext, Config, VapiConfig};
use callme_reminder_sdk::CallmeSDK;
use std::time::Duration;

pub struct TestApp {
    pub config: Config,
    pub ctx: CallmeContext,
}

fn test_config(vapi_base_url: String) -> Config {
    Config {
        port: 0, // Random port
        database_url: None,
        poll_interval: Duration::from_millis(100),
        vapi: VapiConfig {
            api_key: "test-api-key".into(),
            phone_number_id: "test-phone-number-id".into(),
            base_url: vapi_base_url,
            timeout: Duration::from_secs(2),
        },
    }
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, CallmeSDK, String) {
    // Nothing is listening here, so calls fail if any are placed
    spawn_app_with_vapi("http://127.0.0.1:1".into()).await
}

/// Launch the application with calls placed against the given Vapi address
pub async fn spawn_app_with_vapi(vapi_base_url: String) -> (TestApp, CallmeSDK, String) {
    let ctx = CallmeContext::create_inmemory(test_config(vapi_base_url));

    let config = ctx.config.clone();
    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}/api/v1", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { config, ctx };
    let sdk = CallmeSDK::new(address.clone());
    (app, sdk, address)
}
