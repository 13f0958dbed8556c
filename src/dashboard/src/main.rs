use dashboard::{settings::Settings, startup::App, telemetry::init_tracing};

#[tokio::main]
async fn main() {
    let settings = Settings::new().unwrap();
    init_tracing(settings.log_level);

    let app = App::build(settings).unwrap();

    app.run().await.unwrap();
}
