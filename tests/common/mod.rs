use orars::drivers::InMemoryTestDriver;
use orars::types::DriverValue;
use orars::{Connection, Settings};

/// Sets up tracing subscriber. Honors `RUST_LOG`, defaults to `warn`.
#[allow(dead_code)]
pub fn setup_tracing() {
    use tracing_subscriber::{fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = layer().with_test_writer();

    // Several tests in one binary race to install it.
    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}

/// Opens a connection on `driver` and forgets the session setup statements.
#[allow(dead_code)]
pub fn open(driver: &InMemoryTestDriver, settings: Settings) -> Connection<InMemoryTestDriver> {
    setup_tracing();
    let connection = Connection::open(driver.clone(), settings).unwrap();
    driver.clear_recorded_queries();
    connection
}

#[allow(dead_code)]
pub fn number(text: &str) -> DriverValue {
    DriverValue::Number(text.to_string())
}

#[allow(dead_code)]
pub fn text(value: &str) -> DriverValue {
    DriverValue::Text(value.to_string())
}
