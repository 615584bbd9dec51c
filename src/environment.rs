//! One-time client library environment setup.

use std::sync::Once;

use tracing::debug;

/// Variables the client library reads when it is first loaded.
///
/// `NLS_LANG` makes the client exchange UTF-8 text. With
/// `ORA_NCHAR_LITERAL_REPLACE` set, `N'...'` literals keep characters outside
/// the database character set.
pub const CLIENT_ENVIRONMENT: [(&str, &str); 2] = [
    ("NLS_LANG", ".UTF8"),
    ("ORA_NCHAR_LITERAL_REPLACE", "TRUE"),
];

static INIT: Once = Once::new();

/// Exports [`CLIENT_ENVIRONMENT`] into the process environment.
///
/// Call this from application startup before the first connection is made
/// and before other threads are spawned. Later calls do nothing.
pub fn init_client_environment() {
    INIT.call_once(|| {
        for (key, value) in CLIENT_ENVIRONMENT {
            std::env::set_var(key, value);
            debug!(key, value, "client environment variable set");
        }
    });
}
