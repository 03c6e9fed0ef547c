//! Logging setup utilities for the Stagesync sync server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the server library crate and the binary log at `default_log_level`
/// unless `RUST_LOG` says otherwise.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "stagesync-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use stagesync_shared::logger::setup_logger;
///
/// setup_logger("stagesync-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// Binary names use dashes while tracing targets use the crate's module path,
/// so dashes are normalized to underscores.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "stagesync_server={level},{bin}={level},tower_http={level}",
        level = default_log_level,
        bin = binary_name.replace('-', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_binary_name() {
        // テスト項目: バイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let binary_name = "stagesync-server";

        // when (操作):
        let filter = default_filter(binary_name, "debug");

        // then (期待する結果):
        assert_eq!(
            filter,
            "stagesync_server=debug,stagesync_server=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_default_filter_is_a_valid_env_filter() {
        // テスト項目: 生成したディレクティブが EnvFilter としてパースできる
        // given (前提条件):
        let filter = default_filter("stagesync-server", "info");

        // when (操作):
        let result = tracing_subscriber::EnvFilter::try_new(filter);

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
