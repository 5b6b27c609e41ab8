/// Application-level constants
pub const APP_NAME: &str = "Vitalscan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version stamped into every report's metadata. Bumped when extraction rules or
/// reference tables change in a way that alters output.
pub const PROCESSOR_VERSION: &str = "1.0";

/// Debug builds are development builds.
pub fn is_dev() -> bool {
    cfg!(debug_assertions)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if is_dev() {
        "vitalscan=debug,vitalscan_lib=debug"
    } else {
        "vitalscan=info,vitalscan_lib=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_vitalscan() {
        assert_eq!(APP_NAME, "Vitalscan");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn log_filter_targets_own_crates() {
        let filter = default_log_filter();
        assert!(filter.contains("vitalscan="));
        assert!(filter.contains("vitalscan_lib="));
    }
}
