pub mod schema;

pub use schema::{RelayConfig, RobotEntryConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexported_config_default_is_constructible() {
        let config = RelayConfig::default();

        assert!(!config.default_host.is_empty());
        assert!(config.default_port > 0);
        assert!(!config.robots.is_empty());
    }
}
