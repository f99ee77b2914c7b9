#[cfg(test)]
mod tests {
    use logbook::libs::config::{Config, CONFIG_FILE_NAME};
    use logbook::libs::data_storage::DataStorage;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Points the data directory at a fresh temporary directory.
    struct ConfigTestContext {
        _temp_dir: TempDir,
        storage: DataStorage,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let storage = DataStorage::at(temp_dir.path().join("logbook"));
            ConfigTestContext {
                _temp_dir: temp_dir,
                storage,
            }
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.dark_mode);
        assert_eq!(config.timer_workers, 4);
        assert_eq!(config.shutdown_grace_secs, 5);
        assert_eq!(config.export_dir, None);
        assert_eq!(config.export_dir(), PathBuf::from("."));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(ctx: &mut ConfigTestContext) {
        let config = Config {
            dark_mode: true,
            timer_workers: 2,
            shutdown_grace_secs: 1,
            export_dir: Some(PathBuf::from("/tmp/exports")),
        };
        config.save_to(&ctx.storage).unwrap();

        assert!(ctx.storage.base_path().join(CONFIG_FILE_NAME).exists());
        let read_config = Config::read_from(&ctx.storage).unwrap();
        assert_eq!(read_config, config);
        assert_eq!(read_config.export_dir(), PathBuf::from("/tmp/exports"));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file_uses_defaults(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, r#"{ "dark_mode": true }"#).unwrap();

        let config = Config::read_from(&ctx.storage).unwrap();
        assert!(config.dark_mode);
        assert_eq!(config.timer_workers, 4);
        assert_eq!(config.shutdown_grace_secs, 5);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_malformed_file_is_an_error(ctx: &mut ConfigTestContext) {
        let path = ctx.storage.get_path(CONFIG_FILE_NAME).unwrap();
        fs::write(&path, "dark_mode = true").unwrap();

        assert!(Config::read_from(&ctx.storage).is_err());
    }

    #[test]
    fn test_scheduler_settings() {
        let config = Config {
            timer_workers: 3,
            shutdown_grace_secs: 7,
            ..Config::default()
        };
        let scheduler = config.scheduler();
        assert_eq!(scheduler.timer_workers, 3);
        assert_eq!(scheduler.shutdown_grace, Duration::from_secs(7));
    }
}
