#[cfg(test)]
mod tests {
    use clap::Parser;
    use logbook::commands::{Cli, Session};
    use logbook::db::aircraft;
    use logbook::db::db::{Db, DB_FILE_NAME};
    use logbook::db::flights;
    use logbook::db::value::Value;
    use logbook::libs::aircraft::Aircraft;
    use logbook::libs::airframe::Airframe;
    use logbook::libs::config::CONFIG_FILE_NAME;
    use logbook::libs::data_storage::DataStorage;
    use logbook::libs::logbook::Logbook;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct LogbookTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for LogbookTestContext {
        fn setup() -> Self {
            LogbookTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl LogbookTestContext {
        fn storage(&self) -> DataStorage {
            DataStorage::at(self.temp_dir.path().join("logbook"))
        }
    }

    #[test_context(LogbookTestContext)]
    #[test]
    fn test_open_creates_directory_and_tables(ctx: &mut LogbookTestContext) {
        let (logbook, _queue) = Logbook::open_at(ctx.storage()).unwrap();

        assert!(ctx.storage().base_path().join(DB_FILE_NAME).exists());
        assert_eq!(logbook.db().columns(aircraft::TABLE), vec!["registration", "airframe", "engine"]);
        assert_eq!(logbook.db().columns(flights::TABLE).len(), 7);

        logbook.close().unwrap();
    }

    #[test_context(LogbookTestContext)]
    #[test]
    fn test_close_saves_config_and_stops_scheduler(ctx: &mut LogbookTestContext) {
        let (mut logbook, _queue) = Logbook::open_at(ctx.storage()).unwrap();
        logbook.config_mut().dark_mode = true;
        let scheduler = logbook.scheduler().clone();

        logbook.close().unwrap();

        assert!(scheduler.is_shut_down());
        let saved = std::fs::read_to_string(ctx.storage().base_path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(saved.contains("\"dark_mode\": true"));

        let (reopened, _queue) = Logbook::open_at(ctx.storage()).unwrap();
        assert!(reopened.config().dark_mode);
        reopened.close().unwrap();
    }

    #[test_context(LogbookTestContext)]
    #[test]
    fn test_data_survives_reopen(ctx: &mut LogbookTestContext) {
        let (logbook, mut queue) = Logbook::open_at(ctx.storage()).unwrap();
        let added = Arc::new(Mutex::new(None));
        let slot = added.clone();
        logbook
            .aircraft()
            .add(Aircraft::new("C-FXCD", Airframe::A320, "CFM56"), move |ok| *slot.lock() = Some(ok))
            .unwrap();
        assert!(queue.run_next_timeout(Duration::from_secs(5)));
        assert_eq!(*added.lock(), Some(true));
        logbook.close().unwrap();

        let (reopened, _queue) = Logbook::open_at(ctx.storage()).unwrap();
        let all = reopened.aircraft().get_all_blocking();
        assert_eq!(all, vec![Aircraft::new("C-FXCD", Airframe::A320, "CFM56")]);
        reopened.close().unwrap();
    }

    #[test_context(LogbookTestContext)]
    #[test]
    fn test_open_fails_on_unknown_airframe_code(ctx: &mut LogbookTestContext) {
        let storage = ctx.storage();
        storage.ensure_dir().unwrap();
        let db = Db::open(storage.base_path().join(DB_FILE_NAME)).unwrap();
        assert!(db.create_table(
            aircraft::TABLE,
            &["registration", "airframe", "engine"],
            &["TEXT PRIMARY KEY NOT NULL UNIQUE", "TEXT", "TEXT"],
            None
        ));
        assert!(db.upsert_row(
            aircraft::TABLE,
            aircraft::COL_REGISTRATION,
            "N1934D",
            &[(aircraft::COL_AIRFRAME, Value::from("DC3")), (aircraft::COL_ENGINE, Value::from("R-1830"))]
        ));

        let err = Logbook::open_at(storage).err().unwrap();
        assert!(err.to_string().contains("DC3"));
    }

    #[test_context(LogbookTestContext)]
    #[test]
    fn test_open_fails_when_database_cannot_be_opened(ctx: &mut LogbookTestContext) {
        let storage = ctx.storage();
        std::fs::create_dir_all(storage.base_path().join(DB_FILE_NAME)).unwrap();

        let err = Logbook::open_at(storage).err().unwrap();
        assert!(err.to_string().contains("Failed to connect to database"));
    }

    #[test_context(LogbookTestContext)]
    #[test]
    fn test_open_checks_airframe_catalog(ctx: &mut LogbookTestContext) {
        assert!(Airframe::validate_catalog().is_ok());
        let (logbook, _queue) = Logbook::open_at(ctx.storage()).unwrap();
        logbook.close().unwrap();
    }

    #[test_context(LogbookTestContext)]
    #[test]
    fn test_rejected_input_fails_the_command(ctx: &mut LogbookTestContext) {
        let (logbook, queue) = Logbook::open_at(ctx.storage()).unwrap();
        let cli = Cli::try_parse_from([
            "logbook", "aircraft", "add", "C-FXCD", "--airframe", "Concorde", "--engine", "Olympus",
        ])
        .unwrap();

        let err = cli.execute(Session::new(logbook, queue)).err().unwrap();
        assert!(err.to_string().contains("Invalid Input"));

        let (logbook, _queue) = Logbook::open_at(ctx.storage()).unwrap();
        assert!(logbook.aircraft().get_all_blocking().is_empty());
        logbook.close().unwrap();
    }

    #[test_context(LogbookTestContext)]
    #[test]
    fn test_accepted_input_succeeds(ctx: &mut LogbookTestContext) {
        let (logbook, queue) = Logbook::open_at(ctx.storage()).unwrap();
        let cli =
            Cli::try_parse_from(["logbook", "aircraft", "add", "C-FXCD", "--airframe", "A320", "--engine", "CFM56"])
                .unwrap();

        cli.execute(Session::new(logbook, queue)).unwrap();

        let (logbook, _queue) = Logbook::open_at(ctx.storage()).unwrap();
        assert_eq!(
            logbook.aircraft().get_all_blocking(),
            vec![Aircraft::new("C-FXCD", Airframe::A320, "CFM56")]
        );
        logbook.close().unwrap();
    }

    #[test_context(LogbookTestContext)]
    #[test]
    fn test_call_fails_when_reply_is_dropped(ctx: &mut LogbookTestContext) {
        let (logbook, queue) = Logbook::open_at(ctx.storage()).unwrap();
        let mut session = Session::new(logbook, queue);

        let result = session.call::<u32, _>(|reply| {
            drop(reply);
            Ok(())
        });

        assert!(result.is_err());
        session.close().unwrap();
    }
}
