#[cfg(test)]
mod tests {
    use logbook::db::db::Db;
    use logbook::db::value::{Record, Value};
    use std::time::{Duration, Instant};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    const AIRCRAFT_COLUMNS: [&str; 3] = ["registration", "airframe", "engine"];
    const AIRCRAFT_TYPES: [&str; 3] = ["TEXT PRIMARY KEY NOT NULL UNIQUE", "TEXT", "TEXT"];

    /// Fresh database file in a temporary directory with an `aircraft` table.
    struct StoreTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("logbook.db")).unwrap();
            assert!(db.create_table("aircraft", &AIRCRAFT_COLUMNS, &AIRCRAFT_TYPES, None));
            StoreTestContext { _temp_dir: temp_dir, db }
        }
    }

    fn upsert_aircraft(db: &Db, registration: &str, airframe: &str, engine: &str) -> bool {
        db.upsert_row(
            "aircraft",
            "registration",
            registration,
            &[("airframe", Value::from(airframe)), ("engine", Value::from(engine))],
        )
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_upsert_get_delete_scenario(ctx: &mut StoreTestContext) {
        assert!(upsert_aircraft(&ctx.db, "C-FXCD", "A320", "CFM56"));

        let rows = ctx.db.get_rows("aircraft", "registration", "C-FXCD", &[], None);
        assert_eq!(rows.len(), 1);
        let expected = Record::from(vec![
            ("registration".to_string(), Value::from("C-FXCD")),
            ("airframe".to_string(), Value::from("A320")),
            ("engine".to_string(), Value::from("CFM56")),
        ]);
        assert_eq!(rows[0], expected);

        assert!(ctx.db.delete_row("aircraft", "registration", "C-FXCD"));
        assert!(ctx.db.get_rows("aircraft", "registration", "C-FXCD", &[], None).is_empty());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_upsert_overwrites_existing_key(ctx: &mut StoreTestContext) {
        assert!(upsert_aircraft(&ctx.db, "C-FXCD", "A320", "CFM56"));
        assert!(upsert_aircraft(&ctx.db, "C-FXCD", "A320_NEO", "LEAP-1A"));

        assert_eq!(ctx.db.get_row_count("aircraft"), 1);
        let rows = ctx.db.get_rows("aircraft", "registration", "C-FXCD", &[], None);
        assert_eq!(rows[0].text("airframe"), Some("A320_NEO"));
        assert_eq!(rows[0].text("engine"), Some("LEAP-1A"));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_upsert_only_touches_given_columns(ctx: &mut StoreTestContext) {
        assert!(upsert_aircraft(&ctx.db, "C-FXCD", "A320", "CFM56"));
        assert!(ctx.db.set_value("aircraft", "registration", "C-FXCD", "engine", Value::from("V2500")));

        assert_eq!(ctx.db.get_value("aircraft", "registration", "C-FXCD", "airframe"), Some(Value::from("A320")));
        assert_eq!(ctx.db.get_value("aircraft", "registration", "C-FXCD", "engine"), Some(Value::from("V2500")));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_delete_missing_key_reports_success(ctx: &mut StoreTestContext) {
        assert!(ctx.db.delete_row("aircraft", "registration", "N-OPE"));
        assert_eq!(ctx.db.get_row_count("aircraft"), 0);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_empty_table_reads(ctx: &mut StoreTestContext) {
        assert!(ctx.db.get_all_rows("aircraft", &[], None).is_empty());
        assert!(ctx.db.get_column("aircraft", "engine", None).is_empty());
        assert_eq!(ctx.db.get_row_count("aircraft"), 0);
        assert_eq!(ctx.db.get_value("aircraft", "registration", "C-FXCD", "engine"), None);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_create_table_is_idempotent(ctx: &mut StoreTestContext) {
        assert!(upsert_aircraft(&ctx.db, "C-FXCD", "A320", "CFM56"));
        assert!(ctx.db.create_table("aircraft", &AIRCRAFT_COLUMNS, &AIRCRAFT_TYPES, None));
        assert_eq!(ctx.db.get_row_count("aircraft"), 1);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_column_type_mismatch_fails_without_creating(ctx: &mut StoreTestContext) {
        assert!(!ctx.db.create_table("broken", &["a", "b"], &["TEXT"], None));
        assert!(ctx.db.columns("broken").is_empty());
        assert!(!ctx.db.create_table("empty", &[], &[], None));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_extra_clause_is_appended(ctx: &mut StoreTestContext) {
        assert!(ctx.db.create_table(
            "legs",
            &["id", "dep"],
            &["TEXT NOT NULL", "TEXT"],
            Some("PRIMARY KEY (id)")
        ));
        for (id, dep) in [("1", "CYVR"), ("2", "CYYZ"), ("3", "CYYZ"), ("4", "KJFK"), ("5", "CYYZ")] {
            assert!(ctx.db.upsert_row("legs", "id", id, &[("dep", Value::from(dep))]));
        }

        let top = ctx.db.get_column("legs", "dep", Some("GROUP BY dep ORDER BY COUNT(dep) DESC"));
        assert_eq!(top.first(), Some(&Value::from("CYYZ")));
        assert_eq!(top.len(), 3);

        let ordered = ctx.db.get_all_rows("legs", &["dep"], Some("ORDER BY id DESC LIMIT 2"));
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].text("dep"), Some("CYYZ"));
        assert_eq!(ordered[1].text("dep"), Some("KJFK"));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_column_selection_keeps_requested_order(ctx: &mut StoreTestContext) {
        assert!(upsert_aircraft(&ctx.db, "C-FXCD", "A320", "CFM56"));

        let rows = ctx.db.get_all_rows("aircraft", &["engine", "registration", "missing"], None);
        let columns: Vec<&str> = rows[0].columns().collect();
        assert_eq!(columns, vec!["engine", "registration"]);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_values_are_bound_not_interpolated(ctx: &mut StoreTestContext) {
        let hostile = "X'); DROP TABLE aircraft; --";
        assert!(upsert_aircraft(&ctx.db, hostile, "A320", "it's \"quoted\""));

        assert_eq!(ctx.db.get_row_count("aircraft"), 1);
        let rows = ctx.db.get_rows("aircraft", "registration", hostile, &[], None);
        assert_eq!(rows[0].text("engine"), Some("it's \"quoted\""));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_typed_values_round_trip(ctx: &mut StoreTestContext) {
        assert!(ctx.db.create_table(
            "cells",
            &["key", "int", "real", "blob", "nothing"],
            &["TEXT PRIMARY KEY", "INTEGER", "REAL", "BLOB", "TEXT"],
            None
        ));
        assert!(ctx.db.upsert_row(
            "cells",
            "key",
            "k",
            &[
                ("int", Value::from(1_700_000_000_000_i64)),
                ("real", Value::from(1.5)),
                ("blob", Value::from(vec![0xde_u8, 0xad])),
                ("nothing", Value::from(None::<String>)),
            ],
        ));

        let rows = ctx.db.get_rows("cells", "key", "k", &[], None);
        let row = &rows[0];
        assert_eq!(row.integer("int"), Some(1_700_000_000_000));
        assert_eq!(row.get("real"), Some(&Value::Real(1.5)));
        assert_eq!(row.get("blob"), Some(&Value::Blob(vec![0xde, 0xad])));
        assert!(row.get("nothing").is_some_and(Value::is_null));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_failures_become_sentinels(ctx: &mut StoreTestContext) {
        assert_eq!(ctx.db.get_row_count("no_such_table"), -1);
        assert!(ctx.db.get_all_rows("no_such_table", &[], None).is_empty());
        assert!(ctx.db.get_column("no_such_table", "x", None).is_empty());
        assert!(!ctx.db.delete_row("no_such_table", "x", "y"));
        assert!(!ctx.db.execute("NOT SQL AT ALL", &[]));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_truncate_and_drop(ctx: &mut StoreTestContext) {
        assert!(upsert_aircraft(&ctx.db, "C-FXCD", "A320", "CFM56"));
        assert!(upsert_aircraft(&ctx.db, "C-GABC", "B737_800", "CFM56-7B"));

        assert!(ctx.db.truncate_table("aircraft"));
        assert_eq!(ctx.db.get_row_count("aircraft"), 0);
        assert_eq!(ctx.db.columns("aircraft"), vec!["registration", "airframe", "engine"]);

        assert!(ctx.db.drop_table("aircraft"));
        assert!(ctx.db.columns("aircraft").is_empty());
        assert!(ctx.db.drop_table("aircraft"));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_execute_with_parameters(ctx: &mut StoreTestContext) {
        assert!(upsert_aircraft(&ctx.db, "C-FXCD", "A320", "CFM56"));
        assert!(ctx.db.execute(
            "UPDATE aircraft SET engine = ?1 WHERE registration = ?2",
            &[Value::from("PW1100G"), Value::from("C-FXCD")]
        ));
        assert_eq!(ctx.db.get_value("aircraft", "registration", "C-FXCD", "engine"), Some(Value::from("PW1100G")));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_concurrent_writers(ctx: &mut StoreTestContext) {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = ctx.db.clone();
                std::thread::spawn(move || upsert_aircraft(&db, &format!("C-F{i:03}"), "A320", "CFM56"))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(ctx.db.get_row_count("aircraft"), 8);
    }

    #[test]
    fn test_connection_to_fresh_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Db::open(temp_dir.path().join("nested").join("logbook.db")).unwrap();
        assert!(db.test_connection());
        assert!(db.create_table("t", &["k"], &["TEXT PRIMARY KEY"], None));
        assert!(db.path().exists());
    }

    #[test]
    fn test_unopenable_file_gives_up_after_bounded_retries() {
        let temp_dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a database file.
        let db = Db::open(temp_dir.path()).unwrap();

        let started = Instant::now();
        assert!(!db.test_connection());
        assert_eq!(db.get_row_count("aircraft"), -1);
        assert!(db.get_all_rows("aircraft", &[], None).is_empty());
        assert!(!db.create_table("aircraft", &AIRCRAFT_COLUMNS, &AIRCRAFT_TYPES, None));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
