use litewalk_btree::RowId;
use litewalk_result::Error;
use litewalk_table::{Database, SchemaObjectKind};
use litewalk_test_utils::{FixtureOptions, MovieFixture, init_tracing_for_tests};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const OBJECTS: [&str; 5] = [
    "titles",
    "people",
    "crew",
    "titles_by_primary_title",
    "crew_by_title_and_person",
];

#[test]
fn catalog_matches_sqlite_schema() -> TestResult {
    init_tracing_for_tests();
    let fixture = MovieFixture::build(&FixtureOptions::default())?;
    let db = Database::open(fixture.path())?;
    let catalog = db.catalog()?;

    assert_eq!(catalog.len(), OBJECTS.len());
    for name in OBJECTS {
        assert_eq!(i64::from(catalog.root(name)?), fixture.root_page_of(name)?, "{name}");
    }

    let crew_index = catalog
        .entries()
        .iter()
        .find(|e| e.name == "crew_by_title_and_person")
        .expect("index entry");
    assert_eq!(crew_index.kind, SchemaObjectKind::Index);
    assert_eq!(crew_index.table_name, "crew");
    assert!(crew_index.sql.as_deref().is_some_and(|sql| sql.starts_with("CREATE INDEX")));
    Ok(())
}

#[test]
fn unknown_object_is_a_catalog_error() -> TestResult {
    let fixture = MovieFixture::build(&FixtureOptions::tiny())?;
    let db = Database::open(fixture.path())?;
    let catalog = db.catalog()?;

    let err = catalog.root("directors").unwrap_err();
    assert!(matches!(&err, Error::CatalogError(msg) if msg.contains("directors")));
    // Lookups are exact.
    assert!(catalog.get("Titles").is_none());
    Ok(())
}

#[test]
fn report_accumulates_until_reset() -> TestResult {
    let fixture = MovieFixture::build(&FixtureOptions::tiny())?;
    let db = Database::open(fixture.path())?;
    let catalog = db.catalog()?;

    let after_catalog = db.report();
    assert_eq!(after_catalog.page_reads, 1);
    assert_eq!(after_catalog.table_scans, 1);
    assert_eq!(after_catalog.rows_returned, OBJECTS.len() as u64);

    db.reset_stats();
    assert_eq!(db.report(), Default::default());

    let people = catalog.root("people")?;
    assert!(db.stab_table(people, 101)?.is_some());
    let report = db.report();
    assert_eq!(report.page_reads, 1);
    assert_eq!(report.table_scans, 1);
    assert_eq!(report.index_scans, 0);
    assert_eq!(report.rows_returned, 1);
    assert_eq!(
        report.to_string().lines().next(),
        Some("read 1 page with 1 table scan and 0 index scans")
    );
    Ok(())
}

#[test]
fn handles_keep_separate_counts() -> TestResult {
    let fixture = MovieFixture::build(&FixtureOptions::tiny())?;
    let a = Database::open(fixture.path())?;
    let b = Database::from_image(&fixture.image()?)?;

    let rows = a.step_table(1, RowId::MIN)?.count();
    assert_eq!(rows, OBJECTS.len());
    assert_eq!(a.report().table_scans, 1);
    assert_eq!(b.report().table_scans, 0);
    assert_eq!(b.io_stats().snapshot().page_reads, 0);
    assert_eq!(a.page_count(), b.page_count());
    Ok(())
}

#[test]
fn opening_a_missing_file_is_io() -> TestResult {
    let dir = tempfile::tempdir()?;
    let err = Database::open(dir.path().join("nope.db")).err().expect("missing file");
    assert!(matches!(err, Error::Io(_)));
    Ok(())
}
