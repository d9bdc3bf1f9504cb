use litewalk_result::Error;
use litewalk_storage::constants::{FILE_HEADER_SIZE, HEADER_MAGIC};
use litewalk_storage::pager::{BatchGet, FilePager, GetResult, InstrumentedPager, MemPager, Pager};
use litewalk_test_utils::{FixtureOptions, MovieFixture, init_tracing_for_tests};

#[test]
fn file_pager_reads_header_and_counts_pages() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing_for_tests();
    let fixture = MovieFixture::build(&FixtureOptions::default())?;
    let pager = FilePager::open(fixture.path())?;

    let len = std::fs::metadata(fixture.path())?.len();
    assert_eq!(pager.header().page_size(), 4096);
    assert_eq!(pager.page_count() as u64, len / 4096);
    assert_eq!(pager.header().database_size_in_pages, pager.page_count());

    let page1 = pager.get_page(1)?;
    assert_eq!(page1.len(), 4096);
    assert_eq!(&page1[..16], HEADER_MAGIC);
    Ok(())
}

#[test]
fn honours_non_default_page_size() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fixture = MovieFixture::build(&FixtureOptions::tiny().with_page_size(1024))?;
    let pager = FilePager::open(fixture.path())?;
    assert_eq!(pager.header().page_size(), 1024);
    assert_eq!(pager.get_page(2)?.len(), 1024);
    Ok(())
}

#[test]
fn out_of_range_pages_are_missing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fixture = MovieFixture::build(&FixtureOptions::tiny())?;
    let pager = FilePager::open(fixture.path())?;
    let past_end = pager.page_count() + 1;

    let results = pager.batch_get(&[
        BatchGet::Page { number: 0 },
        BatchGet::Page { number: 1 },
        BatchGet::Page { number: past_end },
    ])?;
    assert!(matches!(results[0], GetResult::Missing { number: 0 }));
    assert!(matches!(results[1], GetResult::Page { number: 1, .. }));
    assert!(matches!(results[2], GetResult::Missing { number } if number == past_end));

    assert!(matches!(pager.get_page(past_end), Err(Error::Corrupt(_))));
    Ok(())
}

#[test]
fn mem_pager_matches_file_pager() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fixture = MovieFixture::build(&FixtureOptions::default())?;
    let file = FilePager::open(fixture.path())?;
    let mem = MemPager::from_image(&fixture.image()?)?;

    assert_eq!(file.page_count(), mem.page_count());
    assert_eq!(file.header(), mem.header());
    for number in 1..=file.page_count() {
        assert_eq!(&*file.get_page(number)?, &*mem.get_page(number)?);
    }
    Ok(())
}

#[test]
fn mem_pager_replaces_pages_of_the_right_size_only() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fixture = MovieFixture::build(&FixtureOptions::tiny())?;
    let image = fixture.image()?;

    let mem = MemPager::from_image(&image)?.with_page(2, vec![0xAB; 4096])?;
    assert!(mem.get_page(2)?.iter().all(|&b| b == 0xAB));

    let err = MemPager::from_image(&image)?.with_page(2, vec![0; 10]).unwrap_err();
    assert!(matches!(err, Error::InvalidArgumentError(_)));
    Ok(())
}

#[test]
fn rejects_files_that_are_not_databases() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let dir = tempfile::tempdir()?;
    let short = dir.path().join("short.db");
    std::fs::write(&short, b"SQLite")?;
    assert!(matches!(FilePager::open(&short), Err(Error::Corrupt(_))));

    let text = dir.path().join("text.db");
    std::fs::write(&text, vec![b'x'; FILE_HEADER_SIZE * 2])?;
    assert!(matches!(FilePager::open(&text), Err(Error::Corrupt(_))));

    assert!(matches!(
        FilePager::open(dir.path().join("absent.db")),
        Err(Error::Io(_))
    ));
    Ok(())
}

#[test]
fn instrumented_pager_counts_reads() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fixture = MovieFixture::build(&FixtureOptions::tiny())?;
    let (pager, stats) = InstrumentedPager::new(FilePager::open(fixture.path())?);

    pager.get_page(1)?;
    pager.get_page(2)?;
    let before = stats.snapshot();
    assert_eq!(before.page_reads, 2);
    assert_eq!(before.get_batches, 2);

    pager.batch_get(&[BatchGet::Page { number: 1 }, BatchGet::Page { number: 0 }])?;
    let delta = stats.snapshot().delta_since(&before);
    assert_eq!(delta.page_reads, 2);
    assert_eq!(delta.get_batches, 1);
    assert_eq!(delta.missing_pages, 1);

    stats.reset();
    assert_eq!(stats.snapshot().page_reads, 0);
    Ok(())
}
