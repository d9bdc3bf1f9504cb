#![allow(dead_code)]

use litewalk_btree::BTreeReader;
use litewalk_storage::PageNumber;
use litewalk_storage::pager::FilePager;
use litewalk_test_utils::{FixtureOptions, MovieFixture, init_tracing_for_tests};

pub type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub struct Opened {
    pub fixture: MovieFixture,
    pub reader: BTreeReader<FilePager>,
}

pub fn open(opts: &FixtureOptions) -> Result<Opened, Box<dyn std::error::Error + Send + Sync>> {
    init_tracing_for_tests();
    let fixture = MovieFixture::build(opts)?;
    let reader = BTreeReader::new(FilePager::open(fixture.path())?);
    Ok(Opened { fixture, reader })
}

pub fn root(fixture: &MovieFixture, name: &str) -> PageNumber {
    let root = fixture.root_page_of(name).expect("schema object exists");
    PageNumber::try_from(root).expect("root page fits in u32")
}
