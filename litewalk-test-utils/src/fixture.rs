//! Movie-credits databases written by the real SQLite library.
//!
//! The schema mirrors the dataset the join queries are written against:
//! `titles`, `people` and `crew`, plus the two secondary indexes
//! `titles_by_primary_title` and `crew_by_title_and_person`. A handful of
//! well-known rows (see [`known`]) sit among seeded filler rows so that
//! every b-tree grows interior pages.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rusqlite::{Connection, OpenFlags, params};
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod known {
    pub const INCEPTION: &str = "Inception";
    pub const INCEPTION_ID: i64 = 5;
    pub const MONSTERS_INC: &str = "Monsters, Inc.";
    pub const MONSTERS_INC_ID: i64 = 7;
    pub const HAMLET: &str = "Hamlet";
    pub const HAMLET_IDS: [i64; 3] = [11, 12, 13];
    /// A title with no crew entries.
    pub const KOYAANISQATSI: &str = "Koyaanisqatsi";
    /// Present only when the fixture is built with a dangling credit.
    pub const GHOST_CREDIT: &str = "Ghost Credit";
    pub const GHOST_PERSON_ID: i64 = 999_999;

    pub const NOLAN: i64 = 101;
    pub const DICAPRIO: i64 = 102;
    pub const DOCTER: i64 = 103;
    pub const GOODMAN: i64 = 104;
    pub const CRYSTAL: i64 = 105;

    /// `(person_id, name, born, died)`
    pub const PEOPLE: [(i64, &str, i64, Option<i64>); 8] = [
        (101, "Christopher Nolan", 1970, None),
        (102, "Leonardo DiCaprio", 1974, None),
        (103, "Pete Docter", 1968, None),
        (104, "John Goodman", 1952, None),
        (105, "Billy Crystal", 1948, None),
        (106, "Laurence Olivier", 1907, Some(1989)),
        (107, "Kenneth Branagh", 1960, None),
        (108, "Mel Gibson", 1956, None),
    ];

    /// `(title_id, primary_title, premiered, rating)`
    pub const TITLES: [(i64, &str, i64, f64); 6] = [
        (5, "Inception", 2010, 8.8),
        (7, "Monsters, Inc.", 2001, 8.1),
        (11, "Hamlet", 1948, 7.6),
        (12, "Hamlet", 1996, 7.7),
        (13, "Hamlet", 1990, 6.7),
        (14, "Koyaanisqatsi", 1982, 8.3),
    ];

    /// `(title_id, person_id, category)`
    pub const CREW: [(i64, i64, &str); 8] = [
        (5, 102, "actor"),
        (5, 101, "director"),
        (7, 105, "actor"),
        (7, 103, "director"),
        (7, 104, "actor"),
        (11, 106, "director"),
        (12, 107, "director"),
        (13, 108, "actor"),
    ];
}

const FILLER_TITLE_BASE: i64 = 10_000;
const FILLER_PERSON_BASE: i64 = 50_000;
const GHOST_TITLE_ID: i64 = 20;

#[derive(Clone, Debug)]
pub struct FixtureOptions {
    pub filler_titles: usize,
    pub filler_people: usize,
    pub crew_per_title: usize,
    pub seed: u64,
    pub page_size: u32,
    /// Add a title whose only credit points at a person that does not exist.
    pub dangling_credit: bool,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            filler_titles: 2_000,
            filler_people: 1_500,
            crew_per_title: 3,
            seed: 0x5eed_f00d,
            page_size: 4096,
            dangling_credit: false,
        }
    }
}

impl FixtureOptions {
    /// Only the well-known rows; every b-tree fits in a single leaf page.
    pub fn tiny() -> Self {
        Self {
            filler_titles: 0,
            filler_people: 0,
            ..Self::default()
        }
    }

    pub fn with_dangling_credit(mut self) -> Self {
        self.dangling_credit = true;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// A database file in a private temp directory, removed on drop.
pub struct MovieFixture {
    _dir: TempDir,
    path: PathBuf,
}

type FixtureResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

impl MovieFixture {
    pub fn build(opts: &FixtureOptions) -> FixtureResult<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("movies.db");
        let mut conn = Connection::open(&path)?;
        conn.execute_batch(&format!(
            "PRAGMA page_size = {};
             CREATE TABLE titles (
                 title_id INTEGER PRIMARY KEY,
                 type TEXT NOT NULL,
                 original_title TEXT NOT NULL,
                 primary_title TEXT NOT NULL,
                 is_adult INTEGER NOT NULL,
                 premiered INTEGER,
                 ended INTEGER,
                 runtime_minutes INTEGER,
                 genres TEXT,
                 rating REAL
             );
             CREATE TABLE people (
                 person_id INTEGER PRIMARY KEY,
                 name TEXT NOT NULL,
                 born INTEGER,
                 died INTEGER
             );
             CREATE TABLE crew (
                 title_id INTEGER NOT NULL,
                 person_id INTEGER NOT NULL,
                 category TEXT NOT NULL,
                 job TEXT
             );",
            opts.page_size
        ))?;

        let mut rng = StdRng::seed_from_u64(opts.seed);

        let mut titles: Vec<(i64, String, i64, f64)> = known::TITLES
            .iter()
            .map(|&(id, name, year, rating)| (id, name.to_string(), year, rating))
            .collect();
        for i in 0..opts.filler_titles {
            let id = FILLER_TITLE_BASE + i as i64;
            titles.push((id, format!("Filler Title {i:05}"), 1950 + (i % 70) as i64, 5.0));
        }
        if opts.dangling_credit {
            titles.push((GHOST_TITLE_ID, known::GHOST_CREDIT.to_string(), 1999, 1.0));
        }
        titles.shuffle(&mut rng);

        let mut people: Vec<(i64, String, i64, Option<i64>)> = known::PEOPLE
            .iter()
            .map(|&(id, name, born, died)| (id, name.to_string(), born, died))
            .collect();
        let filler_people: Vec<i64> = (0..opts.filler_people)
            .map(|i| FILLER_PERSON_BASE + i as i64)
            .collect();
        for &id in &filler_people {
            people.push((id, format!("Person {id}"), 1900 + id % 100, None));
        }
        people.shuffle(&mut rng);

        let mut crew: Vec<(i64, i64, String)> = known::CREW
            .iter()
            .map(|&(t, p, c)| (t, p, c.to_string()))
            .collect();
        if !filler_people.is_empty() {
            for i in 0..opts.filler_titles {
                let title_id = FILLER_TITLE_BASE + i as i64;
                for &person_id in filler_people.choose_multiple(&mut rng, opts.crew_per_title) {
                    crew.push((title_id, person_id, "actor".to_string()));
                }
            }
        }
        if opts.dangling_credit {
            crew.push((GHOST_TITLE_ID, known::GHOST_PERSON_ID, "actor".to_string()));
        }
        crew.shuffle(&mut rng);

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO titles VALUES (?1, 'movie', ?2, ?2, 0, ?3, NULL, 100, 'Drama', ?4)",
            )?;
            for (id, name, year, rating) in &titles {
                stmt.execute(params![id, name, year, rating])?;
            }
            let mut stmt = tx.prepare("INSERT INTO people VALUES (?1, ?2, ?3, ?4)")?;
            for (id, name, born, died) in &people {
                stmt.execute(params![id, name, born, died])?;
            }
            let mut stmt = tx.prepare("INSERT INTO crew VALUES (?1, ?2, ?3, NULL)")?;
            for (title_id, person_id, category) in &crew {
                stmt.execute(params![title_id, person_id, category])?;
            }
        }
        tx.commit()?;

        conn.execute_batch(
            "CREATE INDEX titles_by_primary_title ON titles(primary_title);
             CREATE INDEX crew_by_title_and_person ON crew(title_id, person_id);",
        )?;
        conn.close().map_err(|(_, err)| err)?;

        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The whole file, for feeding an in-memory pager.
    pub fn image(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }

    fn open_read_only(&self) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
    }

    /// Ground truth from SQLite itself: person IDs credited on every title
    /// named `title`, ordered by title ID, then person ID.
    pub fn person_ids_for(&self, title: &str) -> rusqlite::Result<Vec<i64>> {
        let conn = self.open_read_only()?;
        let mut stmt = conn.prepare(
            "SELECT c.person_id FROM titles t JOIN crew c ON c.title_id = t.title_id
             WHERE t.primary_title = ?1 ORDER BY t.title_id, c.person_id",
        )?;
        let rows = stmt.query_map(params![title], |row| row.get(0))?;
        rows.collect()
    }

    /// Title IDs whose primary title equals `title`, ascending.
    pub fn title_ids_for(&self, title: &str) -> rusqlite::Result<Vec<i64>> {
        let conn = self.open_read_only()?;
        let mut stmt =
            conn.prepare("SELECT title_id FROM titles WHERE primary_title = ?1 ORDER BY title_id")?;
        let rows = stmt.query_map(params![title], |row| row.get(0))?;
        rows.collect()
    }

    /// Root page of a schema object, as SQLite reports it.
    pub fn root_page_of(&self, name: &str) -> rusqlite::Result<i64> {
        let conn = self.open_read_only()?;
        conn.query_row(
            "SELECT rootpage FROM sqlite_schema WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
    }

    pub fn row_count(&self, table: &str) -> rusqlite::Result<i64> {
        let conn = self.open_read_only()?;
        conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |row| row.get(0))
    }
}
