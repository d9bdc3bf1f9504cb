//! The people-to-title join in its four shapes.

use crate::{JoinStrategy, MovieSchema, PersonRow, Row};
use litewalk_btree::{RowId, Value};
use litewalk_result::{Error, Result};
use litewalk_storage::PageNumber;
use litewalk_storage::pager::Pager;
use litewalk_table::{Catalog, Database};
use std::io::{self, Write};

type Emit<'a> = &'a mut dyn FnMut(Row) -> Result<()>;

/// Print the people credited on `title` to standard output, using the title
/// index and the covering crew index.
///
/// A title that is not in the database prints nothing and is not an error.
/// A credit naming a person that is not in `people` fails with
/// [`Error::DanglingReference`].
pub fn find_people_covering_index<P: Pager>(
    db: &Database<P>,
    catalog: &Catalog,
    title: &str,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    find_people(db, catalog, title, JoinStrategy::CoveringIndex, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write one `rowid: N, row: (...)` line per person credited on `title`.
/// Returns the number of lines written.
pub fn find_people<P: Pager, W: Write>(
    db: &Database<P>,
    catalog: &Catalog,
    title: &str,
    strategy: JoinStrategy,
    out: &mut W,
) -> Result<usize> {
    let schema = MovieSchema::default();
    for_each_person(db, catalog, &schema, title, strategy, |row| {
        writeln!(out, "{row}")?;
        Ok(())
    })
}

pub fn collect_people<P: Pager>(
    db: &Database<P>,
    catalog: &Catalog,
    title: &str,
    strategy: JoinStrategy,
) -> Result<Vec<PersonRow>> {
    let schema = MovieSchema::default();
    let mut rows = Vec::new();
    for_each_person(db, catalog, &schema, title, strategy, |row| {
        rows.push(row);
        Ok(())
    })?;
    Ok(rows)
}

/// Run `strategy` and hand every person row to `emit` as soon as it is
/// found. Returns the number of rows emitted.
pub fn for_each_person<P, F>(
    db: &Database<P>,
    catalog: &Catalog,
    schema: &MovieSchema,
    title: &str,
    strategy: JoinStrategy,
    mut emit: F,
) -> Result<usize>
where
    P: Pager,
    F: FnMut(PersonRow) -> Result<()>,
{
    tracing::debug!(%strategy, title, "finding people credited on title");
    let mut count = 0usize;
    let mut counted = |row: Row| {
        count += 1;
        emit(row)
    };
    let join = Join { db, catalog, schema };
    match strategy {
        JoinStrategy::NestedScan => join.nested_scan(title, &mut counted)?,
        JoinStrategy::CrewDriven => join.crew_driven(title, &mut counted)?,
        JoinStrategy::Index => join.via_indexes(title, false, &mut counted)?,
        JoinStrategy::CoveringIndex => join.via_indexes(title, true, &mut counted)?,
    }
    tracing::debug!(%strategy, title, people = count, "join finished");
    Ok(count)
}

struct Join<'a, P: Pager> {
    db: &'a Database<P>,
    catalog: &'a Catalog,
    schema: &'a MovieSchema,
}

impl<P: Pager> Join<'_, P> {
    fn root(&self, name: &str) -> Result<PageNumber> {
        self.catalog.root(name)
    }

    /// Stab `people`; a miss means the credit is dangling.
    fn person(&self, people: PageNumber, person_id: RowId) -> Result<Row> {
        match self.db.stab_table(people, person_id)? {
            Some(record) => Ok(Row {
                rowid: person_id,
                record,
            }),
            None => Err(Error::dangling(&self.schema.people, person_id)),
        }
    }

    fn nested_scan(&self, title: &str, emit: Emit<'_>) -> Result<()> {
        let titles = self.root(&self.schema.titles)?;
        let crew = self.root(&self.schema.crew)?;
        let people = self.root(&self.schema.people)?;

        for row in self.db.step_table(titles, RowId::MIN)? {
            let (title_id, record) = row?;
            if !self.schema.has_primary_title(&record, title) {
                continue;
            }
            for credit in self.db.step_table(crew, RowId::MIN)? {
                let (_, credit) = credit?;
                if credit.integer_at(self.schema.crew_title_field, "title_id")? != title_id {
                    continue;
                }
                let person_id = credit.integer_at(self.schema.crew_person_field, "person_id")?;
                emit(self.person(people, person_id)?)?;
            }
        }
        Ok(())
    }

    fn crew_driven(&self, title: &str, emit: Emit<'_>) -> Result<()> {
        let titles = self.root(&self.schema.titles)?;
        let crew = self.root(&self.schema.crew)?;
        let people = self.root(&self.schema.people)?;

        for credit in self.db.step_table(crew, RowId::MIN)? {
            let (_, credit) = credit?;
            let title_id = credit.integer_at(self.schema.crew_title_field, "title_id")?;
            let credited = self
                .db
                .stab_table(titles, title_id)?
                .ok_or_else(|| Error::dangling(&self.schema.titles, title_id))?;
            if !self.schema.has_primary_title(&credited, title) {
                continue;
            }
            let person_id = credit.integer_at(self.schema.crew_person_field, "person_id")?;
            emit(self.person(people, person_id)?)?;
        }
        Ok(())
    }

    /// Title index, then crew index. Without `covering`, the person ID is
    /// read from the crew base row the index entry points at.
    fn via_indexes(&self, title: &str, covering: bool, emit: Emit<'_>) -> Result<()> {
        let titles_index = self.root(&self.schema.titles_by_primary_title)?;
        let crew_index = self.root(&self.schema.crew_by_title_and_person)?;
        let crew = if covering {
            None
        } else {
            Some(self.root(&self.schema.crew)?)
        };
        let people = self.root(&self.schema.people)?;

        for entry in self
            .db
            .step_index(titles_index, vec![Value::from(title)])?
            .while_prefix_matches()
        {
            let title_id = entry?.integer_at(MovieSchema::TITLE_INDEX_TITLE_ID, "title_id")?;
            for credit in self
                .db
                .step_index(crew_index, vec![Value::Integer(title_id)])?
                .while_prefix_matches()
            {
                let credit = credit?;
                let person_id = match crew {
                    None => credit.integer_at(MovieSchema::CREW_INDEX_PERSON_ID, "person_id")?,
                    Some(crew) => {
                        let crew_rowid =
                            credit.integer_at(MovieSchema::CREW_INDEX_CREW_ROWID, "crew rowid")?;
                        self.db
                            .stab_table(crew, crew_rowid)?
                            .ok_or_else(|| Error::dangling(&self.schema.crew, crew_rowid))?
                            .integer_at(self.schema.crew_person_field, "person_id")?
                    }
                };
                emit(self.person(people, person_id)?)?;
            }
        }
        Ok(())
    }
}
