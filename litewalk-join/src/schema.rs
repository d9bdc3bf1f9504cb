use litewalk_btree::{Record, Value};

/// Names and field positions of the movie schema.
///
/// Index entries end with the rowid of the row they point at, so the fields
/// of `titles_by_primary_title` are `(primary_title, title_id)` and those of
/// `crew_by_title_and_person` are `(title_id, person_id, crew_rowid)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieSchema {
    pub titles: String,
    pub titles_by_primary_title: String,
    pub crew: String,
    pub crew_by_title_and_person: String,
    pub people: String,
    /// Field of a `titles` row holding the primary title.
    pub primary_title_field: usize,
    /// Field of a `crew` row holding the title ID.
    pub crew_title_field: usize,
    /// Field of a `crew` row holding the person ID.
    pub crew_person_field: usize,
}

impl MovieSchema {
    pub(crate) const TITLE_INDEX_TITLE_ID: usize = 1;
    pub(crate) const CREW_INDEX_PERSON_ID: usize = 1;
    pub(crate) const CREW_INDEX_CREW_ROWID: usize = 2;
}

impl Default for MovieSchema {
    fn default() -> Self {
        Self {
            titles: "titles".to_string(),
            titles_by_primary_title: "titles_by_primary_title".to_string(),
            crew: "crew".to_string(),
            crew_by_title_and_person: "crew_by_title_and_person".to_string(),
            people: "people".to_string(),
            primary_title_field: 3,
            crew_title_field: 0,
            crew_person_field: 1,
        }
    }
}

impl MovieSchema {
    /// Whether a `titles` row carries exactly `title` as its primary title.
    /// Comparison is byte-wise and case-sensitive, like the index.
    pub(crate) fn has_primary_title(&self, row: &Record, title: &str) -> bool {
        row.get(self.primary_title_field).and_then(Value::as_text) == Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_title_match_is_exact() {
        let schema = MovieSchema::default();
        let row = Record::new(vec![
            Value::Null,
            Value::from("movie"),
            Value::from("Hamlet"),
            Value::from("Hamlet"),
        ]);
        assert!(schema.has_primary_title(&row, "Hamlet"));
        assert!(!schema.has_primary_title(&row, "hamlet"));
        assert!(!schema.has_primary_title(&row, "Hamlet "));
        assert!(!schema.has_primary_title(&Record::default(), "Hamlet"));
    }
}
