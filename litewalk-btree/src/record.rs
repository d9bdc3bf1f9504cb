//! Record format: a varint header of serial types followed by the values.

use crate::codecs::ByteReader;
use core::cmp::Ordering;
use litewalk_result::{Error, Result};
use std::fmt;

/// Integer key of a table b-tree row.
pub type RowId = i64;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Storage class rank used when values of different classes meet:
    /// NULL < numeric < text < blob.
    fn class_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Integer(_) | Value::Real(_) => 1,
            Value::Text(_) => 2,
            Value::Blob(_) => 3,
        }
    }

    /// Total order matching SQLite's BINARY collation, which is the order
    /// index b-trees are sorted in.
    pub fn sql_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Real(a), Value::Real(b)) => a.total_cmp(b),
            (Value::Integer(a), Value::Real(b)) => (*a as f64).total_cmp(b),
            (Value::Real(a), Value::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Value::Text(a), Value::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Value::Blob(a), Value::Blob(b)) => a.cmp(b),
            _ => self.class_rank().cmp(&other.class_rank()),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Real(v) => write_real(f, *v),
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Blob(b) => {
                f.write_str("X'")?;
                for byte in b {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'")
            }
        }
    }
}

/// Write a float so it always reads back as a real: `5.0`, `1.0e16`.
pub(crate) fn write_real(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let text = format!("{v:?}");
    if !v.is_finite() || text.contains('.') {
        return f.write_str(&text);
    }
    match text.find('e') {
        Some(exp) => write!(f, "{}.0{}", &text[..exp], &text[exp..]),
        None => write!(f, "{text}.0"),
    }
}

/// The decoded values of one table row or index entry, in column order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Decode a complete (non-spilled) record payload.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut header = ByteReader::new(payload, 0)?;
        let header_len = usize::try_from(header.read_varint()?)
            .map_err(|_| Error::corrupt("record header length overflows usize"))?;
        if header_len > payload.len() || header_len < header.position() {
            return Err(Error::corrupt(format_args!(
                "record header length {header_len} does not fit a {}-byte payload",
                payload.len()
            )));
        }
        let mut header = ByteReader::bounded(payload, header_len, header.position())?;
        let mut body = ByteReader::new(payload, header_len)?;

        let mut values = Vec::new();
        while header.remaining() > 0 {
            let serial_type = header.read_varint()?;
            values.push(decode_value(serial_type, &mut body)?);
        }
        Ok(Self { values })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Integer at `idx`, or a corruption error naming what was expected.
    pub fn integer_at(&self, idx: usize, what: &str) -> Result<i64> {
        match self.values.get(idx) {
            Some(Value::Integer(v)) => Ok(*v),
            Some(other) => Err(Error::corrupt(format_args!(
                "{what} (field {idx}) should be an integer, found {other}"
            ))),
            None => Err(Error::corrupt(format_args!(
                "{what} (field {idx}) missing from a {}-field record",
                self.values.len()
            ))),
        }
    }

    /// Compare the leading `key.len()` fields against `key`, lexicographically.
    /// A record with fewer fields than the key sorts before it.
    pub fn cmp_prefix(&self, key: &[Value]) -> Ordering {
        for (field, k) in self.values.iter().zip(key) {
            match field.sql_cmp(k) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        self.values.len().min(key.len()).cmp(&key.len())
    }

    /// True when the leading fields equal `key`.
    pub fn starts_with(&self, key: &[Value]) -> bool {
        self.cmp_prefix(key) == Ordering::Equal
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str(")")
    }
}

fn decode_value(serial_type: u64, body: &mut ByteReader<'_>) -> Result<Value> {
    let value = match serial_type {
        0 => Value::Null,
        1 => Value::Integer(body.read_int(1)?),
        2 => Value::Integer(body.read_int(2)?),
        3 => Value::Integer(body.read_int(3)?),
        4 => Value::Integer(body.read_int(4)?),
        5 => Value::Integer(body.read_int(6)?),
        6 => Value::Integer(body.read_int(8)?),
        7 => Value::Real(body.read_f64()?),
        8 => Value::Integer(0),
        9 => Value::Integer(1),
        10 | 11 => {
            return Err(Error::corrupt(format_args!(
                "reserved serial type {serial_type} in record"
            )));
        }
        n if n % 2 == 0 => {
            let len = ((n - 12) / 2) as usize;
            Value::Blob(body.read_bytes(len)?.to_vec())
        }
        n => {
            let len = ((n - 13) / 2) as usize;
            let bytes = body.read_bytes(len)?;
            let text = std::str::from_utf8(bytes)
                .map_err(|e| Error::corrupt(format_args!("text field is not UTF-8: {e}")))?;
            Value::Text(text.to_string())
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Header: size 5, types [NULL, 1-byte int, text len 3, real]
    fn sample_payload() -> Vec<u8> {
        let mut p = vec![5, 0, 1, 13 + 2 * 3, 7];
        p.push(0xfe);
        p.extend_from_slice(b"abc");
        p.extend_from_slice(&2.5f64.to_be_bytes());
        p
    }

    #[test]
    fn decodes_mixed_record() {
        let rec = Record::decode(&sample_payload()).unwrap();
        assert_eq!(
            rec.values(),
            &[
                Value::Null,
                Value::Integer(-2),
                Value::Text("abc".into()),
                Value::Real(2.5)
            ]
        );
        assert_eq!(rec.to_string(), "(NULL, -2, 'abc', 2.5)");
    }

    #[test]
    fn constants_and_blobs() {
        // types: 8 (zero), 9 (one), blob len 2
        let payload = [4, 8, 9, 12 + 2 * 2, 0xde, 0xad];
        let rec = Record::decode(&payload).unwrap();
        assert_eq!(rec.get(0), Some(&Value::Integer(0)));
        assert_eq!(rec.get(1), Some(&Value::Integer(1)));
        assert_eq!(rec.get(2), Some(&Value::Blob(vec![0xde, 0xad])));
        assert_eq!(rec.get(2).unwrap().to_string(), "X'DEAD'");
    }

    #[test]
    fn reserved_serial_type_is_corrupt() {
        let payload = [2, 10];
        assert!(matches!(Record::decode(&payload), Err(Error::Corrupt(_))));
    }

    #[test]
    fn body_shorter_than_header_claims_is_corrupt() {
        // text of length 10 but only 3 bytes follow
        let payload = [2, 13 + 2 * 10, b'a', b'b', b'c'];
        assert!(matches!(Record::decode(&payload), Err(Error::Corrupt(_))));

        let payload = [9, 1];
        assert!(matches!(Record::decode(&payload), Err(Error::Corrupt(_))));
    }

    #[test]
    fn text_quotes_are_doubled() {
        let v = Value::from("Ocean's Eleven");
        assert_eq!(v.to_string(), "'Ocean''s Eleven'");
        assert_eq!(Value::Real(5.0).to_string(), "5.0");
    }

    #[test]
    fn reals_keep_a_decimal_point_in_exponent_form() {
        assert_eq!(Value::Real(1e16).to_string(), "1.0e16");
        assert_eq!(Value::Real(-1e20).to_string(), "-1.0e20");
        assert_eq!(Value::Real(1e-7).to_string(), "1.0e-7");
        assert_eq!(Value::Real(2.5e-7).to_string(), "2.5e-7");
        assert_eq!(Value::Real(8.8).to_string(), "8.8");
        for v in [1e16, 2.5e-7, 123456789.0, 1e300] {
            assert!(Value::Real(v).to_string().contains('.'), "{v:?}");
        }
    }

    #[test]
    fn cross_class_ordering() {
        let ordered = [
            Value::Null,
            Value::Integer(-5),
            Value::Real(-4.5),
            Value::Integer(3),
            Value::Text("A".into()),
            Value::Text("a".into()),
            Value::Blob(vec![0]),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(pair[0].sql_cmp(&pair[1]), Ordering::Less, "{pair:?}");
            assert_eq!(pair[1].sql_cmp(&pair[0]), Ordering::Greater, "{pair:?}");
        }
        assert_eq!(Value::Integer(2).sql_cmp(&Value::Real(2.0)), Ordering::Equal);
    }

    #[test]
    fn prefix_comparison() {
        let rec = Record::new(vec![Value::Integer(5), Value::Integer(101), Value::Integer(9)]);
        assert!(rec.starts_with(&[Value::Integer(5)]));
        assert_eq!(rec.cmp_prefix(&[Value::Integer(4)]), Ordering::Greater);
        assert_eq!(rec.cmp_prefix(&[Value::Integer(6)]), Ordering::Less);
        assert_eq!(
            rec.cmp_prefix(&[Value::Integer(5), Value::Integer(101)]),
            Ordering::Equal
        );

        let short = Record::new(vec![Value::Integer(5)]);
        assert_eq!(
            short.cmp_prefix(&[Value::Integer(5), Value::Integer(1)]),
            Ordering::Less
        );
        assert!(rec.starts_with(&[]));
    }

    #[test]
    fn integer_at_reports_what_was_expected() {
        let rec = Record::new(vec![Value::from("x")]);
        let err = rec.integer_at(0, "title_id").unwrap_err();
        assert!(err.to_string().contains("title_id"));
        assert!(rec.integer_at(3, "person_id").is_err());
    }
}
