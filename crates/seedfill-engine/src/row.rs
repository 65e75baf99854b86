use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use seedfill_core::ModelSpec;

use crate::value::{Row, Value, field_value};

/// Candidate primary-key values per local foreign-key field.
///
/// Built fresh for each generation attempt; the target models grow as the
/// run progresses, so caching across attempts would pin stale candidates.
pub type ForeignKeyMap = BTreeMap<String, Vec<Value>>;

/// Build one record for a model.
///
/// Fields are visited in declaration order. The primary-key field is never
/// populated (the store assigns it), fields listed in `empty_fields` are
/// omitted, and a null draw for a nullable field leaves the field absent
/// rather than setting an explicit null.
pub fn build_row(
    spec: &ModelSpec,
    foreign_keys: &ForeignKeyMap,
    empty_fields: &BTreeSet<String>,
    rng: &mut impl Rng,
) -> Row {
    let mut row = Row::new();

    for field in &spec.fields {
        if field.name == spec.key || empty_fields.contains(&field.name) {
            continue;
        }

        let candidates = foreign_keys.get(&field.name).map(Vec::as_slice);
        if let Some(value) = field_value(&field.field_type, candidates, rng) {
            row.insert(field.name.clone(), value);
        }
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use seedfill_core::{Field, FieldKind, Relationship};

    fn book_spec() -> ModelSpec {
        ModelSpec {
            name: "books".to_string(),
            key: "id".to_string(),
            fields: vec![
                Field::new("id", FieldKind::Integer, false),
                Field::new("title", FieldKind::Text, false),
                Field::new("pages", FieldKind::Integer, false),
                Field::new("summary", FieldKind::Text, true),
                Field::new("author_id", FieldKind::Integer, false),
            ],
            relationships: vec![Relationship::belongs_to("author_id", "authors")],
        }
    }

    #[test]
    fn never_sets_the_primary_key() {
        let spec = book_spec();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let row = build_row(&spec, &ForeignKeyMap::new(), &BTreeSet::new(), &mut rng);
            assert!(!row.contains_key("id"));
        }
    }

    #[test]
    fn omits_empty_fields() {
        let spec = book_spec();
        let empty: BTreeSet<String> = ["title".to_string(), "summary".to_string()].into();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..50 {
            let row = build_row(&spec, &ForeignKeyMap::new(), &empty, &mut rng);
            assert!(!row.contains_key("title"));
            assert!(!row.contains_key("summary"));
            assert!(row.contains_key("pages"));
        }
    }

    #[test]
    fn non_nullable_fields_are_always_present() {
        let spec = book_spec();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let row = build_row(&spec, &ForeignKeyMap::new(), &BTreeSet::new(), &mut rng);
            assert!(row.contains_key("title"));
            assert!(row.contains_key("pages"));
            assert!(row.contains_key("author_id"));
        }
    }

    #[test]
    fn foreign_key_values_come_from_candidates() {
        let spec = book_spec();
        let candidates = vec![Value::Int(10), Value::Int(20)];
        let mut foreign_keys = ForeignKeyMap::new();
        foreign_keys.insert("author_id".to_string(), candidates.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..100 {
            let row = build_row(&spec, &foreign_keys, &BTreeSet::new(), &mut rng);
            let value = row.get("author_id").expect("fk is non-nullable");
            assert!(candidates.contains(value));
        }
    }

    #[test]
    fn nullable_field_is_sometimes_absent() {
        let spec = book_spec();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut present = 0;
        let mut absent = 0;
        for _ in 0..300 {
            let row = build_row(&spec, &ForeignKeyMap::new(), &BTreeSet::new(), &mut rng);
            if row.contains_key("summary") {
                present += 1;
            } else {
                absent += 1;
            }
        }
        assert!(present > 0);
        assert!(absent > 0);
    }
}
