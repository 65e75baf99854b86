use std::collections::BTreeMap;

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use seedfill_core::{FieldKind, FieldType};

/// Generated value for a field. Null is expressed as field absence in a
/// [`Row`], never as an explicit variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

/// One generated record, keyed by field name in sorted order.
pub type Row = BTreeMap<String, Value>;

/// Produce one random value for a field, or `None` for null.
///
/// Nullable fields first draw two independent integers in `[0, 100]` and
/// return null when the first is strictly below the second; the two-draw
/// comparison lands on null in roughly a third of outcomes, not half.
/// Otherwise a non-empty candidate list wins over synthesis by kind.
pub fn field_value(
    field_type: &FieldType,
    candidates: Option<&[Value]>,
    rng: &mut impl Rng,
) -> Option<Value> {
    if field_type.nullable {
        let first = rng.random_range(0..=100_u32);
        let second = rng.random_range(0..=100_u32);
        if first < second {
            return None;
        }
    }

    if let Some(candidates) = candidates
        && !candidates.is_empty()
    {
        let index = rng.random_range(0..candidates.len());
        return Some(candidates[index].clone());
    }

    let value = match field_type.kind {
        FieldKind::Integer => Value::Int(rng.random_range(0..=9999)),
        FieldKind::Float => {
            let numerator = rng.random_range(0..=9999_i64) as f64;
            let denominator = rng.random_range(1..=9999_i64) as f64;
            Value::Float(numerator / denominator)
        }
        FieldKind::Text | FieldKind::Other => Value::Text(random_text(rng)),
    };

    Some(value)
}

fn random_text(rng: &mut impl Rng) -> String {
    let len = rng.random_range(0..=9999_usize);
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}
