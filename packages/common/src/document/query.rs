use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DocumentError;

/// Top-level fields of a stored document.
pub type Fields = serde_json::Map<String, Value>;

/// A document snapshot: its id inside the collection plus its fields.
///
/// Also serves as a pagination cursor: a query started after a snapshot
/// continues strictly past its position in the query's ordering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Deserialize the fields into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, DocumentError> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

/// Serialize a typed model into document fields.
pub fn encode<T: Serialize>(model: &T) -> Result<Fields, DocumentError> {
    match serde_json::to_value(model)? {
        Value::Object(fields) => Ok(fields),
        other => Err(DocumentError::NotAnObject(other.to_string())),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Lte,
    Gte,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    /// Whether `doc` satisfies this filter. Range comparisons only match values
    /// of the same JSON type; a missing field never matches.
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(actual) = doc.get(&self.field) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => same_kind(actual, &self.value) && compare_values(actual, &self.value).is_eq(),
            FilterOp::Lte => same_kind(actual, &self.value) && compare_values(actual, &self.value).is_le(),
            FilterOp::Gte => same_kind(actual, &self.value) && compare_values(actual, &self.value).is_ge(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Filtered, ordered, cursor-paginated query over one collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub start_after: Option<Document>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn where_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(field, FilterOp::Eq, value)
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn start_after(mut self, cursor: Option<Document>) -> Self {
        self.start_after = cursor;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if let Some(order) = &self.order_by
            && doc.get(&order.field).is_none()
        {
            return false;
        }
        self.filters.iter().all(|filter| filter.matches(doc))
    }

    /// Position of `a` relative to `b` in this query's ordering. Documents
    /// with equal sort values are ordered by id in the same direction.
    fn compare(&self, a: &Document, b: &Document) -> Ordering {
        match &self.order_by {
            None => a.id.cmp(&b.id),
            Some(order) => {
                let null = Value::Null;
                let left = a.get(&order.field).unwrap_or(&null);
                let right = b.get(&order.field).unwrap_or(&null);
                let ordering = compare_values(left, right).then_with(|| a.id.cmp(&b.id));
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            }
        }
    }

    /// Evaluate the query over every document of a collection.
    pub fn apply(&self, docs: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut matched: Vec<Document> = docs.into_iter().filter(|doc| self.matches(doc)).collect();
        matched.sort_by(|a, b| self.compare(a, b));

        if let Some(cursor) = &self.start_after {
            matched.retain(|doc| self.compare(doc, cursor).is_gt());
        }
        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    kind_rank(a) == kind_rank(b)
}

/// Total order over JSON values: null < bool < number < string < array < object.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (left, right) in x.iter().zip(y.iter()) {
                let ordering = compare_values(left, right);
                if ordering.is_ne() {
                    return ordering;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}
