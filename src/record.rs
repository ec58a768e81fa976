use crate::error::CollectionError;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

struct Schema {
    name: String,
    fields: Vec<String>,
    positions: HashMap<String, usize>,
}

/// A factory for fixed-shape records with named fields.
///
/// Every [`Record`] created by the same `RecordType` shares one field list, so
/// the field names and their order are identical across all of its instances.
///
/// # Examples
///
/// ```
/// use sovran_collections::{RecordType, CollectionError};
///
/// let point = RecordType::new("Point", "x y")?;
/// let p = point.create(vec![5, 7])?;
///
/// assert_eq!(*p.get("x")?, 5);
/// assert_eq!(p.get_index(1), Some(&7));
///
/// let moved = p.replace("x", 10)?;
/// assert_eq!(*moved.get("x")?, 10);
/// assert_eq!(*p.get("x")?, 5);
/// assert_eq!(format!("{:?}", moved), "Point(x=10, y=7)");
/// # Ok::<(), CollectionError>(())
/// ```
#[derive(Clone)]
pub struct RecordType {
    schema: Arc<Schema>,
}

impl RecordType {
    /// Declares a record type.
    ///
    /// `fields` is a whitespace or comma separated list of identifiers, e.g.
    /// `"x y"` or `"x, y"`.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidField` if a field name is not an
    /// identifier, starts with an underscore, or is declared twice.
    pub fn new(name: &str, fields: &str) -> Result<Self, CollectionError> {
        Self::with_fields(name, fields.split(|c: char| c == ',' || c.is_whitespace()).filter(|f| !f.is_empty()))
    }

    /// Declares a record type from an explicit list of field names.
    ///
    /// # Errors
    ///
    /// Same rules as [`RecordType::new`].
    pub fn with_fields<I, S>(name: &str, fields: I) -> Result<Self, CollectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !is_identifier(name) {
            return Err(CollectionError::InvalidField(name.to_string()));
        }

        let mut names = Vec::new();
        let mut positions = HashMap::new();
        for field in fields {
            let field = field.as_ref();
            if !is_identifier(field) || field.starts_with('_') {
                return Err(CollectionError::InvalidField(field.to_string()));
            }
            if positions.insert(field.to_string(), names.len()).is_some() {
                return Err(CollectionError::InvalidField(field.to_string()));
            }
            names.push(field.to_string());
        }

        Ok(Self {
            schema: Arc::new(Schema {
                name: name.to_string(),
                fields: names,
                positions,
            }),
        })
    }

    /// The type name used when formatting records.
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.schema.fields
    }

    /// Creates a record from exactly one value per declared field.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Arity` if the value count differs from the
    /// field count.
    pub fn create<V>(&self, values: Vec<V>) -> Result<Record<V>, CollectionError> {
        let expected = self.schema.fields.len();
        if values.len() != expected {
            return Err(CollectionError::Arity {
                expected,
                actual: values.len(),
            });
        }
        Ok(Record {
            schema: Arc::clone(&self.schema),
            values: values.into_boxed_slice(),
        })
    }

    /// Creates a record from any iterable of values.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::Arity` if the iterable yields the wrong number
    /// of values.
    pub fn make<V, I>(&self, values: I) -> Result<Record<V>, CollectionError>
    where
        I: IntoIterator<Item = V>,
    {
        self.create(values.into_iter().collect())
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("name", &self.schema.name)
            .field("fields", &self.schema.fields)
            .finish()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// An immutable record produced by a [`RecordType`].
///
/// No operation mutates a record; [`Record::replace`] returns a new one.
#[derive(Clone)]
pub struct Record<V> {
    schema: Arc<Schema>,
    values: Box<[V]>,
}

impl<V> Record<V> {
    /// Reads a field by name.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::FieldNotFound` if the field is not declared.
    pub fn get(&self, field: &str) -> Result<&V, CollectionError> {
        let index = self.position(field)?;
        Ok(&self.values[index])
    }

    /// Reads a field by position.
    pub fn get_index(&self, index: usize) -> Option<&V> {
        self.values.get(index)
    }

    /// Returns a copy of this record with one field substituted.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::FieldNotFound` if the field is not declared.
    pub fn replace(&self, field: &str, value: V) -> Result<Record<V>, CollectionError>
    where
        V: Clone,
    {
        let index = self.position(field)?;
        let mut values = self.values.clone();
        values[index] = value;
        Ok(Record {
            schema: Arc::clone(&self.schema),
            values,
        })
    }

    /// Field name to value pairs in declaration order.
    pub fn to_ordered_mapping(&self) -> IndexMap<String, V>
    where
        V: Clone,
    {
        self.schema
            .fields
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.schema.fields
    }

    /// Values in declaration order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true for a record type declared without fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn position(&self, field: &str) -> Result<usize, CollectionError> {
        self.schema
            .positions
            .get(field)
            .copied()
            .ok_or_else(|| CollectionError::FieldNotFound(field.to_string()))
    }
}

impl<V: PartialEq> PartialEq for Record<V> {
    fn eq(&self, other: &Self) -> bool {
        self.schema.fields == other.schema.fields && self.values == other.values
    }
}

impl<V: Eq> Eq for Record<V> {}

impl<V: fmt::Debug> fmt::Debug for Record<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.schema.name)?;
        for (i, (field, value)) in self.schema.fields.iter().zip(self.values.iter()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", field, value)?;
        }
        write!(f, ")")
    }
}
