//! Attribute slots attached to nodes

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::value::Value;

/// Payload of an attribute slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, Value>,
}

/// Mutable, shared attribute slot.
///
/// Cloning an `Attribute` clones the handle, not the slot: every clone sees
/// the same name and value. Two attributes are equal only when they are the
/// same slot, no matter what they hold.
#[derive(Clone, Default)]
pub struct Attribute(Rc<RefCell<AttributeRecord>>);

impl Attribute {
    pub fn new(name: Option<&str>, value: impl Into<Value>) -> Self {
        Self::from_record(AttributeRecord {
            name: name.map(str::to_string),
            value: value.into(),
            fields: IndexMap::new(),
        })
    }

    /// Attribute holding `value` with no name.
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self::new(None, value)
    }

    pub fn from_record(record: AttributeRecord) -> Self {
        Self(Rc::new(RefCell::new(record)))
    }

    /// Adds an extra field, builder style.
    pub fn field(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(key, value);
        self
    }

    pub fn name(&self) -> Option<String> {
        self.0.borrow().name.clone()
    }

    pub fn set_name(&self, name: Option<&str>) {
        self.0.borrow_mut().name = name.map(str::to_string);
    }

    pub fn value(&self) -> Value {
        self.0.borrow().value.clone()
    }

    pub fn set_value(&self, value: impl Into<Value>) {
        self.0.borrow_mut().value = value.into();
    }

    pub fn get_field(&self, key: &str) -> Option<Value> {
        self.0.borrow().fields.get(key).cloned()
    }

    pub fn set_field(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.borrow_mut().fields.insert(key.into(), value.into());
    }

    pub fn remove_field(&self, key: &str) -> Option<Value> {
        self.0.borrow_mut().fields.shift_remove(key)
    }

    pub fn fields(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot of the slot contents.
    pub fn to_record(&self) -> AttributeRecord {
        self.0.borrow().clone()
    }

    /// True when both handles point to the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0.borrow();
        f.debug_struct("Attribute")
            .field("name", &record.name)
            .field("value", &record.value)
            .finish()
    }
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.borrow().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Attribute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        AttributeRecord::deserialize(deserializer).map(Self::from_record)
    }
}
