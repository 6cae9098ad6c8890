use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Identifier of a stored employee.
///
/// New records always get a UUID. Records written by the older form flow
/// carry millisecond timestamps, so those still load and match by their
/// decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployeeId {
    Text(String),
    Timestamp(i64),
}

impl EmployeeId {
    pub fn generate() -> Self {
        EmployeeId::Text(Uuid::new_v4().to_string())
    }

    /// Compares against an id taken from a URL path segment.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            EmployeeId::Text(id) => id == raw,
            EmployeeId::Timestamp(ts) => raw.trim().parse::<i64>().is_ok_and(|n| n == *ts),
        }
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployeeId::Text(id) => f.write_str(id),
            EmployeeId::Timestamp(ts) => write!(f, "{}", ts),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub departments: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub basic_salary: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allowances: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deductions: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_salary: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    /// Keys this version does not know about. Kept so updates don't drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Employee {
    pub fn new(draft: EmployeeDraft) -> Self {
        let mut employee = Self {
            id: EmployeeId::generate(),
            name: String::new(),
            department: String::new(),
            departments: Vec::new(),
            basic_salary: 0.0,
            allowances: 0.0,
            deductions: 0.0,
            total_salary: 0.0,
            gender: String::new(),
            start_date: String::new(),
            profile_image: String::new(),
            notes: String::new(),
            extra: Map::new(),
        };
        employee.apply(draft);
        employee
    }

    /// Replaces every non-id field with the draft's values.
    pub fn apply(&mut self, draft: EmployeeDraft) {
        let total = draft.total_salary();
        self.total_salary = if total.is_finite() { total } else { 0.0 };
        self.name = draft.name;
        self.department = draft.department;
        self.departments = draft.departments;
        self.basic_salary = draft.basic_salary;
        self.allowances = draft.allowances;
        self.deductions = draft.deductions;
        self.gender = draft.gender;
        self.start_date = draft.start_date;
        self.profile_image = draft.profile_image;
        self.notes = draft.notes;
    }
}

/// Stored fields that are explicitly `null` read as their default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One element of the stored array.
///
/// Elements that don't decode as an [`Employee`] (no id, wrong field types)
/// are carried as raw JSON and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StoredRecord {
    Employee(Employee),
    Unreadable(Value),
}

impl StoredRecord {
    pub fn as_employee(&self) -> Option<&Employee> {
        match self {
            StoredRecord::Employee(employee) => Some(employee),
            StoredRecord::Unreadable(_) => None,
        }
    }

    pub fn as_employee_mut(&mut self) -> Option<&mut Employee> {
        match self {
            StoredRecord::Employee(employee) => Some(employee),
            StoredRecord::Unreadable(_) => None,
        }
    }

    pub fn into_employee(self) -> Option<Employee> {
        match self {
            StoredRecord::Employee(employee) => Some(employee),
            StoredRecord::Unreadable(_) => None,
        }
    }
}

impl From<Employee> for StoredRecord {
    fn from(employee: Employee) -> Self {
        StoredRecord::Employee(employee)
    }
}

/// A canonical record without an id, as produced by [`crate::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub name: String,
    pub department: String,
    pub departments: Vec<String>,
    pub basic_salary: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub gender: String,
    pub start_date: String,
    pub profile_image: String,
    pub notes: String,
}

impl EmployeeDraft {
    pub fn total_salary(&self) -> f64 {
        self.basic_salary + self.allowances - self.deductions
    }
}

/// Untyped request fields, either a JSON body or a decoded form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawEmployee(pub Map<String, Value>);

impl RawEmployee {
    /// Builds the field map from url-encoded pairs. Repeated keys (checkbox
    /// groups such as `departments`) collapse into an array.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut fields = Map::new();
        for (key, value) in pairs {
            match fields.get_mut(&key) {
                Some(Value::Array(items)) => items.push(Value::String(value)),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value)]);
                }
                None => {
                    fields.insert(key, Value::String(value));
                }
            }
        }
        RawEmployee(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Field as display text, for refilling a form after a failed submit.
    pub fn text(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
