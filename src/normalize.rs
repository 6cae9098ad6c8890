//! Turns raw request fields into a canonical [`EmployeeDraft`].
//!
//! Both the HTML form flow and the JSON API go through [`normalize`]. The form
//! flow uses [`Mode::Strict`] and gets back the first rule that failed; the API
//! uses [`Mode::Lenient`], which coerces instead of rejecting.

use crate::error::ValidationError;
use crate::models::{EmployeeDraft, RawEmployee};
use serde_json::Value;

pub const NAME_REQUIRED: &str = "Name is required.";
pub const INVALID_SALARY: &str = "Basic salary must be a valid non-negative number.";
pub const DEPARTMENT_REQUIRED: &str = "Please select at least one department.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Strict,
    Lenient,
}

pub fn normalize(raw: &RawEmployee, mode: Mode) -> Result<EmployeeDraft, ValidationError> {
    let name = loose_string(raw.get("name")).trim().to_string();
    if mode == Mode::Strict && name.is_empty() {
        return Err(ValidationError::new(NAME_REQUIRED));
    }

    let salary = raw.get("basicSalary").or_else(|| raw.get("salary"));
    let mut basic_salary = loose_number(salary);
    if !basic_salary.is_finite() || basic_salary < 0.0 {
        match mode {
            Mode::Strict => return Err(ValidationError::new(INVALID_SALARY)),
            Mode::Lenient if !basic_salary.is_finite() => basic_salary = 0.0,
            Mode::Lenient => {}
        }
    }

    let manual_department = loose_string(raw.get("department")).trim().to_string();
    let mut departments = normalize_departments(raw.get("departments"));
    if mode == Mode::Strict && manual_department.is_empty() && departments.is_empty() {
        return Err(ValidationError::new(DEPARTMENT_REQUIRED));
    }
    if departments.is_empty() && !manual_department.is_empty() {
        departments.push(manual_department.clone());
    }
    let department = if manual_department.is_empty() {
        departments.join(", ")
    } else {
        manual_department
    };

    let mut draft = EmployeeDraft {
        name,
        department,
        departments,
        basic_salary,
        allowances: optional_number(raw.get("allowances")),
        deductions: optional_number(raw.get("deductions")),
        gender: loose_string(raw.get("gender")).trim().to_string(),
        start_date: start_date(raw),
        profile_image: loose_string(raw.get("profileImage")).trim().to_string(),
        notes: loose_string(raw.get("notes")).trim().to_string(),
    };

    // Each amount is finite, but their sum can still overflow.
    if !draft.total_salary().is_finite() {
        match mode {
            Mode::Strict => return Err(ValidationError::new(INVALID_SALARY)),
            Mode::Lenient => {
                draft.basic_salary = 0.0;
                draft.allowances = 0.0;
                draft.deductions = 0.0;
            }
        }
    }

    Ok(draft)
}

/// Accepts a list, a single string, or nothing. Entries are trimmed, blanks
/// dropped, and repeats removed keeping the first occurrence.
pub fn normalize_departments(value: Option<&Value>) -> Vec<String> {
    let candidates: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| loose_string(Some(item)).trim().to_string())
            .collect(),
        Some(Value::String(s)) => vec![s.trim().to_string()],
        _ => Vec::new(),
    };

    let mut departments: Vec<String> = Vec::with_capacity(candidates.len());
    for department in candidates {
        if !department.is_empty() && !departments.contains(&department) {
            departments.push(department);
        }
    }
    departments
}

/// `startYear`/`startMonth`/`startDay` win when all three are non-zero
/// numbers; otherwise the literal `startDate` is used.
fn start_date(raw: &RawEmployee) -> String {
    let part = |key: &str| optional_number(raw.get(key));
    let (year, month, day) = (part("startYear"), part("startMonth"), part("startDay"));

    if year == 0.0 || month == 0.0 || day == 0.0 {
        return loose_string(raw.get("startDate")).trim().to_string();
    }

    format!(
        "{}-{:0>2}-{:0>2}",
        number_text(year),
        number_text(month),
        number_text(day)
    )
}

/// Numeric coercion for untyped input. Absent values and anything that does
/// not read as a number give NaN; blank strings give 0.
pub fn loose_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => f64::NAN,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(items)) => match items.as_slice() {
            [] => 0.0,
            [single] => loose_number(Some(single)),
            _ => f64::NAN,
        },
        Some(Value::Object(_)) => f64::NAN,
    }
}

fn optional_number(value: Option<&Value>) -> f64 {
    let n = loose_number(value);
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// String coercion for untyped input. Falsy values (absent, null, false, 0,
/// empty) become an empty string.
pub fn loose_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f == 0.0 => String::new(),
            Some(f) => number_text(f),
            None => n.to_string(),
        },
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                Value::Bool(false) => "false".to_string(),
                Value::Number(n) if n.as_f64() == Some(0.0) => "0".to_string(),
                other => loose_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

fn number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
