//! Page rendering for the form flow.
//!
//! Handlers hand a [`View`] to whatever [`ViewRenderer`] the app was built
//! with. The bag fields serialize with the names a template engine would
//! expect (`employees`, `formError`, `formData`, `editingId`, `error`,
//! `employee`). [`HtmlRenderer`] is the built-in implementation.

use crate::error::RenderError;
use crate::models::{Employee, RawEmployee};
use crate::normalize::normalize_departments;
use serde::Serialize;
use std::fmt::Write;

pub const DEPARTMENT_CHOICES: [&str; 5] = ["HR", "Finance", "Engineering", "Sales", "Operations"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexView {
    pub employees: Vec<Employee>,
    pub form_error: Option<String>,
    pub form_data: Option<RawEmployee>,
    pub editing_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FormView {
    pub error: Option<String>,
    pub employee: Option<Employee>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "lowercase")]
pub enum View {
    Index(IndexView),
    Add(FormView),
    Edit(FormView),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Index(_) => "index",
            View::Add(_) => "add",
            View::Edit(_) => "edit",
        }
    }
}

pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &View) -> Result<String, RenderError>;
}

/// Plain HTML pages, no template files needed.
#[derive(Debug, Default, Clone)]
pub struct HtmlRenderer;

impl ViewRenderer for HtmlRenderer {
    fn render(&self, view: &View) -> Result<String, RenderError> {
        let mut body = String::new();
        let result = match view {
            View::Index(index) => render_index(&mut body, index),
            View::Add(form) => render_form_page(&mut body, "Add employee", "/add", form),
            View::Edit(form) => {
                let action = form
                    .employee
                    .as_ref()
                    .map(|e| format!("/edit/{}", e.id))
                    .unwrap_or_else(|| "/".to_string());
                render_form_page(&mut body, "Edit employee", &action, form)
            }
        };
        result.map_err(|e| RenderError {
            view: view.name().to_string(),
            reason: e.to_string(),
        })?;
        Ok(page(view.name(), &body))
    }
}

/// Field values used to fill a form, either from a stored record or from a
/// rejected submission.
#[derive(Debug, Default)]
struct FormValues {
    name: String,
    department: String,
    departments: Vec<String>,
    basic_salary: String,
    allowances: String,
    deductions: String,
    gender: String,
    start_date: String,
    profile_image: String,
    notes: String,
}

impl From<&Employee> for FormValues {
    fn from(e: &Employee) -> Self {
        Self {
            name: e.name.clone(),
            department: e.department.clone(),
            departments: e.departments.clone(),
            basic_salary: e.basic_salary.to_string(),
            allowances: e.allowances.to_string(),
            deductions: e.deductions.to_string(),
            gender: e.gender.clone(),
            start_date: e.start_date.clone(),
            profile_image: e.profile_image.clone(),
            notes: e.notes.clone(),
        }
    }
}

impl From<&RawEmployee> for FormValues {
    fn from(raw: &RawEmployee) -> Self {
        let basic_salary = if raw.get("basicSalary").is_some() {
            raw.text("basicSalary")
        } else {
            raw.text("salary")
        };
        Self {
            name: raw.text("name"),
            department: raw.text("department"),
            departments: normalize_departments(raw.get("departments")),
            basic_salary,
            allowances: raw.text("allowances"),
            deductions: raw.text("deductions"),
            gender: raw.text("gender"),
            start_date: raw.text("startDate"),
            profile_image: raw.text("profileImage"),
            notes: raw.text("notes"),
        }
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Employees - {}</title>\n\
         <link rel=\"stylesheet\" href=\"/styles.css\">\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

fn render_index(out: &mut String, view: &IndexView) -> std::fmt::Result {
    writeln!(out, "<h1>Employees</h1>")?;
    writeln!(out, "<p><a href=\"/add\">Add employee</a></p>")?;

    if let Some(error) = &view.form_error {
        writeln!(out, "<p class=\"error\">{}</p>", escape(error))?;
    }

    if view.employees.is_empty() {
        writeln!(out, "<p>No employees yet.</p>")?;
    } else {
        writeln!(out, "<table>")?;
        writeln!(
            out,
            "<tr><th>Name</th><th>Department</th><th>Basic</th><th>Total</th>\
             <th>Gender</th><th>Start date</th><th></th></tr>"
        )?;
        for e in &view.employees {
            writeln!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td><a href=\"/edit/{id}\">Edit</a> <a href=\"/delete/{id}\">Delete</a></td></tr>",
                escape(&e.name),
                escape(&e.department),
                e.basic_salary,
                e.total_salary,
                escape(&e.gender),
                escape(&e.start_date),
                id = escape(&e.id.to_string()),
            )?;
        }
        writeln!(out, "</table>")?;
    }

    // A rejected submission is shown again with what the user typed.
    if let Some(raw) = &view.form_data {
        let action = match &view.editing_id {
            Some(id) => format!("/edit/{}", id),
            None => "/add".to_string(),
        };
        render_fields(out, &action, &FormValues::from(raw))?;
    }
    Ok(())
}

fn render_form_page(out: &mut String, title: &str, action: &str, view: &FormView) -> std::fmt::Result {
    writeln!(out, "<h1>{}</h1>", escape(title))?;
    if let Some(error) = &view.error {
        writeln!(out, "<p class=\"error\">{}</p>", escape(error))?;
    }
    let values = view.employee.as_ref().map(FormValues::from).unwrap_or_default();
    render_fields(out, action, &values)?;
    writeln!(out, "<p><a href=\"/\">Back to list</a></p>")
}

fn render_fields(out: &mut String, action: &str, values: &FormValues) -> std::fmt::Result {
    writeln!(out, "<form method=\"post\" action=\"{}\">", escape(action))?;
    text_input(out, "Name", "name", &values.name)?;
    text_input(out, "Basic salary", "basicSalary", &values.basic_salary)?;
    text_input(out, "Allowances", "allowances", &values.allowances)?;
    text_input(out, "Deductions", "deductions", &values.deductions)?;

    writeln!(out, "<fieldset><legend>Departments</legend>")?;
    for choice in DEPARTMENT_CHOICES {
        let checked = if values.departments.iter().any(|d| d == choice) {
            " checked"
        } else {
            ""
        };
        writeln!(
            out,
            "<label><input type=\"checkbox\" name=\"departments\" value=\"{0}\"{1}> {0}</label>",
            choice, checked
        )?;
    }
    writeln!(out, "</fieldset>")?;
    text_input(out, "Other department", "department", &values.department)?;

    writeln!(out, "<label>Gender <select name=\"gender\">")?;
    for option in ["", "female", "male", "other"] {
        let selected = if values.gender == option { " selected" } else { "" };
        writeln!(out, "<option value=\"{0}\"{1}>{0}</option>", option, selected)?;
    }
    writeln!(out, "</select></label>")?;

    writeln!(
        out,
        "<label>Start date <input type=\"number\" name=\"startDay\" min=\"1\" max=\"31\" placeholder=\"DD\">\
         <input type=\"number\" name=\"startMonth\" min=\"1\" max=\"12\" placeholder=\"MM\">\
         <input type=\"number\" name=\"startYear\" placeholder=\"YYYY\"></label>"
    )?;
    writeln!(
        out,
        "<input type=\"hidden\" name=\"startDate\" value=\"{}\">",
        escape(&values.start_date)
    )?;
    text_input(out, "Profile image", "profileImage", &values.profile_image)?;
    writeln!(
        out,
        "<label>Notes <textarea name=\"notes\">{}</textarea></label>",
        escape(&values.notes)
    )?;
    writeln!(out, "<button type=\"submit\">Save</button>\n</form>")
}

fn text_input(out: &mut String, label: &str, name: &str, value: &str) -> std::fmt::Result {
    writeln!(
        out,
        "<label>{} <input type=\"text\" name=\"{}\" value=\"{}\"></label>",
        label,
        name,
        escape(value)
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_keeps_rejected_input() {
        let form_data: RawEmployee =
            serde_json::from_value(json!({ "name": "<Ana>", "basicSalary": "abc" })).unwrap();
        let html = HtmlRenderer
            .render(&View::Index(IndexView {
                employees: Vec::new(),
                form_error: Some("Basic salary must be a valid non-negative number.".into()),
                form_data: Some(form_data),
                editing_id: Some("42".into()),
            }))
            .unwrap();

        assert!(html.contains("Basic salary must be a valid non-negative number."));
        assert!(html.contains("value=\"&lt;Ana&gt;\""));
        assert!(html.contains("value=\"abc\""));
        assert!(html.contains("action=\"/edit/42\""));
    }

    #[test]
    fn test_view_bag_names() {
        let bag = serde_json::to_value(View::Index(IndexView {
            employees: Vec::new(),
            form_error: None,
            form_data: None,
            editing_id: None,
        }))
        .unwrap();

        assert_eq!(bag["view"], "index");
        assert_eq!(
            bag["data"],
            json!({ "employees": [], "formError": null, "formData": null, "editingId": null })
        );
    }
}
