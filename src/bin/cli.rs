use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use employee_records::models::{Employee, MessageResponse};
use prettytable::{Cell, Row, Table};
use serde_json::{json, Value};

const API_URL: &str = "http://localhost:3000";

#[derive(Parser)]
#[command(name = "employees")]
#[command(about = "A CLI tool for managing employee records", long_about = None)]
struct Cli {
    #[arg(long, global = true, default_value = API_URL, help = "Base URL of the server")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List all employees")]
    List,

    #[command(about = "Show one employee")]
    Show {
        #[arg(help = "Employee ID")]
        id: String,
    },

    #[command(about = "Create a new employee")]
    Create(EmployeeArgs),

    #[command(about = "Replace an employee's details")]
    Update {
        #[arg(help = "Employee ID")]
        id: String,

        #[command(flatten)]
        employee: EmployeeArgs,
    },

    #[command(about = "Delete an employee")]
    Delete {
        #[arg(help = "Employee ID")]
        id: String,
    },
}

#[derive(Args)]
struct EmployeeArgs {
    #[arg(short, long, help = "Full name")]
    name: String,

    #[arg(short, long, help = "Basic salary")]
    basic_salary: f64,

    #[arg(short, long, default_value_t = 0.0, help = "Allowances")]
    allowances: f64,

    #[arg(short = 'x', long, default_value_t = 0.0, help = "Deductions")]
    deductions: f64,

    #[arg(short, long, help = "Departments (comma-separated)")]
    departments: Option<String>,

    #[arg(short, long, help = "Gender")]
    gender: Option<String>,

    #[arg(short, long, help = "Start date (YYYY-MM-DD)")]
    start_date: Option<String>,

    #[arg(short, long, help = "Profile image path or URL")]
    profile_image: Option<String>,

    #[arg(long, help = "Free-form notes")]
    notes: Option<String>,
}

impl EmployeeArgs {
    fn into_body(self) -> Value {
        let departments: Vec<String> = self
            .departments
            .unwrap_or_default()
            .split(',')
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();

        json!({
            "name": self.name,
            "basicSalary": self.basic_salary,
            "allowances": self.allowances,
            "deductions": self.deductions,
            "departments": departments,
            "gender": self.gender.unwrap_or_default(),
            "startDate": self.start_date.unwrap_or_default(),
            "profileImage": self.profile_image.unwrap_or_default(),
            "notes": self.notes.unwrap_or_default(),
        })
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run_command(&cli.url, cli.command).await {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_command(base: &str, command: Commands) -> Result<()> {
    let client = reqwest::Client::new();
    let base = base.trim_end_matches('/');

    match command {
        Commands::List => list_employees(&client, base).await,
        Commands::Show { id } => show_employee(&client, base, &id).await,
        Commands::Create(employee) => create_employee(&client, base, employee).await,
        Commands::Update { id, employee } => update_employee(&client, base, &id, employee).await,
        Commands::Delete { id } => delete_employee(&client, base, &id).await,
    }
}

async fn list_employees(client: &reqwest::Client, base: &str) -> Result<()> {
    let response = client
        .get(format!("{}/employees", base))
        .send()
        .await
        .context("Failed to reach server")?;
    let employees: Vec<Employee> = parse(response, "Failed to fetch employees").await?;

    if employees.is_empty() {
        println!("📭 No employees found.");
        return Ok(());
    }

    println!("\n📋 Employees ({})\n", employees.len());

    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("ID"),
        Cell::new("Name"),
        Cell::new("Departments"),
        Cell::new("Total Salary"),
        Cell::new("Start Date"),
    ]));

    for employee in employees {
        let id = employee.id.to_string();
        let short_id: String = id.chars().take(8).collect();
        table.add_row(Row::new(vec![
            Cell::new(&short_id),
            Cell::new(&employee.name),
            Cell::new(&employee.departments.join(", ")),
            Cell::new(&format!("{:.2}", employee.total_salary)),
            Cell::new(&display_date(&employee.start_date)),
        ]));
    }

    table.printstd();
    println!();

    Ok(())
}

async fn show_employee(client: &reqwest::Client, base: &str, id: &str) -> Result<()> {
    let response = client
        .get(format!("{}/employees/{}", base, id))
        .send()
        .await
        .context("Failed to reach server")?;
    let employee: Employee = parse(response, "Failed to fetch employee").await?;

    print_employee(&employee);
    Ok(())
}

async fn create_employee(client: &reqwest::Client, base: &str, args: EmployeeArgs) -> Result<()> {
    let response = client
        .post(format!("{}/employees", base))
        .json(&args.into_body())
        .send()
        .await
        .context("Failed to reach server")?;
    let employee: Employee = parse(response, "Failed to create employee").await?;

    println!("✅ Employee created successfully!");
    print_employee(&employee);
    Ok(())
}

async fn update_employee(
    client: &reqwest::Client,
    base: &str,
    id: &str,
    args: EmployeeArgs,
) -> Result<()> {
    let response = client
        .put(format!("{}/employees/{}", base, id))
        .json(&args.into_body())
        .send()
        .await
        .context("Failed to reach server")?;
    let employee: Employee = parse(response, "Failed to update employee").await?;

    println!("✅ Employee updated successfully!");
    print_employee(&employee);
    Ok(())
}

async fn delete_employee(client: &reqwest::Client, base: &str, id: &str) -> Result<()> {
    let response = client
        .delete(format!("{}/employees/{}", base, id))
        .send()
        .await
        .context("Failed to reach server")?;
    let result: MessageResponse = parse(response, "Failed to delete employee").await?;

    println!("🗑️  {}", result.message);
    Ok(())
}

async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageResponse>(&body)
            .map(|m| m.message)
            .unwrap_or(body);
        bail!("{} ({}): {}", what, status, message);
    }

    response
        .json()
        .await
        .with_context(|| format!("{}: unexpected response body", what))
}

fn print_employee(employee: &Employee) {
    println!("   ID: {}", employee.id);
    println!("   Name: {}", employee.name);
    if !employee.departments.is_empty() {
        println!("   Departments: {}", employee.departments.join(", "));
    }
    println!(
        "   Salary: {:.2} + {:.2} - {:.2} = {:.2}",
        employee.basic_salary, employee.allowances, employee.deductions, employee.total_salary
    );
    if !employee.gender.is_empty() {
        println!("   Gender: {}", employee.gender);
    }
    if !employee.start_date.is_empty() {
        println!("   Started: {}", display_date(&employee.start_date));
    }
    if !employee.notes.is_empty() {
        println!("   Notes: {}", employee.notes);
    }
}

fn display_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d %b %Y").to_string(),
        Err(_) if raw.is_empty() => "-".to_string(),
        Err(_) => raw.to_string(),
    }
}
