//! Walk-in CLI - Command-line interface for the walk-in queue daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "walkin")]
#[command(about = "Walk-in queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "WALKIN_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daemon status
    Health,

    /// Show a configured unit
    Info {
        /// Unit id
        unit: String,
    },

    /// Issue a ticket
    Issue {
        /// Unit id
        unit: String,

        /// Service id (or free label when the unit has no catalog)
        #[arg(short, long)]
        service: String,

        /// Request priority service
        #[arg(short, long)]
        priority: bool,

        /// Priority category (e.g., elderly, pregnant)
        #[arg(long)]
        priority_kind: Option<String>,

        /// Party size for table-mode units
        #[arg(short, long)]
        group_size: Option<u32>,

        /// Requester name
        #[arg(long)]
        name: Option<String>,

        /// Requester contact
        #[arg(long)]
        contact: Option<String>,
    },

    /// List a unit's queue
    List {
        /// Unit id
        unit: String,
    },

    /// Call the next waiting ticket
    CallNext {
        /// Unit id
        unit: String,
    },

    /// Apply an action to a ticket (call, served, absent, hold, resume)
    Ticket {
        /// Unit id
        unit: String,

        /// Ticket id
        id: u64,

        /// Action name
        action: String,
    },

    /// Manage tables of a table-mode unit
    Tables {
        #[command(subcommand)]
        command: TableCommands,
    },
}

#[derive(Subcommand)]
enum TableCommands {
    /// List free tables
    List {
        /// Unit id
        unit: String,
    },

    /// Register a free table
    Register {
        /// Unit id
        unit: String,

        /// Seat count
        #[arg(short, long)]
        seats: u32,

        /// Display label
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Seat a ticket at a table
    Assign {
        /// Unit id
        unit: String,

        /// Table id
        table: u32,

        /// Ticket id
        ticket: u64,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Tabled)]
struct TicketRow {
    id: u64,
    number: String,
    service: String,
    status: String,
    priority: String,
    requester: String,
}

impl TicketRow {
    fn from_json(ticket: &Value) -> Self {
        let text = |key: &str| ticket[key].as_str().unwrap_or("-").to_string();
        let priority = if ticket["priority"].as_bool().unwrap_or(false) {
            ticket["priority_kind"].as_str().unwrap_or("yes").to_string()
        } else {
            "-".to_string()
        };

        Self {
            id: ticket["id"].as_u64().unwrap_or(0),
            number: text("visible_number"),
            service: text("service"),
            status: text("status"),
            priority,
            requester: text("requester_name"),
        }
    }
}

#[derive(Tabled)]
struct TableRow {
    id: u64,
    seats: u64,
    label: String,
}

impl TableRow {
    fn from_json(table: &Value) -> Self {
        let id = table["id"].as_u64().unwrap_or(0);
        let seats = table["seats"].as_u64().unwrap_or(0);
        let label = table["note"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Table {} ({} seats)", id, seats));

        Self { id, seats, label }
    }
}

async fn call_rpc(url: &str, method: &str, params: Value) -> Result<Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn print_ticket(ticket: &Value) {
    println!("{}", Table::new(vec![TicketRow::from_json(ticket)]));
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Health => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "system.health.v1", json!({})).await {
                Ok(health) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!("  {} {}", "Version:".bold(), health["version"]);
                    println!();
                    println!("  {} {}", "Configured units:".bold(), health["configured_units"]);
                    println!("  {} {}", "Active units:".bold(), health["active_units"]);
                    println!("  {} {} seconds", "Uptime:".bold(), health["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::Info { unit } => {
            let result = call_rpc(&cli.rpc_url, "unit.info.v1", json!({ "unit_id": unit })).await?;
            let info = &result["unit"];

            println!("{}", format!("Unit {}", unit).cyan().bold());
            println!();
            println!("  {} {}", "Name:".bold(), info["name"].as_str().unwrap_or("-"));
            println!("  {} {}", "Segment:".bold(), info["segment"].as_str().unwrap_or("-"));
            println!(
                "  {} {}",
                "Availability:".bold(),
                info["availability"].as_str().unwrap_or("-")
            );
            println!(
                "  {} {} from {}",
                "Numbering:".bold(),
                info["prefix"].as_str().unwrap_or("-"),
                info["offset"]
            );
            println!("  {} {}", "Priority:".bold(), info["priority_eligible"]);
            println!("  {} {}", "Table mode:".bold(), info["table_mode"]);

            if let Some(services) = info["services"].as_array().filter(|s| !s.is_empty()) {
                println!();
                println!("  {}", "Services:".bold());
                for service in services {
                    println!(
                        "    {} {}",
                        service["id"].as_str().unwrap_or("-"),
                        service["name"].as_str().unwrap_or("-").dimmed()
                    );
                }
            }
        }

        Commands::Issue {
            unit,
            service,
            priority,
            priority_kind,
            group_size,
            name,
            contact,
        } => {
            let params = json!({
                "unit_id": unit,
                "service": service,
                "priority": priority,
                "priority_kind": priority_kind,
                "group_size": group_size,
                "requester_name": name,
                "requester_contact": contact,
            });

            let result = call_rpc(&cli.rpc_url, "queue.issue.v1", params).await?;

            println!(
                "{}",
                format!(
                    "✓ Ticket {} issued (position {})",
                    result["ticket"]["visible_number"].as_str().unwrap_or("-"),
                    result["position"]
                )
                .green()
                .bold()
            );
            println!();
            print_ticket(&result["ticket"]);
        }

        Commands::List { unit } => {
            let result = call_rpc(&cli.rpc_url, "queue.list.v1", json!({ "unit_id": unit })).await?;

            let rows: Vec<TicketRow> = result["tickets"]
                .as_array()
                .map(|tickets| tickets.iter().map(TicketRow::from_json).collect())
                .unwrap_or_default();

            println!("{}", format!("Queue {}", unit).cyan().bold());
            println!();
            if rows.is_empty() {
                println!("{}", "No tickets".yellow());
            } else {
                println!("{}", Table::new(rows));
            }

            let summary = &result["summary"];
            println!();
            println!(
                "  {} {}  {} {}  {} {}  {} {}",
                "Total:".bold(),
                summary["total"],
                "Active:".bold(),
                summary["active"],
                "Served:".bold(),
                summary["served"],
                "Absent:".bold(),
                summary["absent"]
            );

            if let Some(calls) = result["recent_calls"].as_array().filter(|c| !c.is_empty()) {
                println!();
                println!("  {}", "Recent calls:".bold());
                for call in calls {
                    println!(
                        "    {} {} {}",
                        call["time_of_day"].as_str().unwrap_or("--:--").dimmed(),
                        call["visible_number"].as_str().unwrap_or("-"),
                        call["resource"].as_str().unwrap_or("")
                    );
                }
            }
        }

        Commands::CallNext { unit } => {
            let result =
                call_rpc(&cli.rpc_url, "queue.call_next.v1", json!({ "unit_id": unit })).await?;

            if result["outcome"] == "called" {
                println!(
                    "{}",
                    format!(
                        "✓ Calling {}",
                        result["ticket"]["visible_number"].as_str().unwrap_or("-")
                    )
                    .green()
                    .bold()
                );
                println!();
                print_ticket(&result["ticket"]);
            } else {
                println!("{}", "No waiting tickets".yellow());
            }
        }

        Commands::Ticket { unit, id, action } => {
            let params = json!({
                "unit_id": unit,
                "ticket_id": id,
                "action": action,
            });

            let result = call_rpc(&cli.rpc_url, "ticket.transition.v1", params).await?;

            println!(
                "{}",
                format!("✓ Ticket {} updated", id).green().bold()
            );
            println!();
            print_ticket(&result["ticket"]);
        }

        Commands::Tables { command } => match command {
            TableCommands::List { unit } => {
                let result =
                    call_rpc(&cli.rpc_url, "tables.list.v1", json!({ "unit_id": unit })).await?;

                let rows: Vec<TableRow> = result["tables"]
                    .as_array()
                    .map(|tables| tables.iter().map(TableRow::from_json).collect())
                    .unwrap_or_default();

                if rows.is_empty() {
                    println!("{}", "No free tables".yellow());
                } else {
                    println!("{}", Table::new(rows));
                }
            }

            TableCommands::Register { unit, seats, note } => {
                let params = json!({
                    "unit_id": unit,
                    "seats": seats,
                    "note": note,
                });

                let result = call_rpc(&cli.rpc_url, "tables.register.v1", params).await?;

                println!("{}", "✓ Table registered".green().bold());
                println!();
                println!("{}", Table::new(vec![TableRow::from_json(&result["table"])]));
            }

            TableCommands::Assign {
                unit,
                table,
                ticket,
            } => {
                let params = json!({
                    "unit_id": unit,
                    "table_id": table,
                    "ticket_id": ticket,
                });

                let result = call_rpc(&cli.rpc_url, "tables.assign.v1", params).await?;

                println!(
                    "{}",
                    format!(
                        "✓ Ticket {} seated at {}",
                        result["ticket"]["visible_number"].as_str().unwrap_or("-"),
                        result["ticket"]["assigned_resource"].as_str().unwrap_or("-")
                    )
                    .green()
                    .bold()
                );
            }
        },
    }

    Ok(())
}
