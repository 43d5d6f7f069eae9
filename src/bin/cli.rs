//! partdb CLI Client
//!
//! Command-line interface for interacting with a partdb server.

use clap::{Parser, Subcommand};
use partdb::{FieldUpdate, PartsClient, RobotPart};
use serde::Serialize;

/// partdb CLI
#[derive(Parser, Debug)]
#[command(name = "partdb-cli")]
#[command(about = "CLI for the partdb robot parts catalog")]
struct Args {
    /// Server URL
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new part
    Add {
        name: String,
        serial_number: String,
        manufacturer: String,
        weight: i32,

        /// Serial numbers of compatible parts
        compatibilities: Vec<String>,
    },

    /// Read a part by serial number
    Read { serial_number: String },

    /// Update one field of a part
    Update {
        serial_number: String,

        /// name, serialNumber, manufacturer, weight or compatibilities
        field: String,

        /// New value; JSON for weight and compatibilities (e.g. 600, '["1","2"]')
        value: String,
    },

    /// Delete a part
    Delete { serial_number: String },

    /// List every part
    ListAll,

    /// List parts compatible with a part
    ListCompatible { serial_number: String, number: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = PartsClient::new(args.server);

    match args.command {
        Commands::Add {
            name,
            serial_number,
            manufacturer,
            weight,
            compatibilities,
        } => {
            let part = RobotPart::new(name, serial_number, manufacturer, weight, compatibilities);
            client.add(&part).await?;
            println!("OK");
        }
        Commands::Read { serial_number } => {
            print_json(&client.read(&serial_number).await?)?;
        }
        Commands::Update {
            serial_number,
            field,
            value,
        } => {
            let update = FieldUpdate::from_field(&field, parse_value(&field, value))?;
            client.update(&serial_number, &update).await?;
            println!("OK");
        }
        Commands::Delete { serial_number } => {
            client.delete(&serial_number).await?;
            println!("OK");
        }
        Commands::ListAll => {
            print_json(&client.list_all().await?)?;
        }
        Commands::ListCompatible {
            serial_number,
            number,
        } => {
            print_json(&client.list_compatible(&serial_number, number).await?)?;
        }
    }

    Ok(())
}

/// String fields take the argument verbatim; the rest parse it as JSON
fn parse_value(field: &str, raw: String) -> serde_json::Value {
    match field {
        FieldUpdate::WEIGHT | FieldUpdate::COMPATIBILITIES => {
            serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
        }
        _ => serde_json::Value::String(raw),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
