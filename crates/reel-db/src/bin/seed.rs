//! # Seed Data Generator
//!
//! Populates the database with a small catalogue and customer list for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./reel_dev.db with 3 copies of every title (default)
//! cargo run -p reel-db --bin seed
//!
//! # More copies per title
//! cargo run -p reel-db --bin seed -- --copies 10
//!
//! # Specify database path
//! cargo run -p reel-db --bin seed -- --db ./data/reel.db
//! ```

use chrono::NaiveDate;
use reel_core::{NewCustomer, NewVideo};
use reel_db::{Database, DbConfig};
use std::env;

/// (title, overview, release year, month, day)
const VIDEOS: &[(&str, &str, i32, u32, u32)] = &[
    ("Wonder Woman", "An Amazon princess leaves her island home.", 2017, 6, 2),
    ("Black Widow", "A spy confronts the darker parts of her ledger.", 2021, 7, 9),
    ("Blacksmith Of The Banished", "A smith forges a way home.", 1979, 1, 18),
    ("Robots Of Eternity", "Machines outlive the city that built them.", 1997, 2, 10),
    ("Harvest Of The Lake", "A fishing town waits out a long winter.", 2004, 9, 22),
    ("The Long Lunch", "Six coworkers, one table, no clock.", 2012, 3, 1),
    ("Midnight Ferry", "The last crossing of the night goes wrong.", 1988, 11, 3),
    ("Paper Kites", "Two sisters and a windy summer.", 2019, 5, 31),
];

/// (name, phone, postal code)
const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("Shelley Rocha", "(322) 510-8695", "24309"),
    ("Curran Stout", "(908) 949-6758", "94267"),
    ("Roanna Robinson", "(323) 336-1841", "15867"),
    ("Carolyn Chandler", "(234) 837-2886", "92683"),
    ("Aquila Riddle", "(933) 262-8964", "73251"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut copies: i64 = 3;
    let mut db_path = String::from("./reel_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--copies" | "-c" => {
                if i + 1 < args.len() {
                    copies = args[i + 1].parse().unwrap_or(3);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Reel Rentals Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --copies <N>   Copies of each title (default: 3)");
                println!("  -d, --db <PATH>    Database file path (default: ./reel_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Reel Rentals Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!("Copies per title: {}", copies);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.videos().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} videos", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Inserting videos...");
    for (title, overview, year, month, day) in VIDEOS {
        let Some(release_date) = NaiveDate::from_ymd_opt(*year, *month, *day) else {
            eprintln!("Skipping {}: bad release date", title);
            continue;
        };

        match db
            .videos()
            .insert(&NewVideo::new(*title, release_date, copies).overview(*overview))
            .await
        {
            Ok(video) => println!("  #{} {} ({})", video.id, video.title, video.formatted_release_date()),
            Err(e) => eprintln!("Failed to insert {}: {}", title, e),
        }
    }

    println!();
    println!("Inserting customers...");
    for (name, phone, postal_code) in CUSTOMERS {
        let mut customer = NewCustomer::named(*name);
        customer.phone = Some(phone.to_string());
        customer.postal_code = Some(postal_code.to_string());

        match db.customers().insert(&customer).await {
            Ok(customer) => println!("  #{} {}", customer.id, customer.name),
            Err(e) => eprintln!("Failed to insert {}: {}", name, e),
        }
    }

    println!();
    println!(
        "✓ Seed complete: {} videos, {} customers",
        db.videos().count().await?,
        db.customers().count().await?
    );

    db.close().await;
    Ok(())
}
