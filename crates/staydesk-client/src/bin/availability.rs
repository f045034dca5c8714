//! # Availability Viewer
//!
//! Prints a room's month occupancy and a sample quote against a running
//! booking service.
//!
//! ## Usage
//! ```bash
//! # Current month
//! cargo run -p staydesk-client --bin availability -- room-204
//!
//! # A specific month, with an inter-state quote
//! cargo run -p staydesk-client --bin availability -- room-204 2026-11 --gst withIGST
//!
//! # Point at another service
//! STAYDESK_API_URL=https://api.example-hotel.in/v1 cargo run -p staydesk-client --bin availability -- room-204
//! ```

use std::env;
use std::sync::Arc;

use chrono::{Datelike, Local};
use tracing_subscriber::EnvFilter;

use staydesk_client::{AvailabilityStore, ClientConfig, HttpBackend};
use staydesk_core::{try_compute_price, GstOption, Money};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,staydesk=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

struct Args {
    room_id: String,
    year: i32,
    month: u32,
    gst_option: GstOption,
    rate: Option<Money>,
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let room_id = args
        .next()
        .ok_or("usage: availability <room_id> [YYYY-MM] [--gst OPTION] [--rate AMOUNT]")?;

    let today = Local::now().date_naive();
    let mut parsed = Args {
        room_id,
        year: today.year(),
        month: today.month(),
        gst_option: GstOption::default(),
        rate: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--gst" => {
                let value = args.next().ok_or("--gst needs a value")?;
                parsed.gst_option = value.parse()?;
            }
            "--rate" => {
                let value = args.next().ok_or("--rate needs an amount")?;
                parsed.rate = Some(Money::parse_decimal(&value)?);
            }
            month => {
                let (y, m) = month.split_once('-').ok_or("month must be YYYY-MM")?;
                parsed.year = y.parse()?;
                parsed.month = m.parse()?;
            }
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = parse_args()?;
    let config = ClientConfig::load(None)?;
    let backend = Arc::new(HttpBackend::new(&config)?);
    let store = AvailabilityStore::from_config(backend, &config);

    let report = store
        .fetch_month_report(&args.room_id, args.year, args.month)
        .await?;

    println!(
        "Room {} - {:04}-{:02} ({} days)",
        args.room_id,
        args.year,
        args.month,
        report.occupancy.len()
    );
    println!("{}", "-".repeat(60));

    let today = Local::now().date_naive();
    for day in report.occupancy.values() {
        let marker = if report.failed.contains_key(&day.date) {
            "?"
        } else if day.is_fully_booked() {
            "FULL"
        } else if !day.is_selectable(today) {
            "past"
        } else if day.has_bookings() {
            "partial"
        } else {
            "free"
        };
        let hours: Vec<String> = day.booked_hours().iter().map(|h| h.to_string()).collect();
        println!("{}  {:<8} {}", day.date, marker, hours.join(","));
    }

    if !report.is_complete() {
        println!(
            "\n{} day(s) could not be read and are shown as free.",
            report.failed.len()
        );
    }

    if let Some(rate) = args.rate {
        let price = try_compute_price(rate, 1, args.gst_option)?;
        println!("\nOne night at {} ({}):", rate, args.gst_option);
        println!("  base   {}", price.base_amount);
        println!("  cgst   {}", price.cgst());
        println!("  sgst   {}", price.sgst());
        println!("  igst   {}", price.igst());
        println!("  gst %  {}", price.gst_percent());
        println!("  total  {}", price.total_amount);
    }

    Ok(())
}
