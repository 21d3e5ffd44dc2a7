use anyhow::{bail, Context, Result};
use std::env;

// Use library instead of local modules
use parking_ledger::{
    init_tracing, FeeCalculator, LedgerConfig, NewVehicle, ParkOutcome, ParkRequest, ParkingLedger,
    ParkingMap, SqliteStore, UnparkOutcome,
};

const USAGE: &str = "usage: parking-ledger <command>

commands:
  map <file.json>       set the parking map (resets all vehicles)
  park <name> <size>    park a new vehicle (size 0, 1 or 2)
  repark <id>           park a previously unparked vehicle again
  unpark <id>           unpark a vehicle and print its receipt
  show                  print occupancy and vehicles";

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let config = LedgerConfig::from_env()?;

    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("Failed to open database {:?}", config.db_path))?;
    let mut ledger = ParkingLedger::new(store, FeeCalculator::new(config.fee_schedule()?));

    match args.get(1).map(String::as_str) {
        Some("map") => run_set_map(&mut ledger, arg(&args, 2, "file.json")?),
        Some("park") => {
            let name = arg(&args, 2, "name")?;
            let size: u8 = arg(&args, 3, "size")?
                .parse()
                .context("size must be 0, 1 or 2")?;
            run_park(&mut ledger, ParkRequest::New(NewVehicle::new(name, size)))
        }
        Some("repark") => run_park(&mut ledger, ParkRequest::Existing(parse_id(&args)?)),
        Some("unpark") => run_unpark(&mut ledger, parse_id(&args)?),
        Some("show") | None => run_show(&ledger),
        Some(other) => {
            eprintln!("unknown command: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
    }
}

fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    match args.get(index) {
        Some(value) => Ok(value),
        None => bail!("missing <{}>\n\n{}", name, USAGE),
    }
}

fn parse_id(args: &[String]) -> Result<u64> {
    arg(args, 2, "id")?
        .parse()
        .context("vehicle id must be a non-negative integer")
}

fn run_set_map(ledger: &mut ParkingLedger<SqliteStore>, path: &str) -> Result<()> {
    let map = ParkingMap::from_file(path)?;
    let map = ledger.set_map(map)?;

    println!("✓ Map set: {} entrances, {} slots", map.entrances().len(), map.iter().count());
    println!("✓ Vehicle registry reset");
    Ok(())
}

fn run_park(ledger: &mut ParkingLedger<SqliteStore>, request: ParkRequest) -> Result<()> {
    match ledger.park(request)? {
        ParkOutcome::Parked { vehicle, .. } => {
            let coord = vehicle
                .parked_at
                .context("parked vehicle has no slot")?;
            println!(
                "🚗 #{} {} parked at entrance {} slot {}",
                vehicle.id, vehicle.name, coord.entrance, coord.slot
            );
        }
        ParkOutcome::AlreadyParked(vehicle) => {
            println!("ℹ️  #{} {} is already parked", vehicle.id, vehicle.name);
        }
    }
    Ok(())
}

fn run_unpark(ledger: &mut ParkingLedger<SqliteStore>, id: u64) -> Result<()> {
    match ledger.unpark(id)? {
        UnparkOutcome::Unparked(receipt) => {
            println!("🧾 Receipt");
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("Vehicle:  #{} {}", receipt.vehicle.id, receipt.vehicle.name);
            println!("Size:     {}", receipt.vehicle.size.as_str());
            println!("Parked:   {}", receipt.vehicle.park_time.to_rfc3339());
            if let Some(unparked) = receipt.vehicle.unpark_time {
                println!("Unparked: {}", unparked.to_rfc3339());
            }
            println!("Units:    {}", receipt.elapsed_units);
            println!("Fee:      {}", receipt.fee);
        }
        UnparkOutcome::AlreadyUnparked(vehicle) => {
            println!("ℹ️  #{} {} is already unparked", vehicle.id, vehicle.name);
        }
    }
    Ok(())
}

fn run_show(ledger: &ParkingLedger<SqliteStore>) -> Result<()> {
    let map = ledger.map()?;
    let vehicles = ledger.vehicles()?;

    println!("🅿️  Occupancy");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for entrance in map.occupancy() {
        println!(
            "Entrance {}: {}/{} free",
            entrance.entrance, entrance.free, entrance.total
        );
    }

    println!("\n🚗 Vehicles ({})", vehicles.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for vehicle in &vehicles {
        match vehicle.parked_at {
            Some(coord) => println!(
                "#{:<4} {:<20} {:<8} {} at {}",
                vehicle.id,
                vehicle.name,
                vehicle.size.as_str(),
                vehicle.status.as_str(),
                coord
            ),
            None => println!(
                "#{:<4} {:<20} {:<8} {}",
                vehicle.id,
                vehicle.name,
                vehicle.size.as_str(),
                vehicle.status.as_str()
            ),
        }
    }

    Ok(())
}
