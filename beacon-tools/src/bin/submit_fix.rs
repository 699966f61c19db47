use beacon_net::geo::Location;
use beacon_tools::client::{parse_key, BeaconClient};
use std::{env, error::Error, process};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 5 {
        eprintln!("Usage: {} SERVER KEY LATITUDE LONGITUDE", args[0]);
        process::exit(2);
    }

    let key = parse_key(&args[2])?;
    let location = Location::new(args[3].parse()?, args[4].parse()?);

    let client = BeaconClient::connect(&args[1], key)?;
    client.send_fix(location)?;

    println!(
        "Sent fix ({}, {}) to {}",
        location.latitude,
        location.longitude,
        client.server()
    );

    Ok(())
}
