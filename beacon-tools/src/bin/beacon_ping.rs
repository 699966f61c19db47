use beacon_net::packets::FLAG_BAD_KEY;
use beacon_tools::client::{parse_key, BeaconClient};
use std::{
    env,
    error::Error,
    process,
    time::{Duration, Instant},
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} SERVER KEY", args[0]);
        process::exit(2);
    }

    let key = parse_key(&args[2])?;
    let client = BeaconClient::connect(&args[1], key)?;

    let started = Instant::now();
    let ack = client.ping(TIMEOUT)?;

    println!(
        "Ack {} from {} in {:?}",
        ack.id,
        client.server(),
        started.elapsed()
    );
    if ack.has_flag(FLAG_BAD_KEY) {
        println!("Server does not know key {:x}", key);
    }

    Ok(())
}
