use beacon_tools::{
    client::{parse_key, BeaconClient},
    track,
};
use std::{env, error::Error, fs, process, thread, time::Duration};

const INTERVAL: Duration = Duration::from_millis(200);

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: {} SERVER KEY TRACK_FILE", args[0]);
        process::exit(2);
    }

    let key = parse_key(&args[2])?;
    let client = BeaconClient::connect(&args[1], key)?;
    let track = track::parse(&fs::read_to_string(&args[3])?)?;

    for (i, location) in track.iter().enumerate() {
        if i > 0 {
            thread::sleep(INTERVAL);
        }
        client.send_fix(*location)?;
        println!("{}/{} {} {}", i + 1, track.len(), location.latitude, location.longitude);
    }

    Ok(())
}
