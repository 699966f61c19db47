//! Append-only fix storage.
//!
//! Each fix becomes one tab separated line holding the same columns the
//! `fixes` table uses: key, client host, WKT location. Direction, speed and
//! altitude follow. Missing values are written as `\N`.

use crate::{client::Client, handler::Handler};
use beacon_net::{geo::Location, packets::Fix};
use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, BufWriter, Write},
    net::IpAddr,
    path::Path,
};
use tracing::{debug, error};

#[derive(Clone, Debug, PartialEq)]
pub struct FixRecord {
    pub key: u64,
    /// The sender's host; the port is not kept.
    pub client_address: IpAddr,
    pub location: Option<String>,
    pub direction: Option<u16>,
    pub speed: Option<u16>,
    pub altitude: Option<i16>,
}

impl FixRecord {
    pub fn new(client: &Client, fix: &Fix) -> Self {
        Self {
            key: client.key,
            client_address: client.address.ip(),
            location: fix.location.map(wkt_point),
            direction: fix.direction,
            speed: fix.speed,
            altitude: fix.altitude,
        }
    }
}

/// Formats a location as WKT. Note the axis order: longitude comes first.
///
/// Coordinates use the shortest form that reads back to the same value, so
/// whole degrees print without a fraction.
pub fn wkt_point(location: Location) -> String {
    format!("POINT({} {})", location.longitude, location.latitude)
}

struct Column<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Column<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("\\N"),
        }
    }
}

impl fmt::Display for FixRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.key,
            self.client_address,
            Column(&self.location),
            Column(&self.direction),
            Column(&self.speed),
            Column(&self.altitude)
        )
    }
}

pub struct Journal<W: Write> {
    writer: W,
}

impl Journal<BufWriter<File>> {
    /// Opens `path` for appending, creating it if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;

        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> Journal<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one line and flushes it.
    pub fn append(&mut self, record: &FixRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", record)?;
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Handler for Journal<W> {
    fn on_fix(&mut self, client: &Client, fix: &Fix) {
        let record = FixRecord::new(client, fix);
        debug!(%record, "Storing fix");

        // A lost record must not take the receiver down with it
        if let Err(error) = self.append(&record) {
            error!(%error, key = record.key, "Failed to store fix");
        }
    }
}
