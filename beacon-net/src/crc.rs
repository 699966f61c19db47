//! CRC-16/CCITT with a zero seed (the "XModem" variant).
//!
//! The register starts at 0x0000, not CCITT's usual 0xFFFF. Devices in the
//! field compute exactly this, so the seed must not change.

const POLYNOMIAL: u16 = 0x1021;

static CRC16_TABLE: [u16; 256] = generate_table();

const fn generate_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut j = 0;

        while j < 8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Feeds `data` into a running CRC register.
#[inline]
pub fn update(mut crc: u16, data: &[u8]) -> u16 {
    for &octet in data {
        crc = (crc << 8) ^ CRC16_TABLE[((crc >> 8) as u8 ^ octet) as usize];
    }

    crc
}

#[inline]
pub fn crc16(data: &[u8]) -> u16 {
    update(0, data)
}
