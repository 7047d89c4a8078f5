//! CRC32 checksum for decompressed payloads
//!
//! Reflected CRC-32 (polynomial 0xEDB88320), the checksum containers store
//! next to compressed resources. The codec never verifies it itself; callers
//! compare the digest of the decompressed buffer against their stored value.

/// CRC32 lookup table (polynomial 0xEDB88320)
pub const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB88320;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

const CRC32_INIT: u32 = 0xFFFFFFFF;

/// Running CRC32 accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32 {
    acc: u32,
}

impl Crc32 {
    /// Create an accumulator in its initial state
    pub fn new() -> Self {
        Self { acc: CRC32_INIT }
    }

    /// Reset the accumulator
    pub fn init(&mut self) {
        self.acc = CRC32_INIT;
    }

    /// Feed bytes into the checksum
    pub fn update(&mut self, bytes: &[u8]) {
        let mut acc = self.acc;
        for &byte in bytes {
            acc = CRC32_TABLE[((acc ^ byte as u32) & 0xFF) as usize] ^ (acc >> 8);
        }
        self.acc = acc;
    }

    /// Finalized checksum; does not consume or alter the accumulator
    pub fn digest(&self) -> u32 {
        self.acc ^ CRC32_INIT
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl std::io::Write for Crc32 {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Calculate the CRC32 of a byte slice
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.digest()
}
