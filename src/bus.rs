//! Register framing over a shared SPI bus.
//!
//! Both converter chips hang off one bus behind their own chip selects; each
//! decode engine owns an [`SpiDevice`] whose implementation supplies the
//! CS bracket, bus arbitration, and the per-chip clock/mode (RTD converter:
//! 1 MHz mode 1, TC converter: 4 MHz mode 0). What this module adds is the
//! wire framing on top:
//!
//! - register addresses travel with the top bit forced low for reads and
//!   forced high for writes,
//! - multi-byte values are big-endian,
//! - the TC converter has no register map at all, just a 32-bit read-only
//!   frame.
//!
//! No retries and no checksums: a garbage transaction surfaces as the raw
//! bits received, and the chip protocols lean on sentinel values (all-ones
//! frame) instead of transport-level error signaling.

use embedded_hal::spi::SpiDevice;

/// Top bit low selects a register read.
const ADDR_READ_MASK: u8 = 0x7F;
/// Top bit high selects a register write.
const ADDR_WRITE_FLAG: u8 = 0x80;

/// Read one register byte.
pub(crate) fn read_byte<SPI: SpiDevice>(spi: &mut SPI, addr: u8) -> Result<u8, SPI::Error> {
    let mut buf = [addr & ADDR_READ_MASK, 0x00];
    spi.transfer_in_place(&mut buf)?;
    Ok(buf[1])
}

/// Read two consecutive registers as one big-endian word, MSB register first.
pub(crate) fn read_word<SPI: SpiDevice>(spi: &mut SPI, addr: u8) -> Result<u16, SPI::Error> {
    let mut buf = [addr & ADDR_READ_MASK, 0x00, 0x00];
    spi.transfer_in_place(&mut buf)?;
    Ok(u16::from_be_bytes([buf[1], buf[2]]))
}

/// Write one register byte.
pub(crate) fn write_byte<SPI: SpiDevice>(
    spi: &mut SPI,
    addr: u8,
    value: u8,
) -> Result<(), SPI::Error> {
    spi.write(&[addr | ADDR_WRITE_FLAG, value])
}

/// Read the TC converter's full 32-bit frame (no addressing, MSB first).
pub(crate) fn read_frame<SPI: SpiDevice>(spi: &mut SPI) -> Result<u32, SPI::Error> {
    let mut buf = [0u8; 4];
    spi.read(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}
