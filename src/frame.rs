//! Frame codec for the LT8722 SPI protocol.
//!
//! Every transaction is one chip-select-framed, full-duplex exchange: each
//! byte position simultaneously sends one prescribed byte and captures one
//! byte from the device. The device's shift register runs one position behind
//! the controller's, which is why the captured payload of the 8-byte frames
//! is offset from the outgoing positions. This module only places outgoing
//! bytes and labels captured ones; validation is the accessor's job.

use crate::crc::crc8;
use crate::data_types::TransactionResult;

/// Status acquisition command.
pub const OP_STATUS_READ: u8 = 0xF0;
/// Data write command.
pub const OP_DATA_WRITE: u8 = 0xF2;
/// Data read command.
pub const OP_DATA_READ: u8 = 0xF4;

/// Length of a status-read frame.
pub const STATUS_FRAME_LEN: usize = 4;
/// Length of a register read/write frame.
pub const DATA_FRAME_LEN: usize = 8;

/// Second header byte: the 7-bit register address shifted into bits [7:1].
pub const fn addr_byte(addr: u8) -> u8 {
    (addr << 1) & 0xFE
}

/// Outgoing bytes of a status-read frame: header (opcode + status register
/// address), header CRC, one turnaround byte for the acknowledge.
pub fn status_read_frame() -> [u8; STATUS_FRAME_LEN] {
    let mut frame = [0u8; STATUS_FRAME_LEN];
    frame[0] = OP_STATUS_READ;
    frame[1] = addr_byte(0x01);
    frame[2] = crc8(&frame[..2]);
    frame
}

/// Outgoing bytes of a register-read frame: header, header CRC, then five
/// turnaround bytes clocking out the data, device CRC and acknowledge.
pub fn register_read_frame(addr: u8) -> [u8; DATA_FRAME_LEN] {
    let mut frame = [0u8; DATA_FRAME_LEN];
    frame[0] = OP_DATA_READ;
    frame[1] = addr_byte(addr);
    frame[2] = crc8(&frame[..2]);
    frame
}

/// Outgoing bytes of a register-write frame: header, four data bytes
/// (most-significant first), CRC over header and data, one turnaround byte.
pub fn register_write_frame(addr: u8, data: [u8; 4]) -> [u8; DATA_FRAME_LEN] {
    let mut frame = [0u8; DATA_FRAME_LEN];
    frame[0] = OP_DATA_WRITE;
    frame[1] = addr_byte(addr);
    frame[2..6].copy_from_slice(&data);
    frame[6] = crc8(&frame[..6]);
    frame
}

/// Label the captured bytes of a status-read frame: status word, device CRC
/// (over the status word), acknowledge. The frame carries no data payload.
pub fn capture_status_frame(buf: &[u8; STATUS_FRAME_LEN]) -> TransactionResult {
    TransactionResult {
        status: [buf[0], buf[1]],
        data: [0; 4],
        crc: buf[2],
        ack: buf[3],
    }
}

/// Label the captured bytes of a register-read frame: status word, four data
/// bytes, device CRC (over status and data), acknowledge.
pub fn capture_read_frame(buf: &[u8; DATA_FRAME_LEN]) -> TransactionResult {
    TransactionResult {
        status: [buf[0], buf[1]],
        data: [buf[2], buf[3], buf[4], buf[5]],
        crc: buf[6],
        ack: buf[7],
    }
}

/// Label the captured bytes of a register-write frame. The device emits its
/// CRC (over the status word only) at position 2, before the pipelined
/// response bytes at positions 3-6.
pub fn capture_write_frame(buf: &[u8; DATA_FRAME_LEN]) -> TransactionResult {
    TransactionResult {
        status: [buf[0], buf[1]],
        data: [buf[3], buf[4], buf[5], buf[6]],
        crc: buf[2],
        ack: buf[7],
    }
}

/// Byte span the device signs with its response CRC.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CrcSpan {
    /// The two status bytes (status-read and register-write responses).
    Status,
    /// Status bytes followed by the four data bytes (register-read response).
    StatusAndData,
}

/// Recompute the CRC the device should have sent for `result` over `span`.
pub fn response_crc(result: &TransactionResult, span: CrcSpan) -> u8 {
    match span {
        CrcSpan::Status => crc8(&result.status),
        CrcSpan::StatusAndData => {
            let mut bytes = [0u8; 6];
            bytes[..2].copy_from_slice(&result.status);
            bytes[2..].copy_from_slice(&result.data);
            crc8(&bytes)
        }
    }
}
