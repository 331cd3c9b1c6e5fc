//! LT8722 Rust Driver
//!
//! Platform-agnostic driver for the Analog Devices LT8722 full-bridge DC/DC
//! converter (as found on the DC3145A evaluation board). The device is
//! controlled over a full-duplex SPI link with CRC-8 protected frames; this
//! crate builds those frames, validates the acknowledge byte and CRC of every
//! transaction, performs read-modify-write bitfield updates, converts between
//! engineering units and raw register codes and sequences timed voltage ramps.
//!
//! Blocking API by default; an async mirror is available behind the `async`
//! feature. `defmt` formatting for public types behind the `defmt` feature.

#![no_std]

pub mod crc;
pub mod data_types;
pub mod driver;
pub mod error;
pub mod frame;
pub mod registers;

pub use data_types::TransactionResult;
pub use driver::{AnalogInput, Lt8722};
pub use error::Error;
pub use registers::{CommandField, Register};
