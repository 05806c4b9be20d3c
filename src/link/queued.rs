//! Queue-backed [`ByteLink`].
//!
//! Reads come from the staged RX queue; writes go straight to a
//! [`TxSink`] (UART driver on the target, an in-memory buffer in tests).

use crate::app::ports::ByteLink;
use crate::error::CommsError;

use super::rx_queue::RxConsumer;

/// Outbound byte channel.
pub trait TxSink {
    /// Write all of `data` or fail.
    fn write_all(&mut self, data: &[u8]) -> Result<(), CommsError>;
}

/// Discards every write.  Used when no host is attached.
pub struct NullSink;

impl TxSink for NullSink {
    fn write_all(&mut self, _data: &[u8]) -> Result<(), CommsError> {
        Ok(())
    }
}

/// Collects writes in memory.
impl TxSink for std::vec::Vec<u8> {
    fn write_all(&mut self, data: &[u8]) -> Result<(), CommsError> {
        self.extend_from_slice(data);
        Ok(())
    }
}

pub struct QueuedLink<'a, TX: TxSink> {
    rx: RxConsumer<'a>,
    tx: TX,
}

impl<'a, TX: TxSink> QueuedLink<'a, TX> {
    pub fn new(rx: RxConsumer<'a>, tx: TX) -> Self {
        Self { rx, tx }
    }

    pub fn rx(&self) -> &RxConsumer<'a> {
        &self.rx
    }

    pub fn tx(&self) -> &TX {
        &self.tx
    }
}

impl<TX: TxSink> ByteLink for QueuedLink<'_, TX> {
    fn available(&self) -> bool {
        self.rx.ready()
    }

    fn receive(&mut self) -> Result<u8, CommsError> {
        self.rx.dequeue().ok_or(CommsError::RxEmpty)
    }

    fn send(&mut self, byte: u8) -> Result<(), CommsError> {
        self.tx.write_all(&[byte])
    }

    fn send_all(&mut self, bytes: &[u8]) -> Result<(), CommsError> {
        self.tx.write_all(bytes)
    }
}
