//! Bounded single-producer / single-consumer byte queue.
//!
//! Built on `heapless::spsc::Queue`: the producer half is handed to
//! whatever receives bytes from the wire, the consumer half stays with the
//! control loop.  When the queue is full the new byte is dropped and an
//! overrun is counted.

use core::sync::atomic::{AtomicU32, Ordering};

use heapless::spsc::{Consumer, Producer, Queue};
use log::warn;

use crate::error::CommsError;

/// Backing array size.  `heapless` keeps one slot free, so the queue
/// holds `RX_QUEUE_CAPACITY - 1` bytes.
pub const RX_QUEUE_CAPACITY: usize = 64;

pub type RxQueue = Queue<u8, RX_QUEUE_CAPACITY>;

/// Producer half.  Never touches controller state.
pub struct RxStager<'a> {
    producer: Producer<'a, u8, RX_QUEUE_CAPACITY>,
    overruns: &'a AtomicU32,
}

/// Consumer half, owned by the control loop.
pub struct RxConsumer<'a> {
    consumer: Consumer<'a, u8, RX_QUEUE_CAPACITY>,
    overruns: &'a AtomicU32,
}

/// Split `queue` into its two halves sharing one overrun counter.
pub fn split<'a>(queue: &'a mut RxQueue, overruns: &'a AtomicU32) -> (RxStager<'a>, RxConsumer<'a>) {
    let (producer, consumer) = queue.split();
    (
        RxStager { producer, overruns },
        RxConsumer { consumer, overruns },
    )
}

impl RxStager<'_> {
    /// Stage one byte, dropping it if the queue is full.
    pub fn stage(&mut self, byte: u8) -> Result<(), CommsError> {
        self.producer.enqueue(byte).map_err(|_| {
            let total = self.overruns.fetch_add(1, Ordering::Relaxed).saturating_add(1);
            warn!("rx overrun: dropped 0x{byte:02x} ({total} total)");
            CommsError::RxOverrun
        })
    }

    /// Stage a run of bytes in order.  Returns how many were kept.
    pub fn stage_all(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|&&b| self.stage(b).is_ok()).count()
    }
}

impl RxConsumer<'_> {
    pub fn ready(&self) -> bool {
        self.consumer.ready()
    }

    pub fn dequeue(&mut self) -> Option<u8> {
        self.consumer.dequeue()
    }

    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.consumer.ready()
    }

    /// Bytes dropped since boot.
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}
