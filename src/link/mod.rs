//! Serial link plumbing.
//!
//! Inbound bytes arrive asynchronously (UART reader task on the target, a
//! test harness on the host) and are only ever **staged** into a bounded
//! SPSC queue.  The control loop drains that queue through the
//! [`ByteLink`](crate::app::ports::ByteLink) port, so command decoding
//! always runs on the loop's own context.

pub mod queued;
pub mod rx_queue;

pub use queued::{QueuedLink, TxSink};
pub use rx_queue::{RX_QUEUE_CAPACITY, RxConsumer, RxQueue, RxStager, split};
