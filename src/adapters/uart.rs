//! UART link to the vision host (ESP-IDF only).
//!
//! The driver is split: the RX half moves into a small reader thread that
//! only stages bytes into the SPSC queue, the TX half becomes the
//! [`TxSink`] of the control loop's [`QueuedLink`](crate::link::QueuedLink).
//!
//! ```text
//!  UART RX ──▶ rx-pump thread ──stage()──▶ RxQueue ──▶ control loop
//!  UART TX ◀──────────────── UartTx ◀─────────────────── StatusReporter
//! ```

use esp_idf_svc::hal::delay::BLOCK;
use esp_idf_svc::hal::uart::{UartRxDriver, UartTxDriver};
use log::{info, warn};

use crate::error::CommsError;
use crate::link::{RxStager, TxSink};

const RX_CHUNK: usize = 16;
const RX_PUMP_STACK: usize = 4096;

/// Outbound half of the UART.
pub struct UartTx<'d> {
    driver: UartTxDriver<'d>,
}

impl<'d> UartTx<'d> {
    pub fn new(driver: UartTxDriver<'d>) -> Self {
        Self { driver }
    }
}

impl TxSink for UartTx<'_> {
    fn write_all(&mut self, mut data: &[u8]) -> Result<(), CommsError> {
        while !data.is_empty() {
            match self.driver.write(data) {
                Ok(0) => return Err(CommsError::TxFailed),
                Ok(n) => data = &data[n..],
                Err(e) => {
                    warn!("uart write failed: {e}");
                    return Err(CommsError::TxFailed);
                }
            }
        }
        Ok(())
    }
}

/// Spawn the reader thread.  It blocks on the UART and stages every byte;
/// a full queue drops bytes (counted by the stager).
pub fn spawn_rx_pump(
    mut rx: UartRxDriver<'static>,
    mut stager: RxStager<'static>,
) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("uart-rx".into())
        .stack_size(RX_PUMP_STACK)
        .spawn(move || {
            info!("uart-rx: running");
            let mut buf = [0u8; RX_CHUNK];
            loop {
                match rx.read(&mut buf, BLOCK) {
                    Ok(n) => {
                        stager.stage_all(&buf[..n]);
                    }
                    Err(e) => warn!("uart read failed: {e}"),
                }
            }
        })
}
