//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART console on the target, stderr on the host).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(s) => {
                info!(
                    "STATUS | mode={:?} | fan={:?} | presence={} | echo={}us ({}) | \
                     grace={} | run={}",
                    s.mode,
                    s.fan,
                    s.presence,
                    s.echo_us,
                    s.distance_cm
                        .map_or_else(|| "--".into(), |cm| format!("{cm}cm")),
                    s.grace_ticks,
                    s.run_ticks,
                );
            }
            AppEvent::FanChanged { state, cause } => {
                info!("FAN | {:?} ({:?})", state, cause);
            }
            AppEvent::ModeChanged(mode) => {
                info!("MODE | {:?}", mode);
            }
            AppEvent::PresenceChanged(present) => {
                info!("PRESENCE | {}", if *present { "detected" } else { "lost" });
            }
            AppEvent::Started => {
                info!("START | AUTO, fan off");
            }
        }
    }
}
