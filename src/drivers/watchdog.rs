//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the control loop
//! stalls for longer than `watchdog_timeout_ms`.  The loop calls
//! [`Watchdog::feed`] once per iteration; the longest bounded ranging wait
//! is far below the timeout (checked by `SystemConfig::validate`).

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::config::SystemConfig;

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(feature = "espidf")]
    subscribed: bool,
    feeds: u64,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new(config: &SystemConfig) -> Self {
        let timeout_ms = config.watchdog_timeout_ms;

        #[cfg(feature = "espidf")]
        {
            // SAFETY: plain FFI calls on the current task; the config
            // struct outlives the reconfigure call.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK {
                    log::warn!("TWDT reconfigure returned {ret} (may already be configured)");
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK;
                if subscribed {
                    info!("Watchdog: subscribed ({timeout_ms} ms, panic on trigger)");
                } else {
                    log::warn!("Watchdog: failed to subscribe ({ret})");
                }

                Self {
                    timeout_ms,
                    subscribed,
                    feeds: 0,
                }
            }
        }

        #[cfg(not(feature = "espidf"))]
        {
            info!("Watchdog(sim): {timeout_ms} ms, no-op");
            Self {
                timeout_ms,
                feeds: 0,
            }
        }
    }

    /// Feed the watchdog.  Must be called at least once per timeout.
    pub fn feed(&mut self) {
        self.feeds = self.feeds.wrapping_add(1);

        #[cfg(feature = "espidf")]
        if self.subscribed {
            // SAFETY: resets the TWDT entry of the calling task only.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}
