//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                 | Connects to               |
//! |------------|----------------------------|---------------------------|
//! | `hardware` | SensorPort, ActuatorPort   | HC-SR04 ranger, L293D fan |
//! | `log_sink` | EventSink                  | Serial log output         |
//! | `time`     | FreeRunningCounter         | ESP32 system timer        |
//! | `uart`     | TxSink (+ RX staging task) | UART to the vision host   |

pub mod hardware;
pub mod log_sink;
pub mod time;
#[cfg(feature = "espidf")]
pub mod uart;
