//! Function-pointer finite state machine engine.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  StateTable                                   │
//! │  ┌─────────┬───────────┬───────────────────┐  │
//! │  │ StateId │ on_enter  │ on_update         │  │
//! │  ├─────────┼───────────┼───────────────────┤  │
//! │  │ FanOff  │ fn(ctx)   │ fn(ctx)->Option<> │  │
//! │  │ FanOn   │ fn(ctx)   │ fn(ctx)->Option<> │  │
//! │  └─────────┴───────────┴───────────────────┘  │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine moves the current pointer
//! and runs `on_enter` for the next state.  All functions receive `&mut FusionContext`.
//!
//! The operating mode is not a state here: it is a context field the
//! handlers consult, so a mode switch never moves the fan by itself.

pub mod context;
pub mod controller;
pub mod states;

use context::{FanState, FusionContext};
use log::info;

pub use controller::{ControlOutcome, FanTransition, FusionController};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all fan states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    FanOff = 0,
    FanOn = 1,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 2;

    /// Convert an index back to `StateId`.  Out-of-range indices assert in
    /// debug builds and fall back to `FanOff` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::FanOff,
            1 => Self::FanOn,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::FanOff
            }
        }
    }
}

impl From<StateId> for FanState {
    fn from(id: StateId) -> Self {
        match id {
            StateId::FanOff => FanState::Off,
            StateId::FanOn => FanState::On,
        }
    }
}

impl From<FanState> for StateId {
    fn from(state: FanState) -> Self {
        match state {
            FanState::Off => StateId::FanOff,
            FanState::On => StateId::FanOn,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` actions.
pub type StateActionFn = fn(&mut FusionContext);

/// Per-tick update handler.  `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut FusionContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FusionContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    pub fn tick(&mut self, ctx: &mut FusionContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition, bypassing `on_update`.  A request
    /// for the current state is a no-op.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut FusionContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    fn transition(&mut self, next_id: StateId, ctx: &mut FusionContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
