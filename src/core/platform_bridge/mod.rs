//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges platform layer (winit) with the core frame loop.
//
// This module defines the contract between platform implementations and
// core logic, enabling platform backends to be swapped without changing
// core code.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side event collection and frame coalescing
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::{EventCollector, TickControl};
pub(crate) use interface::PlatformEvent;
pub use interface::PlatformError;
