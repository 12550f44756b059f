//! Bluetooth Low Energy broadcast path.
//!
//! The beacon runs in **Broadcaster** role only: no GATT server, no
//! connections.  Everything it has to say travels in one
//! manufacturer-specific AD structure:
//!
//! 1. **Payload** - the fixed 26-byte frame and the encoder that mutates
//!    its telemetry/input offsets in place.
//! 2. **Publisher** - pushes the frame to the radio stack and refreshes
//!    non-connectable advertising.

pub mod payload;
pub mod publisher;
