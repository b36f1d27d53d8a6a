//! Mole scheduling core: slot choice, pacing, the timed task queue and the
//! round controller that ties them together. Free of any browser API so it
//! runs (and is tested) on the host.

pub mod delay;
pub mod queue;
pub mod round;
pub mod selector;

pub use delay::compute_delay;
pub use round::{Activation, EndReason, Phase, Round, SchedulerState, ScoreDelta, Signal};
pub use selector::{Slot, SlotSelector};
