// =============================================================================
// Session & Liquidity Model
// =============================================================================
//
// Everything here that depends on time takes the time as an argument; the
// only ambient clock read lives behind the `Clock` trait.

pub mod asian_range;
pub mod clock;
pub mod liquidity_sweep;
pub mod profile;
pub mod volume;

pub use asian_range::{detect_asian_range, AsianRange};
pub use clock::{Clock, FixedClock, SystemClock};
pub use liquidity_sweep::{detect_liquidity_sweep, LiquiditySweep, SweepKind};
pub use profile::{SessionInfo, SessionProfile};
pub use volume::{session_volume, VolumeContext, VolumeGrade, VolumeProfile};
