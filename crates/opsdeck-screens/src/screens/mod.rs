// ── Screen controllers ──
//
// One module per dashboard screen. Each owns its Sources and must stop
// them on deactivation.

pub mod chaos;
pub mod dlq;
pub mod orders;
pub mod slo;
