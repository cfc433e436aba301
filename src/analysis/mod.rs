/// Derived series for the dashboard.
///
/// Submodules:
/// - `buckets` — trailing 24-hour Kp series averaged into 3-hour blocks.

pub mod buckets;
