//! Geomagnetic storm severity classification.
//!
//! Two independent mappings from Kp to NOAA's G-scale live here:
//!
//! - [`classify`] is the table used for the status blocks. It compares the
//!   value with exact equality at each integer step, so fractional values
//!   between 4 and 9 fall through to G5.
//! - [`g_level`] is the floor-based level attached to storm events.
//!
//! They agree on integers and are kept separate.

/// Severity tiers, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StormTier {
    Quiet,
    Minor,
    Moderate,
    Strong,
    Severe,
    Extreme,
}

impl StormTier {
    /// Marker shown in front of a level label.
    pub fn marker(self) -> &'static str {
        match self {
            StormTier::Quiet => "🟩",
            StormTier::Minor => "🟨",
            StormTier::Moderate => "🟧",
            StormTier::Strong | StormTier::Severe | StormTier::Extreme => "🔴",
        }
    }
}

/// Block colour: safe below Kp 5, alert at or above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockColor {
    Safe,
    Alert,
}

impl BlockColor {
    pub fn for_kp(kp: f64) -> Self {
        if kp < 5.0 { BlockColor::Safe } else { BlockColor::Alert }
    }

    pub fn hex(self) -> &'static str {
        match self {
            BlockColor::Safe => "#4CAF50",
            BlockColor::Alert => "#F44336",
        }
    }
}

/// Table classification of a Kp value into a G-scale label and tier.
#[allow(clippy::float_cmp)]
pub fn classify(kp: f64) -> (&'static str, StormTier) {
    if kp <= 4.0 {
        ("G0 (Quiet)", StormTier::Quiet)
    } else if kp == 5.0 {
        ("G1 (Minor)", StormTier::Minor)
    } else if kp == 6.0 {
        ("G2 (Moderate)", StormTier::Moderate)
    } else if kp == 7.0 {
        ("G3 (Strong)", StormTier::Strong)
    } else if kp == 8.0 {
        ("G4 (Severe)", StormTier::Severe)
    } else {
        ("G5 (Extreme)", StormTier::Extreme)
    }
}

/// Storm level `"G" + min(floor(kp) - 4, 5)`. `None` below Kp 5.
pub fn g_level(kp: f64) -> Option<String> {
    if !kp.is_finite() || kp < 5.0 {
        return None;
    }
    let level = (kp.floor() as i64 - 4).min(5);
    Some(format!("G{}", level))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
