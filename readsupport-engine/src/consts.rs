/// Bases of flank added on each side of the repeat-expanded variant core.
pub const DEFAULT_WINDOW_MARGIN: usize = 5;

/// Mismatch fraction tolerated in lenient mode (0).
pub const DEFAULT_LENIENT_TOLERANCE: f64 = 0.10;

/// Mismatch fraction tolerated in strict mode (1).
pub const DEFAULT_STRICT_TOLERANCE: f64 = 0.0;

/// How much better than the runner-up the best candidate must score.
pub const DEFAULT_MIN_SEPARATION: f64 = 0.02;

/// Slack for comparing accumulated floating point fractions.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Placeholder written for a read that has no difference score.
pub const MISSING_SCORE: &str = "NA";
