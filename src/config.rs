//! Viewer configuration.

/// What happens to the current model when a new load starts.
///
/// The two policies differ only when the load fails: `Eager` leaves the
/// viewport empty, `Lazy` keeps the previous model visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReplacePolicy {
    /// Detach the current model as soon as a load starts.
    Eager,
    /// Keep the current model until a replacement parses successfully.
    Lazy,
}

impl std::fmt::Display for ReplacePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eager => f.write_str("eager"),
            Self::Lazy => f.write_str("lazy"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Multiplies the minimal fitting distance to leave breathing room
    /// around the framed model. Values above 1.0 make sense.
    pub margin: f32,
    /// Vertical field of view in degrees, in (0, 180).
    pub fovy_degrees: f32,
    pub replace_policy: ReplacePolicy,
    pub window_title: String,
    /// Clear color, linear RGB.
    pub background: [f64; 3],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            margin: 1.5,
            fovy_degrees: 75.0,
            replace_policy: ReplacePolicy::Lazy,
            window_title: "meshview".to_string(),
            background: [0.93, 0.93, 0.93],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_framing_setup() {
        let config = ViewerConfig::default();
        assert_eq!(config.margin, 1.5);
        assert_eq!(config.fovy_degrees, 75.0);
        assert_eq!(config.replace_policy, ReplacePolicy::Lazy);
        assert!(config.margin > 1.0);
    }
}
