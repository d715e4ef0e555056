/// Tunables shared by the generators.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Draws considered "recent" by the multi-factor score.
    pub recent_window: usize,
    /// Draws considered "hot" by the multi-factor score.
    pub hot_window: usize,
    /// Number of k-means clusters.
    pub clusters: usize,
    pub seed: u64,
    /// Draws fed to the sequence model per prediction.
    pub sequence_window: usize,
    pub include_ml: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recent_window: 50,
            hot_window: 5,
            clusters: 5,
            seed: 42,
            sequence_window: 10,
            include_ml: true,
        }
    }
}
