//! Planner configuration.

/// Settings shared by cost-field propagation, path extraction and component
/// generation. All three must agree for a field and its paths to be consistent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Use all eight neighbour directions. When false only the four
    /// orthogonal directions are used.
    /// Default: true
    pub allow_diagonal_move: bool,

    /// Cap on propagation rounds. `None` leaves only the structural bound
    /// (the number of grid positions).
    /// Default: None
    pub max_rounds: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            allow_diagonal_move: true,
            max_rounds: None,
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allow_diagonal_move(mut self, allow: bool) -> Self {
        self.allow_diagonal_move = allow;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }
}
