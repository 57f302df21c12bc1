//! Coordinator configuration.

/// Retry budgets for the coordinator's two loops.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// How many random codes to try before giving up with
    /// `CodeCollision`. The code space is 9000 values, so collisions
    /// are rare until the store holds thousands of live rooms.
    pub code_attempts: u32,

    /// How many CAS retries a single mutation gets before surfacing the
    /// conflict. Each retry re-reads and re-validates, so any bound here
    /// only matters under sustained write contention on one room.
    pub cas_retries: u32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            code_attempts: 5,
            cas_retries: 16,
        }
    }
}
