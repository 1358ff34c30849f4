// ╔════════════════════════════╗
// ║     Suggest Profiles       ║
// ╚════════════════════════════╝

#[derive(Debug)]
pub struct SuggestInput {
    pub caller_id: String,
    /// Falls back to the configured default when absent.
    pub limit: Option<u64>,
}
