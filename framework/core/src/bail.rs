/// Return this error from a virtual user's behaviour function to retire that virtual user.
///
/// Use this when a virtual user hits a condition that makes further iterations pointless for
/// that user but not for the run. For example, a resource the user depends on has disappeared
/// from the service under test. The rest of the scenario's virtual users keep running.
#[derive(derive_more::Error, derive_more::Display, Debug)]
pub struct IterationBailError {
    msg: String,
}

impl Default for IterationBailError {
    fn default() -> Self {
        Self {
            msg: "Virtual user is bailing".to_string(),
        }
    }
}
