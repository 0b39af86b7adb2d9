use gust_client::prelude::HttpClient;
use gust_runner::prelude::SharedValuesConstraint;

/// Shared context for every virtual user, produced once by the setup hook.
///
/// `exercise_rejections` is seeded from the CLI before setup runs, the rest is filled in by
/// setup and read-only afterwards.
#[derive(Debug, Default)]
pub struct CoopFundContext {
    pub client: Option<HttpClient>,
    pub access_token: String,
    /// The signed-up user's name, used as the affiliate key for fine mutations.
    pub affiliate_key: String,
    /// Whether approve-or-reject mutations should sometimes submit a rejection instead of
    /// always approving.
    pub exercise_rejections: bool,
}

impl SharedValuesConstraint for CoopFundContext {}

impl CoopFundContext {
    /// Absent until the setup hook has signed up and built the client.
    pub fn client(&self) -> Option<&HttpClient> {
        self.client.as_ref()
    }
}

pub fn signup_endpoint(base_url: &str) -> String {
    format!("{base_url}/general/signup")
}

pub fn payment_endpoint(base_url: &str) -> String {
    format!("{base_url}/graphql/payment")
}

pub fn loan_endpoint(base_url: &str) -> String {
    format!("{base_url}/graphql/loan")
}

pub fn fine_endpoint(base_url: &str) -> String {
    format!("{base_url}/graphql/fine")
}

pub fn quota_endpoint(base_url: &str) -> String {
    format!("{base_url}/graphql/quota")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn client_is_absent_until_setup_populates_it() {
        let ctx = CoopFundContext::default();
        assert!(ctx.client().is_none());
    }

    #[test]
    fn endpoints_are_rooted_at_the_base_url() {
        assert_eq!(
            signup_endpoint("http://localhost:8080"),
            "http://localhost:8080/general/signup"
        );
        assert_eq!(
            quota_endpoint("http://localhost:8080"),
            "http://localhost:8080/graphql/quota"
        );
    }
}
