use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The wire shape of a GraphQL-over-HTTP request.
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

/// The standard GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlEnvelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl GraphqlEnvelope {
    /// Parse a response body, tolerating anything that is not valid JSON by returning None.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Whether the envelope carries usable data, meaning `data` is present and non-null and
    /// no errors were reported.
    pub fn has_data(&self) -> bool {
        matches!(&self.data, Some(data) if !data.is_null()) && self.errors.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialises_to_query_and_variables() {
        let request = GraphqlRequest {
            query: "query Q { me }",
            variables: serde_json::json!({"limit": 1}),
        };
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"query": "query Q { me }", "variables": {"limit": 1}})
        );
    }

    #[test]
    fn envelope_with_errors_has_no_data() {
        let envelope =
            GraphqlEnvelope::parse(r#"{"data":null,"errors":[{"message":"boom"}]}"#).unwrap();
        assert!(!envelope.has_data());

        let envelope = GraphqlEnvelope::parse(r#"{"data":{"ok":true}}"#).unwrap();
        assert!(envelope.has_data());
    }

    #[test]
    fn malformed_body_parses_to_none() {
        assert!(GraphqlEnvelope::parse("<html>504</html>").is_none());
    }
}
