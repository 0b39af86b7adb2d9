use serde_json::Value;

use crate::graphql::GraphqlEnvelope;

// The signup response shape varies with how the server serialises its Result type, so the
// token is probed at several known paths, first hit wins. The precedence order is
// compatibility logic inherited from observed responses, not a contract.
type TokenProbe = fn(&Value) -> Option<&str>;

fn token_at_top_level(body: &Value) -> Option<&str> {
    body.get("access_token")?.as_str()
}

fn token_in_ok_variant(body: &Value) -> Option<&str> {
    body.get("Ok")?.get("access_token")?.as_str()
}

fn token_in_lowercase_ok_variant(body: &Value) -> Option<&str> {
    body.get("ok")?.get("access_token")?.as_str()
}

fn token_in_first_element(body: &Value) -> Option<&str> {
    body.get(0)?.get("access_token")?.as_str()
}

const TOKEN_PROBES: &[TokenProbe] = &[
    token_at_top_level,
    token_in_ok_variant,
    token_in_lowercase_ok_variant,
    token_in_first_element,
];

/// Extract the access token from a signup response body. Malformed JSON or a body matching
/// none of the known shapes yields None.
pub fn extract_access_token(body: &str) -> Option<String> {
    let body: Value = serde_json::from_str(body).ok()?;
    TOKEN_PROBES
        .iter()
        .find_map(|probe| probe(&body))
        .map(|token| token.to_string())
}

/// Extract the identifier returned by a GraphQL mutation under `data.<field>`.
///
/// The mutation may return the id as a bare string or as an object carrying an `id` field.
/// An envelope with errors, or with null or missing data, yields None.
pub fn extract_mutation_id(body: &str, field: &str) -> Option<String> {
    let envelope = GraphqlEnvelope::parse(body)?;
    if !envelope.has_data() {
        return None;
    }

    let value = envelope.data.as_ref()?.get(field)?;
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Object(_) => value.get("id")?.as_str().map(|id| id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn token_at_top_level() {
        assert_eq!(
            extract_access_token(r#"{"access_token":"abc"}"#),
            Some("abc".to_string())
        );
    }

    #[test]
    fn token_wrapped_in_result_variants() {
        assert_eq!(
            extract_access_token(r#"{"Ok":{"access_token":"abc"}}"#),
            Some("abc".to_string())
        );
        assert_eq!(
            extract_access_token(r#"{"ok":{"access_token":"abc"}}"#),
            Some("abc".to_string())
        );
        assert_eq!(
            extract_access_token(r#"[{"access_token":"abc"}]"#),
            Some("abc".to_string())
        );
    }

    #[test]
    fn token_probe_precedence_is_top_level_first() {
        let body = r#"{"access_token":"outer","Ok":{"access_token":"inner"}}"#;
        assert_eq!(extract_access_token(body), Some("outer".to_string()));
    }

    #[test]
    fn no_token_in_empty_or_malformed_body() {
        assert_eq!(extract_access_token("{}"), None);
        assert_eq!(extract_access_token("not json"), None);
        assert_eq!(extract_access_token(r#"{"access_token":42}"#), None);
    }

    #[test]
    fn mutation_id_as_bare_string() {
        let body = r#"{"data":{"createUserPayment":"id123"}}"#;
        assert_eq!(
            extract_mutation_id(body, "createUserPayment"),
            Some("id123".to_string())
        );
    }

    #[test]
    fn mutation_id_as_object() {
        let body = r#"{"data":{"createUserPayment":{"id":"id123","name":"p"}}}"#;
        assert_eq!(
            extract_mutation_id(body, "createUserPayment"),
            Some("id123".to_string())
        );
    }

    #[test]
    fn mutation_errors_yield_no_id() {
        let body = r#"{"data":null,"errors":[{"message":"denied"}]}"#;
        assert_eq!(extract_mutation_id(body, "createUserPayment"), None);

        let body = r#"{"data":{"otherField":"id123"}}"#;
        assert_eq!(extract_mutation_id(body, "createUserPayment"), None);
    }
}
