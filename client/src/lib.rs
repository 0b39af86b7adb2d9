mod extract;
mod graphql;
mod http;

pub mod prelude {
    pub use crate::extract::{extract_access_token, extract_mutation_id};
    pub use crate::graphql::{GraphqlEnvelope, GraphqlRequest};
    pub use crate::http::{ClientError, HttpClient, HttpResponse};
}
