//! The GraphQL documents of the cooperative fund API.
//!
//! The server maps snake_case Rust fields to camelCase GraphQL names, so the documents here
//! use the camelCase forms.

pub const CREATE_PAYMENT_MUTATION: &str = r#"mutation CreatePayment($accessToken: String!, $name: String!, $totalAmount: Float!, $ticketNumber: String!, $accountNumber: String!, $beingPayed: [PayedToInput!]!) {
  createUserPayment(accessToken: $accessToken, name: $name, totalAmount: $totalAmount, ticketNumber: $ticketNumber, accountNumber: $accountNumber, beingPayed: $beingPayed)
}"#;

pub const APPROVE_REJECT_MUTATION: &str = r#"mutation ApproveOrReject($id: String!, $newState: String!, $commentary: String!) { approveOrRejectPayment(id: $id, newState: $newState, commentary: $commentary) { id name state } }"#;

pub const GET_ALL_PAYMENTS_QUERY: &str =
    r#"query GetAllPayments { getAllPayments { id name accountNum } }"#;

pub const GET_USER_PAYMENTS_QUERY: &str = r#"query GetUserPayments($accessToken: String!) { getUsersPayments(accessToken: $accessToken) { id name totalAmount accountNum } }"#;

pub const GET_HISTORY_QUERY: &str = r#"query GetHistory($accessToken: String!) { getHistory(accessToken: $accessToken) { payedToCapital owedCapital } }"#;

pub const GET_USER_LOANS_QUERY: &str = r#"query GetUserLoans($accessToken: String!) { getUserLoans(accessToken: $accessToken) { id quotas payed debt total status reason } }"#;

pub const GET_FINES_BY_ID_QUERY: &str = r#"query GetFines($accessToken: String!) { getFinesById(accessToken: $accessToken) { id amount status reason } }"#;

pub const CREATE_FINE_MUTATION: &str = r#"mutation CreateFine($affiliateKey:String!, $amount:Float!, $motive:String!){ createFine(affiliateKey:$affiliateKey, amount:$amount, motive:$motive) }"#;

pub const EDIT_FINE_MUTATION: &str = r#"mutation EditFine($fineKey:String!, $newAmount:Float, $newMotive:String, $newStatus:String){ editFine(fineKey:$fineKey, newAmount:$newAmount, newMotive:$newMotive, newStatus:$newStatus) }"#;

pub const GET_PENDING_QUOTAS_QUERY: &str = r#"query GetPendingQuotas($accessToken:String!){ getPendingQuotas(accessToken:$accessToken) { userId amount expDate identifier } }"#;

pub const GET_MONTHLY_AFFILIATE_QUOTA_QUERY: &str = r#"query GetMonthlyAffiliateQuota($accessToken:String!){ getMonthlyAffiliateQuota(accessToken:$accessToken) { userId amount expDate identifier } }"#;

pub const GET_QUOTAS_PRESTAMO_PENDIENTES_QUERY: &str = r#"query GetQuotasPrestamoPendientes($accessToken:String!){ getQuotasPrestamoPendientes(accessToken:$accessToken) { userId amount expDate loanId quotaNumber } }"#;

pub const GET_PENDING_LOANS_QUOTAS_QUERY: &str = r#"query GetPendingLoansQuotas($accessToken:String!){ getPendingLoansQuotas(accessToken:$accessToken) { userId amount expDate loanId quotaNumber nombrePrestamo nombreUsuario } }"#;

pub const GET_ALL_MEMBERS_QUERY: &str =
    r#"query GetAllMembers { getAllMembers { userId name } }"#;
