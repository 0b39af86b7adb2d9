use tabled::Tabled;

#[derive(Tabled)]
pub struct OperationRow {
    pub operation_id: String,
    pub count: usize,
    pub errors: usize,
    #[tabled(display = "float2")]
    pub avg_ms: f64,
    #[tabled(display = "float2")]
    pub min_ms: f64,
    #[tabled(display = "float2")]
    pub max_ms: f64,
    #[tabled(display = "float2")]
    pub p95_ms: f64,
}

fn float2(n: &f64) -> String {
    format!("{:.2}", n)
}
