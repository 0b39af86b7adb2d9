use tabled::Tabled;

#[derive(Tabled)]
pub struct CheckTableRow {
    pub name: String,
    pub passed: u64,
    pub total: u64,
    #[tabled(display = "float4")]
    pub rate: f64,
}

fn float4(n: &f64) -> String {
    format!("{:.4}", n)
}
