pub struct CreateArea {
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub requires_approval: bool,
    pub has_fee: bool,
    pub fee_amount: Option<f64>,
    pub is_active: bool,
}
