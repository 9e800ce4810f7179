use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_id: i64,
    pub service_type: String,
    pub service_price: f64,
    pub staff_id: i64,
    pub staff_name: String,
}
