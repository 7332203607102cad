use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Address;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAddressRequest {
    pub label: Option<String>,
    pub recipient: String,
    pub department: String,
    pub city: String,
    pub street: String,
    pub country: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AddressList {
    #[schema(value_type = Vec<Address>)]
    pub items: Vec<Address>,
}
