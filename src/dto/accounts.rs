use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Account, Address};

/// Partial update: absent fields are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAddressRequest {
    pub house_address: Option<String>,
    pub street: Option<String>,
    pub ward: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub is_default: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountList {
    pub items: Vec<Account>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AddressList {
    pub items: Vec<Address>,
}
