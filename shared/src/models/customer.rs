//! Customer Model

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::validation::{MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};

/// Customer entity; `national_id` is unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub national_id: String,
    pub address: String,
}

/// Create/replace payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub national_id: String,
    pub address: String,
}

impl CustomerInput {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.national_id, "national_id", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.address, "address", MAX_ADDRESS_LEN)?;
        Ok(())
    }
}

/// Partial update payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub address: Option<String>,
}

impl CustomerPatch {
    pub fn apply(self, customer: &Customer) -> CustomerInput {
        CustomerInput {
            name: self.name.unwrap_or_else(|| customer.name.clone()),
            phone: self.phone.unwrap_or_else(|| customer.phone.clone()),
            national_id: self
                .national_id
                .unwrap_or_else(|| customer.national_id.clone()),
            address: self.address.unwrap_or_else(|| customer.address.clone()),
        }
    }
}
