use anyhow::Context;
use sea_orm::Set;

use crate::contract::User;
use crate::infra::storage::entity::{ActiveModel, Model};

/// Convert a database row to the contract model, parsing the stored enums.
pub fn entity_to_user(m: Model) -> anyhow::Result<User> {
    Ok(User {
        id: m.id,
        email: m.email,
        phone: m.phone,
        password_hash: m.password_hash,
        role: m.role.parse().map_err(anyhow::Error::msg).context("role")?,
        status: m
            .status
            .parse()
            .map_err(anyhow::Error::msg)
            .context("status")?,
        kyc_status: m
            .kyc_status
            .parse()
            .map_err(anyhow::Error::msg)
            .context("kyc_status")?,
        birth_year: m.birth_year,
        city: m.city,
        premium_until: m.premium_until,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub fn user_to_active_model(u: User) -> ActiveModel {
    ActiveModel {
        id: Set(u.id),
        email: Set(u.email),
        phone: Set(u.phone),
        password_hash: Set(u.password_hash),
        role: Set(u.role.as_str().to_string()),
        status: Set(u.status.as_str().to_string()),
        kyc_status: Set(u.kyc_status.as_str().to_string()),
        birth_year: Set(u.birth_year),
        city: Set(u.city),
        premium_until: Set(u.premium_until),
        created_at: Set(u.created_at),
        updated_at: Set(u.updated_at),
    }
}
