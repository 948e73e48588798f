use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{DomainError, DomainResult, HubId, TenantId};

use crate::{limited_opt, required};

/// A physical warehouse location owned by a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hub {
    pub id: HubId,
    pub tenant_id: TenantId,
    pub name: String,
    pub code: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a hub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHub {
    pub tenant_id: Option<TenantId>,
    pub name: String,
    pub code: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub pincode: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl NewHub {
    pub fn into_hub(self, id: HubId, now: DateTime<Utc>) -> DomainResult<Hub> {
        let tenant_id = self
            .tenant_id
            .ok_or_else(|| DomainError::invalid_id("tenant_id is required"))?
            .ensure_present()?;

        Ok(Hub {
            id,
            tenant_id,
            name: required("name", self.name, 100)?,
            code: required("code", self.code, 20)?,
            address: required("address", self.address, 255)?,
            city: limited_opt("city", self.city, 100)?,
            state: limited_opt("state", self.state, 100)?,
            country: limited_opt("country", self.country, 100)?,
            pincode: limited_opt("pincode", self.pincode, 20)?,
            location: limited_opt("location", self.location, 30)?,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_hub() -> NewHub {
        NewHub {
            tenant_id: Some(TenantId::new()),
            name: " North DC ".to_string(),
            code: "NDC".to_string(),
            address: "1 Dock Road".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn into_hub_trims_required_fields() {
        let id = HubId::new();
        let hub = new_hub().into_hub(id, Utc::now()).unwrap();
        assert_eq!(hub.id, id);
        assert_eq!(hub.name, "North DC");
        assert_eq!(hub.created_at, hub.updated_at);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = NewHub {
            name: "   ".to_string(),
            ..new_hub()
        }
        .into_hub(HubId::new(), Utc::now())
        .unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let err = NewHub {
            name: "n".repeat(101),
            ..new_hub()
        }
        .into_hub(HubId::new(), Utc::now())
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("name cannot exceed 100 characters")
        );

        let hub = NewHub {
            name: "n".repeat(100),
            ..new_hub()
        }
        .into_hub(HubId::new(), Utc::now())
        .unwrap();
        assert_eq!(hub.name.len(), 100);
    }

    #[test]
    fn overlong_optional_field_is_rejected() {
        let err = NewHub {
            pincode: Some("9".repeat(21)),
            ..new_hub()
        }
        .into_hub(HubId::new(), Utc::now())
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("pincode cannot exceed 20 characters")
        );
    }

    #[test]
    fn missing_tenant_is_rejected() {
        let err = NewHub {
            tenant_id: None,
            ..new_hub()
        }
        .into_hub(HubId::new(), Utc::now())
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
    }
}
