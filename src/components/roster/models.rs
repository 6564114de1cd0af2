use crate::error::{validation_error, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type EmployeeId = u64;
pub type StoreId = u64;

/// Upper bound on `pay_rate`, in won
pub const MAX_PAY_RATE: u64 = 100_000_000;

/// Calendar colors handed out to new employees in order
pub const DEFAULT_COLORS: [&str; 8] = [
    "#4F46E5", "#059669", "#D97706", "#DC2626", "#7C3AED", "#0891B2", "#DB2777", "#65A30D",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Active,
    Leave,
    Resigned,
}

impl EmploymentStatus {
    /// Resigned employees get no new shifts
    pub fn can_be_scheduled(&self) -> bool {
        !matches!(self, EmploymentStatus::Resigned)
    }

    pub fn can_transition_to(&self, next: EmploymentStatus) -> bool {
        match self {
            EmploymentStatus::Resigned => next == EmploymentStatus::Resigned,
            _ => true,
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmploymentStatus::Active => t!("status_active"),
            EmploymentStatus::Leave => t!("status_leave"),
            EmploymentStatus::Resigned => t!("status_resigned"),
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Regular,
    PartTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    Hourly,
    Monthly,
}

/// A person on the roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub status: EmploymentStatus,
    pub employment_type: EmploymentType,
    pub pay_type: PayType,
    /// Won per hour or per month depending on `pay_type`
    pub pay_rate: u64,
    /// Calendar color as #RRGGBB
    pub color: String,
    #[serde(default)]
    pub store_id: Option<StoreId>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Employee {
    /// Check the fields an admin can get wrong in a form
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(validation_error(&t!("validation_name_required")));
        }
        if self.pay_rate == 0 {
            return Err(validation_error(&t!("validation_pay_rate_positive")));
        }
        if self.pay_rate > MAX_PAY_RATE {
            return Err(validation_error(&t!(
                "validation_pay_rate_too_high",
                max = MAX_PAY_RATE
            )));
        }
        if !is_hex_color(&self.color) {
            return Err(validation_error(&t!(
                "validation_invalid_color",
                color = self.color.as_str()
            )));
        }
        Ok(())
    }

    /// Apply an admin edit, all or nothing
    pub fn apply(&mut self, update: EmployeeUpdate) -> AppResult<()> {
        let mut edited = self.clone();

        if let Some(name) = update.name {
            edited.name = name.trim().to_string();
        }
        if let Some(status) = update.status {
            if !self.status.can_transition_to(status) {
                return Err(validation_error(&t!("validation_resigned_terminal")));
            }
            edited.status = status;
        }
        if let Some(employment_type) = update.employment_type {
            edited.employment_type = employment_type;
        }
        if let Some(pay_type) = update.pay_type {
            edited.pay_type = pay_type;
        }
        if let Some(pay_rate) = update.pay_rate {
            edited.pay_rate = pay_rate;
        }
        if let Some(color) = update.color {
            edited.color = color;
        }
        if let Some(store_id) = update.store_id {
            edited.store_id = store_id;
        }
        if let Some(phone) = update.phone {
            edited.phone = phone;
        }

        edited.validate()?;
        *self = edited;
        Ok(())
    }
}

/// Partial edit from the admin employee form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub status: Option<EmploymentStatus>,
    pub employment_type: Option<EmploymentType>,
    pub pay_type: Option<PayType>,
    pub pay_rate: Option<u64>,
    pub color: Option<String>,
    pub store_id: Option<Option<StoreId>>,
    pub phone: Option<Option<String>>,
}

/// A shop location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Join request sent by a worker, pending admin approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub store_id: Option<StoreId>,
    pub requested_at: DateTime<Utc>,
}

impl WorkerRequest {
    pub fn new(
        name: &str,
        phone: Option<String>,
        store_id: Option<StoreId>,
        requested_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(validation_error(&t!("validation_name_required")));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone,
            store_id,
            requested_at,
        })
    }

    /// Turn the request into an active employee with the admin's terms
    pub fn approve(self, id: EmployeeId, terms: EmployeeTerms) -> AppResult<Employee> {
        let color = terms
            .color
            .unwrap_or_else(|| DEFAULT_COLORS[(id as usize) % DEFAULT_COLORS.len()].to_string());

        let employee = Employee {
            id,
            name: self.name,
            status: EmploymentStatus::Active,
            employment_type: terms.employment_type,
            pay_type: terms.pay_type,
            pay_rate: terms.pay_rate,
            color,
            store_id: self.store_id,
            phone: self.phone,
        };
        employee.validate()?;

        Ok(employee)
    }
}

/// Employment terms the admin fills in when approving a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeTerms {
    pub employment_type: EmploymentType,
    pub pay_type: PayType,
    pub pay_rate: u64,
    pub color: Option<String>,
}

fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}
