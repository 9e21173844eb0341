use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::EligibleCustomer;

/// Direction of the final sort
///
/// `"DESC"` (any case) is descending; anything else sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl From<String> for SortDirection {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for SortDirection {
    fn from(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("DESC") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }
}

impl From<SortDirection> for String {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => "ASC".to_string(),
            SortDirection::Descending => "DESC".to_string(),
        }
    }
}

/// Numeric value a customer is ordered by
///
/// Ids compare as integers so large ids never collapse into one float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey {
    Id(i64),
    Number(f64),
}

impl SortKey {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Id(a), Self::Id(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        }
    }
}

/// Numeric value of `field` on a customer, if it has one
///
/// `name` only yields a key when it reads as a number; unknown fields never do.
pub fn sort_key(customer: &EligibleCustomer, field: &str) -> Option<SortKey> {
    match field {
        "user_id" => Some(SortKey::Id(customer.user_id)),
        "name" => customer
            .name
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| !value.is_nan())
            .map(SortKey::Number),
        _ => None,
    }
}

/// Stable sort of eligible customers by a numeric field
///
/// Returns `false` and leaves the list in encounter order when any
/// customer has no numeric key for `field`.
pub fn sort_customers(
    customers: &mut [EligibleCustomer],
    field: &str,
    direction: SortDirection,
) -> bool {
    if customers.iter().any(|c| sort_key(c, field).is_none()) {
        return false;
    }

    // slice::sort_by is stable, so equal keys keep encounter order
    customers.sort_by(|a, b| {
        let ordering = match (sort_key(a, field), sort_key(b, field)) {
            (Some(a), Some(b)) => a.compare(&b),
            _ => Ordering::Equal,
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    true
}
