//! Value objects for the order domain.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

use super::OrderError;

/// Shipping address, embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            country: country.into(),
            zip_code: zip_code.into(),
        }
    }
}

/// Status of an order.
///
/// Orders enter the system as `Submitted`. Later states (awaiting
/// validation, paid, shipped, cancelled) are driven by services outside
/// the checkout flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Submitted,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Submitted => "submitted",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    product_name: String,
    unit_price: Money,
    discount: Money,
    units: u32,
    picture_url: String,
}

impl OrderItem {
    /// Creates a validated order line.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        unit_price: Money,
        discount: Money,
        picture_url: impl Into<String>,
        units: u32,
    ) -> Result<Self, OrderError> {
        if units == 0 {
            return Err(OrderError::InvalidUnits { units });
        }

        if discount.is_negative() {
            return Err(OrderError::InvalidDiscount {
                discount: discount.cents(),
            });
        }

        let total = unit_price
            .checked_multiply(units)
            .ok_or(OrderError::AmountOverflow {
                unit_price: unit_price.cents(),
                units,
            })?;

        if total < discount {
            return Err(OrderError::DiscountExceedsTotal {
                discount: discount.cents(),
                total: total.cents(),
            });
        }

        Ok(Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            unit_price,
            discount,
            units,
            picture_url: picture_url.into(),
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    pub fn picture_url(&self) -> &str {
        &self.picture_url
    }

    /// Returns unit price times units, before discount.
    pub fn total_price(&self) -> Money {
        // Construction and `add_units` keep this product in range.
        self.unit_price.saturating_multiply(self.units)
    }

    pub(crate) fn set_new_discount(&mut self, discount: Money) -> Result<(), OrderError> {
        if discount.is_negative() {
            return Err(OrderError::InvalidDiscount {
                discount: discount.cents(),
            });
        }
        self.discount = discount;
        Ok(())
    }

    pub(crate) fn add_units(&mut self, units: u32) -> Result<(), OrderError> {
        if units == 0 {
            return Err(OrderError::InvalidUnits { units });
        }
        let total_units = self
            .units
            .checked_add(units)
            .filter(|total| self.unit_price.checked_multiply(*total).is_some())
            .ok_or(OrderError::AmountOverflow {
                unit_price: self.unit_price.cents(),
                units,
            })?;
        self.units = total_units;
        Ok(())
    }
}
