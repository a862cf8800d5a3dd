//! Command validation rules.

use std::fmt;

use chrono::Utc;
use serde::Serialize;

use crate::commands::CreateOrderCommand;

/// One rule a command broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub field: &'static str,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Checks a command before it reaches its handler.
///
/// Returns every rule the command breaks; an empty list means valid.
pub trait Validator<C>: Send + Sync {
    fn validate(&self, command: &C) -> Vec<ValidationFailure>;
}

/// Rules for [`CreateOrderCommand`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOrderCommandValidator;

impl CreateOrderCommandValidator {
    pub fn new() -> Self {
        Self
    }
}

fn not_empty(failures: &mut Vec<ValidationFailure>, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        failures.push(ValidationFailure::new(field, "must not be empty"));
        return false;
    }
    true
}

impl Validator<CreateOrderCommand> for CreateOrderCommandValidator {
    fn validate(&self, command: &CreateOrderCommand) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();

        not_empty(&mut failures, "city", &command.city);
        not_empty(&mut failures, "street", &command.street);
        not_empty(&mut failures, "state", &command.state);
        not_empty(&mut failures, "country", &command.country);
        not_empty(&mut failures, "zip_code", &command.zip_code);

        if not_empty(&mut failures, "card_number", &command.card_number)
            && !(12..=19).contains(&command.card_number.chars().count())
        {
            failures.push(ValidationFailure::new(
                "card_number",
                "must be between 12 and 19 characters",
            ));
        }

        not_empty(&mut failures, "card_holder_name", &command.card_holder_name);

        if command.card_expiration < Utc::now() {
            failures.push(ValidationFailure::new(
                "card_expiration",
                "Please specify a valid card expiration date",
            ));
        }

        if not_empty(&mut failures, "card_security_number", &command.card_security_number)
            && command.card_security_number.chars().count() != 3
        {
            failures.push(ValidationFailure::new(
                "card_security_number",
                "must be exactly 3 characters",
            ));
        }

        if command.card_type_id == 0 {
            failures.push(ValidationFailure::new("card_type_id", "must not be empty"));
        }

        if command.order_items.is_empty() {
            failures.push(ValidationFailure::new("order_items", "No order items found"));
        }

        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::OrderItemDto;
    use chrono::Duration;
    use common::Money;

    fn valid() -> CreateOrderCommand {
        CreateOrderCommand {
            order_items: vec![OrderItemDto {
                product_id: "1".into(),
                product_name: "Mug".to_string(),
                unit_price: Money::from_cents(500),
                discount: Money::zero(),
                units: 1,
                picture_url: String::new(),
            }],
            user_id: "u1".to_string(),
            user_name: "Ann".to_string(),
            city: "Redmond".to_string(),
            street: "1 Main St".to_string(),
            state: "WA".to_string(),
            country: "US".to_string(),
            zip_code: "98052".to_string(),
            card_number: "4111111111111111".to_string(),
            card_holder_name: "Ann".to_string(),
            card_expiration: Utc::now() + Duration::days(365),
            card_security_number: "123".to_string(),
            card_type_id: 1,
        }
    }

    fn fields(command: &CreateOrderCommand) -> Vec<&'static str> {
        CreateOrderCommandValidator
            .validate(command)
            .into_iter()
            .map(|f| f.field)
            .collect()
    }

    #[test]
    fn valid_command_passes() {
        assert!(fields(&valid()).is_empty());
    }

    #[test]
    fn every_broken_rule_is_reported() {
        let mut command = valid();
        command.city = String::new();
        command.card_security_number = "12".to_string();
        command.order_items.clear();

        assert_eq!(fields(&command), ["city", "card_security_number", "order_items"]);
    }

    #[test]
    fn card_number_length_is_bounded() {
        let mut command = valid();
        command.card_number = "41111111111".to_string();
        assert_eq!(fields(&command), ["card_number"]);

        command.card_number = "4".repeat(20);
        assert_eq!(fields(&command), ["card_number"]);

        command.card_number = "4".repeat(19);
        assert!(fields(&command).is_empty());
    }

    #[test]
    fn empty_card_number_reports_once() {
        let mut command = valid();
        command.card_number = String::new();
        assert_eq!(fields(&command), ["card_number"]);
    }

    #[test]
    fn expired_card_and_missing_card_type_are_rejected() {
        let mut command = valid();
        command.card_expiration = Utc::now() - Duration::days(1);
        command.card_type_id = 0;

        assert_eq!(fields(&command), ["card_expiration", "card_type_id"]);
    }
}
