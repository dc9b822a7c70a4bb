//! Entry validation rules
//!
//! Rules run in a fixed order and the first failure wins, so callers always see
//! the message of the earliest missing or invalid field.

use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::Entry;

pub const INVALID_DESCRIPTION: &str = "Informe uma Descrição válida.";
pub const INVALID_MONTH: &str = "Informe um Mês válido.";
pub const INVALID_YEAR: &str = "Informe um Ano válido.";
pub const MISSING_USER: &str = "Informe um Usuário.";
pub const INVALID_VALUE: &str = "Informe um Valor válido.";
pub const MISSING_TYPE: &str = "Informe um Tipo de Lançamento.";

/// Check an entry's fields before create/update. Pure: no I/O.
pub fn validate(entry: &Entry) -> Result<()> {
    if entry.description.as_deref().map_or(true, |d| d.trim().is_empty()) {
        return Err(Error::business_rule(INVALID_DESCRIPTION));
    }

    if !entry.month.is_some_and(|m| (1..=12).contains(&m)) {
        return Err(Error::business_rule(INVALID_MONTH));
    }

    // Four digits, no sign
    if !entry.year.is_some_and(|y| (1000..=9999).contains(&y)) {
        return Err(Error::business_rule(INVALID_YEAR));
    }

    if entry.owner_user_id.is_none() {
        return Err(Error::business_rule(MISSING_USER));
    }

    if !entry.value.is_some_and(|v| v > Decimal::ZERO) {
        return Err(Error::business_rule(INVALID_VALUE));
    }

    if entry.entry_type.is_none() {
        return Err(Error::business_rule(MISSING_TYPE));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryType;
    use uuid::Uuid;

    fn message(entry: &Entry) -> String {
        let err = validate(entry).unwrap_err();
        assert!(matches!(err, Error::BusinessRule(_)), "unexpected error kind: {:?}", err);
        err.to_string()
    }

    #[test]
    fn test_rules_fire_in_order_as_fields_are_filled() {
        let mut entry = Entry::new();
        assert_eq!(message(&entry), "Informe uma Descrição válida.");

        entry.description = Some("Salario".to_string());
        assert_eq!(message(&entry), "Informe um Mês válido.");

        entry.month = Some(0);
        assert_eq!(message(&entry), "Informe um Mês válido.");

        entry.month = Some(13);
        assert_eq!(message(&entry), "Informe um Mês válido.");

        entry.month = Some(1);
        assert_eq!(message(&entry), "Informe um Ano válido.");

        entry.year = Some(202);
        assert_eq!(message(&entry), "Informe um Ano válido.");

        entry.year = Some(20202);
        assert_eq!(message(&entry), "Informe um Ano válido.");

        entry.year = Some(2022);
        assert_eq!(message(&entry), "Informe um Usuário.");

        entry.owner_user_id = Some(Uuid::new_v4());
        assert_eq!(message(&entry), "Informe um Valor válido.");

        entry.value = Some(Decimal::ZERO);
        assert_eq!(message(&entry), "Informe um Valor válido.");

        entry.value = Some(Decimal::from(-1));
        assert_eq!(message(&entry), "Informe um Valor válido.");

        entry.value = Some(Decimal::from(10));
        assert_eq!(message(&entry), "Informe um Tipo de Lançamento.");

        entry.entry_type = Some(EntryType::Income);
        assert!(validate(&entry).is_ok());
    }

    #[test]
    fn test_blank_description_is_invalid() {
        let entry = Entry::new().with_description("   ").with_month(13);
        assert_eq!(message(&entry), INVALID_DESCRIPTION);
    }

    #[test]
    fn test_earlier_rule_wins_regardless_of_later_fields() {
        // month and owner both invalid: month is reported
        let entry = Entry::new().with_description("Salario").with_month(13).with_year(2022);
        assert_eq!(message(&entry), INVALID_MONTH);

        // valid through year, no owner, no value, no type: owner is reported
        let entry = Entry::new().with_description("Salario").with_month(5).with_year(2022);
        assert_eq!(message(&entry), MISSING_USER);
    }

    #[test]
    fn test_month_and_year_range_edges() {
        let entry_at = |month: i32, year: i32| {
            Entry::new()
                .with_description("Salario")
                .with_month(month)
                .with_year(year)
                .with_owner(Uuid::new_v4())
                .with_value(Decimal::from(1))
                .with_type(EntryType::Income)
        };

        for (month, ok) in [(0, false), (1, true), (12, true), (13, false)] {
            let result = validate(&entry_at(month, 2022));
            assert_eq!(result.is_ok(), ok, "month {}", month);
            if !ok {
                assert_eq!(result.unwrap_err().to_string(), INVALID_MONTH);
            }
        }

        for (year, ok) in [(999, false), (1000, true), (9999, true), (10000, false)] {
            let result = validate(&entry_at(6, year));
            assert_eq!(result.is_ok(), ok, "year {}", year);
            if !ok {
                assert_eq!(result.unwrap_err().to_string(), INVALID_YEAR);
            }
        }
    }

    #[test]
    fn test_negative_four_character_year_is_invalid() {
        let entry = Entry::new().with_description("x").with_month(1).with_year(-999);
        assert_eq!(message(&entry), INVALID_YEAR);
    }
}
