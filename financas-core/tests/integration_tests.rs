//! End-to-end tests against a DuckDB file
//!
//! Run with: cargo test --test integration_tests

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

use financas_core::adapters::{DuckDbGateway, PasswordStorage};
use financas_core::config::{Config, PasswordScheme};
use financas_core::domain::Argon2Params;
use financas_core::services::AuthenticationService;
use financas_core::{Entry, EntryStatus, EntryType, Error, FinancasContext, Password, User};

fn fast_argon2() -> PasswordStorage {
    PasswordStorage::Argon2id(Argon2Params {
        time_cost: 1,
        memory_cost: 1024,
        parallelism: 1,
        ..Argon2Params::default()
    })
}

/// Context backed by a fresh database file in `dir`
fn open_context(dir: &TempDir, storage: PasswordStorage) -> FinancasContext {
    let gateway = DuckDbGateway::new(&dir.path().join("test.duckdb"), storage).unwrap();
    gateway.ensure_schema().unwrap();
    FinancasContext::with_gateway(Config::default(), Arc::new(gateway))
}

fn register(ctx: &FinancasContext, email: &str) -> User {
    ctx.credential_service
        .register_user(User::new("Usuario", email, Password::plain("senha")))
        .unwrap()
}

fn entry_for(owner: Uuid, description: &str, month: i32, entry_type: EntryType, cents: i64) -> Entry {
    Entry::new()
        .with_description(description)
        .with_month(month)
        .with_year(2024)
        .with_value(Decimal::new(cents, 2))
        .with_type(entry_type)
        .with_owner(owner)
}

#[test]
fn test_entry_lifecycle() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir, PasswordStorage::Plain);
    let owner = register(&ctx, "a@a.com").id.unwrap();
    let service = &ctx.entry_service;

    let created = service
        .create(entry_for(owner, "Salario", 1, EntryType::Income, 500000))
        .unwrap();
    let id = created.id.unwrap();
    assert_eq!(created.status, Some(EntryStatus::Pending));

    let updated = service
        .update(Entry {
            description: Some("Salario janeiro".to_string()),
            ..created
        })
        .unwrap();
    assert_eq!(
        service.get_by_id(id).unwrap().unwrap().description.as_deref(),
        Some("Salario janeiro")
    );

    let effective = service.update_status(updated, EntryStatus::Effective).unwrap();
    assert_eq!(
        service.get_by_id(id).unwrap().unwrap().status,
        Some(EntryStatus::Effective)
    );

    service.delete(&effective).unwrap();
    assert!(service.get_by_id(id).unwrap().is_none());
}

#[test]
fn test_validation_failure_leaves_database_untouched() {
    let dir = TempDir::new().unwrap();
    let gateway = Arc::new(DuckDbGateway::new(&dir.path().join("test.duckdb"), PasswordStorage::Plain).unwrap());
    gateway.ensure_schema().unwrap();
    let ctx = FinancasContext::with_gateway(Config::default(), gateway.clone());

    let err = ctx
        .entry_service
        .create(Entry::new().with_description("Salario").with_month(13))
        .unwrap_err();

    assert_eq!(err.to_string(), "Informe um Mês válido.");
    assert_eq!(gateway.entry_count().unwrap(), 0);
}

#[test]
fn test_search_filters_and_order() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir, PasswordStorage::Plain);
    let owner = register(&ctx, "a@a.com").id.unwrap();
    let other = register(&ctx, "b@b.com").id.unwrap();
    let service = &ctx.entry_service;

    let jan = service
        .create(entry_for(owner, "Salario", 1, EntryType::Income, 500000))
        .unwrap();
    let rent = service
        .create(entry_for(owner, "Aluguel", 1, EntryType::Expense, 150000))
        .unwrap();
    let feb = service
        .create(entry_for(owner, "Salario", 2, EntryType::Income, 500000))
        .unwrap();
    service
        .create(entry_for(other, "Salario", 1, EntryType::Income, 100))
        .unwrap();

    let by_owner = service.search(&Entry::new().with_owner(owner)).unwrap();
    assert_eq!(by_owner, vec![jan.clone(), rent.clone(), feb.clone()]);

    let january = service
        .search(&Entry::new().with_owner(owner).with_month(1))
        .unwrap();
    assert_eq!(january, vec![jan.clone(), rent.clone()]);

    let salaries = service
        .search(&Entry::new().with_description("Salario").with_owner(owner))
        .unwrap();
    assert_eq!(salaries, vec![jan.clone(), feb]);

    let by_value = service
        .search(&Entry::new().with_value(Decimal::from(1500)))
        .unwrap();
    assert_eq!(by_value, vec![rent]);

    let by_date = service
        .search(&Entry::new().with_registration_date(jan.registration_date.unwrap()))
        .unwrap();
    assert_eq!(by_date.len(), 4);

    assert_eq!(service.search(&Entry::new()).unwrap().len(), 4);
}

#[test]
fn test_balance_for_user() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir, PasswordStorage::Plain);
    let owner = register(&ctx, "a@a.com").id.unwrap();
    let service = &ctx.entry_service;

    let salary = service
        .create(entry_for(owner, "Salario", 1, EntryType::Income, 500000))
        .unwrap();
    let rent = service
        .create(entry_for(owner, "Aluguel", 1, EntryType::Expense, 150025))
        .unwrap();
    let canceled = service
        .create(entry_for(owner, "Mercado", 1, EntryType::Expense, 30000))
        .unwrap();

    service.update_status(salary, EntryStatus::Effective).unwrap();
    service.update_status(rent, EntryStatus::Effective).unwrap();
    service.update_status(canceled, EntryStatus::Canceled).unwrap();

    assert_eq!(service.balance_for_user(owner).unwrap(), Decimal::new(349975, 2));
}

#[test]
fn test_update_of_deleted_entry_is_not_found() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir, PasswordStorage::Plain);
    let owner = register(&ctx, "a@a.com").id.unwrap();

    let entry = ctx
        .entry_service
        .create(entry_for(owner, "Salario", 1, EntryType::Income, 100))
        .unwrap();
    ctx.entry_service.delete(&entry).unwrap();

    let err = ctx.entry_service.update(entry).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_register_and_authenticate_with_hashed_storage() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir, fast_argon2());

    let user = register(&ctx, "email@email.com");
    assert!(user.password.is_hashed());

    let logged_in = ctx
        .credential_service
        .authenticate("email@email.com", "senha")
        .unwrap();
    assert_eq!(logged_in.id, user.id);
    assert!(logged_in.password.is_hashed());

    let err = ctx
        .credential_service
        .authenticate("email@email.com", "errada")
        .unwrap_err();
    assert_eq!(err.to_string(), "Senha inválida.");

    let err = ctx
        .credential_service
        .authenticate("outro@email.com", "senha")
        .unwrap_err();
    assert_eq!(err.to_string(), "Usuario não encontrado para o email informado.");
}

#[test]
fn test_plain_storage_keeps_plain_password() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir, PasswordStorage::Plain);

    register(&ctx, "email@email.com");
    let found = ctx.gateway.find_user_by_email("email@email.com").unwrap().unwrap();

    assert_eq!(found.password.scheme(), "plain");
    assert!(found.password.matches("senha").unwrap());
}

#[test]
fn test_duplicate_email_rejected() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir, PasswordStorage::Plain);
    register(&ctx, "email@email.com");

    let err = ctx
        .credential_service
        .register_user(User::new("Outro", "email@email.com", Password::plain("x")))
        .unwrap_err();
    assert_eq!(err.to_string(), "Já existe um usuário cadastrado com este email.");

    // Bypassing the service still hits the UNIQUE constraint
    let err = ctx
        .gateway
        .create_user(&User::new("Outro", "email@email.com", Password::plain("x")))
        .unwrap_err();
    assert!(matches!(err, Error::Database(_)));
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let (owner, entry_id) = {
        let ctx = open_context(&dir, fast_argon2());
        let owner = register(&ctx, "email@email.com").id.unwrap();
        let entry = ctx
            .entry_service
            .create(entry_for(owner, "Salario", 1, EntryType::Income, 500000).with_registration_date(date))
            .unwrap();
        (owner, entry.id.unwrap())
    };

    let ctx = open_context(&dir, fast_argon2());
    let entry = ctx.entry_service.get_by_id(entry_id).unwrap().unwrap();
    assert_eq!(entry.owner_user_id, Some(owner));
    assert_eq!(entry.registration_date, Some(date));
    assert_eq!(entry.value, Some(Decimal::new(500000, 2)));

    let user = ctx.credential_service.get_user_by_id(owner).unwrap().unwrap();
    assert_eq!(user.email, "email@email.com");
    assert!(ctx.credential_service.authenticate("email@email.com", "senha").is_ok());
}

#[test]
fn test_context_new_creates_database_in_data_dir() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.password_storage = PasswordScheme::Plain;
    config.save(dir.path()).unwrap();

    let ctx = FinancasContext::new(dir.path()).unwrap();
    register(&ctx, "email@email.com");

    assert!(dir.path().join("financas.duckdb").exists());
    assert!(ctx.credential_service.authenticate("email@email.com", "senha").is_ok());
}

#[test]
fn test_migrations_are_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("test.duckdb");

    let gateway = DuckDbGateway::new(&path, PasswordStorage::Plain).unwrap();
    let first = gateway.run_migrations().unwrap();
    assert!(!first.applied.is_empty());
    drop(gateway);

    let gateway = DuckDbGateway::new(&path, PasswordStorage::Plain).unwrap();
    let second = gateway.run_migrations().unwrap();
    assert!(second.applied.is_empty());
    assert_eq!(second.already_applied, first.applied.len());
}

#[test]
fn test_fractional_value_survives_round_trip() {
    let dir = TempDir::new().unwrap();
    let ctx = open_context(&dir, PasswordStorage::Plain);
    let owner = register(&ctx, "a@a.com").id.unwrap();

    let created = ctx
        .entry_service
        .create(entry_for(owner, "Juros", 1, EntryType::Income, 0).with_value(Decimal::new(1, 3)))
        .unwrap();

    let found = ctx.entry_service.get_by_id(created.id.unwrap()).unwrap().unwrap();
    assert_eq!(found, created);
    assert!(found.value.unwrap() > Decimal::ZERO);
}
