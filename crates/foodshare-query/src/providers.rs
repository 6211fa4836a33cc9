// SPDX-License-Identifier: Apache-2.0

use foodshare_model::{LabeledTable, Provider, ProviderId};
use rusqlite::types::Value;

use crate::{QueryError, QueryErrorCode, QueryRunner};

const SQL_INSERT: &str = "
    INSERT INTO providers (Provider_ID, Name, Type, Address, City, Contact)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const SQL_LIST: &str = "
    SELECT Provider_ID, Name, Type, Address, City, Contact
    FROM providers
    ORDER BY Provider_ID ASC";

const SQL_GET: &str = "
    SELECT Provider_ID, Name, Type, Address, City, Contact
    FROM providers
    WHERE Provider_ID = ?1";

const SQL_UPDATE: &str = "
    UPDATE providers
    SET Name = ?1, Type = ?2, Address = ?3, City = ?4, Contact = ?5
    WHERE Provider_ID = ?6";

const SQL_DELETE: &str = "DELETE FROM providers WHERE Provider_ID = ?1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderAction {
    Created,
    Updated,
    Deleted,
}

impl ProviderAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// Acknowledgement of a successful provider mutation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Confirmation {
    pub provider_id: ProviderId,
    pub action: ProviderAction,
}

impl Confirmation {
    #[must_use]
    pub fn message(&self) -> String {
        format!("provider {} {}", self.provider_id, self.action.as_str())
    }
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn id_value(id: ProviderId) -> Value {
    Value::Integer(id.get())
}

/// Inserts a new provider. A taken id fails with `ConstraintViolation` and the
/// stored row is left as it was.
pub fn create_provider(
    runner: &QueryRunner,
    provider: &Provider,
) -> Result<Confirmation, QueryError> {
    let params = [
        id_value(provider.id),
        text(&provider.name),
        text(&provider.provider_type),
        text(&provider.address),
        text(&provider.city),
        text(&provider.contact),
    ];
    runner.write(SQL_INSERT, &params).map_err(|e| {
        if e.code == QueryErrorCode::ConstraintViolation {
            QueryError::new(
                e.code,
                format!("provider {} already exists: {}", provider.id, e.message),
            )
        } else {
            e
        }
    })?;
    tracing::info!(provider_id = provider.id.get(), "provider created");
    Ok(Confirmation {
        provider_id: provider.id,
        action: ProviderAction::Created,
    })
}

pub fn list_providers(runner: &QueryRunner) -> Result<LabeledTable, QueryError> {
    runner.read(SQL_LIST, &[])
}

pub fn get_provider(runner: &QueryRunner, id: ProviderId) -> Result<Provider, QueryError> {
    let table = runner.read(SQL_GET, &[id_value(id)])?;
    if table.is_empty() {
        return Err(QueryError::not_found(format!("provider {id} does not exist")));
    }
    Ok(Provider::from_row(&table, 0)?)
}

/// Overwrites every descriptive field of an existing provider.
pub fn update_provider(
    runner: &QueryRunner,
    provider: &Provider,
) -> Result<Confirmation, QueryError> {
    let params = [
        text(&provider.name),
        text(&provider.provider_type),
        text(&provider.address),
        text(&provider.city),
        text(&provider.contact),
        id_value(provider.id),
    ];
    if runner.write(SQL_UPDATE, &params)? == 0 {
        return Err(QueryError::not_found(format!(
            "provider {} does not exist",
            provider.id
        )));
    }
    tracing::info!(provider_id = provider.id.get(), "provider updated");
    Ok(Confirmation {
        provider_id: provider.id,
        action: ProviderAction::Updated,
    })
}

/// Deletes one provider. Nothing cascades: with foreign key enforcement on,
/// a provider that still has listings fails with `ConstraintViolation`.
pub fn delete_provider(runner: &QueryRunner, id: ProviderId) -> Result<Confirmation, QueryError> {
    if runner.write(SQL_DELETE, &[id_value(id)])? == 0 {
        return Err(QueryError::not_found(format!("provider {id} does not exist")));
    }
    tracing::info!(provider_id = id.get(), "provider deleted");
    Ok(Confirmation {
        provider_id: id,
        action: ProviderAction::Deleted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_message_names_id_and_action() {
        let ack = Confirmation {
            provider_id: ProviderId::new(99),
            action: ProviderAction::Deleted,
        };
        assert_eq!(ack.message(), "provider 99 deleted");
    }

    #[test]
    fn statements_bind_every_field() {
        for sql in [SQL_INSERT, SQL_UPDATE] {
            assert!(sql.contains("?6"));
            assert!(!sql.contains("?7"));
        }
        assert!(SQL_LIST.contains("ORDER BY Provider_ID"));
    }
}
