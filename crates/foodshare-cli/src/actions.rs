// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use foodshare_core::StoreConfig;
use foodshare_ingest::{
    ensure_schema, load_table, schema_report, seed_directory, LoadMode, LoadOptions,
    SCHEMA_VERSION,
};
use foodshare_model::{LookupClassifier, MealTypeClassifier, Provider, ProviderId, TableName};
use foodshare_query::{
    create_provider, delete_provider, explain_report, get_provider, list_providers, run_report,
    update_provider, QueryError, QueryErrorCode, QueryRunner, ReportKind,
};
use serde_json::json;

use crate::commands::ProviderFields;
use crate::helpers::{emit_ok, to_json};
use crate::{CliError, OutputMode};

fn mode(replace: bool) -> LoadMode {
    if replace {
        LoadMode::Replace
    } else {
        LoadMode::Append
    }
}

fn emit(output_mode: OutputMode, payload: serde_json::Value) -> Result<(), CliError> {
    emit_ok(output_mode, payload).map_err(CliError::internal)
}

pub(crate) fn init(config: &StoreConfig, output_mode: OutputMode) -> Result<(), CliError> {
    ensure_schema(config)?;
    emit(
        output_mode,
        json!({
            "command": "init",
            "status": "ok",
            "db": config.db_path,
            "schema_version": SCHEMA_VERSION,
        }),
    )
}

pub(crate) fn inspect(config: &StoreConfig, output_mode: OutputMode) -> Result<(), CliError> {
    let tables = schema_report(config)?;
    emit(
        output_mode,
        json!({
            "command": "inspect",
            "db": config.db_path,
            "tables": to_json(&tables).map_err(CliError::internal)?,
        }),
    )
}

pub(crate) fn load(
    config: &StoreConfig,
    table: TableName,
    csv: PathBuf,
    replace: bool,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let report = load_table(
        config,
        &LoadOptions {
            source: csv,
            table,
            mode: mode(replace),
        },
    )?;
    emit(
        output_mode,
        json!({
            "command": "load",
            "status": "ok",
            "report": to_json(&report).map_err(CliError::internal)?,
        }),
    )
}

pub(crate) fn seed(
    config: &StoreConfig,
    dir: &Path,
    replace: bool,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let reports = seed_directory(config, dir, mode(replace))?;
    emit(
        output_mode,
        json!({
            "command": "seed",
            "status": "ok",
            "reports": to_json(&reports).map_err(CliError::internal)?,
        }),
    )
}

pub(crate) fn report_list(output_mode: OutputMode) -> Result<(), CliError> {
    let reports: Vec<serde_json::Value> = ReportKind::ALL
        .into_iter()
        .map(|kind| {
            json!({
                "id": kind.id(),
                "title": kind.title(),
                "takes_city": kind.takes_city(),
            })
        })
        .collect();
    emit(output_mode, json!({ "reports": reports }))
}

pub(crate) fn report_run(
    config: &StoreConfig,
    id: &str,
    city: Option<&str>,
    explain: bool,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let kind = ReportKind::parse(id)?;
    let runner = QueryRunner::new(config.clone());
    if explain {
        let plan = explain_report(&runner, kind, city)?;
        return emit(output_mode, json!({ "report": kind.id(), "plan": plan }));
    }
    let table = run_report(&runner, kind, city)?;
    emit(
        output_mode,
        json!({
            "report": kind.id(),
            "title": kind.title(),
            "result": to_json(&table).map_err(CliError::internal)?,
        }),
    )
}

fn provider_from(fields: ProviderFields) -> Result<Provider, QueryError> {
    let id = ProviderId::parse(&fields.id)?;
    Ok(Provider::new(
        id,
        fields.name,
        fields.provider_type,
        fields.address,
        fields.city,
        fields.contact,
    ))
}

pub(crate) fn provider_create(
    config: &StoreConfig,
    fields: ProviderFields,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let runner = QueryRunner::new(config.clone());
    let provider = provider_from(fields)?;
    match create_provider(&runner, &provider) {
        Ok(ack) => emit(
            output_mode,
            json!({
                "status": "ok",
                "message": ack.message(),
                "confirmation": to_json(&ack).map_err(CliError::internal)?,
            }),
        ),
        Err(err) if err.code == QueryErrorCode::ConstraintViolation => {
            let mut cli_err = CliError::from(err);
            if let Ok(existing) = get_provider(&runner, provider.id) {
                let shown = serde_json::to_string(&existing)
                    .map_err(|e| CliError::internal(e.to_string()))?;
                cli_err = cli_err.with_detail("existing", &shown);
            }
            Err(cli_err)
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn provider_list(config: &StoreConfig, output_mode: OutputMode) -> Result<(), CliError> {
    let runner = QueryRunner::new(config.clone());
    let table = list_providers(&runner)?;
    emit(
        output_mode,
        json!({ "providers": to_json(&table).map_err(CliError::internal)? }),
    )
}

pub(crate) fn provider_get(
    config: &StoreConfig,
    id: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let id = ProviderId::parse(id).map_err(QueryError::from)?;
    let provider = get_provider(&QueryRunner::new(config.clone()), id)?;
    emit(
        output_mode,
        json!({ "provider": to_json(&provider).map_err(CliError::internal)? }),
    )
}

pub(crate) fn provider_update(
    config: &StoreConfig,
    fields: ProviderFields,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let provider = provider_from(fields)?;
    let ack = update_provider(&QueryRunner::new(config.clone()), &provider)?;
    emit(
        output_mode,
        json!({
            "status": "ok",
            "message": ack.message(),
            "confirmation": to_json(&ack).map_err(CliError::internal)?,
        }),
    )
}

pub(crate) fn provider_delete(
    config: &StoreConfig,
    id: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let id = ProviderId::parse(id).map_err(QueryError::from)?;
    let ack = delete_provider(&QueryRunner::new(config.clone()), id)?;
    emit(
        output_mode,
        json!({
            "status": "ok",
            "message": ack.message(),
            "confirmation": to_json(&ack).map_err(CliError::internal)?,
        }),
    )
}

pub(crate) fn classify(
    table: &Path,
    provider_type: &str,
    food_name: &str,
    location: &str,
    output_mode: OutputMode,
) -> Result<(), CliError> {
    let raw = fs::read_to_string(table).map_err(|e| {
        CliError::dependency("io", format!("cannot read {}: {e}", table.display()))
    })?;
    let classifier = LookupClassifier::from_json(&raw)?;
    let meal_type = classifier.classify(provider_type, food_name, location)?;
    emit(
        output_mode,
        json!({
            "provider_type": provider_type,
            "food_name": food_name,
            "location": location,
            "meal_type": meal_type,
        }),
    )
}
