// src/services/enrichment.rs

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use rand::Rng;

use crate::{
    models::transactions::{EnrichedTransaction, WithdrawalRecord},
    services::name_cache::{display_id, NameResolver},
};

pub const UNSPECIFIED_ITEM: &str = "Não especificado";
const UNKNOWN_TIME: &str = "--:--";
const UNKNOWN_DATE: &str = "--/--/----";

#[derive(Debug, Clone)]
pub struct EnrichmentOptions {
    pub display_offset: FixedOffset,
    pub sector_label: String,
}

// RFC 3339; sem fuso ("2025-10-23T14:32:00.000") é lido como UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn observation(item_count: usize) -> String {
    let noun = if item_count == 1 { "item" } else { "itens" };
    format!("Procedimento realizado com {item_count} {noun}.")
}

pub fn enrich_record<R: Rng>(
    record: &WithdrawalRecord,
    resolver: &NameResolver<R>,
    options: &EnrichmentOptions,
) -> EnrichedTransaction {
    let timestamp_date = parse_timestamp(&record.timestamp);
    if timestamp_date.is_none() {
        tracing::warn!(
            "Timestamp inválido na retirada de {}: '{}'",
            record.employee_id,
            record.timestamp
        );
    }

    let funcionario_nome =
        resolver.resolve_with_hint(&record.employee_id, record.employee_name.as_deref());

    let items = &record.procedure.items;
    let item = items
        .first()
        .map(|first| first.name.clone())
        .unwrap_or_else(|| UNSPECIFIED_ITEM.to_string());
    let itens_adicionais = items.iter().skip(1).map(|i| i.name.clone()).collect();

    // Hora e data saem do mesmo instante convertido.
    let (horario, data) = match timestamp_date {
        Some(ts) => {
            let local = ts.with_timezone(&options.display_offset);
            (
                local.format("%H:%M").to_string(),
                local.format("%d/%m/%Y").to_string(),
            )
        }
        None => (UNKNOWN_TIME.to_string(), UNKNOWN_DATE.to_string()),
    };

    EnrichedTransaction {
        employee_id: record.employee_id.clone(),
        funcionario_nome,
        funcionario_id: display_id(&record.employee_id),
        item,
        itens_adicionais,
        itens: items.clone(),
        procedimento: record.procedure.name.clone(),
        horario,
        data,
        observacoes: observation(items.len()),
        setor: options.sector_label.clone(),
        timestamp_date,
        quantidade_total: items.iter().map(|i| u64::from(i.quantity)).sum(),
        total_itens: items.len(),
    }
}

/// Enriquece as retiradas e ordena da mais recente para a mais antiga.
///
/// A ordenação é estável: timestamps iguais mantêm a ordem de entrada.
/// Registros com timestamp ilegível ficam no fim.
pub fn enrich_transactions<R: Rng>(
    records: &[WithdrawalRecord],
    resolver: &NameResolver<R>,
    options: &EnrichmentOptions,
) -> Vec<EnrichedTransaction> {
    let mut enriched: Vec<EnrichedTransaction> = records
        .iter()
        .map(|record| enrich_record(record, resolver, options))
        .collect();

    // None < Some(_), então na ordem decrescente os inválidos vão para o fim
    enriched.sort_by(|a, b| b.timestamp_date.cmp(&a.timestamp_date));
    enriched
}
