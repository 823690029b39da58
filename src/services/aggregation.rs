// src/services/aggregation.rs

use std::collections::HashMap;

use crate::models::{
    dashboard::{AnalyticsOverview, ProcedureFrequency, ProcedureSummary},
    transactions::{EnrichedTransaction, WithdrawalRecord},
};

// Cores das barras, na ordem do ranking
pub const CHART_COLORS: [&str; 12] = [
    "#3b82f6", "#8b5cf6", "#ec4899", "#f59e0b", "#10b981", "#06b6d4",
    "#f97316", "#14b8a6", "#a855f7", "#6366f1", "#ef4444", "#84cc16",
];

// O que a agregação precisa de um registro, bruto ou enriquecido.
pub trait ProcedureRecord {
    fn procedure_name(&self) -> &str;
    fn item_quantity(&self) -> u64;
}

impl ProcedureRecord for WithdrawalRecord {
    fn procedure_name(&self) -> &str {
        &self.procedure.name
    }

    fn item_quantity(&self) -> u64 {
        self.procedure.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

impl ProcedureRecord for EnrichedTransaction {
    fn procedure_name(&self) -> &str {
        &self.procedimento
    }

    fn item_quantity(&self) -> u64 {
        self.quantidade_total
    }
}

#[derive(Default)]
struct GroupBuilder {
    first_seen: usize,
    retiradas: u32,
    itens_total: u64,
}

// Agrupa por nome do procedimento e ordena por retiradas (desc),
// desempate pela primeira aparição na entrada.
fn group_by_procedure<T: ProcedureRecord>(records: &[T]) -> Vec<(String, GroupBuilder)> {
    let mut groups: HashMap<&str, GroupBuilder> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        let entry = groups
            .entry(record.procedure_name())
            .or_insert_with(|| GroupBuilder {
                first_seen: index,
                ..GroupBuilder::default()
            });
        entry.retiradas = entry.retiradas.saturating_add(1);
        entry.itens_total = entry.itens_total.saturating_add(record.item_quantity());
    }

    let mut grouped: Vec<(String, GroupBuilder)> = groups
        .into_iter()
        .map(|(name, builder)| (name.to_string(), builder))
        .collect();

    grouped.sort_by(|(_, a), (_, b)| {
        b.retiradas
            .cmp(&a.retiradas)
            .then(a.first_seen.cmp(&b.first_seen))
    });
    grouped
}

/// Retiradas por procedimento (uma por registro, não por item).
pub fn count_by_procedure<T: ProcedureRecord>(records: &[T]) -> Vec<ProcedureFrequency> {
    group_by_procedure(records)
        .into_iter()
        .enumerate()
        .map(|(rank, (name, builder))| ProcedureFrequency {
            name,
            quantidade: builder.retiradas,
            color: CHART_COLORS[rank % CHART_COLORS.len()].to_string(),
        })
        .collect()
}

/// Retiradas e soma das quantidades de itens por procedimento.
pub fn summarize_by_procedure<T: ProcedureRecord>(records: &[T]) -> Vec<ProcedureSummary> {
    group_by_procedure(records)
        .into_iter()
        .map(|(name, builder)| ProcedureSummary {
            name,
            retiradas: builder.retiradas,
            itens_total: builder.itens_total,
        })
        .collect()
}

pub fn overview<T: ProcedureRecord>(records: &[T]) -> AnalyticsOverview {
    let chart = count_by_procedure(records);

    AnalyticsOverview {
        total_retiradas: chart.iter().map(|entry| entry.quantidade).sum(),
        procedimentos_distintos: chart.len(),
        mais_retirado: chart.first().cloned(),
        chart,
    }
}

// Participação percentual; 0 quando o total é 0.
pub fn share_of(part: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        (f64::from(part) / f64::from(total)) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transactions::{Procedure, ProcedureItem};

    fn withdrawal(procedure: &str, quantities: &[u32]) -> WithdrawalRecord {
        WithdrawalRecord {
            employee_id: "emp".to_string(),
            employee_name: None,
            procedure: Procedure {
                id: format!("proc-{procedure}"),
                name: procedure.to_string(),
                items: quantities
                    .iter()
                    .enumerate()
                    .map(|(i, q)| ProcedureItem {
                        id: format!("item-{i}"),
                        name: format!("Item {i}"),
                        quantity: *q,
                    })
                    .collect(),
            },
            timestamp: "2025-10-23T12:00:00Z".to_string(),
        }
    }

    #[test]
    fn grouped_summary_adds_counts_and_quantities() {
        let records = vec![withdrawal("X", &[2]), withdrawal("X", &[3]), withdrawal("Y", &[1])];

        let summary = summarize_by_procedure(&records);

        assert_eq!(
            summary,
            vec![
                ProcedureSummary { name: "X".to_string(), retiradas: 2, itens_total: 5 },
                ProcedureSummary { name: "Y".to_string(), retiradas: 1, itens_total: 1 },
            ]
        );
    }

    #[test]
    fn large_quantities_do_not_overflow_the_totals() {
        let records = vec![
            withdrawal("X", &[3_000_000_000]),
            withdrawal("X", &[3_000_000_000, u32::MAX]),
        ];

        let summary = summarize_by_procedure(&records);

        assert_eq!(summary[0].retiradas, 2);
        assert_eq!(summary[0].itens_total, 6_000_000_000 + u64::from(u32::MAX));
    }

    #[test]
    fn frequency_counts_sum_to_the_number_of_records() {
        let records = vec![
            withdrawal("Triagem", &[1, 1, 1]),
            withdrawal("Curativo simples", &[1]),
            withdrawal("Triagem", &[]),
            withdrawal("Coleta de Sangue", &[2]),
        ];

        let chart = count_by_procedure(&records);

        let total: u32 = chart.iter().map(|c| c.quantidade).sum();
        assert_eq!(total, records.len() as u32);
        assert_eq!(chart[0].name, "Triagem");
        assert_eq!(chart[0].quantidade, 2);
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let records = vec![
            withdrawal("B", &[1]),
            withdrawal("A", &[1]),
            withdrawal("C", &[1]),
            withdrawal("A", &[1]),
            withdrawal("B", &[1]),
        ];

        let names: Vec<String> = count_by_procedure(&records).into_iter().map(|c| c.name).collect();

        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn colors_follow_the_rank() {
        let records: Vec<WithdrawalRecord> =
            (0..13).map(|i| withdrawal(&format!("P{i}"), &[1])).collect();

        let chart = count_by_procedure(&records);

        assert_eq!(chart[0].color, CHART_COLORS[0]);
        assert_eq!(chart[12].color, CHART_COLORS[0]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let records: Vec<WithdrawalRecord> = Vec::new();

        assert!(count_by_procedure(&records).is_empty());
        assert!(summarize_by_procedure(&records).is_empty());

        let overview = overview(&records);
        assert_eq!(overview.total_retiradas, 0);
        assert_eq!(overview.mais_retirado, None);
    }

    #[test]
    fn overview_reports_the_top_procedure() {
        let records = vec![withdrawal("X", &[1]), withdrawal("Y", &[1]), withdrawal("Y", &[1])];

        let overview = overview(&records);

        assert_eq!(overview.total_retiradas, 3);
        assert_eq!(overview.procedimentos_distintos, 2);
        assert_eq!(overview.mais_retirado.unwrap().name, "Y");
    }

    #[test]
    fn share_of_guards_zero_total() {
        assert_eq!(share_of(3, 0), 0.0);
        assert_eq!(share_of(1, 4), 25.0);
    }
}
