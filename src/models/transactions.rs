// src/models/transactions.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// `null` e campo ausente têm o mesmo tratamento: valor padrão.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Formato canônico vindo de GET /transactions/ ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcedureItem {
    #[schema(example = "a5fc7a2e-a4a6-414a-87d6-b95fe2ea3dd3")]
    pub id: String,
    #[schema(example = "Luvas descartáveis")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = 1)]
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    #[schema(example = "a2e5fa7a-2784-4071-a65c-db8faac3f8df")]
    pub id: String,
    #[schema(example = "Curativo simples")]
    pub name: String,
    // A ordem importa: o primeiro item é o "principal" da tabela.
    // Lista ausente ou null no JSON vira lista vazia.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ProcedureItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRecord {
    #[schema(example = "3cfba964-545e-4e68-adaa-867ab2b0d155")]
    pub employee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub procedure: Procedure,
    #[schema(example = "2025-10-23T14:32:00Z")]
    pub timestamp: String,
}

// --- View model da tabela de histórico (derivado, nunca armazenado) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTransaction {
    pub employee_id: String,
    #[schema(example = "Dr. João Silva")]
    pub funcionario_nome: String,
    #[schema(example = "F-3CFBA964")]
    pub funcionario_id: String,
    #[schema(example = "Luvas descartáveis")]
    pub item: String,
    pub itens_adicionais: Vec<String>,
    pub itens: Vec<ProcedureItem>,
    #[schema(example = "Curativo simples")]
    pub procedimento: String,
    #[schema(example = "14:32")]
    pub horario: String,
    #[schema(example = "23/10/2025")]
    pub data: String,
    #[schema(example = "Procedimento realizado com 2 itens.")]
    pub observacoes: String,
    #[schema(example = "Laboratório Central")]
    pub setor: String,
    // None quando o timestamp da API não pôde ser lido
    pub timestamp_date: Option<DateTime<Utc>>,
    // u64: a soma de várias quantidades u32 não cabe em u32
    pub quantidade_total: u64,
    pub total_itens: usize,
}
