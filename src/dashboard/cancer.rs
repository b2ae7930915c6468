//! Global cancer patients dashboard (2015-2024).

use crate::color::{GOLDENROD, INDIAN_RED, MEDIUM_SEA_GREEN, STEEL_BLUE, TEAL};
use crate::data::aggregate::SortOrder;

use super::{
    ChartKind, ChartSpec, ColumnRef, FilterSpec, Layout, MetricSpec, NumberFormat,
};

pub const DATA_FILE: &str = "global_cancer_patients_2015_2024.csv";

pub const COUNTRY: &str = "Country_Region";
pub const CANCER_TYPE: &str = "Cancer_Type";
pub const CANCER_STAGE: &str = "Cancer_Stage";
pub const TREATMENT_COST: &str = "Treatment_Cost_USD";
pub const SURVIVAL_YEARS: &str = "Survival_Years";

pub const TOTAL_PATIENTS: &str = "Total de Pacientes";
pub const MEAN_COST: &str = "Custo Médio de Tratamento (USD)";
pub const MEAN_SURVIVAL: &str = "Sobrevida Média (Anos)";

fn filter(column: &str, label: &str) -> FilterSpec {
    FilterSpec {
        column: column.to_string(),
        label: label.to_string(),
    }
}

pub fn layout() -> Layout {
    Layout {
        title: "🌎 Análise Global de Pacientes com Câncer (2015-2024)".into(),
        description: "Este projeto explora a relação entre tipos de câncer, distribuição \
                      geográfica e custo de tratamento em escala global entre 2015 e 2024."
            .into(),
        filter_heading: "Filtros".into(),
        preview_heading: "🔍 Visão Geral dos Dados Filtrados".into(),
        metrics_heading: "📊 Métricas Chave".into(),
        filters: vec![
            filter(COUNTRY, "Filtrar por País/Região"),
            filter(CANCER_TYPE, "Filtrar por Tipo de Câncer"),
            filter(CANCER_STAGE, "Filtrar por Estágio do Câncer"),
        ],
        pickers: Vec::new(),
        metrics: vec![
            MetricSpec::Count {
                label: TOTAL_PATIENTS.into(),
            },
            MetricSpec::Mean {
                label: Some(MEAN_COST.into()),
                column: ColumnRef::fixed(TREATMENT_COST),
                format: NumberFormat::Grouped2,
            },
            MetricSpec::Mean {
                label: Some(MEAN_SURVIVAL.into()),
                column: ColumnRef::fixed(SURVIVAL_YEARS),
                format: NumberFormat::Fixed2,
            },
        ],
        charts: vec![
            ChartSpec {
                heading: "📍 Distribuição de Pacientes por País/Região (Filtrado)".into(),
                title: "Número de Pacientes por País/Região".into(),
                kind: ChartKind::Histogram {
                    column: ColumnRef::fixed(COUNTRY),
                },
                x_label: Some("País/Região".into()),
                y_label: Some("Número de Pacientes".into()),
                color: INDIAN_RED,
            },
            ChartSpec {
                heading: "🧬 Tipos de Câncer Mais Frequentes (Filtrado)".into(),
                title: "Tipos de Câncer".into(),
                kind: ChartKind::Histogram {
                    column: ColumnRef::fixed(CANCER_TYPE),
                },
                x_label: Some("Tipo de Câncer".into()),
                y_label: Some("Contagem".into()),
                color: TEAL,
            },
            ChartSpec {
                heading: "💸 Custo de Tratamento vs Anos de Sobrevivência (Filtrado)".into(),
                title: "Custo de Tratamento vs Anos de Sobrevivência".into(),
                kind: ChartKind::Scatter {
                    x: ColumnRef::fixed(TREATMENT_COST),
                    y: ColumnRef::fixed(SURVIVAL_YEARS),
                    color_by: Some(ColumnRef::fixed(CANCER_STAGE)),
                },
                x_label: Some("Custo do Tratamento (USD)".into()),
                y_label: Some("Anos de Sobrevivência".into()),
                color: STEEL_BLUE,
            },
            ChartSpec {
                heading: "💰 Custo Médio de Tratamento por Tipo de Câncer".into(),
                title: "Custo Médio de Tratamento por Tipo de Câncer".into(),
                kind: ChartKind::RankedBar {
                    group: ColumnRef::fixed(CANCER_TYPE),
                    target: ColumnRef::fixed(TREATMENT_COST),
                    order: SortOrder::Descending,
                },
                x_label: Some("Tipo de Câncer".into()),
                y_label: Some("Custo Médio (USD)".into()),
                color: GOLDENROD,
            },
            ChartSpec {
                heading: "⏳ Sobrevida Média por Estágio do Câncer".into(),
                title: "Sobrevida Média por Estágio do Câncer".into(),
                kind: ChartKind::RankedBar {
                    group: ColumnRef::fixed(CANCER_STAGE),
                    target: ColumnRef::fixed(SURVIVAL_YEARS),
                    order: SortOrder::Ascending,
                },
                x_label: Some("Estágio do Câncer".into()),
                y_label: Some("Sobrevida Média (Anos)".into()),
                color: MEDIUM_SEA_GREEN,
            },
        ],
    }
}
