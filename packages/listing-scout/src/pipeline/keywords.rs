//! Keyword lists used by the scoring engine.
//!
//! Entries are stored lowercase and accent-folded, so they compare directly
//! against text passed through [`fold_accents`](crate::extract::text::fold_accents).

/// Phrases suggesting a motivated seller or a renovation opportunity.
/// No entry contains another.
pub static RENOVATION_KEYWORDS: &[&str] = &[
    "reforma",
    "estado original",
    "oportunidade",
    "abaixo do mercado",
    "urgente",
    "aceita proposta",
    "aceita permuta",
    "venda rapida",
    "inventario",
    "espolio",
    "heranca",
    "motivo viagem",
    "preco de ocasiao",
];

/// Phrases suggesting structural or water damage.
pub static DAMAGE_KEYWORDS: &[&str] = &[
    "infiltracao",
    "mofo",
    "umidade",
    "rachadura",
    "trinca",
    "vazamento",
    "problema estrutural",
    "goteira",
    "cupim",
];
