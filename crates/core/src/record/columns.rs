//! Column names of the support sheet.

/// Declared output identifier.
pub const POSICAO: &str = "POSICAO";
/// Declared template name.
pub const TIPO_SUPORTE: &str = "TipoSuporte";
/// Legacy header accepted in place of `TipoSuporte`.
pub const TEMPLATE_ALIAS: &str = "Name";
pub const ELEVACAO: &str = "Elevacao";
pub const MEDIDA_H: &str = "MEDIDA_H";
pub const MEDIDA_L: &str = "MEDIDA_L";
pub const MEDIDA_M: &str = "MEDIDA_M";
pub const MEDIDA_H1: &str = "MEDIDA_H1";
pub const MEDIDA_H2: &str = "MEDIDA_H2";
pub const MEDIDA_L1: &str = "MEDIDA_L1";
pub const MEDIDA_L2: &str = "MEDIDA_L2";
pub const MEDIDA_B: &str = "MEDIDA_B";
pub const NUM_DOC: &str = "NUM_DOC";
pub const QTD: &str = "QTD";
pub const CLIENTE: &str = "CLIENTE";

/// Columns whose absence aborts the batch.
pub const REQUIRED: [&str; 11] = [
    POSICAO,
    TIPO_SUPORTE,
    ELEVACAO,
    MEDIDA_H,
    MEDIDA_L,
    MEDIDA_M,
    MEDIDA_H1,
    MEDIDA_H2,
    MEDIDA_L1,
    MEDIDA_L2,
    MEDIDA_B,
];

/// Columns read when present; a missing column behaves like blank cells.
pub const OPTIONAL: [&str; 3] = [NUM_DOC, QTD, CLIENTE];
