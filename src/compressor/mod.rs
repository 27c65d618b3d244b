pub mod codec;
pub mod header;
pub mod reference;

use serde::{Deserialize, Serialize};

/// The two coding variants the codec offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodingVariant {
    /// Context-free coding: every symbol is coded on its own.
    Simple,
    /// Coding conditioned on the preceding symbol.
    Contextual,
}

impl CodingVariant {
    pub const ALL: [CodingVariant; 2] = [CodingVariant::Simple, CodingVariant::Contextual];

    /// Flag selecting the variant in encode mode.
    pub fn encode_flag(self) -> &'static str {
        match self {
            CodingVariant::Simple => "-h",
            CodingVariant::Contextual => "-",
        }
    }

    /// Flag selecting decode mode for the variant.
    pub fn decode_flag(self) -> &'static str {
        match self {
            CodingVariant::Simple => "-xh",
            CodingVariant::Contextual => "-x",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CodingVariant::Simple => "simple",
            CodingVariant::Contextual => "contextual",
        }
    }
}
