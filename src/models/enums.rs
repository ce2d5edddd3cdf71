use serde::{Deserialize, Serialize};

use super::SchemaError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = SchemaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(SchemaError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Wire tags are the ones the extraction prompt asks the model for.
str_enum!(DocumentType {
    IdentityCard => "CEDULA",
    InsuranceCertificate => "ACTA_SEGURO",
    Contract => "CONTRATO",
});

str_enum!(IssueKind {
    Missing => "missing",
    InvalidFormat => "invalid_format",
});

impl DocumentType {
    /// Key under which the model (and the persisted envelope) carries this
    /// type's payload.
    pub fn payload_key(&self) -> &'static str {
        match self {
            Self::IdentityCard => "cedula",
            Self::InsuranceCertificate => "acta_seguro",
            Self::Contract => "contrato",
        }
    }

    pub fn all() -> [DocumentType; 3] {
        [Self::IdentityCard, Self::InsuranceCertificate, Self::Contract]
    }
}
