use thiserror::Error;

#[derive(Error, Debug)]
pub enum FusilladeError {
    #[error("Unit not found: {0:?}")]
    UnitNotFound(crate::core::types::UnitId),

    #[error("Weapon slot {slot} not mounted on unit {unit:?}")]
    WeaponNotMounted {
        unit: crate::core::types::UnitId,
        slot: usize,
    },

    #[error("Invalid rules table {file}: {reason}")]
    InvalidTable { file: String, reason: String },

    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FusilladeError>;
