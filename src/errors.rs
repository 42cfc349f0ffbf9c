use crate::equipment::EquipmentType;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChpDefaultsError {
    #[error("Could not read reference table {path}: {source}")]
    UnreadableTable {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error(
        "Reference table {table} has no {equipment_type} value at {capacity_kw} kW, \
         which is a boundary of size class {class_index}"
    )]
    MissingBoundaryRow {
        table: String,
        equipment_type: EquipmentType,
        class_index: usize,
        capacity_kw: f64,
    },
    #[error("Could not write defaults document to {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("Size classes for {equipment_type} are invalid: {reason}")]
pub struct InvalidSizeClassesError {
    equipment_type: EquipmentType,
    reason: String,
}

impl InvalidSizeClassesError {
    pub(crate) fn new(equipment_type: EquipmentType, reason: impl Into<String>) -> Self {
        Self {
            equipment_type,
            reason: reason.into(),
        }
    }
}

/// A cell in a reference table that could not be read as a number.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("Value {value:?} in row {row}, column {column:?} is not a number")]
pub struct MalformedCellError {
    pub(crate) row: usize,
    pub(crate) column: String,
    pub(crate) value: String,
}
