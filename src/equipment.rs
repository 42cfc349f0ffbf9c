use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The kinds of generating equipment that default parameters are built for.
///
/// The string form of each variant is also the column name used for it in the
/// reference tables and the key used for it in the output documents.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EquipmentType {
    RecipEngine,
    MicroTurbine,
    CombustionTurbine,
    FuelCell,
    SteamTurbine,
}

impl EquipmentType {
    /// The CHP prime movers, in the order they appear in the combined CHP document.
    pub const CHP_PRIME_MOVERS: [EquipmentType; 4] = [
        EquipmentType::RecipEngine,
        EquipmentType::MicroTurbine,
        EquipmentType::CombustionTurbine,
        EquipmentType::FuelCell,
    ];

    pub fn column_name(&self) -> &'static str {
        self.into()
    }

    pub fn is_chp_prime_mover(&self) -> bool {
        Self::CHP_PRIME_MOVERS.contains(self)
    }
}
