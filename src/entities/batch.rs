//! Offering batch entity - Groups entries recorded together at one service.
//!
//! A batch carries the recorder, date, and mass/service context shared by
//! its entries. `major_mass_number` distinguishes the first and second major
//! mass and is present exactly when `mass_type` is MAJOR. Batches are
//! immutable once created.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Church service a batch was collected at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MassType {
    /// Main Sunday mass; comes in a first and second sitting
    #[sea_orm(string_value = "MAJOR")]
    Major,
    /// Early-morning service
    #[sea_orm(string_value = "MORNING_GLORY")]
    MorningGlory,
    /// Evening service
    #[sea_orm(string_value = "EVENING_GLORY")]
    EveningGlory,
    /// Cell-group service
    #[sea_orm(string_value = "SELI")]
    Seli,
}

impl MassType {
    /// Stable string form, matching the stored database value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Major => "MAJOR",
            Self::MorningGlory => "MORNING_GLORY",
            Self::EveningGlory => "EVENING_GLORY",
            Self::Seli => "SELI",
        }
    }
}

/// Offering batch database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offering_batches")]
pub struct Model {
    /// Unique identifier for the batch
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Street the batch was collected for
    pub street_id: i64,
    /// Name of the person who recorded the batch
    pub recorder_name: String,
    /// Service date shared by the batch's entries
    pub date: Date,
    /// Service the batch was collected at
    pub mass_type: MassType,
    /// 1 or 2 when `mass_type` is MAJOR, absent otherwise
    pub major_mass_number: Option<i16>,
    /// When the batch row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Batch and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each batch belongs to one street
    #[sea_orm(
        belongs_to = "super::street::Entity",
        from = "Column::StreetId",
        to = "super::street::Column::Id"
    )]
    Street,
    /// One batch owns many entries
    #[sea_orm(has_many = "super::entry::Entity")]
    Entries,
}

impl Related<super::street::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Street.def()
    }
}

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
