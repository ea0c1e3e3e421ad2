use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TIMESTAMP_FORMAT;

/// Lifecycle of a swatch card.
///
/// ```text
/// AKTIF ──► DOLU ──► KARTELA_ARSIV / KALITE_ARSIV ──► KULLANIM_DISI
///   └──────────┴──────────────────────────────────────────┘
/// ```
///
/// A reset returns any status to `AKTIF`; it is not a transition.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwatchStatus {
    #[sea_orm(string_value = "AKTIF")]
    Aktif,
    #[sea_orm(string_value = "DOLU")]
    Dolu,
    #[sea_orm(string_value = "KARTELA_ARSIV")]
    KartelaArsiv,
    #[sea_orm(string_value = "KALITE_ARSIV")]
    KaliteArsiv,
    #[sea_orm(string_value = "KULLANIM_DISI")]
    KullanimDisi,
}

impl SwatchStatus {
    pub const ALL: [SwatchStatus; 5] = [
        SwatchStatus::Aktif,
        SwatchStatus::Dolu,
        SwatchStatus::KartelaArsiv,
        SwatchStatus::KaliteArsiv,
        SwatchStatus::KullanimDisi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SwatchStatus::Aktif => "AKTIF",
            SwatchStatus::Dolu => "DOLU",
            SwatchStatus::KartelaArsiv => "KARTELA_ARSIV",
            SwatchStatus::KaliteArsiv => "KALITE_ARSIV",
            SwatchStatus::KullanimDisi => "KULLANIM_DISI",
        }
    }

    pub fn is_archived(&self) -> bool {
        matches!(self, SwatchStatus::KartelaArsiv | SwatchStatus::KaliteArsiv)
    }

    /// Whether `self → next` is a legal status change.
    pub fn can_transition_to(&self, next: SwatchStatus) -> bool {
        use SwatchStatus::*;
        match (self, next) {
            (Aktif, Dolu | KartelaArsiv | KaliteArsiv | KullanimDisi) => true,
            (Dolu, KartelaArsiv | KaliteArsiv | KullanimDisi) => true,
            (KartelaArsiv | KaliteArsiv, KullanimDisi) => true,
            _ => false,
        }
    }

    /// Slots can be filled and customers assigned only while in circulation.
    pub fn accepts_assignment(&self) -> bool {
        matches!(self, SwatchStatus::Aktif | SwatchStatus::Dolu)
    }
}

impl fmt::Display for SwatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown swatch status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for SwatchStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        SwatchStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or(UnknownStatus(wanted))
    }
}

/// Colour swatch card (`kartelalar`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "kartelalar")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Kartela number printed on the card
    #[sea_orm(unique)]
    pub number: String,

    pub color_code: String,
    pub color_name: String,
    pub pantone_code: Option<String>,

    pub status: SwatchStatus,

    /// Filled slots ("göz"); never above `slots_max`
    pub slots_used: i32,
    pub slots_max: i32,

    pub customer_id: Option<i32>,
    pub cell_id: Option<i32>,

    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn slots_full(&self) -> bool {
        self.slots_used >= self.slots_max
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SwatchResponse {
    pub id: i32,
    pub number: String,
    pub color_code: String,
    pub color_name: String,
    pub pantone_code: Option<String>,
    pub status: SwatchStatus,
    pub slots_used: i32,
    pub slots_max: i32,
    pub customer_id: Option<i32>,
    pub cell_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Model> for SwatchResponse {
    fn from(m: Model) -> Self {
        SwatchResponse {
            id: m.id,
            number: m.number,
            color_code: m.color_code,
            color_name: m.color_name,
            pantone_code: m.pantone_code,
            status: m.status,
            slots_used: m.slots_used,
            slots_max: m.slots_max,
            customer_id: m.customer_id,
            cell_id: m.cell_id,
            created_at: m.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: m.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(SwatchStatus::Aktif.can_transition_to(SwatchStatus::Dolu));
        assert!(SwatchStatus::Dolu.can_transition_to(SwatchStatus::KaliteArsiv));
        assert!(SwatchStatus::KartelaArsiv.can_transition_to(SwatchStatus::KullanimDisi));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!SwatchStatus::Dolu.can_transition_to(SwatchStatus::Aktif));
        assert!(!SwatchStatus::KaliteArsiv.can_transition_to(SwatchStatus::Dolu));
        assert!(!SwatchStatus::KartelaArsiv.can_transition_to(SwatchStatus::KaliteArsiv));
    }

    #[test]
    fn test_retired_is_terminal() {
        for next in SwatchStatus::ALL {
            assert!(!SwatchStatus::KullanimDisi.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_self_transition() {
        for st in SwatchStatus::ALL {
            assert!(!st.can_transition_to(st));
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("kalite_arsiv".parse::<SwatchStatus>(), Ok(SwatchStatus::KaliteArsiv));
        assert_eq!(" DOLU ".parse::<SwatchStatus>(), Ok(SwatchStatus::Dolu));
        assert!("ARSIV".parse::<SwatchStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_stored_names() {
        let json = serde_json::to_string(&SwatchStatus::KullanimDisi).unwrap();
        assert_eq!(json, "\"KULLANIM_DISI\"");
    }
}
