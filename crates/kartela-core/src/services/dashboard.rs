//! Read-only aggregates behind the three staff dashboards.

use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::KartelaError;
use crate::extractors::{RoomSession, SessionInfo};
use crate::models::cell::{self, CellResponse};
use crate::models::movement_log::{self, MovementResponse};
use crate::models::room::{self, RoomResponse};
use crate::models::swatch::{self, SwatchStatus};
use crate::models::system_log::{self, SystemLogResponse};
use crate::models::{customer, user};
use crate::services::location;

/// Rows shown in the "recent activity" lists.
pub const RECENT_LIMIT: u64 = 20;

/// Non-deleted swatches per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    #[serde(rename = "AKTIF")]
    pub aktif: u64,
    #[serde(rename = "DOLU")]
    pub dolu: u64,
    #[serde(rename = "KARTELA_ARSIV")]
    pub kartela_arsiv: u64,
    #[serde(rename = "KALITE_ARSIV")]
    pub kalite_arsiv: u64,
    #[serde(rename = "KULLANIM_DISI")]
    pub kullanim_disi: u64,
    pub total: u64,
}

impl StatusCounts {
    pub fn add(&mut self, status: SwatchStatus, n: u64) {
        let slot = match status {
            SwatchStatus::Aktif => &mut self.aktif,
            SwatchStatus::Dolu => &mut self.dolu,
            SwatchStatus::KartelaArsiv => &mut self.kartela_arsiv,
            SwatchStatus::KaliteArsiv => &mut self.kalite_arsiv,
            SwatchStatus::KullanimDisi => &mut self.kullanim_disi,
        };
        *slot += n;
        self.total += n;
    }

    pub fn get(&self, status: SwatchStatus) -> u64 {
        match status {
            SwatchStatus::Aktif => self.aktif,
            SwatchStatus::Dolu => self.dolu,
            SwatchStatus::KartelaArsiv => self.kartela_arsiv,
            SwatchStatus::KaliteArsiv => self.kalite_arsiv,
            SwatchStatus::KullanimDisi => self.kullanim_disi,
        }
    }
}

/// Count non-deleted swatches by status, optionally only those in `cell_ids`.
pub async fn status_counts<C: ConnectionTrait>(
    db: &C,
    cell_ids: Option<&[i32]>,
) -> Result<StatusCounts, KartelaError> {
    let mut counts = StatusCounts::default();
    if matches!(cell_ids, Some(ids) if ids.is_empty()) {
        return Ok(counts);
    }

    let mut query = swatch::Entity::find()
        .select_only()
        .column(swatch::Column::Status)
        .column_as(Expr::col(swatch::Column::Id).count(), "n")
        .filter(swatch::Column::IsDeleted.eq(false));
    if let Some(ids) = cell_ids {
        query = query.filter(swatch::Column::CellId.is_in(ids.iter().copied()));
    }
    let rows: Vec<(String, i64)> = query
        .group_by(swatch::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    for (status, n) in rows {
        match status.parse::<SwatchStatus>() {
            Ok(status) => counts.add(status, n.max(0) as u64),
            Err(e) => tracing::warn!(error = %e, "skipping swatches with unknown status"),
        }
    }
    Ok(counts)
}

/// Cells at or over capacity, optionally restricted to `cell_ids`.
pub async fn full_cells<C: ConnectionTrait>(
    db: &C,
    cell_ids: Option<&[i32]>,
) -> Result<Vec<CellResponse>, KartelaError> {
    if matches!(cell_ids, Some(ids) if ids.is_empty()) {
        return Ok(Vec::new());
    }

    let occupancy = location::occupancy_by_cell(db).await?;
    let mut query = cell::Entity::find().order_by_asc(cell::Column::Id);
    if let Some(ids) = cell_ids {
        query = query.filter(cell::Column::Id.is_in(ids.iter().copied()));
    }
    let cells = query.all(db).await?;

    Ok(cells
        .into_iter()
        .map(|c| {
            let occupied = occupancy.get(&c.id).copied().unwrap_or(0);
            CellResponse::new(c, occupied)
        })
        .filter(|c| c.is_full)
        .collect())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomDashboard {
    pub session: SessionInfo,
    pub room: RoomResponse,
    pub status_counts: StatusCounts,
    pub cell_count: u64,
    pub full_cell_count: u64,
}

pub async fn room_dashboard<C: ConnectionTrait>(
    db: &C,
    session: &RoomSession,
) -> Result<RoomDashboard, KartelaError> {
    let room = room::Entity::find_by_id(session.room_id)
        .one(db)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Room {} not found", session.room_code)))?;

    let cell_ids = location::room_cell_ids(db, room.id).await?;
    let status_counts = status_counts(db, Some(&cell_ids)).await?;
    let full = full_cells(db, Some(&cell_ids)).await?;

    Ok(RoomDashboard {
        session: session.info(),
        room: room.into(),
        status_counts,
        cell_count: cell_ids.len() as u64,
        full_cell_count: full.len() as u64,
    })
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupervisorDashboard {
    pub status_counts: StatusCounts,
    pub full_cells: Vec<CellResponse>,
    pub recent_movements: Vec<MovementResponse>,
}

pub async fn supervisor_dashboard<C: ConnectionTrait>(
    db: &C,
) -> Result<SupervisorDashboard, KartelaError> {
    let status_counts = status_counts(db, None).await?;
    let full_cells = full_cells(db, None).await?;
    let recent_movements = movement_log::Entity::find()
        .order_by_desc(movement_log::Column::CreatedAt)
        .order_by_desc(movement_log::Column::Id)
        .limit(RECENT_LIMIT)
        .all(db)
        .await?
        .into_iter()
        .map(MovementResponse::from)
        .collect();

    Ok(SupervisorDashboard {
        status_counts,
        full_cells,
        recent_movements,
    })
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Totals {
    pub swatches: u64,
    pub customers: u64,
    pub active_users: u64,
    pub rooms: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomSwatchCount {
    pub room_id: i32,
    pub room_code: String,
    pub room_name: String,
    pub swatches: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ManagerDashboard {
    pub totals: Totals,
    pub status_counts: StatusCounts,
    pub rooms: Vec<RoomSwatchCount>,
    pub recent_system_logs: Vec<SystemLogResponse>,
}

pub async fn manager_dashboard<C: ConnectionTrait>(
    db: &C,
) -> Result<ManagerDashboard, KartelaError> {
    let status_counts = status_counts(db, None).await?;
    let totals = Totals {
        swatches: status_counts.total,
        customers: customer::Entity::find().count(db).await?,
        active_users: user::Entity::find()
            .filter(user::Column::IsActive.eq(true))
            .count(db)
            .await?,
        rooms: room::Entity::find().count(db).await?,
    };

    let occupancy: HashMap<i32, u64> = location::occupancy_by_cell(db).await?;
    let rooms = room::Entity::find()
        .order_by_asc(room::Column::Code)
        .all(db)
        .await?;
    let mut per_room = Vec::with_capacity(rooms.len());
    for r in rooms {
        let swatches = location::room_cell_ids(db, r.id)
            .await?
            .iter()
            .map(|id| occupancy.get(id).copied().unwrap_or(0))
            .sum();
        per_room.push(RoomSwatchCount {
            room_id: r.id,
            room_code: r.code,
            room_name: r.name,
            swatches,
        });
    }

    let recent_system_logs = system_log::Entity::find()
        .order_by_desc(system_log::Column::CreatedAt)
        .order_by_desc(system_log::Column::Id)
        .limit(RECENT_LIMIT)
        .all(db)
        .await?
        .into_iter()
        .map(SystemLogResponse::from)
        .collect();

    Ok(ManagerDashboard {
        totals,
        status_counts,
        rooms: per_room,
        recent_system_logs,
    })
}
