//! Swatch search and the state-changing flows.
//!
//! Every flow that touches more than one row runs in a single transaction:
//! the swatch update and its movement-log row commit together or not at all.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::error::KartelaError;
use crate::extractors::Pagination;
use crate::models::swatch::{self, SwatchStatus};
use crate::models::{customer, movement_log};
use crate::services::audit::{Actor, Movement, MovementAction};
use crate::services::location;
use crate::services::qr::QrPayload;
use crate::services::substring_pattern;

/// Queries shorter than this apply no text filter.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct SwatchFilter {
    pub q: Option<String>,
    pub status: Option<SwatchStatus>,
    pub customer_id: Option<i32>,
    pub cell_id: Option<i32>,
    /// Restrict to these cells (e.g. every cell of one room)
    pub cell_ids: Option<Vec<i32>>,
}

impl SwatchFilter {
    /// The trimmed text query, when long enough to filter on.
    pub fn text(&self) -> Option<&str> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| q.chars().count() >= MIN_QUERY_LEN)
    }

    fn condition(&self) -> Condition {
        let mut cond = Condition::all().add(swatch::Column::IsDeleted.eq(false));
        if let Some(q) = self.text() {
            cond = cond.add(
                Condition::any()
                    .add(swatch::Column::Number.like(substring_pattern(q)))
                    .add(swatch::Column::ColorCode.like(substring_pattern(q)))
                    .add(swatch::Column::ColorName.like(substring_pattern(q))),
            );
        }
        if let Some(status) = self.status {
            cond = cond.add(swatch::Column::Status.eq(status));
        }
        if let Some(customer_id) = self.customer_id {
            cond = cond.add(swatch::Column::CustomerId.eq(customer_id));
        }
        if let Some(cell_id) = self.cell_id {
            cond = cond.add(swatch::Column::CellId.eq(cell_id));
        }
        if let Some(ids) = &self.cell_ids {
            cond = cond.add(swatch::Column::CellId.is_in(ids.iter().copied()));
        }
        cond
    }
}

/// Search non-deleted swatches. Returns the page and the total match count.
pub async fn search<C: ConnectionTrait>(
    db: &C,
    filter: &SwatchFilter,
    page: &Pagination,
) -> Result<(Vec<swatch::Model>, u64), KartelaError> {
    if matches!(&filter.cell_ids, Some(ids) if ids.is_empty()) {
        return Ok((Vec::new(), 0));
    }

    let query = swatch::Entity::find().filter(filter.condition());
    let total = query.clone().count(db).await?;
    let items = query
        .order_by_asc(swatch::Column::Number)
        .offset(page.offset)
        .limit(page.limit)
        .all(db)
        .await?;
    Ok((items, total))
}

/// Load a swatch that has not been deleted.
pub async fn find_live<C: ConnectionTrait>(db: &C, id: i32) -> Result<swatch::Model, KartelaError> {
    swatch::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|s| !s.is_deleted)
        .ok_or_else(|| KartelaError::NotFound(format!("Swatch with id {} not found", id)))
}

pub async fn find_by_number<C: ConnectionTrait>(
    db: &C,
    number: &str,
) -> Result<swatch::Model, KartelaError> {
    swatch::Entity::find()
        .filter(swatch::Column::Number.eq(number.trim()))
        .filter(swatch::Column::IsDeleted.eq(false))
        .one(db)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Swatch {} not found", number.trim())))
}

#[derive(Debug, Clone)]
pub struct NewSwatch {
    pub number: String,
    pub color_code: String,
    pub color_name: String,
    pub pantone_code: Option<String>,
    pub slots_max: i32,
    pub cell_id: Option<i32>,
}

pub async fn create(
    db: &DatabaseConnection,
    actor: Actor,
    new: NewSwatch,
) -> Result<swatch::Model, KartelaError> {
    let number = new.number.trim().to_string();
    let txn = db.begin().await?;

    let existing = swatch::Entity::find()
        .filter(swatch::Column::Number.eq(number.as_str()))
        .count(&txn)
        .await?;
    if existing > 0 {
        return Err(KartelaError::Conflict(format!(
            "Swatch number {} already exists",
            number
        )));
    }

    if let Some(cell_id) = new.cell_id {
        let cell = location::find_cell(&txn, cell_id).await?;
        location::ensure_room_for_one(&txn, &cell, None).await?;
    }

    let now = Utc::now().naive_utc();
    let model = swatch::ActiveModel {
        number: Set(number),
        color_code: Set(new.color_code.trim().to_string()),
        color_name: Set(new.color_name.trim().to_string()),
        pantone_code: Set(new.pantone_code.filter(|p| !p.trim().is_empty())),
        status: Set(SwatchStatus::Aktif),
        slots_used: Set(0),
        slots_max: Set(new.slots_max),
        customer_id: Set(None),
        cell_id: Set(new.cell_id),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    Movement::new(model.id, MovementAction::Create)
        .cells(None, model.cell_id)
        .record(&txn, actor)
        .await?;
    txn.commit().await?;

    tracing::info!(swatch = %model.number, "swatch created");
    Ok(model)
}

#[derive(Debug, Clone, Default)]
pub struct SwatchChanges {
    pub color_code: Option<String>,
    pub color_name: Option<String>,
    pub pantone_code: Option<String>,
    pub slots_max: Option<i32>,
}

pub async fn update(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
    changes: SwatchChanges,
) -> Result<swatch::Model, KartelaError> {
    let txn = db.begin().await?;
    let current = find_live(&txn, id).await?;

    if let Some(max) = changes.slots_max {
        if max < current.slots_used {
            return Err(KartelaError::Validation(format!(
                "slots_max ({}) cannot be below used slots ({})",
                max, current.slots_used
            )));
        }
    }

    let mut active: swatch::ActiveModel = current.clone().into();
    if let Some(code) = changes.color_code {
        active.color_code = Set(code.trim().to_string());
    }
    if let Some(name) = changes.color_name {
        active.color_name = Set(name.trim().to_string());
    }
    if let Some(pantone) = changes.pantone_code {
        let pantone = pantone.trim().to_string();
        active.pantone_code = Set((!pantone.is_empty()).then_some(pantone));
    }
    // Shrinking an active swatch down to its used slots fills it.
    let fills = current.status == SwatchStatus::Aktif
        && changes.slots_max.is_some_and(|max| max == current.slots_used);
    if let Some(max) = changes.slots_max {
        active.slots_max = Set(max);
    }
    if fills {
        active.status = Set(SwatchStatus::Dolu);
    }
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    let mut movement = Movement::new(id, MovementAction::Update);
    if fills {
        movement = movement.status(current.status, SwatchStatus::Dolu);
    }
    movement.record(&txn, actor).await?;
    txn.commit().await?;

    Ok(updated)
}

/// Soft delete: the row stays for the audit trail but leaves every listing
/// and frees its cell.
pub async fn soft_delete(db: &DatabaseConnection, actor: Actor, id: i32) -> Result<(), KartelaError> {
    let txn = db.begin().await?;
    let current = find_live(&txn, id).await?;

    let mut active: swatch::ActiveModel = current.clone().into();
    active.is_deleted = Set(true);
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(&txn).await?;

    Movement::new(id, MovementAction::Delete)
        .cells(current.cell_id, None)
        .record(&txn, actor)
        .await?;
    txn.commit().await?;

    tracing::info!(swatch = %current.number, "swatch deleted");
    Ok(())
}

/// Move a swatch into another cell.
///
/// Every check (retired swatch, same cell, full cell, full shelf) runs
/// before the first write.
pub async fn transfer(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
    target_cell_id: i32,
    note: Option<String>,
) -> Result<swatch::Model, KartelaError> {
    let txn = db.begin().await?;
    let current = find_live(&txn, id).await?;

    if current.status == SwatchStatus::KullanimDisi {
        return Err(KartelaError::Conflict(format!(
            "Swatch {} is out of use and cannot be moved",
            current.number
        )));
    }
    if current.cell_id == Some(target_cell_id) {
        return Err(KartelaError::BadRequest(
            "Swatch is already in the target cell".to_string(),
        ));
    }

    let target = location::find_cell(&txn, target_cell_id).await?;
    location::ensure_room_for_one(&txn, &target, Some(current.id)).await?;

    let from_cell = current.cell_id;
    let mut active: swatch::ActiveModel = current.clone().into();
    active.cell_id = Set(Some(target.id));
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    Movement::new(id, MovementAction::Transfer)
        .cells(from_cell, Some(target.id))
        .reason_opt(note)
        .record(&txn, actor)
        .await?;
    txn.commit().await?;

    tracing::info!(
        swatch = %updated.number,
        from_cell = ?from_cell,
        to_cell = target.id,
        "swatch transferred"
    );
    Ok(updated)
}

/// Return a swatch to circulation: no used slots, no customer, `AKTIF`,
/// whatever its previous status.
pub async fn reset(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
    reason_code: &str,
    note: Option<String>,
) -> Result<swatch::Model, KartelaError> {
    let reason_code = reason_code.trim();
    if reason_code.is_empty() {
        return Err(KartelaError::Validation(
            "A reset reason is required".to_string(),
        ));
    }

    let txn = db.begin().await?;
    let current = find_live(&txn, id).await?;

    let mut active: swatch::ActiveModel = current.clone().into();
    active.slots_used = Set(0);
    active.customer_id = Set(None);
    active.status = Set(SwatchStatus::Aktif);
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    let reason = match note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(note) => format!("{}: {}", reason_code, note),
        None => reason_code.to_string(),
    };
    Movement::new(id, MovementAction::Reset)
        .status(current.status, SwatchStatus::Aktif)
        .reason(reason)
        .record(&txn, actor)
        .await?;
    txn.commit().await?;

    tracing::info!(swatch = %updated.number, from = %current.status, reason = reason_code, "swatch reset");
    Ok(updated)
}

/// Use one slot ("göz"). The swatch turns `DOLU` on its last slot.
pub async fn fill_slot(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
) -> Result<swatch::Model, KartelaError> {
    let txn = db.begin().await?;
    let current = find_live(&txn, id).await?;

    if current.status != SwatchStatus::Aktif {
        return Err(KartelaError::Conflict(format!(
            "Swatch {} is {} and accepts no more slots",
            current.number, current.status
        )));
    }
    if current.slots_full() {
        return Err(KartelaError::Conflict(format!(
            "Swatch {} has no free slot",
            current.number
        )));
    }

    let used = current.slots_used + 1;
    let next_status = if used >= current.slots_max {
        SwatchStatus::Dolu
    } else {
        SwatchStatus::Aktif
    };

    let mut active: swatch::ActiveModel = current.clone().into();
    active.slots_used = Set(used);
    active.status = Set(next_status);
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    Movement::new(id, MovementAction::SlotFill)
        .status(current.status, next_status)
        .reason(format!("{}/{}", used, current.slots_max))
        .record(&txn, actor)
        .await?;
    txn.commit().await?;

    Ok(updated)
}

pub async fn assign_customer(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
    customer_id: i32,
) -> Result<swatch::Model, KartelaError> {
    let txn = db.begin().await?;
    let current = find_live(&txn, id).await?;

    if !current.status.accepts_assignment() {
        return Err(KartelaError::Conflict(format!(
            "Swatch {} is {} and cannot be assigned",
            current.number, current.status
        )));
    }

    let customer = customer::Entity::find_by_id(customer_id)
        .one(&txn)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Customer with id {} not found", customer_id)))?;
    if !customer.is_active {
        return Err(KartelaError::Conflict(format!(
            "Customer {} is not active",
            customer.code
        )));
    }

    let mut active: swatch::ActiveModel = current.clone().into();
    active.customer_id = Set(Some(customer.id));
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    Movement::new(id, MovementAction::Assign)
        .reason(customer.code.clone())
        .record(&txn, actor)
        .await?;
    txn.commit().await?;

    tracing::info!(swatch = %updated.number, customer = %customer.code, "swatch assigned");
    Ok(updated)
}

pub async fn change_status(
    db: &DatabaseConnection,
    actor: Actor,
    id: i32,
    next: SwatchStatus,
    reason: Option<String>,
) -> Result<swatch::Model, KartelaError> {
    let txn = db.begin().await?;
    let current = find_live(&txn, id).await?;

    if !current.status.can_transition_to(next) {
        return Err(KartelaError::Conflict(format!(
            "Cannot change status from {} to {}",
            current.status, next
        )));
    }

    let mut active: swatch::ActiveModel = current.clone().into();
    active.status = Set(next);
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    Movement::new(id, MovementAction::StatusChange)
        .status(current.status, next)
        .reason_opt(reason)
        .record(&txn, actor)
        .await?;
    txn.commit().await?;

    tracing::info!(swatch = %updated.number, from = %current.status, to = %next, "swatch status changed");
    Ok(updated)
}

/// Movement log of one swatch, newest first.
pub async fn movements<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Vec<movement_log::Model>, KartelaError> {
    let exists = swatch::Entity::find_by_id(id).count(db).await?;
    if exists == 0 {
        return Err(KartelaError::NotFound(format!("Swatch with id {} not found", id)));
    }

    Ok(movement_log::Entity::find()
        .filter(movement_log::Column::SwatchId.eq(id))
        .order_by_desc(movement_log::Column::CreatedAt)
        .order_by_desc(movement_log::Column::Id)
        .all(db)
        .await?)
}

/// Label payload for a swatch, dated `today`.
pub async fn qr_payload<C: ConnectionTrait>(
    db: &C,
    id: i32,
    today: NaiveDate,
) -> Result<QrPayload, KartelaError> {
    let swatch = find_live(db, id).await?;
    let customer_name = match swatch.customer_id {
        Some(customer_id) => customer::Entity::find_by_id(customer_id)
            .one(db)
            .await?
            .map(|c| c.name),
        None => None,
    };
    Ok(QrPayload::from_swatch(&swatch, customer_name, today))
}

/// Resolve a scanned label to the swatch it names.
pub async fn scan<C: ConnectionTrait>(
    db: &C,
    payload: &str,
    today: NaiveDate,
) -> Result<swatch::Model, KartelaError> {
    let parsed = QrPayload::parse(payload, today)?;
    find_by_number(db, &parsed.number).await
}
