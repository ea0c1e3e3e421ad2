use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::error::KartelaError;
use crate::extractors::Pagination;
use crate::models::customer::{self, CustomerResponse};
use crate::models::swatch;
use crate::services::substring_pattern;
use crate::services::swatch::MIN_QUERY_LEN;

/// Assigned and full swatch counts per customer, for the given customers.
pub async fn swatch_counts<C: ConnectionTrait>(
    db: &C,
    customer_ids: &[i32],
) -> Result<HashMap<i32, (u64, u64)>, KartelaError> {
    let mut counts = HashMap::new();
    if customer_ids.is_empty() {
        return Ok(counts);
    }

    let rows: Vec<(Option<i32>, i32, i32)> = swatch::Entity::find()
        .select_only()
        .column(swatch::Column::CustomerId)
        .column(swatch::Column::SlotsUsed)
        .column(swatch::Column::SlotsMax)
        .filter(swatch::Column::CustomerId.is_in(customer_ids.iter().copied()))
        .filter(swatch::Column::IsDeleted.eq(false))
        .into_tuple()
        .all(db)
        .await?;

    for (customer_id, used, max) in rows {
        let Some(customer_id) = customer_id else {
            continue;
        };
        let entry = counts.entry(customer_id).or_insert((0, 0));
        entry.0 += 1;
        if used >= max {
            entry.1 += 1;
        }
    }
    Ok(counts)
}

/// Attach computed counts to customer rows.
pub async fn with_counts<C: ConnectionTrait>(
    db: &C,
    customers: Vec<customer::Model>,
) -> Result<Vec<CustomerResponse>, KartelaError> {
    let ids: Vec<i32> = customers.iter().map(|c| c.id).collect();
    let counts = swatch_counts(db, &ids).await?;
    Ok(customers
        .into_iter()
        .map(|c| {
            let (assigned, full) = counts.get(&c.id).copied().unwrap_or((0, 0));
            CustomerResponse::new(c, assigned, full)
        })
        .collect())
}

pub async fn search<C: ConnectionTrait>(
    db: &C,
    q: Option<&str>,
    active_only: bool,
    page: &Pagination,
) -> Result<(Vec<customer::Model>, u64), KartelaError> {
    let mut query = customer::Entity::find();
    if let Some(q) = q.map(str::trim).filter(|q| q.chars().count() >= MIN_QUERY_LEN) {
        query = query.filter(
            Condition::any()
                .add(customer::Column::Name.like(substring_pattern(q)))
                .add(customer::Column::Code.like(substring_pattern(q))),
        );
    }
    if active_only {
        query = query.filter(customer::Column::IsActive.eq(true));
    }

    let total = query.clone().count(db).await?;
    let items = query
        .order_by_asc(customer::Column::Name)
        .offset(page.offset)
        .limit(page.limit)
        .all(db)
        .await?;
    Ok((items, total))
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<customer::Model, KartelaError> {
    customer::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| KartelaError::NotFound(format!("Customer with id {} not found", id)))
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    code: &str,
    name: &str,
) -> Result<customer::Model, KartelaError> {
    let code = code.trim();
    let existing = customer::Entity::find()
        .filter(customer::Column::Code.eq(code))
        .count(db)
        .await?;
    if existing > 0 {
        return Err(KartelaError::Conflict(format!(
            "Customer code {} already exists",
            code
        )));
    }

    let now = Utc::now().naive_utc();
    let model = customer::ActiveModel {
        code: Set(code.to_string()),
        name: Set(name.trim().to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    name: Option<String>,
    is_active: Option<bool>,
) -> Result<customer::Model, KartelaError> {
    let current = find(db, id).await?;
    let mut active: customer::ActiveModel = current.into();
    if let Some(name) = name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(is_active) = is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(db).await?)
}

/// Non-deleted swatches assigned to a customer, ordered by number.
pub async fn swatches<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Vec<swatch::Model>, KartelaError> {
    find(db, id).await?;
    Ok(swatch::Entity::find()
        .filter(swatch::Column::CustomerId.eq(id))
        .filter(swatch::Column::IsDeleted.eq(false))
        .order_by_asc(swatch::Column::Number)
        .all(db)
        .await?)
}
