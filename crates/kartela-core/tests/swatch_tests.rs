use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::json;

use kartela_core::models::room;
use kartela_core::models::swatch::{self, SwatchStatus};
use kartela_core::models::user::Role;
use kartela_core::models::{customer, movement_log};
use kartela_core::testing::TestApp;

const BASE: &str = "/api/room/ROOM-0001";

async fn setup() -> (TestApp, room::Model, String) {
    let app = TestApp::new().await;
    let r = app.seed_room("ROOM-0001", "Kartela Arşivi").await;
    let token = app.session("USER-0001", Role::Operator, false, &r).await;
    (app, r, token)
}

async fn movement_count(app: &TestApp, swatch_id: i32, action: &str) -> u64 {
    movement_log::Entity::find()
        .filter(movement_log::Column::SwatchId.eq(swatch_id))
        .filter(movement_log::Column::Action.eq(action))
        .count(&app.db)
        .await
        .unwrap()
}

async fn reload(app: &TestApp, id: i32) -> swatch::Model {
    swatch::Entity::find_by_id(id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap()
}

fn numbers(res: &kartela_core::TestResponse) -> Vec<String> {
    res.data()["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["number"].as_str().unwrap().to_string())
        .collect()
}

// ── Search ──

#[tokio::test]
async fn test_search_matches_substrings() {
    let (app, _r, token) = setup().await;
    app.seed_swatch("K-1002", "18-1234", "Mavi Gök", None).await;
    app.seed_swatch("K-1001", "19-4052", "Classic Blue", None).await;
    app.seed_swatch("K-2001", "17-5555", "Kırmızı", None).await;

    let res = app.get_auth(&format!("{}/swatches?q=K-1", BASE), &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(numbers(&res), vec!["K-1001", "K-1002"]);
    assert_eq!(res.data()["total"], 2);

    let res = app.get_auth(&format!("{}/swatches?q=Blue", BASE), &token).await;
    assert_eq!(numbers(&res), vec!["K-1001"]);

    let res = app.get_auth(&format!("{}/swatches?q=5555", BASE), &token).await;
    assert_eq!(numbers(&res), vec!["K-2001"]);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let (app, _r, token) = setup().await;
    app.seed_swatch("KA-100", "19-4052", "Classic Blue", None).await;
    app.seed_swatch("K_7", "17-5555", "Kırmızı 100%", None).await;

    let res = app.get_auth(&format!("{}/swatches?q=K_", BASE), &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(numbers(&res), vec!["K_7"]);

    let res = app.get_auth(&format!("{}/swatches?q=%25%25", BASE), &token).await;
    assert_eq!(res.data()["total"], 0);

    let res = app.get_auth(&format!("{}/swatches?q=0%25", BASE), &token).await;
    assert_eq!(numbers(&res), vec!["K_7"]);

    let res = app.get_auth(&format!("{}/swatches?q=A-1", BASE), &token).await;
    assert_eq!(numbers(&res), vec!["KA-100"]);
}

#[tokio::test]
async fn test_short_query_applies_no_filter() {
    let (app, _r, token) = setup().await;
    app.seed_swatch("K-1001", "19-4052", "Classic Blue", None).await;
    app.seed_swatch("K-2001", "17-5555", "Kırmızı", None).await;

    let res = app.get_auth(&format!("{}/swatches?q=B", BASE), &token).await;
    assert_eq!(res.data()["total"], 2);

    let res = app.get_auth(&format!("{}/swatches?q=%20%20", BASE), &token).await;
    assert_eq!(res.data()["total"], 2);
}

#[tokio::test]
async fn test_search_filters_and_paginates() {
    let (app, _r, token) = setup().await;
    for i in 1..=5 {
        app.seed_swatch(&format!("K-30{}", i), "10-0000", "Gri", None).await;
    }
    let archived = app.seed_swatch("K-400", "10-0000", "Gri", None).await;
    let mut active: swatch::ActiveModel = archived.into();
    active.status = Set(SwatchStatus::KaliteArsiv);
    active.update(&app.db).await.unwrap();

    let res = app
        .get_auth(&format!("{}/swatches?limit=2&offset=2", BASE), &token)
        .await;
    assert_eq!(numbers(&res), vec!["K-303", "K-304"]);
    assert_eq!(res.data()["total"], 6);
    assert_eq!(res.data()["limit"], 2);

    let res = app
        .get_auth(&format!("{}/swatches?status=KALITE_ARSIV", BASE), &token)
        .await;
    assert_eq!(numbers(&res), vec!["K-400"]);

    let res = app
        .get_auth(&format!("{}/swatches?limit=1000", BASE), &token)
        .await;
    assert_eq!(res.data()["limit"], 100);
}

#[tokio::test]
async fn test_invalid_query_uses_error_envelope() {
    let (app, _r, token) = setup().await;

    let res = app
        .get_auth(&format!("{}/swatches?status=BOGUS", BASE), &token)
        .await;
    assert_eq!(res.status, 422);
    assert_eq!(res.error_code().as_deref(), Some("VALIDATION_ERROR"));

    let res = app
        .get_auth(&format!("{}/swatches?customer_id=abc", BASE), &token)
        .await;
    assert_eq!(res.status, 422);
    assert_eq!(res.error_code().as_deref(), Some("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_search_in_room_only() {
    let (app, r, token) = setup().await;
    let other = app.seed_room("ROOM-0002", "Kalite").await;
    let shelf_here = app.seed_shelf(r.id, "R1", 10).await;
    let cell_here = app.seed_cell(shelf_here.id, "H1", 5).await;
    let shelf_there = app.seed_shelf(other.id, "R2", 10).await;
    let cell_there = app.seed_cell(shelf_there.id, "H2", 5).await;
    app.seed_swatch("K-1", "1", "Bir", Some(cell_here.id)).await;
    app.seed_swatch("K-2", "2", "İki", Some(cell_there.id)).await;

    let res = app
        .get_auth(&format!("{}/swatches?in_room=true", BASE), &token)
        .await;
    assert_eq!(numbers(&res), vec!["K-1"]);
}

// ── Create / update / delete ──

#[tokio::test]
async fn test_create_swatch_logs_movement() {
    let (app, r, token) = setup().await;
    let shelf = app.seed_shelf(r.id, "R1", 10).await;
    let cell = app.seed_cell(shelf.id, "H1", 5).await;

    let res = app
        .post_auth(
            &format!("{}/swatches", BASE),
            &token,
            json!({
                "number": "K-5000",
                "color_code": "19-4052",
                "color_name": "Classic Blue",
                "pantone_code": "19-4052 TCX",
                "slots_max": 6,
                "cell_id": cell.id
            }),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    let data = res.data();
    assert_eq!(data["status"], "AKTIF");
    assert_eq!(data["slots_used"], 0);
    assert_eq!(data["cell_id"], cell.id);

    let id = data["id"].as_i64().unwrap() as i32;
    assert_eq!(movement_count(&app, id, "CREATE").await, 1);
}

#[tokio::test]
async fn test_create_rejects_duplicate_number() {
    let (app, _r, token) = setup().await;
    app.seed_swatch("K-5000", "1", "Bir", None).await;

    let res = app
        .post_auth(
            &format!("{}/swatches", BASE),
            &token,
            json!({ "number": "K-5000", "color_code": "2", "color_name": "İki", "slots_max": 4 }),
        )
        .await;
    assert_eq!(res.status, 409);
}

#[tokio::test]
async fn test_create_rejects_full_cell() {
    let (app, r, token) = setup().await;
    let shelf = app.seed_shelf(r.id, "R1", 10).await;
    let cell = app.seed_cell(shelf.id, "H1", 1).await;
    app.seed_swatch("K-1", "1", "Bir", Some(cell.id)).await;

    let res = app
        .post_auth(
            &format!("{}/swatches", BASE),
            &token,
            json!({ "number": "K-2", "color_code": "2", "color_name": "İki", "slots_max": 4, "cell_id": cell.id }),
        )
        .await;
    assert_eq!(res.status, 409);
    let created = swatch::Entity::find()
        .filter(swatch::Column::Number.eq("K-2"))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(created, 0);
}

#[tokio::test]
async fn test_create_validates_input() {
    let (app, _r, token) = setup().await;

    let res = app
        .post_auth(
            &format!("{}/swatches", BASE),
            &token,
            json!({ "number": "", "color_code": "2", "color_name": "İki", "slots_max": 0 }),
        )
        .await;
    assert_eq!(res.status, 422);
    let fields: Vec<String> = res.error()["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["number", "slots_max"]);
}

#[tokio::test]
async fn test_update_rejects_slots_below_used() {
    let (app, _r, token) = setup().await;
    let s = app.seed_swatch("K-1", "1", "Bir", None).await;
    let mut active: swatch::ActiveModel = s.clone().into();
    active.slots_used = Set(3);
    active.update(&app.db).await.unwrap();

    let path = format!("{}/swatches/{}", BASE, s.id);
    let res = app.put_auth(&path, &token, json!({ "slots_max": 2 })).await;
    assert_eq!(res.status, 422);

    let res = app
        .put_auth(&path, &token, json!({ "slots_max": 8, "color_name": "Lacivert" }))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["slots_max"], 8);
    assert_eq!(res.data()["color_name"], "Lacivert");
}

#[tokio::test]
async fn test_update_down_to_used_slots_fills_swatch() {
    let (app, _r, token) = setup().await;
    let s = app.seed_swatch("K-1", "1", "Bir", None).await;
    let mut active: swatch::ActiveModel = s.clone().into();
    active.slots_used = Set(3);
    active.update(&app.db).await.unwrap();

    let path = format!("{}/swatches/{}", BASE, s.id);
    let res = app.put_auth(&path, &token, json!({ "slots_max": 3 })).await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(res.data()["status"], "DOLU");
    assert_eq!(reload(&app, s.id).await.status, SwatchStatus::Dolu);

    let row = movement_log::Entity::find()
        .filter(movement_log::Column::SwatchId.eq(s.id))
        .filter(movement_log::Column::Action.eq("UPDATE"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.from_status.as_deref(), Some("AKTIF"));
    assert_eq!(row.to_status.as_deref(), Some("DOLU"));

    // Raising the limit again does not reopen a full swatch.
    let res = app.put_auth(&path, &token, json!({ "slots_max": 6 })).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["status"], "DOLU");
}

#[tokio::test]
async fn test_delete_requires_supervisor_and_hides_swatch() {
    let (app, r, operator) = setup().await;
    let supervisor = app
        .session("USER-0002", Role::Supervisor, false, &r)
        .await;
    let s = app.seed_swatch("K-1", "1", "Bir", None).await;
    let path = format!("{}/swatches/{}", BASE, s.id);

    let res = app.delete_auth(&path, &operator).await;
    assert_eq!(res.status, 403);

    let res = app.delete_auth(&path, &supervisor).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["deleted"], true);

    assert!(reload(&app, s.id).await.is_deleted);
    assert_eq!(app.get_auth(&path, &operator).await.status, 404);
    let res = app.get_auth(&format!("{}/swatches", BASE), &operator).await;
    assert_eq!(res.data()["total"], 0);
    assert_eq!(movement_count(&app, s.id, "DELETE").await, 1);
}

// ── Transfer ──

#[tokio::test]
async fn test_transfer_moves_swatch_and_logs() {
    let (app, r, token) = setup().await;
    let shelf = app.seed_shelf(r.id, "R1", 10).await;
    let from = app.seed_cell(shelf.id, "H1", 5).await;
    let to = app.seed_cell(shelf.id, "H2", 5).await;
    let s = app.seed_swatch("K-1", "1", "Bir", Some(from.id)).await;

    let res = app
        .post_auth(
            &format!("{}/swatches/{}/transfer", BASE, s.id),
            &token,
            json!({ "target_cell_id": to.id, "note": "yer değişikliği" }),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(res.data()["cell_id"], to.id);

    let log = movement_log::Entity::find()
        .filter(movement_log::Column::Action.eq("TRANSFER"))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(log.from_cell_id, Some(from.id));
    assert_eq!(log.to_cell_id, Some(to.id));
    assert_eq!(log.reason.as_deref(), Some("yer değişikliği"));
}

#[tokio::test]
async fn test_transfer_to_full_cell_rejected_before_write() {
    let (app, r, token) = setup().await;
    let shelf = app.seed_shelf(r.id, "R1", 10).await;
    let full = app.seed_cell(shelf.id, "H1", 1).await;
    app.seed_swatch("K-1", "1", "Bir", Some(full.id)).await;
    let s = app.seed_swatch("K-2", "2", "İki", None).await;

    let res = app
        .post_auth(
            &format!("{}/swatches/{}/transfer", BASE, s.id),
            &token,
            json!({ "target_cell_id": full.id }),
        )
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(reload(&app, s.id).await.cell_id, None);
    assert_eq!(movement_count(&app, s.id, "TRANSFER").await, 0);
}

#[tokio::test]
async fn test_transfer_to_full_shelf_rejected_before_write() {
    let (app, r, token) = setup().await;
    let shelf = app.seed_shelf(r.id, "R1", 2).await;
    let a = app.seed_cell(shelf.id, "H1", 5).await;
    let b = app.seed_cell(shelf.id, "H2", 5).await;
    app.seed_swatch("K-1", "1", "Bir", Some(a.id)).await;
    app.seed_swatch("K-2", "2", "İki", Some(a.id)).await;
    let s = app.seed_swatch("K-3", "3", "Üç", None).await;

    let res = app
        .post_auth(
            &format!("{}/swatches/{}/transfer", BASE, s.id),
            &token,
            json!({ "target_cell_id": b.id }),
        )
        .await;
    assert_eq!(res.status, 409);
    assert!(res.error()["message"].as_str().unwrap().contains("Shelf"));
    assert_eq!(reload(&app, s.id).await.cell_id, None);
    assert_eq!(movement_count(&app, s.id, "TRANSFER").await, 0);
}

#[tokio::test]
async fn test_transfer_within_full_shelf_allowed() {
    let (app, r, token) = setup().await;
    let shelf = app.seed_shelf(r.id, "R1", 2).await;
    let a = app.seed_cell(shelf.id, "H1", 5).await;
    let b = app.seed_cell(shelf.id, "H2", 5).await;
    let s = app.seed_swatch("K-1", "1", "Bir", Some(a.id)).await;
    app.seed_swatch("K-2", "2", "İki", Some(a.id)).await;

    let res = app
        .post_auth(
            &format!("{}/swatches/{}/transfer", BASE, s.id),
            &token,
            json!({ "target_cell_id": b.id }),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(reload(&app, s.id).await.cell_id, Some(b.id));
    assert_eq!(movement_count(&app, s.id, "TRANSFER").await, 1);
}

#[tokio::test]
async fn test_transfer_edge_cases() {
    let (app, r, token) = setup().await;
    let shelf = app.seed_shelf(r.id, "R1", 10).await;
    let cell = app.seed_cell(shelf.id, "H1", 5).await;
    let s = app.seed_swatch("K-1", "1", "Bir", Some(cell.id)).await;
    let path = format!("{}/swatches/{}/transfer", BASE, s.id);

    let res = app.post_auth(&path, &token, json!({ "target_cell_id": cell.id })).await;
    assert_eq!(res.status, 400);

    let res = app.post_auth(&path, &token, json!({ "target_cell_id": 9999 })).await;
    assert_eq!(res.status, 404);

    let res = app
        .post_auth(
            &format!("{}/swatches/9999/transfer", BASE),
            &token,
            json!({ "target_cell_id": cell.id }),
        )
        .await;
    assert_eq!(res.status, 404);

    let mut active: swatch::ActiveModel = s.clone().into();
    active.status = Set(SwatchStatus::KullanimDisi);
    active.cell_id = Set(None);
    active.update(&app.db).await.unwrap();
    let res = app.post_auth(&path, &token, json!({ "target_cell_id": cell.id })).await;
    assert_eq!(res.status, 409);
}

// ── Reset ──

#[tokio::test]
async fn test_reset_from_any_status() {
    let (app, _r, token) = setup().await;
    let c = app.seed_customer("M-001", "Deniz Tekstil").await;

    for status in SwatchStatus::ALL {
        let s = app
            .seed_swatch(&format!("K-{}", status), "1", "Bir", None)
            .await;
        let mut active: swatch::ActiveModel = s.clone().into();
        active.status = Set(status);
        active.slots_used = Set(3);
        active.customer_id = Set(Some(c.id));
        active.update(&app.db).await.unwrap();

        let res = app
            .post_auth(
                &format!("{}/swatches/{}/reset", BASE, s.id),
                &token,
                json!({ "reason_code": "YENI_SEZON", "note": "sezon başı" }),
            )
            .await;
        assert_eq!(res.status, 200, "{}: {}", status, res.body);

        let after = reload(&app, s.id).await;
        assert_eq!(after.status, SwatchStatus::Aktif);
        assert_eq!(after.slots_used, 0);
        assert_eq!(after.customer_id, None);

        let log = movement_log::Entity::find()
            .filter(movement_log::Column::SwatchId.eq(s.id))
            .filter(movement_log::Column::Action.eq("RESET"))
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(log.from_status.as_deref(), Some(status.as_str()));
        assert_eq!(log.to_status.as_deref(), Some("AKTIF"));
        assert_eq!(log.reason.as_deref(), Some("YENI_SEZON: sezon başı"));
    }
}

#[tokio::test]
async fn test_reset_requires_reason() {
    let (app, _r, token) = setup().await;
    let s = app.seed_swatch("K-1", "1", "Bir", None).await;

    let res = app
        .post_auth(
            &format!("{}/swatches/{}/reset", BASE, s.id),
            &token,
            json!({ "reason_code": "" }),
        )
        .await;
    assert_eq!(res.status, 422);
    assert_eq!(movement_count(&app, s.id, "RESET").await, 0);
}

// ── Slots, assignment, status ──

#[tokio::test]
async fn test_fill_slots_until_full() {
    let (app, _r, token) = setup().await;
    let s = app.seed_swatch("K-1", "1", "Bir", None).await;
    let path = format!("{}/swatches/{}/fill-slot", BASE, s.id);

    for used in 1..=3 {
        let res = app.post_auth(&path, &token, json!({})).await;
        assert_eq!(res.data()["slots_used"], used);
        assert_eq!(res.data()["status"], "AKTIF");
    }
    let res = app.post_auth(&path, &token, json!({})).await;
    assert_eq!(res.data()["slots_used"], 4);
    assert_eq!(res.data()["status"], "DOLU");

    let res = app.post_auth(&path, &token, json!({})).await;
    assert_eq!(res.status, 409);
    assert_eq!(movement_count(&app, s.id, "SLOT_FILL").await, 4);
}

#[tokio::test]
async fn test_assign_customer_rules() {
    let (app, _r, token) = setup().await;
    let s = app.seed_swatch("K-1", "1", "Bir", None).await;
    let c = app.seed_customer("M-001", "Deniz Tekstil").await;
    let inactive = app.seed_customer("M-002", "Kapalı Firma").await;
    let mut active: customer::ActiveModel = inactive.clone().into();
    active.is_active = Set(false);
    active.update(&app.db).await.unwrap();
    let path = format!("{}/swatches/{}/assign", BASE, s.id);

    let res = app.post_auth(&path, &token, json!({ "customer_id": inactive.id })).await;
    assert_eq!(res.status, 409);

    let res = app.post_auth(&path, &token, json!({ "customer_id": 9999 })).await;
    assert_eq!(res.status, 404);

    let res = app.post_auth(&path, &token, json!({ "customer_id": c.id })).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["customer_id"], c.id);
    assert_eq!(movement_count(&app, s.id, "ASSIGN").await, 1);

    let mut active: swatch::ActiveModel = reload(&app, s.id).await.into();
    active.status = Set(SwatchStatus::KartelaArsiv);
    active.update(&app.db).await.unwrap();
    let res = app.post_auth(&path, &token, json!({ "customer_id": c.id })).await;
    assert_eq!(res.status, 409);
}

#[tokio::test]
async fn test_status_transitions() {
    let (app, _r, token) = setup().await;
    let s = app.seed_swatch("K-1", "1", "Bir", None).await;
    let path = format!("{}/swatches/{}/status", BASE, s.id);

    let res = app
        .post_auth(&path, &token, json!({ "status": "KARTELA_ARSIV", "reason": "sezon sonu" }))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["status"], "KARTELA_ARSIV");

    let res = app.post_auth(&path, &token, json!({ "status": "AKTIF" })).await;
    assert_eq!(res.status, 409);

    let res = app.post_auth(&path, &token, json!({ "status": "KULLANIM_DISI" })).await;
    assert_eq!(res.status, 200);

    let res = app.post_auth(&path, &token, json!({ "status": "DOLU" })).await;
    assert_eq!(res.status, 409);

    let res = app
        .post_auth(&format!("{}/swatches/{}/fill-slot", BASE, s.id), &token, json!({}))
        .await;
    assert_eq!(res.status, 409);

    assert_eq!(movement_count(&app, s.id, "STATUS_CHANGE").await, 2);
}

#[tokio::test]
async fn test_unknown_status_value_rejected() {
    let (app, _r, token) = setup().await;
    let s = app.seed_swatch("K-1", "1", "Bir", None).await;

    let res = app
        .post_auth(
            &format!("{}/swatches/{}/status", BASE, s.id),
            &token,
            json!({ "status": "ARSIV" }),
        )
        .await;
    assert_eq!(res.status, 422);
}

// ── History and labels ──

#[tokio::test]
async fn test_movements_newest_first() {
    let (app, r, token) = setup().await;
    let shelf = app.seed_shelf(r.id, "R1", 10).await;
    let cell = app.seed_cell(shelf.id, "H1", 5).await;
    let s = app.seed_swatch("K-1", "1", "Bir", None).await;

    app.post_auth(
        &format!("{}/swatches/{}/transfer", BASE, s.id),
        &token,
        json!({ "target_cell_id": cell.id }),
    )
    .await;
    app.post_auth(&format!("{}/swatches/{}/fill-slot", BASE, s.id), &token, json!({}))
        .await;

    let res = app
        .get_auth(&format!("{}/swatches/{}/movements", BASE, s.id), &token)
        .await;
    assert_eq!(res.status, 200);
    let actions: Vec<String> = res
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["action"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(actions, vec!["SLOT_FILL", "TRANSFER"]);
}

#[tokio::test]
async fn test_qr_payload_and_scan() {
    let (app, _r, token) = setup().await;
    let s = app.seed_swatch("K-1001", "19-4052", "Classic Blue", None).await;
    let c = app.seed_customer("M-001", "Deniz Tekstil").await;
    app.post_auth(
        &format!("{}/swatches/{}/assign", BASE, s.id),
        &token,
        json!({ "customer_id": c.id }),
    )
    .await;

    let res = app
        .get_auth(&format!("{}/swatches/{}/qr", BASE, s.id), &token)
        .await;
    assert_eq!(res.status, 200);
    assert!(
        res.headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    let lines: Vec<&str> = res.body.lines().collect();
    assert_eq!(lines[0], "KARTELA:K-1001");
    assert_eq!(lines[1], "RENK:19-4052");
    assert_eq!(lines[2], "ADI:Classic Blue");
    assert_eq!(lines[3], "DURUM:AKTIF");
    assert_eq!(lines[4], "GOZ:0/4");
    assert_eq!(lines[5], "MUSTERI:Deniz Tekstil");
    assert!(lines[6].starts_with("TARIH:"));

    let res = app
        .post_auth(
            &format!("{}/swatches/scan", BASE),
            &token,
            json!({ "payload": res.body }),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(res.data()["id"], s.id);

    let res = app
        .post_auth(
            &format!("{}/swatches/scan", BASE),
            &token,
            json!({ "payload": "RENK:1\nADI:x" }),
        )
        .await;
    assert_eq!(res.status, 400);
}
