use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;

use kartela_core::models::swatch::{self, SwatchStatus};
use kartela_core::models::user::Role;
use kartela_core::testing::TestApp;

const BASE: &str = "/api/room/ROOM-0001";

async fn set_status(app: &TestApp, s: swatch::Model, status: SwatchStatus) {
    let mut active: swatch::ActiveModel = s.into();
    active.status = Set(status);
    active.update(&app.db).await.unwrap();
}

#[tokio::test]
async fn test_room_dashboard_counts_room_only() {
    let app = TestApp::new().await;
    let room = app.seed_room("ROOM-0001", "Kartela Arşivi").await;
    let other = app.seed_room("ROOM-0002", "Kalite Arşivi").await;
    let token = app.session("USER-0001", Role::Operator, false, &room).await;

    let shelf = app.seed_shelf(room.id, "R1", 10).await;
    let small = app.seed_cell(shelf.id, "H1", 1).await;
    let big = app.seed_cell(shelf.id, "H2", 5).await;
    let elsewhere = app.seed_shelf(other.id, "R9", 10).await;
    let far = app.seed_cell(elsewhere.id, "H9", 5).await;

    app.seed_swatch("K-1", "1", "Bir", Some(small.id)).await;
    let dolu = app.seed_swatch("K-2", "2", "İki", Some(big.id)).await;
    set_status(&app, dolu, SwatchStatus::Dolu).await;
    app.seed_swatch("K-3", "3", "Üç", Some(far.id)).await;
    app.seed_swatch("K-4", "4", "Dört", None).await;

    let res = app.get_auth(&format!("{}/dashboard", BASE), &token).await;
    assert_eq!(res.status, 200, "{}", res.body);
    let data = res.data();
    assert_eq!(data["session"]["roomCode"], "ROOM-0001");
    assert_eq!(data["room"]["code"], "ROOM-0001");
    assert_eq!(data["status_counts"]["AKTIF"], 1);
    assert_eq!(data["status_counts"]["DOLU"], 1);
    assert_eq!(data["status_counts"]["total"], 2);
    assert_eq!(data["cell_count"], 2);
    assert_eq!(data["full_cell_count"], 1);
}

#[tokio::test]
async fn test_supervisor_dashboard_role_gate() {
    let app = TestApp::new().await;
    let room = app.seed_room("ROOM-0001", "Kartela Arşivi").await;
    let operator = app.session("USER-0001", Role::Operator, false, &room).await;
    let admin = app.session("USER-0009", Role::Operator, true, &room).await;
    let supervisor = app.session("USER-0002", Role::Supervisor, false, &room).await;
    let path = format!("{}/dashboard/supervisor", BASE);

    assert_eq!(app.get_auth(&path, &operator).await.status, 403);
    assert_eq!(app.get_auth(&path, &admin).await.status, 200);
    assert_eq!(app.get_auth(&path, &supervisor).await.status, 200);
}

#[tokio::test]
async fn test_supervisor_dashboard_contents() {
    let app = TestApp::new().await;
    let room = app.seed_room("ROOM-0001", "Kartela Arşivi").await;
    let token = app.session("USER-0002", Role::Supervisor, false, &room).await;
    let shelf = app.seed_shelf(room.id, "R1", 10).await;
    let cell = app.seed_cell(shelf.id, "H1", 1).await;
    let s = app.seed_swatch("K-1", "1", "Bir", Some(cell.id)).await;
    let archived = app.seed_swatch("K-2", "2", "İki", None).await;
    set_status(&app, archived, SwatchStatus::KartelaArsiv).await;

    app.post_auth(&format!("{}/swatches/{}/fill-slot", BASE, s.id), &token, json!({}))
        .await;
    app.post_auth(
        &format!("{}/swatches/{}/status", BASE, s.id),
        &token,
        json!({ "status": "KALITE_ARSIV" }),
    )
    .await;

    let res = app
        .get_auth(&format!("{}/dashboard/supervisor", BASE), &token)
        .await;
    let data = res.data();
    assert_eq!(data["status_counts"]["KARTELA_ARSIV"], 1);
    assert_eq!(data["status_counts"]["KALITE_ARSIV"], 1);
    assert_eq!(data["full_cells"][0]["code"], "H1");
    let actions: Vec<&str> = data["recent_movements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["STATUS_CHANGE", "SLOT_FILL"]);
}

#[tokio::test]
async fn test_manager_dashboard() {
    let app = TestApp::new().await;
    let room = app.seed_room("ROOM-0001", "Kartela Arşivi").await;
    app.seed_room("ROOM-0002", "Kalite Arşivi").await;
    let supervisor = app.session("USER-0002", Role::Supervisor, false, &room).await;
    let manager = app.session("USER-0003", Role::Manager, false, &room).await;
    let path = format!("{}/dashboard/manager", BASE);

    assert_eq!(app.get_auth(&path, &supervisor).await.status, 403);

    let shelf = app.seed_shelf(room.id, "R1", 10).await;
    let cell = app.seed_cell(shelf.id, "H1", 5).await;
    app.seed_swatch("K-1", "1", "Bir", Some(cell.id)).await;
    app.seed_swatch("K-2", "2", "İki", None).await;
    app.seed_customer("M-001", "Deniz Tekstil").await;

    let res = app.get_auth(&path, &manager).await;
    assert_eq!(res.status, 200, "{}", res.body);
    let data = res.data();
    assert_eq!(data["totals"]["swatches"], 2);
    assert_eq!(data["totals"]["customers"], 1);
    assert_eq!(data["totals"]["active_users"], 2);
    assert_eq!(data["totals"]["rooms"], 2);
    assert_eq!(data["rooms"][0]["room_code"], "ROOM-0001");
    assert_eq!(data["rooms"][0]["swatches"], 1);
    assert_eq!(data["rooms"][1]["swatches"], 0);

    // one ACCESS_GRANTED per login
    let logs = data["recent_system_logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["action"], "ACCESS_GRANTED");
}
