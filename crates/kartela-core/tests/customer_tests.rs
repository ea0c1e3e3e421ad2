use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::json;

use kartela_core::models::swatch::{self, SwatchStatus};
use kartela_core::models::system_log;
use kartela_core::models::user::Role;
use kartela_core::testing::TestApp;

const BASE: &str = "/api/room/ROOM-0001";

async fn setup(role: Role) -> (TestApp, String) {
    let app = TestApp::new().await;
    let room = app.seed_room("ROOM-0001", "Kartela Arşivi").await;
    let token = app.session("USER-0001", role, false, &room).await;
    (app, token)
}

fn codes(res: &kartela_core::TestResponse) -> Vec<String> {
    res.data()["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_search_customers() {
    let (app, token) = setup(Role::Operator).await;
    app.seed_customer("M-001", "Deniz Tekstil").await;
    app.seed_customer("M-002", "Anadolu Örme").await;
    app.seed_customer("X-100", "Deniz Konfeksiyon").await;

    let res = app.get_auth(&format!("{}/customers?q=Deniz", BASE), &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(codes(&res), vec!["X-100", "M-001"]);

    let res = app.get_auth(&format!("{}/customers?q=M-0", BASE), &token).await;
    assert_eq!(codes(&res), vec!["M-002", "M-001"]);

    let res = app.get_auth(&format!("{}/customers?q=D", BASE), &token).await;
    assert_eq!(res.data()["total"], 3);
}

#[tokio::test]
async fn test_search_customers_treats_wildcards_literally() {
    let (app, token) = setup(Role::Operator).await;
    app.seed_customer("M_01", "Deniz %50 Tekstil").await;
    app.seed_customer("MX01", "Anadolu Örme").await;

    let res = app.get_auth(&format!("{}/customers?q=M_", BASE), &token).await;
    assert_eq!(codes(&res), vec!["M_01"]);

    let res = app.get_auth(&format!("{}/customers?q=%2550", BASE), &token).await;
    assert_eq!(codes(&res), vec!["M_01"]);

    let res = app.get_auth(&format!("{}/customers?q=%25%25", BASE), &token).await;
    assert_eq!(res.data()["total"], 0);
}

#[tokio::test]
async fn test_counts_computed_from_swatches() {
    let (app, token) = setup(Role::Operator).await;
    let c = app.seed_customer("M-001", "Deniz Tekstil").await;

    for (number, used) in [("K-1", 0), ("K-2", 4), ("K-3", 4)] {
        let s = app.seed_swatch(number, "1", "Bir", None).await;
        let mut active: swatch::ActiveModel = s.into();
        active.customer_id = Set(Some(c.id));
        active.slots_used = Set(used);
        if used == 4 {
            active.status = Set(SwatchStatus::Dolu);
        }
        active.update(&app.db).await.unwrap();
    }
    let deleted = app.seed_swatch("K-4", "1", "Bir", None).await;
    let mut active: swatch::ActiveModel = deleted.into();
    active.customer_id = Set(Some(c.id));
    active.is_deleted = Set(true);
    active.update(&app.db).await.unwrap();

    let res = app.get_auth(&format!("{}/customers/{}", BASE, c.id), &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["swatch_count"], 3);
    assert_eq!(res.data()["full_swatch_count"], 2);

    let res = app
        .get_auth(&format!("{}/customers/{}/swatches", BASE, c.id), &token)
        .await;
    let numbers: Vec<String> = res
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["number"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(numbers, vec!["K-1", "K-2", "K-3"]);
}

#[tokio::test]
async fn test_create_requires_supervisor() {
    let (app, token) = setup(Role::Operator).await;

    let res = app
        .post_auth(
            &format!("{}/customers", BASE),
            &token,
            json!({ "code": "M-010", "name": "Yeni Müşteri" }),
        )
        .await;
    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn test_create_and_update_customer() {
    let (app, token) = setup(Role::Supervisor).await;

    let res = app
        .post_auth(
            &format!("{}/customers", BASE),
            &token,
            json!({ "code": "M-010", "name": "Yeni Müşteri" }),
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.body);
    assert_eq!(res.data()["swatch_count"], 0);
    assert_eq!(res.data()["is_active"], true);
    let id = res.data()["id"].as_i64().unwrap();

    let res = app
        .post_auth(
            &format!("{}/customers", BASE),
            &token,
            json!({ "code": "M-010", "name": "Başka" }),
        )
        .await;
    assert_eq!(res.status, 409);

    let res = app
        .put_auth(
            &format!("{}/customers/{}", BASE, id),
            &token,
            json!({ "name": "Yeni Müşteri A.Ş.", "is_active": false }),
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["name"], "Yeni Müşteri A.Ş.");
    assert_eq!(res.data()["is_active"], false);

    let res = app
        .get_auth(&format!("{}/customers?active_only=true", BASE), &token)
        .await;
    assert_eq!(res.data()["total"], 0);

    let logs = system_log::Entity::find()
        .filter(system_log::Column::Action.starts_with("CUSTOMER_"))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(logs, 2);
}

#[tokio::test]
async fn test_unknown_customer() {
    let (app, token) = setup(Role::Operator).await;

    let res = app.get_auth(&format!("{}/customers/999", BASE), &token).await;
    assert_eq!(res.status, 404);

    let res = app
        .get_auth(&format!("{}/customers/999/swatches", BASE), &token)
        .await;
    assert_eq!(res.status, 404);
}
