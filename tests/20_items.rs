mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn naruto_scenario_end_to_end() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let user_u = common::token_for("user-u");
    let user_v = common::token_for("user-v");

    let res = client
        .post(server.url("/anime"))
        .bearer_auth(&user_u)
        .json(&json!({ "title": "Naruto", "rating": 9, "status": "watching", "cover": "url" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created["userId"], "user-u");
    assert_eq!(created["title"], "Naruto");

    let mine = client
        .get(server.url("/anime"))
        .bearer_auth(&user_u)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    assert_eq!(mine[0]["id"], created["id"]);
    assert_eq!(mine[0]["status"], "watching");
    assert_eq!(mine[0]["cover"], "url");

    let theirs = client
        .get(server.url("/anime"))
        .bearer_auth(&user_v)
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(theirs, json!([]));
    Ok(())
}

#[tokio::test]
async fn update_then_delete_lifecycle() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();
    let owner = common::token_for("owner");
    let intruder = common::token_for("intruder");

    let created = client
        .post(server.url("/games"))
        .bearer_auth(&owner)
        .json(&json!({ "title": "Hades", "rating": 8.5, "status": "playing", "cover": "hades.png" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let item_url = server.url(&format!("/games/{}", created["id"].as_str().unwrap_or_default()));

    let res = client
        .put(&item_url)
        .bearer_auth(&intruder)
        .json(&json!({ "status": "dropped" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(&item_url)
        .bearer_auth(&owner)
        .json(&json!({ "status": "completed", "rating": 10 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["rating"], 10.0);
    assert_eq!(updated["title"], "Hades");

    let res = client.delete(&item_url).bearer_auth(&intruder).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(&item_url).bearer_auth(&owner).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["message"], "Item deleted successfully");

    let res = client.delete(&item_url).bearer_auth(&owner).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn gates_run_in_order() -> Result<()> {
    let server = common::spawn_server().await?;
    let client = reqwest::Client::new();

    // Invalid category wins over missing credentials
    let res = client.get(server.url("/podcasts")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Invalid category");

    let res = client.get(server.url("/books")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/books"))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
