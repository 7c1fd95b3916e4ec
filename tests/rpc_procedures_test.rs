mod common;

use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

use common::{FailingStore, Harness};
use wholesale_rpc::recommend::{RankingService, Suggestion};
use wholesale_rpc::rpc::{ErrorCode, SessionEffect};
use wholesale_rpc::seed::{ReferenceData, SeedData};
use wholesale_rpc::session::MemorySessions;
use wholesale_rpc::{Caller, MemoryStore, ProcedureKind, Repositories, RpcError, RpcRouter};

use ProcedureKind::{Mutation, Query};

async fn data(harness: &Harness, caller: &Caller, path: &str, kind: ProcedureKind, input: Value) -> Value {
    harness
        .router
        .call(caller, path, kind, input)
        .await
        .unwrap_or_else(|e| panic!("{path} failed: {e}"))
        .data
}

#[tokio::test]
async fn malformed_input_is_rejected_before_any_collaborator_call() {
    let harness = Harness::new();
    let admin = harness.admin();

    let cases = [
        ("products.getById", Query, json!("1")),
        ("products.getById", Query, json!(null)),
        ("products.search", Query, json!(42)),
        ("products.search", Query, json!("  ")),
        ("products.recommend", Query, json!({ "productIds": "1,2" })),
        ("orders.getByNumber", Query, json!({ "orderNumber": "ORD-2026-0042" })),
        ("orders.getItems", Query, json!("two")),
        ("chat.sendMessage", Mutation, json!({ "userQuery": "cable" })),
        ("chat.sendMessage", Mutation, json!({ "messages": [], "userQuery": 5 })),
        ("chat.sendMessage", Mutation, json!({ "messages": [{ "role": "robot", "content": "x" }], "userQuery": "hi" })),
        ("chat.getAlternatives", Query, json!({ "productId": -4 })),
        ("chat.exportToEmail", Mutation, json!({ "email": "nobody", "messages": [] })),
        ("invoices.getById", Query, json!(3)),
        ("invoices.updateStatus", Mutation, json!({ "id": 1, "status": "lost" })),
        ("deliveryOrders.updateStatus", Mutation, json!({ "id": 1 })),
        ("dealers.predictiveCart", Query, json!({ "dealerId": 0 })),
    ];

    for (path, kind, input) in cases {
        let err = harness
            .router
            .call(&admin, path, kind, input.clone())
            .await
            .expect_err(path);
        assert!(
            matches!(err, RpcError::InvalidInput(_)),
            "{path} with {input} gave {err:?}"
        );
    }
    assert_eq!(harness.collaborator_calls(), 0);
}

#[tokio::test]
async fn access_is_checked_before_input() {
    let harness = Harness::new();

    let err = harness
        .router
        .call(&Caller::anonymous(), "invoices.updateStatus", Mutation, json!("garbage"))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Unauthorized));

    let err = harness
        .router
        .call(&harness.dealer(), "deliveryOrders.list", Query, Value::Null)
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Forbidden));
    assert_eq!(harness.collaborator_calls(), 0);

    let list = data(&harness, &harness.admin(), "deliveryOrders.list", Query, Value::Null).await;
    assert_eq!(list.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn unknown_session_tokens_are_anonymous() {
    let harness = Harness::new();
    let caller = harness.router.caller(Some("not-a-session"));
    assert!(caller.user.is_none());

    let err = harness
        .router
        .call(&caller, "invoices.list", Query, Value::Null)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn product_lookup_by_id() {
    let harness = Harness::new();
    let anon = Caller::anonymous();

    let product = data(&harness, &anon, "products.getById", Query, json!(1)).await;
    assert_eq!(product["id"], 1);
    assert_eq!(product["sku"], "CBL-USBC-1M");

    let missing = data(&harness, &anon, "products.getById", Query, json!(99999)).await;
    assert!(missing.is_null());
}

#[tokio::test]
async fn product_search_matches_name_or_description_ignoring_case() {
    let harness = Harness::new();
    let anon = Caller::anonymous();

    let hits = data(&harness, &anon, "products.search", Query, json!("cable")).await;
    let hits = hits.as_array().unwrap();
    assert!(!hits.is_empty());
    for hit in hits {
        let text = format!("{} {}", hit["name"], hit["description"]).to_lowercase();
        assert!(text.contains("cable"), "{text}");
    }

    let upper = data(&harness, &anon, "products.search", Query, json!("CABLE")).await;
    assert_eq!(upper.as_array().unwrap(), hits);

    // Product 6 mentions a cable only in its description.
    assert!(hits.iter().any(|p| p["id"] == 6));

    let none = data(
        &harness,
        &anon,
        "products.search",
        Query,
        json!("nonexistentproduct12345"),
    )
    .await;
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn order_lookup_by_number() {
    let harness = Harness::new();
    let anon = Caller::anonymous();

    let order = data(&harness, &anon, "orders.getByNumber", Query, json!("ORD-2026-0042")).await;
    assert_eq!(order["orderNumber"], "ORD-2026-0042");
    assert!(order["total"].as_i64().unwrap() > 0);
    assert_eq!(order["status"], "in_transit");

    let missing = data(&harness, &anon, "orders.getByNumber", Query, json!("ORD-1999-0001")).await;
    assert!(missing.is_null());
}

#[tokio::test]
async fn order_items_are_complete_or_empty() {
    let harness = Harness::new();
    let anon = Caller::anonymous();

    let order = data(&harness, &anon, "orders.getByNumber", Query, json!("ORD-2026-0042")).await;
    let items = data(&harness, &anon, "orders.getItems", Query, order["id"].clone()).await;
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 4);

    let mut total = 0;
    for item in items {
        assert!(item["productName"].is_string());
        assert!(item["productSku"].is_string());
        let quantity = item["quantity"].as_i64().unwrap();
        let unit_price = item["unitPrice"].as_i64().unwrap();
        let subtotal = item["subtotal"].as_i64().unwrap();
        assert_eq!(quantity * unit_price, subtotal);
        total += subtotal;
    }
    assert_eq!(Some(total), order["subtotal"].as_i64());

    let empty_order = data(&harness, &anon, "orders.getItems", Query, json!(3)).await;
    assert_eq!(empty_order, json!([]));
    let unknown = data(&harness, &anon, "orders.getItems", Query, json!(99999)).await;
    assert_eq!(unknown, json!([]));
}

#[tokio::test]
async fn recommendations_are_deterministic() {
    let harness = Harness::new();
    let anon = Caller::anonymous();
    let input = json!({ "productIds": [10, 1, 8, 1] });

    let first = data(&harness, &anon, "products.recommend", Query, input.clone()).await;
    let second = data(&harness, &anon, "products.recommend", Query, input).await;
    assert_eq!(first, second);

    let suggestions = first.as_array().unwrap();
    assert!(!suggestions.is_empty() && suggestions.len() <= 4);
    for s in suggestions {
        assert!(s["reason"].as_str().is_some_and(|r| !r.is_empty()));
        assert!(![1, 8, 10].contains(&s["productId"].as_i64().unwrap()));
    }
}

#[tokio::test]
async fn invoice_status_update_reports_success_flag() {
    let harness = Harness::new();
    let admin = harness.admin();

    let result = data(
        &harness,
        &admin,
        "invoices.updateStatus",
        Mutation,
        json!({ "id": 2, "status": "paid" }),
    )
    .await;
    assert_eq!(result, json!({ "success": true }));

    let invoice = data(&harness, &admin, "invoices.getById", Query, json!({ "id": 2 })).await;
    assert_eq!(invoice["status"], "paid");
    assert!(invoice["paidAt"].is_string());

    let missing = data(
        &harness,
        &admin,
        "invoices.updateStatus",
        Mutation,
        json!({ "id": 404, "status": "paid" }),
    )
    .await;
    assert_eq!(missing, json!({ "success": false }));
}

#[tokio::test]
async fn delivery_status_update_stamps_dispatch_time() {
    let harness = Harness::new();
    let admin = harness.admin();

    let before = data(&harness, &admin, "deliveryOrders.getById", Query, json!({ "id": 3 })).await;
    assert!(before["dispatchedAt"].is_null());

    let result = data(
        &harness,
        &admin,
        "deliveryOrders.updateStatus",
        Mutation,
        json!({ "id": 3, "status": "dispatched" }),
    )
    .await;
    assert_eq!(result["success"], true);

    let after = data(&harness, &admin, "deliveryOrders.getById", Query, json!({ "id": 3 })).await;
    assert_eq!(after["status"], "dispatched");
    assert!(after["dispatchedAt"].is_string());
    assert!(after["deliveredAt"].is_null());

    data(
        &harness,
        &admin,
        "deliveryOrders.updateStatus",
        Mutation,
        json!({ "id": 3, "status": "delivered" }),
    )
    .await;
    let delivered = data(&harness, &admin, "deliveryOrders.getById", Query, json!({ "id": 3 })).await;
    assert_eq!(delivered["status"], "delivered");
    assert!(delivered["deliveredAt"].is_string());
    assert_eq!(delivered["dispatchedAt"], after["dispatchedAt"]);
}

#[tokio::test]
async fn procedures_must_be_called_with_their_kind() {
    let harness = Harness::new();
    let anon = Caller::anonymous();

    let err = harness
        .router
        .call(&anon, "products.list", Mutation, Value::Null)
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::MethodNotSupported { .. }));

    let err = harness
        .router
        .call(&anon, "products.delete", Mutation, Value::Null)
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::ProcedureNotFound(ref p) if p == "products.delete"));
    assert_eq!(harness.collaborator_calls(), 0);
}

#[tokio::test]
async fn logout_revokes_session_and_clears_cookie() {
    let harness = Harness::new();
    let dealer = harness.dealer();

    let me = data(&harness, &dealer, "auth.me", Query, Value::Null).await;
    assert_eq!(me["role"], "user");

    let out = harness
        .router
        .call(&dealer, "auth.logout", Mutation, Value::Null)
        .await
        .unwrap();
    assert_eq!(out.data, json!({ "success": true }));
    assert_eq!(out.effect, Some(SessionEffect::ClearCookie));

    let after = harness.dealer();
    assert!(after.user.is_none());
    let me = data(&harness, &after, "auth.me", Query, Value::Null).await;
    assert!(me.is_null());

    let anon_logout = harness
        .router
        .call(&Caller::anonymous(), "auth.logout", Mutation, Value::Null)
        .await
        .unwrap();
    assert_eq!(anon_logout.data["success"], true);
}

#[tokio::test]
async fn chat_procedures_reach_the_chat_collaborator() {
    let harness = Harness::new();
    let anon = Caller::anonymous();

    let reply = data(
        &harness,
        &anon,
        "chat.sendMessage",
        Mutation,
        json!({
            "messages": [{ "role": "user", "content": "hello" }],
            "userQuery": "power bank"
        }),
    )
    .await;
    assert!(reply["response"].as_str().unwrap().contains("power bank"));
    assert!(!reply["products"].as_array().unwrap().is_empty());

    let alts = data(&harness, &anon, "chat.getAlternatives", Query, json!({ "productId": 6 })).await;
    assert_eq!(alts[0]["id"], 7);

    let export = data(
        &harness,
        &anon,
        "chat.exportToEmail",
        Mutation,
        json!({ "email": "buyer@example.com", "messages": [] }),
    )
    .await;
    assert_eq!(export["success"], true);
    assert_eq!(harness.chat.calls(), 3);
}

#[tokio::test]
async fn reference_tables_are_served() {
    let harness = Harness::new();
    let anon = Caller::anonymous();

    let tiers = data(&harness, &anon, "loyalty.tiers", Query, Value::Null).await;
    assert_eq!(tiers.as_array().map(Vec::len), Some(4));

    let agents = data(&harness, &anon, "agents.list", Query, Value::Null).await;
    assert!(agents[0]["name"].is_string());

    let cart = data(
        &harness,
        &harness.dealer(),
        "dealers.predictiveCart",
        Query,
        json!({ "dealerId": 2 }),
    )
    .await;
    assert_eq!(cart.as_array().map(Vec::len), Some(2));

    let dealers = data(&harness, &harness.admin(), "dealers.list", Query, Value::Null).await;
    assert_eq!(dealers[0]["recentOrders"][0]["status"], "delivered");
}

#[tokio::test]
async fn store_failures_surface_as_opaque_collaborator_errors() {
    let memory = Arc::new(MemoryStore::seeded());
    let repos = Repositories {
        products: Arc::new(FailingStore),
        ..Repositories::from_store(memory)
    };
    let router = RpcRouter::new(repos, Arc::new(MemorySessions::new()));

    let err = router
        .call(&Caller::anonymous(), "products.getById", Query, json!(1))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InternalServerError);
    assert_eq!(err.public_message(), "Internal server error");

    let order = router
        .call(&Caller::anonymous(), "orders.getByNumber", Query, json!("ORD-2026-0041"))
        .await
        .unwrap();
    assert_eq!(order.data["id"], 1);
}

/// Ranks every selection to the same single product.
struct FixedRanking(i32);

impl RankingService for FixedRanking {
    fn rank(&self, _selected: &BTreeSet<i32>) -> Vec<Suggestion> {
        vec![Suggestion {
            product_id: self.0,
            reason: "Pinned by merchandising",
        }]
    }
}

#[tokio::test]
async fn ranking_and_reference_collaborators_can_be_replaced() {
    let mut seed = SeedData::mock();
    seed.loyalty_tiers.truncate(1);
    let router = RpcRouter::new(
        Repositories::from_store(Arc::new(MemoryStore::seeded())),
        Arc::new(MemorySessions::new()),
    )
    .with_ranking(Arc::new(FixedRanking(11)))
    .with_reference(Arc::new(ReferenceData::new(&seed)));
    let anon = Caller::anonymous();

    let suggestions = router
        .call(&anon, "products.recommend", Query, json!({ "productIds": [1] }))
        .await
        .unwrap()
        .data;
    assert_eq!(
        suggestions,
        json!([{ "productId": 11, "reason": "Pinned by merchandising" }])
    );

    let tiers = router
        .call(&anon, "loyalty.tiers", Query, Value::Null)
        .await
        .unwrap()
        .data;
    assert_eq!(tiers.as_array().map(Vec::len), Some(1));
}
