//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every accessor over
//! real HTTP through the default `UreqTransport`. Validates that request
//! building, status mapping, and envelope handling agree with the server's
//! wire format.

use std::sync::Arc;
use std::time::Duration;

use snapads_core::{ApiError, Context, HttpMethod, HttpStatusError, SnapchatClient};

const TOKEN: &str = "mock-token";

/// Start a mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(host: &str) -> SnapchatClient {
    SnapchatClient::builder()
        .access_token(TOKEN)
        .host(host)
        .build()
        .unwrap()
}

fn client_with_header(host: &str, name: &str, value: &str) -> SnapchatClient {
    SnapchatClient::builder()
        .access_token(TOKEN)
        .host(host)
        .header(name, value)
        .build()
        .unwrap()
}

#[test]
fn read_every_resource() {
    let host = start_server();
    let client = client(&host);
    let ctx = Context::with_timeout(Duration::from_secs(10));

    let me = client.users().me(&ctx).unwrap();
    assert_eq!(me.organization_id, "org-1");

    let orgs = client.organizations().list(&ctx).unwrap();
    assert_eq!(orgs.len(), 1);
    let org = client.organizations().get(&ctx, "org-1").unwrap();
    assert_eq!(org, orgs[0]);

    let accounts = client.ad_accounts().list(&ctx, "org-1").unwrap();
    assert_eq!(accounts.len(), 2);
    let account = client.ad_accounts().get(&ctx, "acct-1").unwrap();
    assert_eq!(account.funding_source_ids, ["fs-1", "fs-2"]);
    assert_eq!(account.timezone, "America/Los_Angeles");

    let sources = client.funding_sources().list(&ctx, "org-1").unwrap();
    assert_eq!(sources.len(), 2);
    let coupon = client.funding_sources().get(&ctx, "fs-2").unwrap();
    assert_eq!(coupon.kind, "COUPON");
    assert_eq!(coupon.value_micro, 100_000_000);
    assert!(coupon.created_at.is_some());

    let campaigns = client.campaigns().list(&ctx, "acct-1").unwrap();
    assert_eq!(campaigns.len(), 2);
    let paused = client.campaigns().get(&ctx, "camp-2").unwrap();
    assert_eq!(paused.status, "PAUSED");

    let squads = client.ad_squads().list_by_campaign(&ctx, "camp-1").unwrap();
    assert_eq!(squads.len(), 1);
    let squads = client.ad_squads().list_by_ad_account(&ctx, "acct-1").unwrap();
    assert_eq!(squads.len(), 2);
    let squad = client.ad_squads().get(&ctx, "sq-1").unwrap();
    assert_eq!(squad.bid_micro, 1_500_000);

    let ad = client.ads().get(&ctx, "ad-1").unwrap();
    assert_eq!(ad.ad_squad_id, "sq-1");

    let stats = client.measurements().stats_for_ad_squad(&ctx, "sq-1").unwrap();
    let total = stats.items[0].entity.as_ref().unwrap();
    assert_eq!(total.stats.impressions, 12_000);
    assert_eq!(total.stats.first_quartile, 9_100);
}

#[test]
fn failed_sub_requests_are_dropped_from_lists() {
    let host = start_server();
    let client = client(&host);
    let ctx = Context::background();

    let ads = client.ads().list_by_ad_squad(&ctx, "sq-1").unwrap();
    let ids: Vec<&str> = ads.iter().map(|ad| ad.id.as_str()).collect();
    assert_eq!(ids, ["ad-1"]);

    let ads = client.ads().list_by_ad_account(&ctx, "acct-1").unwrap();
    let ids: Vec<&str> = ads.iter().map(|ad| ad.id.as_str()).collect();
    assert_eq!(ids, ["ad-1", "ad-3"]);

    // Singleton lookups take the first entry regardless of its sub-status.
    let rejected = client.ads().get(&ctx, "ad-2").unwrap();
    assert_eq!(rejected.review_status, "REJECTED");
}

#[test]
fn empty_children_are_an_empty_result() {
    let host = start_server();
    let client = client(&host);

    let err = client
        .campaigns()
        .list(&Context::background(), "acct-2")
        .unwrap_err();
    assert!(
        matches!(&err, ApiError::EmptyResult { context } if context == "list campaigns for ad account with id acct-2"),
        "{err:?}"
    );
}

#[test]
fn status_codes_map_to_typed_errors() {
    let host = start_server();
    let ctx = Context::background();

    let anonymous = SnapchatClient::builder().host(&host).build().unwrap();
    let err = anonymous.users().me(&ctx).unwrap_err();
    assert_eq!(err.status_error(), Some(HttpStatusError::Unauthorized));

    let err = client(&host).campaigns().get(&ctx, "camp-404").unwrap_err();
    assert_eq!(err.status_error(), Some(HttpStatusError::NotFound));

    for (code, expected) in [
        ("429", HttpStatusError::TooManyRequests),
        ("503", HttpStatusError::ServiceUnavailable),
        ("418", HttpStatusError::Other(418)),
    ] {
        let forced = client_with_header(&host, "x-mock-status", code);
        let err = forced.ads().get(&ctx, "ad-1").unwrap_err();
        assert_eq!(err.status_error(), Some(expected), "{code}");
    }
}

#[test]
fn delete_then_get_is_not_found() {
    let host = start_server();
    let client = client(&host);
    let ctx = Context::background();

    client.ads().delete(&ctx, "ad-3").unwrap();
    client.ad_squads().delete(&ctx, "sq-2").unwrap();
    client.campaigns().delete(&ctx, "camp-2").unwrap();

    let err = client.ads().get(&ctx, "ad-3").unwrap_err();
    assert_eq!(err.status_error(), Some(HttpStatusError::NotFound));

    let campaigns = client.campaigns().list(&ctx, "acct-1").unwrap();
    assert_eq!(campaigns.len(), 1);
}

#[test]
fn deadline_shorter_than_response_times_out() {
    let host = start_server();
    let slow = client_with_header(&host, "x-mock-delay-ms", "2000");

    let ctx = Context::with_timeout(Duration::from_millis(200));
    let err = slow.users().me(&ctx).unwrap_err();
    assert!(matches!(err, ApiError::TimedOut), "{err:?}");
}

#[test]
fn canceled_context_sends_nothing() {
    let host = start_server();
    let client = client(&host);
    let ctx = Context::background();
    ctx.cancel();

    let err = client.ads().delete(&ctx, "ad-1").unwrap_err();
    assert!(matches!(err, ApiError::Canceled));

    // The delete never reached the server.
    let ad = client.ads().get(&Context::background(), "ad-1").unwrap();
    assert_eq!(ad.id, "ad-1");
}

#[test]
fn raw_requests_round_trip() {
    let host = start_server();
    let client = client(&host);

    let request = client.build_request(HttpMethod::Get, "me").unwrap();
    let body: serde_json::Value = client.execute(&Context::background(), request).unwrap();
    assert_eq!(body["me"]["id"], "user-1");
}

#[test]
fn bodiless_post_and_put_send_an_empty_body() {
    let host = start_server();
    let client = client(&host);
    let ctx = Context::background();

    for (method, name) in [(HttpMethod::Post, "POST"), (HttpMethod::Put, "PUT")] {
        let request = client.build_request(method, "echo").unwrap();
        assert!(request.body.is_none());

        let echo: serde_json::Value = client.execute(&ctx, request).unwrap();
        assert_eq!(echo["method"], name);
        assert_eq!(echo["body_len"], 0, "{name}");
        assert!(echo["content_type"].is_null(), "{name}: {echo}");
        assert!(
            echo["content_length"].is_null() || echo["content_length"] == "0",
            "{name}: {echo}"
        );
    }
}

#[test]
fn post_with_body_carries_json() {
    let host = start_server();
    let client = client(&host);

    let body = serde_json::json!({"campaigns": [{"id": "camp-1"}]});
    let request = client
        .build_json_request(HttpMethod::Post, "echo", &body)
        .unwrap();
    let sent = request.body.as_ref().map(String::len).unwrap();

    let echo: serde_json::Value = client.execute(&Context::background(), request).unwrap();
    assert_eq!(echo["body_len"], sent);
    assert_eq!(echo["content_type"], "application/json");
}

#[test]
fn token_rotation_reaches_the_server() {
    let host = start_server();
    let client = SnapchatClient::builder()
        .access_token("expired")
        .host(&host)
        .build()
        .unwrap();
    let ctx = Context::background();

    let err = client.users().me(&ctx).unwrap_err();
    assert_eq!(err.status_error(), Some(HttpStatusError::Unauthorized));

    client.update_access_token(TOKEN);
    assert!(client.users().me(&ctx).is_ok());
}

#[test]
fn concurrent_calls_share_one_client() {
    let host = start_server();
    let client = Arc::new(client(&host));

    let handles: Vec<_> = ["ad-1", "ad-2", "ad-3"]
        .into_iter()
        .cycle()
        .take(12)
        .map(|id| {
            let client = Arc::clone(&client);
            std::thread::spawn(move || {
                let ad = client.ads().get(&Context::background(), id).unwrap();
                (id, ad.id)
            })
        })
        .collect();

    for handle in handles {
        let (requested, returned) = handle.join().unwrap();
        assert_eq!(requested, returned);
    }
}
