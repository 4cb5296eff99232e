//! HttpRecordStore against a local mock server

use mockito::{Matcher, Server, ServerGuard};
use preprint_submit::config::Config;
use preprint_submit::error::Error;
use preprint_submit::store::{FileTransfer, HttpRecordStore, RecordStore, load_all};
use preprint_submit::types::{
    ActionTrigger, FileRef, ModerationWorkflow, PublicationDraft, ReviewAction, ReviewsState,
    WithdrawalRequest,
};
use serde_json::json;

const JSON_API: &str = "application/vnd.api+json";

fn store_for(server: &ServerGuard) -> HttpRecordStore {
    let config = Config {
        api_url: server.url(),
        files_url: server.url(),
        ..Config::default()
    };
    HttpRecordStore::new(&config, Some("secret-token".to_string()))
}

fn draft_resource(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "attributes": {
            "title": "Seven bridges",
            "description": "We revisit the seven bridges of Königsberg.",
            "tags": ["graphs"],
            "doi": null,
            "original_publication_date": "2023-04-05T00:00:00",
            "license_record": { "year": "2024", "copyright_holders": ["Ada"] },
            "subjects": [[{ "id": "eng", "text": "Engineering" }, "civil"]],
            "is_published": false,
            "reviews_state": "pending"
        },
        "relationships": {
            "node": { "data": { "type": "nodes", "id": "node1" } },
            "provider": { "data": { "type": "preprint_providers", "id": "engrxiv" } },
            "license": { "data": { "type": "licenses", "id": "mit", "name": "MIT License" } },
            "primary_file": { "data": { "type": "files", "id": "file1", "name": "paper.pdf" } }
        }
    })
}

#[tokio::test]
async fn test_find_providers_sends_token_and_parses_workflow() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/preprint_providers/")
        .match_header("authorization", "Bearer secret-token")
        .match_header("accept", JSON_API)
        .with_status(200)
        .with_header("content-type", JSON_API)
        .with_body(
            json!({
                "data": [
                    {
                        "id": "osf",
                        "attributes": { "name": "OSF Preprints", "reviews_workflow": null }
                    },
                    {
                        "id": "engrxiv",
                        "attributes": {
                            "name": "engrXiv",
                            "reviews_workflow": "pre-moderation",
                            "preprint_word": "paper",
                            "domain": "https://engrxiv.org/",
                            "domain_redirect_enabled": true
                        }
                    }
                ],
                "links": { "next": null }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let providers = store_for(&server).find_providers().await.unwrap();

    mock.assert_async().await;
    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0].moderation, ModerationWorkflow::None);
    assert_eq!(providers[0].document_type, "preprint");
    assert_eq!(providers[1].moderation, ModerationWorkflow::PreModeration);
    assert_eq!(providers[1].document_type, "paper");
    assert_eq!(providers[1].domain.as_deref(), Some("https://engrxiv.org/"));
    assert!(providers[1].domain_redirect_enabled);
}

#[tokio::test]
async fn test_licenses_follow_next_links() {
    let mut server = Server::new_async().await;
    let next = format!("{}/preprint_providers/osf/licenses/?page=2", server.url());
    let first = server
        .mock("GET", "/preprint_providers/osf/licenses/")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(
            json!({
                "data": [{ "id": "cc0", "attributes": { "name": "CC0 1.0 Universal" } }],
                "links": { "next": next }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let second = server
        .mock("GET", "/preprint_providers/osf/licenses/")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(
            json!({
                "data": [{
                    "id": "mit",
                    "attributes": {
                        "name": "MIT License",
                        "required_fields": ["year", "copyrightHolders"]
                    }
                }],
                "links": { "next": null }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let store = store_for(&server);
    let licenses = load_all(|page| store.acceptable_licenses("osf", page))
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let ids: Vec<_> = licenses.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["cc0", "mit"]);
    assert!(licenses[1].requires_year());
    assert!(licenses[1].requires_copyright_holders());
}

#[tokio::test]
async fn test_reload_draft_parses_relationships() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/preprints/draft1/")
        .with_status(200)
        .with_body(json!({ "data": draft_resource("draft1") }).to_string())
        .create_async()
        .await;

    let draft = store_for(&server).reload_draft("draft1").await.unwrap();

    assert_eq!(draft.id.as_deref(), Some("draft1"));
    assert_eq!(draft.container_id.as_deref(), Some("node1"));
    assert_eq!(draft.provider_id.as_deref(), Some("engrxiv"));
    assert_eq!(draft.license.as_ref().unwrap().name, "MIT License");
    assert_eq!(draft.primary_file.as_ref().unwrap().name, "paper.pdf");
    assert_eq!(
        draft.subjects,
        vec![vec!["eng".to_string(), "civil".to_string()]]
    );
    assert_eq!(
        draft.original_publication_date,
        chrono::NaiveDate::from_ymd_opt(2023, 4, 5)
    );
    assert_eq!(draft.reviews_state, ReviewsState::Pending);
    assert_eq!(
        draft.license_record.unwrap().copyright_holders,
        vec!["Ada".to_string()]
    );
}

#[tokio::test]
async fn test_save_draft_patches_attributes_and_relationships() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/preprints/draft1/")
        .match_body(Matcher::PartialJson(json!({
            "data": {
                "id": "draft1",
                "type": "preprints",
                "attributes": { "title": "Seven bridges", "is_published": true },
                "relationships": {
                    "node": { "data": { "type": "nodes", "id": "node1" } }
                }
            }
        })))
        .with_status(200)
        .with_body(json!({ "data": draft_resource("draft1") }).to_string())
        .create_async()
        .await;

    let draft = PublicationDraft {
        id: Some("draft1".to_string()),
        title: Some("Seven bridges".to_string()),
        container_id: Some("node1".to_string()),
        is_published: true,
        ..PublicationDraft::default()
    };
    store_for(&server).save_draft(&draft).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_carries_detail() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/nodes/node1/")
        .with_status(403)
        .with_body(r#"{"errors":[{"detail":"You do not have permission."}]}"#)
        .create_async()
        .await;

    let err = store_for(&server).find_container("node1").await.unwrap_err();

    let Error::Api(message) = err else {
        panic!("expected an API error, got {err:?}");
    };
    assert!(message.contains("403"));
    assert!(message.contains("You do not have permission."));
}

#[tokio::test]
async fn test_create_child_container_records_parent() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/nodes/parent1/children/")
        .match_body(Matcher::PartialJson(json!({
            "data": { "type": "nodes", "attributes": { "title": "Component" } }
        })))
        .with_status(201)
        .with_body(
            json!({
                "data": {
                    "id": "child1",
                    "attributes": {
                        "title": "Component",
                        "current_user_permissions": ["read", "write", "admin"]
                    }
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let child = store_for(&server)
        .create_child_container("parent1", "Component")
        .await
        .unwrap();

    assert_eq!(child.id, "child1");
    assert_eq!(child.parent_id.as_deref(), Some("parent1"));
    assert!(child.can_edit());
}

#[tokio::test]
async fn test_upload_puts_file_bytes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/v1/resources/node1/providers/osfstorage/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("kind".into(), "file".into()),
            Matcher::UrlEncoded("name".into(), "paper.pdf".into()),
        ]))
        .match_body("%PDF-1.7")
        .with_status(201)
        .with_body(json!({ "data": { "id": "file9", "attributes": { "name": "paper.pdf" } } }).to_string())
        .create_async()
        .await;

    let file = store_for(&server)
        .upload("node1", "paper.pdf", b"%PDF-1.7".to_vec())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        file,
        FileRef {
            id: "file9".to_string(),
            name: "paper.pdf".to_string(),
        }
    );
}

#[tokio::test]
async fn test_review_action_and_withdrawal_target_the_draft() {
    let mut server = Server::new_async().await;
    let action = server
        .mock("POST", "/actions/reviews/")
        .match_body(Matcher::PartialJson(json!({
            "data": {
                "type": "review_actions",
                "relationships": { "target": { "data": { "id": "draft1" } } }
            }
        })))
        .with_status(201)
        .with_body(json!({ "data": { "id": "action1", "attributes": {} } }).to_string())
        .create_async()
        .await;
    let withdrawal = server
        .mock("POST", "/preprints/draft1/requests/")
        .match_body(Matcher::PartialJson(json!({
            "data": {
                "type": "preprint_requests",
                "attributes": { "comment": "Wrong file", "request_type": "withdrawal" }
            }
        })))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let store = store_for(&server);
    let saved = store
        .save_review_action(&ReviewAction {
            id: None,
            trigger: ActionTrigger::Submit,
            target_id: "draft1".to_string(),
        })
        .await
        .unwrap();
    store
        .save_withdrawal_request(&WithdrawalRequest {
            target_id: "draft1".to_string(),
            comment: "Wrong file".to_string(),
        })
        .await
        .unwrap();

    action.assert_async().await;
    withdrawal.assert_async().await;
    assert_eq!(saved.id.as_deref(), Some("action1"));
}
