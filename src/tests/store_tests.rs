use crate::core::errors::AppError;
use crate::core::models::UserChanges;
use crate::infrastructure::session::SessionStore;
use crate::infrastructure::storage::collection::UserCollection;
use crate::infrastructure::storage::cookie::{self, CookieUserStore, USERS_COOKIE};
use crate::infrastructure::storage::session::USERS_KEY;
use crate::infrastructure::storage::{StoreBackend, UserStore};
use crate::tests::new_user;

async fn open(backend: StoreBackend) -> Box<dyn UserStore> {
    let sessions = SessionStore::new(chrono::Duration::minutes(30));
    let (session, _) = sessions.resume(None).await;
    backend.open(session, None)
}

fn cookie_value(set_cookie: &str) -> &str {
    set_cookie
        .strip_prefix(&format!("{}=", USERS_COOKIE))
        .and_then(|rest| rest.split(';').next())
        .unwrap()
}

const BACKENDS: [StoreBackend; 2] = [StoreBackend::Session, StoreBackend::Cookie];

#[tokio::test]
async fn test_create_then_find() {
    for backend in BACKENDS {
        let mut store = open(backend).await;
        let created = store.create(new_user("Bob", "b@b.com")).await.unwrap();
        assert!(!created.id.is_empty());

        let found = store.find(&created.id).await.unwrap();
        assert_eq!(found.name, "Bob");
        assert_eq!(found.email, "b@b.com");
        assert_eq!(found, created);
    }
}

#[tokio::test]
async fn test_created_ids_are_distinct() {
    for backend in BACKENDS {
        let mut store = open(backend).await;
        let first = store.create(new_user("Ann", "a@a.com")).await.unwrap();
        let second = store.create(new_user("Ann", "a@a.com")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.id.len(), 32);
    }
}

#[tokio::test]
async fn test_all_keeps_insertion_order() {
    for backend in BACKENDS {
        let mut store = open(backend).await;
        assert!(store.all().await.unwrap().is_empty());
        for name in ["Zed", "Amy", "Max"] {
            store.create(new_user(name, "x@y.zz")).await.unwrap();
        }
        let names: Vec<String> = store.all().await.unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Max"]);
    }
}

#[tokio::test]
async fn test_update_name_only_keeps_email() {
    for backend in BACKENDS {
        let mut store = open(backend).await;
        let created = store.create(new_user("Bob", "b@b.com")).await.unwrap();
        let updated = store
            .update(
                &created.id,
                UserChanges {
                    name: Some("New".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.email, "b@b.com");
        assert_eq!(updated.password, created.password);
        assert_eq!(updated.password_confirmation, created.password_confirmation);
        assert_eq!(store.find(&created.id).await.unwrap(), updated);
    }
}

#[tokio::test]
async fn test_update_email_only_keeps_name() {
    for backend in BACKENDS {
        let mut store = open(backend).await;
        let created = store.create(new_user("Bob", "b@b.com")).await.unwrap();
        let changes = UserChanges {
            email: Some("new@b.com".to_string()),
            ..Default::default()
        };
        store.update(&created.id, changes).await.unwrap();

        let found = store.find(&created.id).await.unwrap();
        assert_eq!(found.name, "Bob");
        assert_eq!(found.email, "new@b.com");
    }
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    for backend in BACKENDS {
        let mut store = open(backend).await;
        let result = store.update("missing", UserChanges::default()).await;
        assert!(matches!(result, Err(AppError::UserNotFound(id)) if id == "missing"));
    }
}

#[tokio::test]
async fn test_delete_then_find_is_not_found() {
    for backend in BACKENDS {
        let mut store = open(backend).await;
        let created = store.create(new_user("Bob", "b@b.com")).await.unwrap();
        store.delete(&created.id).await.unwrap();
        assert!(matches!(store.find(&created.id).await, Err(AppError::UserNotFound(_))));
        assert!(store.all().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_an_error() {
    for backend in BACKENDS {
        let mut store = open(backend).await;
        store.create(new_user("Bob", "b@b.com")).await.unwrap();
        store.delete("missing").await.unwrap();
        assert_eq!(store.all().await.unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_session_store_persists_across_requests() {
    let sessions = SessionStore::new(chrono::Duration::minutes(30));
    let (session, _) = sessions.resume(None).await;

    let mut store = StoreBackend::Session.open(session.clone(), None);
    let created = store.create(new_user("Bob", "b@b.com")).await.unwrap();
    assert!(store.response_cookie().is_none());

    let (resumed, opened) = sessions.resume(Some(session.id())).await;
    assert!(!opened);
    let next_request = StoreBackend::Session.open(resumed, None);
    assert_eq!(next_request.find(&created.id).await.unwrap(), created);

    let (other, _) = sessions.resume(None).await;
    let other_client = StoreBackend::Session.open(other, None);
    assert!(other_client.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_session_store_keys_records_by_id() {
    let sessions = SessionStore::new(chrono::Duration::minutes(30));
    let (session, _) = sessions.resume(None).await;
    let mut store = StoreBackend::Session.open(session.clone(), None);
    let bob = store.create(new_user("Bob", "b@b.com")).await.unwrap();
    let ann = store.create(new_user("Ann", "a@a.com")).await.unwrap();

    let raw: serde_json::Value = session.get(USERS_KEY).await.unwrap().unwrap();
    let by_id = raw.as_object().unwrap();
    assert_eq!(by_id.len(), 2);
    assert_eq!(by_id[&bob.id]["user"]["name"], "Bob");
    assert_eq!(by_id[&ann.id]["user"]["email"], "a@a.com");
}

#[tokio::test]
async fn test_cookie_store_round_trips_full_collection() {
    let mut store = CookieUserStore::from_cookie(None);
    assert!(store.response_cookie().is_none());

    let bob = store.create(new_user("Bob", "b@b.com")).await.unwrap();
    let ann = store.create(new_user("Ann", "a@a.com")).await.unwrap();
    let set_cookie = store.response_cookie().unwrap();
    assert!(set_cookie.starts_with("users="));
    assert!(set_cookie.contains("Path=/"));

    let next_request = CookieUserStore::from_cookie(Some(cookie_value(&set_cookie)));
    assert_eq!(next_request.all().await.unwrap(), vec![bob, ann]);
}

#[tokio::test]
async fn test_cookie_store_delete_rewrites_cookie() {
    let mut store = CookieUserStore::from_cookie(None);
    let bob = store.create(new_user("Bob", "b@b.com")).await.unwrap();
    let first = store.response_cookie().unwrap();

    let mut next_request = CookieUserStore::from_cookie(Some(cookie_value(&first)));
    next_request.delete(&bob.id).await.unwrap();
    let second = next_request.response_cookie().unwrap();

    let decoded = cookie::decode(cookie_value(&second)).unwrap();
    assert!(decoded.is_empty());
}

#[tokio::test]
async fn test_undecodable_cookie_is_an_empty_collection() {
    let store = CookieUserStore::from_cookie(Some("not*base64"));
    assert!(store.all().await.unwrap().is_empty());

    let garbage = base64_of("{\"oops\":1}");
    let store = CookieUserStore::from_cookie(Some(garbage.as_str()));
    assert!(store.all().await.unwrap().is_empty());
}

#[test]
fn test_encode_decode_collection() {
    let mut users = UserCollection::default();
    users.create(new_user("Bob", "b@b.com"));
    let encoded = cookie::encode(&users).unwrap();
    assert!(!encoded.contains(';'));
    assert_eq!(cookie::decode(&encoded).unwrap(), users);
}

fn base64_of(s: &str) -> String {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(s)
}
