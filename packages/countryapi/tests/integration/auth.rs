use chrono::{Duration, Utc};
use serde_json::json;

use countryapi::models::auth::RegisterRequest;
use countryapi::services::CredentialStore;
use countryapi::utils::jwt;

use crate::common::{JWT_SECRET, TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "alice@example.com", "name": "Alice", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["email"], "alice@example.com");
        assert_eq!(res.body["name"], "Alice");
        assert!(
            res.body.get("password_hash").is_none(),
            "hash must never leave the server"
        );
    }

    #[tokio::test]
    async fn email_is_stored_trimmed_and_lowercased() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "  Alice@Example.COM ", "name": "Alice", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn cannot_register_with_an_already_taken_email() {
        let app = TestApp::spawn().await;
        let body = json!({"email": "alice@example.com", "name": "Alice", "password": "securepass"});

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(
            first.status, 201,
            "First registration failed: {}",
            first.text
        );

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "ALICE@example.com", "name": "Other", "password": "otherpass"}),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "alice@example.com", "name": "Alice", "password": "short"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_a_malformed_email() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "not-an-email", "name": "Alice", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_a_blank_name() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"email": "alice@example.com", "name": "   ", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"email": "alice@example.com"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn concurrent_registrations_of_one_email_create_exactly_one_user() {
        let app = TestApp::spawn().await;
        let auth = app.config.auth.clone();

        let attempts = (0..8).map(|i| {
            let db = app.db.clone();
            let auth = auth.clone();
            tokio::spawn(async move {
                let payload = RegisterRequest {
                    email: "race@example.com".into(),
                    name: format!("Racer {i}"),
                    password: "securepass".into(),
                };
                CredentialStore::new(&db, &auth).register(&payload).await
            })
        });

        let mut created = 0;
        let mut taken = 0;
        for handle in attempts.collect::<Vec<_>>() {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(countryapi::error::AppError::EmailTaken) => taken += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(taken, 7);
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_receives_a_token_and_expiry() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "alice@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(res.body["expires_at"].is_string());
        assert_eq!(res.body["email"], "alice@example.com");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "alice@example.com", "password": "wrongpass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_email_is_indistinguishable_from_wrong_password() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "ghost@example.com", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod tokens {
    use super::*;

    #[tokio::test]
    async fn me_returns_the_token_holder() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["email"], "alice@example.com");
        assert_eq!(res.body["name"], "alice");
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not.a.jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let app = TestApp::spawn().await;
        let forged = jwt::sign_at(
            1,
            "alice@example.com",
            "alice",
            "other-secret",
            Duration::hours(1),
            Utc::now(),
        )
        .unwrap();

        let res = app.get_with_token(routes::ME, &forged).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice@example.com", "securepass")
            .await;
        let expired = jwt::sign_at(
            1,
            "alice@example.com",
            "alice",
            JWT_SECRET,
            Duration::hours(1),
            Utc::now() - Duration::hours(2),
        )
        .unwrap();

        let res = app.get_with_token(routes::ME, &expired).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn validate_resolves_the_issuing_user() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let me = app.get_with_token(routes::ME, &token).await;

        let store = CredentialStore::new(&app.db, &app.config.auth);

        assert_eq!(store.validate(&token).unwrap(), me.id());
        assert!(
            store
                .validate_at(&token, Utc::now() + Duration::hours(2))
                .is_err()
        );
    }
}

mod password_change {
    use super::*;

    #[tokio::test]
    async fn new_password_replaces_the_old_one() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .put_with_token(
                routes::PASSWORD,
                &json!({"current_password": "securepass", "new_password": "evenmoresecure"}),
                &token,
            )
            .await;
        assert_eq!(res.status, 204, "{}", res.text);

        let old = app
            .post_without_token(
                routes::LOGIN,
                &json!({"email": "alice@example.com", "password": "securepass"}),
            )
            .await;
        assert_eq!(old.status, 401);

        app.login("alice@example.com", "evenmoresecure").await;
    }

    #[tokio::test]
    async fn wrong_current_password_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .put_with_token(
                routes::PASSWORD,
                &json!({"current_password": "wrongpass", "new_password": "evenmoresecure"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}
