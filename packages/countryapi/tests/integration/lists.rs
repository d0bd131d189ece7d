use serde_json::json;

use crate::common::{TestApp, routes};

fn names(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .expect("expected a JSON array")
        .iter()
        .map(|e| e["country_name"].as_str().unwrap().to_string())
        .collect()
}

mod visited {
    use super::*;

    #[tokio::test]
    async fn names_need_not_exist_in_the_registry() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .post_with_token(routes::VISITED, &json!({"country_name": "Atlantis"}), &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["country_name"], "Atlantis");
    }

    #[tokio::test]
    async fn names_are_normalized_before_storing() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        app.add_to_list(routes::VISITED, "  New   Zealand ", &token)
            .await;

        let list = app.get_with_token(routes::VISITED, &token).await;
        assert_eq!(names(&list.body), ["New Zealand"]);
    }

    #[tokio::test]
    async fn duplicate_add_conflicts_and_keeps_one_entry() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.add_to_list(routes::VISITED, "Poland", &token).await;

        let res = app
            .post_with_token(routes::VISITED, &json!({"country_name": " Poland"}), &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");

        let list = app.get_with_token(routes::VISITED, &token).await;
        assert_eq!(names(&list.body), ["Poland"]);
    }

    #[tokio::test]
    async fn blank_name_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .post_with_token(routes::VISITED, &json!({"country_name": "   "}), &token)
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn lists_are_private_to_their_owner() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;
        app.add_to_list(routes::VISITED, "Poland", &alice).await;
        app.add_to_list(routes::VISITED, "Japan", &bob).await;
        app.add_to_list(routes::VISITED, "Chile", &alice).await;

        let list = app.get_with_token(routes::VISITED, &alice).await;
        assert_eq!(names(&list.body), ["Chile", "Poland"]);
    }

    #[tokio::test]
    async fn listing_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::VISITED).await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn remove_deletes_only_the_callers_entry() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;
        app.add_to_list(routes::VISITED, "Poland", &alice).await;
        app.add_to_list(routes::VISITED, "Poland", &bob).await;

        let res = app
            .delete_with_token(&routes::visited_entry("Poland"), &alice)
            .await;
        assert_eq!(res.status, 204);

        let alice_list = app.get_with_token(routes::VISITED, &alice).await;
        assert!(names(&alice_list.body).is_empty());
        let bob_list = app.get_with_token(routes::VISITED, &bob).await;
        assert_eq!(names(&bob_list.body), ["Poland"]);
    }

    #[tokio::test]
    async fn removing_an_absent_name_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let res = app
            .delete_with_token(&routes::visited_entry("Poland"), &token)
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn holders_lists_every_user_with_the_name() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;
        app.add_to_list(routes::VISITED, "Poland", &alice).await;
        app.add_to_list(routes::VISITED, "Poland", &bob).await;
        app.add_to_list(routes::VISITED, "Japan", &bob).await;

        let res = app
            .get_without_token(&routes::visited_by_country("Poland"))
            .await;

        assert_eq!(res.status, 200);
        let holders = res.body.as_array().unwrap();
        assert_eq!(holders.len(), 2);
        assert!(holders[0]["user_id"].as_i64() < holders[1]["user_id"].as_i64());
    }
}

mod favourites {
    use super::*;

    #[tokio::test]
    async fn favourites_are_independent_of_visited() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.add_to_list(routes::VISITED, "Poland", &token).await;
        app.add_to_list(routes::FAVOURITES, "Japan", &token).await;

        let favourites = app.get_with_token(routes::FAVOURITES, &token).await;
        assert_eq!(names(&favourites.body), ["Japan"]);
        let visited = app.get_with_token(routes::VISITED, &token).await;
        assert_eq!(names(&visited.body), ["Poland"]);
    }

    #[tokio::test]
    async fn duplicate_favourite_conflicts() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.add_to_list(routes::FAVOURITES, "Japan", &token).await;

        let res = app
            .post_with_token(routes::FAVOURITES, &json!({"country_name": "Japan"}), &token)
            .await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn remove_and_holders() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.add_to_list(routes::FAVOURITES, "Japan", &alice).await;

        let holders = app
            .get_without_token(&routes::favourites_by_country("Japan"))
            .await;
        assert_eq!(holders.body.as_array().unwrap().len(), 1);

        let res = app
            .delete_with_token(&routes::favourite_entry("Japan"), &alice)
            .await;
        assert_eq!(res.status, 204);

        let holders = app
            .get_without_token(&routes::favourites_by_country("Japan"))
            .await;
        assert!(holders.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_remove_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .delete_without_token(&routes::favourite_entry("Japan"))
            .await;

        assert_eq!(res.status, 401);
    }
}

mod by_id {
    use super::*;

    #[tokio::test]
    async fn entry_is_readable_by_anyone() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let id = app.add_to_list(routes::VISITED, "Poland", &token).await;

        let res = app.get_without_token(&routes::visited_by_id(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.id(), id);
        assert_eq!(res.body["country_name"], "Poland");

        let missing = app.get_without_token(&routes::visited_by_id(id + 1000)).await;
        assert_eq!(missing.status, 404);
    }

    #[tokio::test]
    async fn ids_are_scoped_to_their_list() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let id = app.add_to_list(routes::FAVOURITES, "Japan", &token).await;

        let res = app.get_without_token(&routes::favourite_by_id(id)).await;
        assert_eq!(res.status, 200);

        let other_list = app.get_without_token(&routes::visited_by_id(id)).await;
        assert_eq!(other_list.status, 404);
    }

    #[tokio::test]
    async fn owner_can_rename_an_entry() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let id = app.add_to_list(routes::FAVOURITES, "Japan", &token).await;

        let res = app
            .put_with_token(
                &routes::favourite_by_id(id),
                &json!({"country_name": " South   Korea "}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.id(), id);
        assert_eq!(res.body["country_name"], "South Korea");

        let list = app.get_with_token(routes::FAVOURITES, &token).await;
        assert_eq!(names(&list.body), ["South Korea"]);
    }

    #[tokio::test]
    async fn non_owner_cannot_rename_even_with_an_invalid_name() {
        let app = TestApp::spawn().await;
        let alice = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        let bob = app
            .create_authenticated_user("bob@example.com", "securepass")
            .await;
        let id = app.add_to_list(routes::VISITED, "Poland", &alice).await;

        let res = app
            .put_with_token(&routes::visited_by_id(id), &json!({"country_name": "Chile"}), &bob)
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let res = app
            .put_with_token(&routes::visited_by_id(id), &json!({"country_name": "  "}), &bob)
            .await;
        assert_eq!(res.status, 403);

        let entry = app.get_without_token(&routes::visited_by_id(id)).await;
        assert_eq!(entry.body["country_name"], "Poland");
    }

    #[tokio::test]
    async fn renaming_onto_a_held_name_conflicts() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;
        app.add_to_list(routes::VISITED, "Poland", &token).await;
        let id = app.add_to_list(routes::VISITED, "Chile", &token).await;

        let res = app
            .put_with_token(&routes::visited_by_id(id), &json!({"country_name": "Poland"}), &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn rename_requires_a_token_and_an_existing_entry() {
        let app = TestApp::spawn().await;
        let token = app
            .create_authenticated_user("alice@example.com", "securepass")
            .await;

        let anonymous = app
            .put_without_token(&routes::visited_by_id(1), &json!({"country_name": "Chile"}))
            .await;
        assert_eq!(anonymous.status, 401);

        let missing = app
            .put_with_token(&routes::visited_by_id(4242), &json!({"country_name": "Chile"}), &token)
            .await;
        assert_eq!(missing.status, 404);
    }
}
