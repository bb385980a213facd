#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, make_test_app};
    use api::auth::generate_jwt;
    use axum::{
        Router,
        body::Body as AxumBody,
        http::{Request, StatusCode},
        response::Response,
    };
    use db::models::user::Model as UserModel;
    use db::test_utils::{create_admin, create_customer};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct TestData {
        customer: UserModel,
        other_customer: UserModel,
        admin: UserModel,
    }

    async fn setup_test_data(db: &sea_orm::DatabaseConnection) -> TestData {
        TestData {
            customer: create_customer(db, "Amina").await,
            other_customer: create_customer(db, "Karim").await,
            admin: create_admin(db, "Youssef").await,
        }
    }

    fn token_for(user: &UserModel) -> String {
        generate_jwt(user.id, user.admin).0
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        user: &UserModel,
        body: Option<Value>,
    ) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token_for(user)));

        let req = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(AxumBody::from(body.to_string()))
                .unwrap(),
            None => builder.body(AxumBody::empty()).unwrap(),
        };

        app.clone().oneshot(req).await.unwrap()
    }

    async fn open_conversation(app: &Router, user: &UserModel, title: &str) -> i64 {
        let response = send(
            app,
            "POST",
            "/api/chat/conversations",
            user,
            Some(json!({ "title": title })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        get_json_body(response).await["data"]["id"].as_i64().unwrap()
    }

    // --- POST /api/chat/conversations ---

    #[tokio::test]
    async fn create_conversation_then_list_it() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;

        open_conversation(&app, &data.customer, "Order Issue").await;

        let response = send(&app, "GET", "/api/chat/conversations", &data.customer, None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        let list = json["data"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["title"], "Order Issue");
        assert_eq!(list[0]["status"], "open");
        assert_eq!(list[0]["owner"]["name"], "Amina");
        assert_eq!(list[0]["has_unread"], false);
    }

    #[tokio::test]
    async fn blank_title_is_a_validation_error() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;

        for title in ["", "   "] {
            let response = send(
                &app,
                "POST",
                "/api/chat/conversations",
                &data.customer,
                Some(json!({ "title": title })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = get_json_body(response).await;
            assert_eq!(json["data"]["kind"], "ValidationError");
        }
    }

    #[tokio::test]
    async fn overlong_title_is_rejected_by_request_validation() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;

        let response = send(
            &app,
            "POST",
            "/api/chat/conversations",
            &data.customer,
            Some(json!({ "title": "x".repeat(121) })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Title must be at most 120 characters");
    }

    #[tokio::test]
    async fn padded_title_within_limit_is_accepted_and_trimmed() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;
        let title = "t".repeat(120);

        let response = send(
            &app,
            "POST",
            "/api/chat/conversations",
            &data.customer,
            Some(json!({ "title": format!("  {title}    ") })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(get_json_body(response).await["data"]["title"], title);
    }

    #[tokio::test]
    async fn token_for_unknown_user_cannot_post() {
        let (app, state) = make_test_app().await;
        let _data = setup_test_data(state.db()).await;

        let (token, _) = generate_jwt(9999, false);
        let req = Request::builder()
            .method("POST")
            .uri("/api/chat/conversations")
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .body(AxumBody::from(json!({ "title": "Hi" }).to_string()))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_for_unknown_user_cannot_read_or_close() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;
        let id = open_conversation(&app, &data.customer, "Private").await;

        let (token, _) = generate_jwt(9999, true);
        let requests = [
            ("GET", format!("/api/chat/conversations/{id}/messages"), None),
            (
                "PUT",
                format!("/api/chat/conversations/{id}/status"),
                Some(json!({ "status": "closed" })),
            ),
            ("GET", "/api/chat/unread".to_string(), None),
        ];

        for (method, uri, body) in requests {
            let builder = Request::builder()
                .method(method)
                .uri(&uri)
                .header("Authorization", format!("Bearer {}", token));
            let req = match body {
                Some(body) => builder
                    .header("Content-Type", "application/json")
                    .body(AxumBody::from(body.to_string()))
                    .unwrap(),
                None => builder.body(AxumBody::empty()).unwrap(),
            };

            let response = app.clone().oneshot(req).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }

        let response = send(&app, "GET", "/api/chat/conversations", &data.customer, None).await;
        let json = get_json_body(response).await;
        assert_eq!(json["data"][0]["status"], "open");
    }

    // --- GET/POST /api/chat/conversations/{id}/messages ---

    #[tokio::test]
    async fn send_message_returns_message_and_unread() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;
        let id = open_conversation(&app, &data.customer, "Shipping").await;

        let response = send(
            &app,
            "POST",
            &format!("/api/chat/conversations/{id}/messages"),
            &data.customer,
            Some(json!({ "content": "  Where is my rug?  " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["message"]["content"], "Where is my rug?");
        assert_eq!(json["data"]["message"]["read"], false);
        assert_eq!(json["data"]["message"]["sender"]["role"], "customer");
        assert_eq!(json["data"]["unread"], 0);
    }

    #[tokio::test]
    async fn reading_a_thread_clears_unread_for_the_reader() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;
        let id = open_conversation(&app, &data.customer, "Sizes").await;
        let uri = format!("/api/chat/conversations/{id}/messages");

        send(&app, "POST", &uri, &data.customer, Some(json!({ "content": "Is it 50cm?" }))).await;

        let unread = get_json_body(send(&app, "GET", "/api/chat/unread", &data.admin, None).await).await;
        assert_eq!(unread["data"]["unread"], 1);

        let first = get_json_body(send(&app, "GET", &uri, &data.admin, None).await).await;
        assert_eq!(first["data"]["messages"][0]["read"], false);
        assert_eq!(first["data"]["unread"], 0);

        let second = get_json_body(send(&app, "GET", &uri, &data.admin, None).await).await;
        assert_eq!(second["data"]["messages"][0]["read"], true);
        assert_eq!(
            first["data"]["messages"].as_array().unwrap().len(),
            second["data"]["messages"].as_array().unwrap().len()
        );

        let unread = get_json_body(send(&app, "GET", "/api/chat/unread", &data.admin, None).await).await;
        assert_eq!(unread["data"]["unread"], 0);
    }

    #[tokio::test]
    async fn non_owner_is_denied_and_missing_is_not_found() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;
        let id = open_conversation(&app, &data.customer, "Private").await;

        let response = send(
            &app,
            "GET",
            &format!("/api/chat/conversations/{id}/messages"),
            &data.other_customer,
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(get_json_body(response).await["data"]["kind"], "AccessDenied");

        let response = send(
            &app,
            "GET",
            "/api/chat/conversations/4242/messages",
            &data.admin,
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(get_json_body(response).await["data"]["kind"], "NotFound");
    }

    // --- PUT /api/chat/conversations/{id}/status ---

    #[tokio::test]
    async fn status_changes_are_staff_only_and_validated() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;
        let id = open_conversation(&app, &data.customer, "Toggle").await;
        let uri = format!("/api/chat/conversations/{id}/status");

        let response = send(&app, "PUT", &uri, &data.customer, Some(json!({ "status": "closed" }))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(&app, "PUT", &uri, &data.admin, Some(json!({ "status": "ARCHIVED" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(get_json_body(response).await["data"]["kind"], "ValidationError");

        let response = send(&app, "PUT", &uri, &data.admin, Some(json!({ "status": "CLOSED" }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_json_body(response).await["data"]["status"], "closed");
    }

    #[tokio::test]
    async fn damaged_item_scenario() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;
        let id = open_conversation(&app, &data.customer, "Damaged item").await;
        let messages = format!("/api/chat/conversations/{id}/messages");

        send(
            &app,
            "POST",
            &messages,
            &data.customer,
            Some(json!({ "content": "My tagine arrived broken" })),
        )
        .await;

        let inbox = get_json_body(send(&app, "GET", "/api/chat/conversations", &data.admin, None).await).await;
        assert_eq!(inbox["data"][0]["last_message"]["content"], "My tagine arrived broken");
        assert_eq!(inbox["data"][0]["has_unread"], true);

        let reply = send(
            &app,
            "POST",
            &messages,
            &data.admin,
            Some(json!({ "content": "Sorry, we'll replace it" })),
        )
        .await;
        assert_eq!(reply.status(), StatusCode::CREATED);

        let closed = send(
            &app,
            "PUT",
            &format!("/api/chat/conversations/{id}/status"),
            &data.admin,
            Some(json!({ "status": "CLOSED" })),
        )
        .await;
        assert_eq!(closed.status(), StatusCode::OK);

        let mine = get_json_body(send(&app, "GET", "/api/chat/conversations", &data.customer, None).await).await;
        assert_eq!(mine["data"][0]["status"], "closed");
        assert_eq!(mine["data"][0]["unread_count"], 1);

        let response = send(
            &app,
            "POST",
            &messages,
            &data.customer,
            Some(json!({ "content": "Thanks" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_filters_by_status_and_customer() {
        let (app, state) = make_test_app().await;
        let data = setup_test_data(state.db()).await;
        let a = open_conversation(&app, &data.customer, "A").await;
        open_conversation(&app, &data.other_customer, "K").await;

        send(
            &app,
            "PUT",
            &format!("/api/chat/conversations/{a}/status"),
            &data.admin,
            Some(json!({ "status": "closed" })),
        )
        .await;

        let closed = get_json_body(
            send(&app, "GET", "/api/chat/conversations?status=closed", &data.admin, None).await,
        )
        .await;
        assert_eq!(closed["data"].as_array().unwrap().len(), 1);
        assert_eq!(closed["data"][0]["id"], a);

        let karims = get_json_body(
            send(
                &app,
                "GET",
                &format!("/api/chat/conversations?user_id={}", data.other_customer.id),
                &data.admin,
                None,
            )
            .await,
        )
        .await;
        assert_eq!(karims["data"].as_array().unwrap().len(), 1);
        assert_eq!(karims["data"][0]["title"], "K");

        let response = send(&app, "GET", "/api/chat/conversations?status=pending", &data.admin, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
