#[cfg(test)]
mod tests {
    use crate::helpers::{app::init_test_env, get_json_body, make_test_app};
    use api::auth::{Claims, generate_jwt, middleware::log_request};
    use axum::{
        Router,
        body::Body as AxumBody,
        extract::ConnectInfo,
        http::{Request, StatusCode},
        middleware::from_fn,
    };
    use chrono::Utc;
    use db::test_utils::create_customer;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::net::SocketAddr;
    use tower::ServiceExt;

    fn list_request(token: Option<&str>) -> Request<AxumBody> {
        let mut builder = Request::builder()
            .method("GET")
            .uri("/api/chat/conversations");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(AxumBody::empty()).unwrap()
    }

    #[tokio::test]
    async fn chat_routes_require_a_token() {
        let (app, _) = make_test_app().await;

        let response = app.oneshot(list_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["kind"], "Unauthorized");
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let (app, state) = make_test_app().await;
        let user = create_customer(state.db(), "Amina").await;

        let claims = Claims {
            sub: user.id,
            admin: true,
            exp: (Utc::now().timestamp() + 3600) as usize,
        };
        let forged = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"not-the-real-secret"),
        )
        .unwrap();

        let response = app.oneshot(list_request(Some(&forged))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (app, state) = make_test_app().await;
        let user = create_customer(state.db(), "Amina").await;

        let claims = Claims {
            sub: user.id,
            admin: false,
            exp: (Utc::now().timestamp() - 3600) as usize,
        };
        let expired = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(util::config::jwt_secret().as_bytes()),
        )
        .unwrap();

        let response = app.oneshot(list_request(Some(&expired))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes_the_guard() {
        let (app, state) = make_test_app().await;
        let user = create_customer(state.db(), "Amina").await;
        let (token, _) = generate_jwt(user.id, false);

        let response = app.oneshot(list_request(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn request_logging_passes_requests_through() {
        init_test_env();
        let (api, _) = make_test_app().await;
        let app = Router::new().merge(api).layer(from_fn(log_request));

        let mut req = Request::builder()
            .method("GET")
            .uri("/api/health")
            .header("User-Agent", "souk-tests")
            .body(AxumBody::empty())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
