mod common;

use anyhow::Result;
use axum::http::{header, StatusCode};

#[tokio::test]
async fn every_route_answers_wrong_methods_with_json_405() -> Result<()> {
    let app = common::test_app()?;

    for (path, allowed, _) in common::ROUTES {
        for method in common::METHODS.iter().filter(|m| !allowed.contains(*m)) {
            // No credentials: 405 must win over the session and admin gates
            let response = app.raw(common::request(method, path, None, None)).await?;
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, path);

            let allow = response
                .headers()
                .get(header::ALLOW)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            for expected in *allowed {
                assert!(allow.contains(expected), "{} {}: Allow was {:?}", method, path, allow);
            }

            let (_, body) = common::read_json(response).await?;
            assert_eq!(body["error"], true, "{} {}", method, path);
            assert_eq!(body["code"], "METHOD_NOT_ALLOWED", "{} {}", method, path);
        }
    }
    Ok(())
}

#[tokio::test]
async fn allowed_methods_never_405() -> Result<()> {
    let app = common::test_app()?;

    for (path, allowed, _) in common::ROUTES {
        for method in *allowed {
            let (status, _) = app.send(common::request(method, path, None, None)).await?;
            assert_ne!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, path);
        }
    }
    Ok(())
}
