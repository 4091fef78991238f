//! `/api/employees` handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use products_hr::{Employee, EmployeeFields, EmployeeService};
use serde::Deserialize;

use crate::http::{AppState, HttpError, HttpResult};

pub const DELETED_MESSAGE: &str = "Employee deleted successfully!.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/employees",
            get(list_employees)
                .post(create_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
        .route("/api/employees/search", get(search_employees))
        .route("/api/employees/{id}", get(get_employee))
}

#[derive(Deserialize)]
struct IdQuery {
    id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameQuery {
    first_name: String,
    last_name: String,
}

async fn create_employee(
    State(service): State<EmployeeService>,
    Json(fields): Json<EmployeeFields>,
) -> HttpResult<(StatusCode, Json<Employee>)> {
    let saved = service.save_employee(fields).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn list_employees(State(service): State<EmployeeService>) -> HttpResult<Json<Vec<Employee>>> {
    Ok(Json(service.get_all_employees().await?))
}

async fn get_employee(
    State(service): State<EmployeeService>,
    Path(id): Path<i64>,
) -> HttpResult<Json<Employee>> {
    service
        .get_employee_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(HttpError::not_found)
}

async fn search_employees(
    State(service): State<EmployeeService>,
    Query(query): Query<NameQuery>,
) -> HttpResult<Json<Employee>> {
    service
        .find_employee_by_name(&query.first_name, &query.last_name)
        .await?
        .map(Json)
        .ok_or_else(HttpError::not_found)
}

async fn update_employee(
    State(service): State<EmployeeService>,
    Query(IdQuery { id }): Query<IdQuery>,
    Json(fields): Json<EmployeeFields>,
) -> HttpResult<Json<Employee>> {
    let Some(mut existing) = service.get_employee_by_id(id).await? else {
        return Err(HttpError::not_found());
    };
    existing.apply(fields);
    Ok(Json(service.update_employee(existing).await?))
}

async fn delete_employee(
    State(service): State<EmployeeService>,
    Query(IdQuery { id }): Query<IdQuery>,
) -> HttpResult<(StatusCode, &'static str)> {
    service.delete_employee(id).await?;
    Ok((StatusCode::OK, DELETED_MESSAGE))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, header},
    };
    use http_body_util::BodyExt;
    use platform_db::{DatabaseSettings, testing::sqlite_pool};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, http::build_router};

    async fn test_router() -> Router {
        let pool = sqlite_pool().await.unwrap();
        let config = AppConfig {
            database: DatabaseSettings::new("sqlite::memory:"),
            cors_allowed_origins: Vec::new(),
        };
        build_router(AppState::new(pool, config))
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    fn moses() -> Value {
        json!({"firstName": "Moses", "lastName": "Hunsu", "email": "moses@yahoo.com"})
    }

    #[tokio::test]
    async fn create_returns_created_record_with_id() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::POST, "/api/employees", Some(moses())).await;

        assert_eq!(status, StatusCode::CREATED);
        let created: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(created["id"], json!(1));
        assert_eq!(created["firstName"], "Moses");
        assert_eq!(created["lastName"], "Hunsu");
        assert_eq!(created["email"], "moses@yahoo.com");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_and_store_is_unchanged() {
        let router = test_router().await;
        send(&router, Method::POST, "/api/employees", Some(moses())).await;
        let (status, _) = send(&router, Method::POST, "/api/employees", Some(moses())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&router, Method::GET, "/api/employees", None).await;
        assert_eq!(status, StatusCode::OK);
        let list: Vec<Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty_array() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::GET, "/api/employees", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));
    }

    #[tokio::test]
    async fn unknown_id_is_404_with_empty_body() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::GET, "/api/employees/41", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_404_and_creates_nothing() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::PUT, "/api/employees?id=5", Some(moses())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());

        let (_, body) = send(&router, Method::GET, "/api/employees", None).await;
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!([]));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_still_succeeds() {
        let router = test_router().await;
        let (status, body) = send(&router, Method::DELETE, "/api/employees?id=77", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, DELETED_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn search_by_name() {
        let router = test_router().await;
        send(&router, Method::POST, "/api/employees", Some(moses())).await;

        let (status, body) = send(
            &router,
            Method::GET,
            "/api/employees/search?firstName=Moses&lastName=Hunsu",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let found: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(found["email"], "moses@yahoo.com");

        let (status, _) = send(
            &router,
            Method::GET,
            "/api/employees/search?firstName=Nobody&lastName=Hunsu",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn full_lifecycle() {
        let router = test_router().await;

        let (status, body) = send(&router, Method::POST, "/api/employees", Some(moses())).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = serde_json::from_slice::<Value>(&body).unwrap()["id"]
            .as_i64()
            .unwrap();

        let (status, _) = send(&router, Method::POST, "/api/employees", Some(moses())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&router, Method::GET, &format!("/api/employees/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap()["firstName"],
            "Moses"
        );

        let update = json!({
            "id": 999,
            "firstName": "Mos",
            "lastName": "Hunsu",
            "email": "hunsu@gmail.com"
        });
        let (status, body) = send(
            &router,
            Method::PUT,
            &format!("/api/employees?id={id}"),
            Some(update),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            json!({"id": id, "firstName": "Mos", "lastName": "Hunsu", "email": "hunsu@gmail.com"})
        );

        let (status, body) = send(
            &router,
            Method::DELETE,
            &format!("/api/employees?id={id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, DELETED_MESSAGE.as_bytes());

        let (status, _) = send(&router, Method::GET, &format!("/api/employees/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
