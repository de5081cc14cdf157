use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::serializers::SerializerError;
use crate::serializers::user::{CustomUserSerializer, UserInput, UserRepresentation, UserUpdateInput};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use model::auth::AuthError;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Query parameters for listing users
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct UserListQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
}

fn serializer_error(err: SerializerError) -> HandlerError {
    match err {
        SerializerError::Validation(errors) => {
            let fields: Vec<_> = errors.field_errors().into_keys().collect();
            warn!("User input failed validation on fields: {:?}", fields);
            let mut body = ErrorResponse::new("Invalid user data", "VALIDATION_ERROR");
            body.details = Some(validation_details(&errors));
            (StatusCode::BAD_REQUEST, Json(body))
        }
        SerializerError::Auth(AuthError::Validation { field, message }) => {
            warn!("User rejected by manager: {}: {}", field, message);
            let mut body = ErrorResponse::new(message.clone(), "VALIDATION_ERROR");
            body.details = Some(serde_json::json!({ field: [{ "code": "invalid", "message": message }] }));
            (StatusCode::BAD_REQUEST, Json(body))
        }
        SerializerError::Auth(AuthError::UserNotFound(user_id)) => {
            warn!("User with ID {} disappeared before it could be saved", user_id);
            not_found(user_id)
        }
        SerializerError::Auth(AuthError::UsernameTaken(username)) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(
                format!("Username '{}' already exists", username),
                "USERNAME_ALREADY_EXISTS",
            )),
        ),
        SerializerError::Auth(other) => {
            error!("User operation failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error while saving user", "DATABASE_ERROR")),
            )
        }
    }
}

/// Per-field `code` and `message` only. Submitted values are never echoed.
fn validation_details(errors: &ValidationErrors) -> serde_json::Value {
    let fields = errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let entries = errors
                .iter()
                .map(|e| serde_json::json!({ "code": e.code, "message": e.message }))
                .collect();
            (field.to_string(), serde_json::Value::Array(entries))
        })
        .collect();
    serde_json::Value::Object(fields)
}

fn database_error(err: AuthError) -> HandlerError {
    error!("Database error: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error", "DATABASE_ERROR")),
    )
}

fn not_found(user_id: i32) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("User {} not found", user_id), "USER_NOT_FOUND")),
    )
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = UserInput,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserRepresentation>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<UserInput>,
) -> Result<(StatusCode, Json<ApiResponse<UserRepresentation>>), HandlerError> {
    trace!("Entering create_user function");
    debug!("Creating user with username: {:?}", request.username);

    let user = CustomUserSerializer::new(state.users)
        .save(&state.db, request)
        .await
        .map_err(serializer_error)?;

    info!("User created successfully with ID: {}, username: {}", user.id(), user);
    let response = ApiResponse {
        data: CustomUserSerializer::to_representation(&user),
        message: "User created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserRepresentation>>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    Valid(Query(query)): Valid<Query<UserListQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserRepresentation>>>, HandlerError> {
    trace!("Entering get_users function");
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);

    let users = state
        .users
        .list(&state.db, page, limit)
        .await
        .map_err(database_error)?;

    info!("Successfully retrieved {} users", users.len());
    let response = ApiResponse {
        data: users.iter().map(CustomUserSerializer::to_representation).collect(),
        message: "Users retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserRepresentation>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserRepresentation>>, HandlerError> {
    trace!("Entering get_user function for user_id: {}", user_id);

    match state.users.get(&state.db, user_id).await.map_err(database_error)? {
        Some(user) => {
            debug!("Found user {}", user);
            Ok(Json(ApiResponse {
                data: CustomUserSerializer::to_representation(&user),
                message: "User retrieved successfully".to_string(),
                success: true,
            }))
        }
        None => {
            warn!("User with ID {} not found", user_id);
            Err(not_found(user_id))
        }
    }
}

/// Replace a user's writable fields
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UserUpdateInput,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserRepresentation>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UserUpdateInput>,
) -> Result<Json<ApiResponse<UserRepresentation>>, HandlerError> {
    trace!("Entering update_user function for user_id: {}", user_id);

    let validated = CustomUserSerializer::validate_update(request).map_err(serializer_error)?;

    let Some(existing) = state.users.get(&state.db, user_id).await.map_err(database_error)? else {
        warn!("User with ID {} not found for update", user_id);
        return Err(not_found(user_id));
    };

    let serializer = CustomUserSerializer::new(state.users);
    let updated = serializer
        .update(&state.db, existing, validated)
        .await
        .map_err(serializer_error)?;

    info!("User with ID {} updated successfully", user_id);
    Ok(Json(ApiResponse {
        data: CustomUserSerializer::to_representation(&updated),
        message: "User updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, HandlerError> {
    trace!("Entering delete_user function for user_id: {}", user_id);

    if state.users.delete(&state.db, user_id).await.map_err(database_error)? {
        info!("User with ID {} deleted successfully", user_id);
        Ok(Json(ApiResponse {
            data: format!("User {} deleted", user_id),
            message: "User deleted successfully".to_string(),
            success: true,
        }))
    } else {
        warn!("User with ID {} not found for deletion (no rows affected)", user_id);
        Err(not_found(user_id))
    }
}
