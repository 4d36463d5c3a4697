use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest { pub username: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

/// `ServiceResponse<i32>` as it appears on the wire.
#[derive(utoipa::ToSchema)]
pub struct EnvelopeDoc { pub data: Option<i32>, pub success: bool, pub message: String }

#[derive(utoipa::ToSchema)]
pub struct UserDoc { pub id: i32, pub username: String, pub created_at: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::get_user,
        crate::routes::auth::login,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            EnvelopeDoc,
            UserDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth")
    )
)]
pub struct ApiDoc;
