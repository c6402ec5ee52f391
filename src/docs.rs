use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::verify::verify_payment),
    components(schemas(crate::api::verify::VerifyRequest)),
    tags(
        (name = "payments", description = "Server-side payment verification")
    )
)]
pub struct ApiDoc;
