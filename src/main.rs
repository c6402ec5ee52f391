// src/main.rs
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use dotenvy::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use famechase_checkout::{config::InstamojoConfig, api, docs, AppState};

async fn index() -> impl Responder {
    HttpResponse::Ok().body("Service ready!")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let instamojo = InstamojoConfig::from_env();
    if instamojo.credentials().is_none() {
        log::warn!(
            "INSTAMOJO_API_KEY / INSTAMOJO_AUTH_TOKEN not set; /api/instamojo-verify will refuse requests"
        );
    }

    let state = web::Data::new(AppState { instamojo });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(index))
            .service(
                SwaggerUi::new("/docs/{_:.*}")
                    .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
            )
            .service(api::verify::verify_payment)
    })
    .bind(("0.0.0.0", 8080))?
    .run()
    .await
}
