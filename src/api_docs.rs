use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::book::list_books,
        api::book::create_book,
        api::circulation::create_borrowing,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "siperpus", description = "School library management API")
    )
)]
pub struct ApiDoc;
