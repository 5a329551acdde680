use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use crate::predict::{Pass, PassReport};

#[derive(OpenApi)]
#[openapi(
    paths(super::api::passes::find_passes),
    components(schemas(PassReport, Pass, ErrorResponse)),
    info(
        title = "Pass-O-Mat API",
        description = "Visibility windows of an orbiting object over a ground location",
        version = "0.1.0"
    ),
    tags(
        (name = "passes", description = "Pass prediction")
    )
)]
pub struct ApiDoc;
