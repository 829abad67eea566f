use crate::application::http::{
    food_analysis::handlers::analyze_food_image::__path_analyze_food_image,
    health::{__path_health_check, __path_root},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bitewise API",
        description = "Health analysis of food photos and ingredient labels"
    ),
    paths(analyze_food_image, root, health_check)
)]
pub struct ApiDoc;
