use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(ToSchema)]
pub struct ProductInputDoc {
    #[schema(min_length = 1, max_length = 255)]
    pub name: String,
    /// Defaults to "Description not available."
    #[schema(max_length = 255)]
    pub description: Option<String>,
    /// Decimal, as a JSON number or string
    pub price: String,
}

#[derive(ToSchema)]
pub struct LinkDoc { pub rel: String, pub href: String }

#[derive(ToSchema)]
pub struct ProductDoc {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: String,
    /// Present when hypermedia is enabled
    pub links: Option<Vec<LinkDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::products::list,
        crate::products::create,
        crate::products::get,
        crate::products::update,
        crate::products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            ProductInputDoc,
            LinkDoc,
            ProductDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "products")
    )
)]
pub struct ApiDoc;
