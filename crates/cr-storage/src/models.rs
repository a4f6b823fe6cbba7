use serde::Serialize;

/// Property name rating rows are stored under
pub const PROPERTY_NAME: &str = "content-rating";

/// One row of the page property relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PageProp {
    pub pp_page: i64,
    pub pp_propname: String,
    pub pp_value: String,
}
