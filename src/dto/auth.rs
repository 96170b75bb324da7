use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by tokens issued by the external identity provider.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
