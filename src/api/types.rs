use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct MessageCreate {
    #[validate(length(min = 1, max = 2000, message = "text must be 1 to 2000 characters"))]
    pub text: String,
}

fn default_max_length() -> u32 {
    50
}

fn default_temperature() -> f64 {
    0.7
}

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, max = 1000, message = "prompt must be 1 to 1000 characters"))]
    pub prompt: String,

    #[serde(default = "default_max_length")]
    #[validate(range(min = 1, max = 200))]
    pub max_length: u32,

    #[serde(default = "default_temperature")]
    #[validate(range(min = 0.1, max = 2.0))]
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub generated_text: String,
    pub prompt: String,
}
