//! Model clients for the generative fallback.

mod gemini;
mod model_router;

pub use gemini::GeminiClient;
pub use model_router::{route_model, LlmMode, MockModel};
