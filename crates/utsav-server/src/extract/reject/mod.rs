//! Request data extractors with enhanced rejections.

mod enhanced_json;
mod validated_json;

pub use enhanced_json::Json;
pub use validated_json::ValidateJson;
