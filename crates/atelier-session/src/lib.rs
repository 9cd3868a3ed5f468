pub mod assembler;
pub mod config;
pub mod intake;
pub mod modes;
pub mod session;

pub use assembler::{build_request, generate_batch};
pub use config::{Config, LlmConfig, LoggingConfig};
pub use intake::{process_uploads, PdfTextExtractor, Upload};
pub use modes::{BehaviorMode, ModifierSet};
pub use session::Session;
