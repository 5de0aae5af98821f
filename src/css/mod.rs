mod cache;
mod generate;

pub use cache::CssCache;
pub use generate::{fingerprint, generate, minify};
