pub mod analysis_result;
pub mod ingredient_token;
pub mod nutrition_sample;

pub use analysis_result::*;
pub use ingredient_token::*;
pub use nutrition_sample::*;
