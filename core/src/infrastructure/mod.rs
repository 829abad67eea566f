pub mod llm;
pub mod nutrition;
pub mod ocr;
pub mod translation;
