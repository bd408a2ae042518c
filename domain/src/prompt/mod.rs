//! Prompt domain
//!
//! Templates for generating prompts at each stage of the debate flow.

mod template;

pub use template::PromptTemplate;
