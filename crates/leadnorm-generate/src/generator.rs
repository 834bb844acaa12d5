use crate::Result;

/// Instruction in, text out. Implementations must not retry on their own;
/// the caller records a failure and moves on.
pub trait TextGenerator {
    fn name(&self) -> &'static str;
    fn generate(&self, instruction: &str) -> Result<String>;
}
