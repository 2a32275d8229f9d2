//! Token counting (design docs §4.6 supplement), grounded in the teacher's
//! `TokenBudgeter`. Only the counting idiom is kept here — the binary-search packing
//! itself lives in `orchestrator.rs`, following the reference implementation's literal
//! search rather than the teacher's sampling-based shortcut.

use tiktoken_rs::CoreBPE;

pub struct TokenBudgeter {
    tokenizer: CoreBPE,
}

impl TokenBudgeter {
    pub fn new() -> crate::error::Result<Self> {
        let tokenizer = tiktoken_rs::cl100k_base()
            .map_err(|e| crate::error::RetrievalError::Other(e.to_string()))?;
        Ok(Self { tokenizer })
    }

    pub fn count_tokens(&self, text: &str) -> usize {
        self.tokenizer.encode_ordinary(text).len()
    }
}

#[cfg(test)]
#[path = "budget.test.rs"]
mod tests;
