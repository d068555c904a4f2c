//! Tokenization of text rows for sequence tasks.
//!
//! The column order of the tokenizer output is returned with the batch so
//! callers never depend on state left behind by a previous call.

use std::collections::BTreeMap;

use ft_types::{precondition_error, HpoArgs, HpoError, HpoResult, Task};

/// Encoded features of one example, keyed by feature name
/// (`input_ids`, `attention_mask`, ...).
pub type Encoding = BTreeMap<String, Vec<i64>>;

/// Text tokenizer backing a pretrained model.
pub trait Tokenizer {
    /// Encode the text fields of one example, padded and truncated to
    /// `max_length`.
    fn encode(&self, fields: &[&str], max_length: usize) -> HpoResult<Encoding>;
}

/// Tokenized rows with their column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenizedBatch {
    /// Feature names, sorted.
    pub columns: Vec<String>,
    /// One entry per input row, values in `columns` order.
    pub rows: Vec<Vec<Vec<i64>>>,
}

impl TokenizedBatch {
    /// All values of one feature column.
    pub fn column(&self, name: &str) -> Option<Vec<&[i64]>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[idx].as_slice()).collect())
    }
}

/// Tokenize text rows for `task`.
pub fn tokenize_text(
    task: Task,
    rows: &[Vec<String>],
    tokenizer: &dyn Tokenizer,
    args: &HpoArgs,
) -> HpoResult<TokenizedBatch> {
    if !task.is_nlp_task() {
        return Err(precondition_error!("task {task} does not take text input"));
    }
    if args.max_seq_length == 0 {
        return Err(HpoError::MissingArgument("max_seq_length".to_string()));
    }

    let mut batch = TokenizedBatch::default();
    for (index, row) in rows.iter().enumerate() {
        let fields: Vec<&str> = row.iter().map(String::as_str).collect();
        let encoding = tokenizer.encode(&fields, args.max_seq_length)?;

        let columns: Vec<&String> = encoding.keys().collect();
        if index == 0 {
            batch.columns = columns.into_iter().cloned().collect();
        } else if !columns.iter().copied().eq(batch.columns.iter()) {
            return Err(HpoError::Tokenizer(format!(
                "row {index} produced columns {columns:?}, expected {:?}",
                batch.columns
            )));
        }
        batch.rows.push(encoding.into_values().collect());
    }
    Ok(batch)
}
