use std::future::Future;

use tracing::warn;

use crate::repository::{StoreError, StoreResult};

pub const CODE_WIDTH: usize = 3;

/// Attempts made before a run of duplicate codes is reported as an error.
pub const MAX_CODE_ATTEMPTS: u64 = 5;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CodeKind {
    Employee,
    Attendance,
}

impl CodeKind {
    pub fn prefix(self) -> &'static str {
        match self {
            CodeKind::Employee => "EMP",
            CodeKind::Attendance => "ATT",
        }
    }
}

/// `format_code("EMP", 3, 7)` is `"EMP-007"`. Numbers wider than `width` are not truncated.
pub fn format_code(prefix: &str, width: usize, number: u64) -> String {
    format!("{}-{:0width$}", prefix, number, width = width)
}

/// Code following the current highest row id; an empty table starts at 1.
pub fn next_code(kind: CodeKind, max_row_id: Option<u64>) -> String {
    format_code(kind.prefix(), CODE_WIDTH, max_row_id.unwrap_or(0) + 1)
}

/// Reads the highest row id once, then inserts with the next code. A unique-key
/// conflict means another writer took that code, so the following number is tried.
pub async fn insert_with_next_code<T, M, MF, I, IF>(
    kind: CodeKind,
    max_row_id: M,
    mut insert: I,
) -> StoreResult<T>
where
    M: FnOnce() -> MF,
    MF: Future<Output = StoreResult<Option<u64>>>,
    I: FnMut(String) -> IF,
    IF: Future<Output = StoreResult<T>>,
{
    let mut taken = max_row_id().await?;

    let mut attempt = 1;
    loop {
        let code = next_code(kind, taken);
        match insert(code.clone()).await {
            Err(StoreError::Duplicate) if attempt < MAX_CODE_ATTEMPTS => {
                warn!(code = %code, attempt, "Generated code already taken, retrying");
                taken = Some(taken.unwrap_or(0) + 1);
                attempt += 1;
            }
            other => return other,
        }
    }
}
