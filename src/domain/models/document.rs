#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;

/// Upload lifecycle for the single PDF the server scopes to the session.
/// `Active` and `Failed` are terminal and only return to `Idle` through an
/// explicit clear that the server has acknowledged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentState {
    Idle,
    Uploading {
        filename: String,
    },
    Active {
        filename: String,
        uploaded_at: DateTime<Local>,
    },
    Failed {
        detail: String,
    },
}

impl DocumentState {
    pub fn is_active(&self) -> bool {
        return matches!(self, DocumentState::Active { .. });
    }

    pub fn is_uploading(&self) -> bool {
        return matches!(self, DocumentState::Uploading { .. });
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            DocumentState::Uploading { filename } => return Some(filename),
            DocumentState::Active { filename, .. } => return Some(filename),
            _ => return None,
        }
    }
}
