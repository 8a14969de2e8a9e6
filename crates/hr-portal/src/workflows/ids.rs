use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// `<prefix>_<unix-millis>-<seq>`; the sequence keeps ids unique within one millisecond.
pub(crate) fn next_record_id(prefix: &str) -> String {
    let seq = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{}-{seq}", Utc::now().timestamp_millis())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Opaque user identifier issued by the identity provider.
    UserId
);
string_id!(
    /// Identifier of a job posting.
    JobId
);
string_id!(
    /// Identifier of an employee roster entry.
    EmployeeId
);
