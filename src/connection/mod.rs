use std::fmt;
use std::sync::Arc;

/// Handle to a live database session, borrowed per call.
///
/// Cloning is cheap and clones compare equal to the original. The cache never
/// opens, pools or closes connections; it only records which session a
/// descriptor is bound to.
#[derive(Clone)]
pub struct ConnectionHandle {
    inner: Arc<SessionInfo>,
}

#[derive(Debug)]
struct SessionInfo {
    id: u64,
    user: String,
    schema: String,
}

impl ConnectionHandle {
    pub fn new(id: u64, user: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SessionInfo {
                id,
                user: user.into(),
                schema: schema.into(),
            }),
        }
    }

    /// Session id
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn user(&self) -> &str {
        &self.inner.user
    }

    /// Default schema used to qualify unqualified type names.
    pub fn schema(&self) -> &str {
        &self.inner.schema
    }

    /// True when both handles refer to the same session object.
    pub fn same_session(&self, other: &ConnectionHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for ConnectionHandle {}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.inner.id)
            .field("user", &self.inner.user)
            .field("schema", &self.inner.schema)
            .finish()
    }
}
