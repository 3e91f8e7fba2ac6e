//! Requesting identity as handed over by the authentication collaborator.

use uuid::Uuid;

/// Who is making the request. Authentication itself lives outside this
/// crate; by the time a request reaches the core it is either anonymous or
/// carries an opaque, already-verified user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Viewer::Anonymous)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_user_id() {
        assert!(Viewer::Anonymous.is_anonymous());
        assert_eq!(Viewer::Anonymous.user_id(), None);
    }

    #[test]
    fn authenticated_viewer_exposes_id() {
        let id = Uuid::new_v4();
        let viewer = Viewer::User(id);
        assert!(!viewer.is_anonymous());
        assert_eq!(viewer.user_id(), Some(id));
    }
}
