use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::identity::{Credentials, IdentityProvider};
use crate::model::Role;
use crate::session::Session;
use crate::store::StorageBackend;

/// One identity check; on success the profile, with `role` attached, becomes
/// the session user. A failed check leaves the current session alone.
pub fn login<B: StorageBackend>(
    session: &mut Session<B>,
    identity: &dyn IdentityProvider,
    credentials: &Credentials,
    role: Role,
) -> Result<CmdResult> {
    let user = identity.authenticate(credentials)?.with_role(role);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Logged in as {} ({})",
        user.display_name(),
        user.role
    )));
    session.login(user.clone());
    Ok(result.with_user(Some(user)))
}

pub fn logout<B: StorageBackend>(session: &mut Session<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match session.current_user() {
        Some(user) => {
            result.add_message(CmdMessage::success(format!("Logged out {}", user.username)))
        }
        None => result.add_message(CmdMessage::info("Not logged in.")),
    }
    session.logout();
    Ok(result)
}

pub fn whoami<B: StorageBackend>(session: &Session<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !session.is_logged_in() {
        result.add_message(CmdMessage::info("Not logged in."));
    }
    Ok(result.with_user(session.current_user().cloned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PanelzError;
    use crate::identity::{Profile, StaticIdentity};
    use crate::store::mem_backend::MemBackend;
    use crate::store::Storage;
    use std::rc::Rc;

    fn credentials(password: &str) -> Credentials {
        Credentials {
            username: "emilys".into(),
            password: password.into(),
        }
    }

    fn identity() -> StaticIdentity {
        StaticIdentity::new(
            credentials("emilyspass"),
            Profile {
                id: "1".into(),
                username: "emilys".into(),
                email: Some("emily@x.com".into()),
                image: None,
                first_name: Some("Emily".into()),
                last_name: Some("Johnson".into()),
            },
        )
    }

    #[test]
    fn login_attaches_chosen_role_and_persists() {
        let storage = Rc::new(Storage::new(MemBackend::new()));
        let mut session = Session::init(storage.clone());

        let result =
            login(&mut session, &identity(), &credentials("emilyspass"), Role::Admin).unwrap();
        assert_eq!(result.user.as_ref().unwrap().role, Role::Admin);

        let reloaded = Session::init(storage);
        assert_eq!(reloaded.current_user().unwrap().username, "emilys");
        assert_eq!(
            whoami(&reloaded).unwrap().user.unwrap().display_name(),
            "Emily Johnson"
        );
    }

    #[test]
    fn failed_login_keeps_session_empty() {
        let storage = Rc::new(Storage::new(MemBackend::new()));
        let mut session = Session::init(storage);
        let err = login(&mut session, &identity(), &credentials("wrong"), Role::Admin)
            .unwrap_err();
        assert!(matches!(err, PanelzError::Identity(_)));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn logout_clears_session() {
        let storage = Rc::new(Storage::new(MemBackend::new()));
        let mut session = Session::init(storage.clone());
        login(&mut session, &identity(), &credentials("emilyspass"), Role::Panelist).unwrap();

        logout(&mut session).unwrap();
        assert!(!session.is_logged_in());
        assert!(!Session::init(storage).is_logged_in());
        assert!(whoami(&session).unwrap().user.is_none());
    }
}
