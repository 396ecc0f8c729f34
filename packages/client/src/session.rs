use jobboard_common::identity::AuthUser;
use tokio::sync::watch;

/// A consistent view of who is signed in, fed by the identity provider's
/// session-changed notifications. Cheap to clone; every clone observes the
/// same session.
#[derive(Clone, Debug)]
pub struct Session {
    rx: watch::Receiver<Option<AuthUser>>,
}

impl Session {
    pub fn new(rx: watch::Receiver<Option<AuthUser>>) -> Self {
        Self { rx }
    }

    /// A session that is never signed in.
    pub fn signed_out() -> Self {
        let (_, rx) = watch::channel(None);
        Self { rx }
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.rx.borrow().clone()
    }

    pub fn uid(&self) -> Option<String> {
        self.rx.borrow().as_ref().map(|user| user.uid.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait for the next sign-in or sign-out and return the new user.
    /// Returns the last known user once the provider is gone.
    pub async fn changed(&mut self) -> Option<AuthUser> {
        // An error only means the sender was dropped.
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }
}
