use crate::core::models::Identity;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    identity: Option<Identity>,
}

impl SessionContext {
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.email.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub(crate) fn set(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub(crate) fn clear(&mut self) {
        self.identity = None;
    }
}
