//! Identity provider trait.
//!
//! Decouples the limiter and chat flow from any specific auth provider. The
//! limiter only needs to know whether someone is signed in; the chat flow also
//! uses the visitor details for backend requests and greetings.

use std::sync::Arc;

use mindneox_types::visitor::Visitor;

pub trait IdentityProvider: Send + Sync {
    /// The signed-in visitor, or None for an anonymous visitor.
    fn current_visitor(&self) -> Option<Visitor>;

    fn is_authenticated(&self) -> bool {
        self.current_visitor().is_some()
    }
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    fn current_visitor(&self) -> Option<Visitor> {
        (**self).current_visitor()
    }

    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }
}
