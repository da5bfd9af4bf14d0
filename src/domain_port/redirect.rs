/// Hard-navigation side effect on forced logout. A hard navigation (not a
/// client-side route change) so all in-memory state is discarded before the
/// next boot restores from storage.
pub trait LoginRedirector: Send + Sync {
    fn redirect_to_login(&self);
}
