//! Loading flag guard shared by the stores.

/// Holds a loading flag up until dropped, including on cancellation.
pub struct Busy<'a>(&'a mut bool);

impl<'a> Busy<'a> {
    #[must_use]
    pub fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
