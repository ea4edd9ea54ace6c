/// Something a focus key manager can move focus to.
///
/// Takes `&self` because cells are shared (`Rc`) between the widget that renders them and the
/// manager that navigates them; implementors use interior mutability for their focus flag.
pub trait Focusable {
    fn focus(&self);
}

/// Items a list key manager should step over (for example, disabled chips).
pub trait Skippable {
    fn is_skipped(&self) -> bool {
        false
    }
}
