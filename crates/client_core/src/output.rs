use shared::display::DisplayPayload;

/// What a view implements to receive user updates from the view model.
///
/// Only ever called on the thread that pumps the coordinator. Implementations
/// must not fail; anything that goes wrong while rendering is theirs to absorb.
pub trait UserViewOutput {
    fn update_view(&self, payload: &DisplayPayload);
}
