//! Terminal user card: the view side of the user view model.

use std::cell::{Cell, RefCell};

use client_core::UserViewOutput;
use shared::display::DisplayPayload;
use tokio::runtime::Runtime;

use crate::avatar::{AvatarImage, AvatarLoader};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AvatarState {
    #[default]
    Empty,
    Requested(String),
    Loaded { url: String, image: AvatarImage },
    Unavailable { url: String, reason: String },
}

#[derive(Default)]
pub struct UserCardView {
    email: RefCell<Option<String>>,
    avatar: RefCell<AvatarState>,
    updates: Cell<usize>,
}

impl UserCardView {
    pub fn email(&self) -> Option<String> {
        self.email.borrow().clone()
    }

    pub fn avatar(&self) -> AvatarState {
        self.avatar.borrow().clone()
    }

    pub fn updates(&self) -> usize {
        self.updates.get()
    }

    /// Loads a requested avatar. A bad url or bad bytes leaves the card
    /// without an image instead of failing.
    pub fn resolve_avatar(&self, runtime: &Runtime, loader: &dyn AvatarLoader) {
        let AvatarState::Requested(url) = self.avatar() else {
            return;
        };

        let next = match runtime.block_on(loader.load(&url)) {
            Ok(image) => {
                tracing::debug!(%url, width = image.width, height = image.height, "avatar loaded");
                AvatarState::Loaded { url, image }
            }
            Err(err) => {
                tracing::warn!(%url, "skipping avatar: {err}");
                AvatarState::Unavailable {
                    url,
                    reason: err.to_string(),
                }
            }
        };
        *self.avatar.borrow_mut() = next;
    }

    pub fn render(&self) -> String {
        let email = self.email().unwrap_or_else(|| "(loading)".to_string());
        let avatar = match self.avatar() {
            AvatarState::Empty => "avatar: (none)".to_string(),
            AvatarState::Requested(url) => format!("avatar: {url}"),
            AvatarState::Loaded { url, image } => format!(
                "avatar: {url} ({}x{}, {} bytes)",
                image.width, image.height, image.byte_len
            ),
            AvatarState::Unavailable { url, reason } => {
                format!("avatar: {url} (unavailable: {reason})")
            }
        };
        format!("email: {email}\n{avatar}")
    }
}

impl UserViewOutput for UserCardView {
    fn update_view(&self, payload: &DisplayPayload) {
        *self.email.borrow_mut() = Some(payload.email.clone());
        *self.avatar.borrow_mut() = AvatarState::Requested(payload.image_url.clone());
        self.updates.set(self.updates.get() + 1);
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
